//! Shared constants for the grid crate.

// ── Columns ─────────────────────────────────────────────────────

/// Key of the synthetic sequence-number column that is always leftmost.
pub const FIXED_COLUMN_KEY: &str = "sno";

/// Header label of the sequence-number column.
pub const FIXED_COLUMN_LABEL: &str = "S.No";

/// Row keys that carry bookkeeping rather than cell data.
pub const INTERNAL_KEYS: [&str; 2] = ["id", "_id"];

/// Any key starting with this prefix is bookkeeping too.
pub const INTERNAL_KEY_PREFIX: &str = "__";

/// Prefix of client-assigned row ids. Rows carrying one are unsaved.
pub const LOCAL_ID_PREFIX: &str = "new-";

// ── Tax fields ──────────────────────────────────────────────────

/// Combined goods-and-services tax column.
pub const GST_KEY: &str = "gst";

/// Central share of a split tax.
pub const CGST_KEY: &str = "cgst";

/// State share of a split tax. Always mirrors [`CGST_KEY`].
pub const SGST_KEY: &str = "sgst";

/// Upper bound for ordinary percentage columns.
pub const PERCENT_MAX: f64 = 100.0;

/// Upper bound for the combined tax rate.
pub const GST_MAX: f64 = 28.0;

/// Upper bound for each half of a split tax rate.
pub const SPLIT_GST_MAX: f64 = 14.0;

// ── Coercion ────────────────────────────────────────────────────

/// Literals accepted as `true` (compared case-insensitively).
pub const TRUE_LITERALS: [&str; 4] = ["true", "1", "yes", "on"];

/// Literals accepted as `false` (compared case-insensitively).
pub const FALSE_LITERALS: [&str; 4] = ["false", "0", "no", "off"];

// ── Pagination ──────────────────────────────────────────────────

/// Rows per page when the host does not choose.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page sizes offered in the page-size picker.
pub const PAGE_SIZE_OPTIONS: [usize; 5] = [5, 10, 25, 50, 100];
