//! Table model: column descriptors, rows, and column derivation.
//!
//! Rows arrive from the host as JSON objects shaped like the backend's line
//! items. The `id` key is lifted out into a [`RowId`] so that identity stays
//! stable while values and position change; every other key is a cell value.
//! Columns come from an explicit host configuration when one is supplied and
//! are otherwise inferred from the first row.

#[cfg(test)]
#[path = "table_test.rs"]
mod table_test;

use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use time::Date;

use crate::coerce::format_date;
use crate::consts::{FIXED_COLUMN_KEY, FIXED_COLUMN_LABEL, INTERNAL_KEY_PREFIX, INTERNAL_KEYS, LOCAL_ID_PREFIX};
use crate::error::GridError;

/// Semantic type declared by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Free text.
    #[default]
    String,
    /// Integer or decimal number.
    Number,
    /// Yes/no flag.
    Boolean,
    /// Calendar date stored as `YYYY-MM-DD`.
    Date,
}

impl ColumnType {
    /// Value given to this column in a freshly inserted row.
    #[must_use]
    pub fn default_value(self, today: Date) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Number => Value::from(0),
            Self::Boolean => Value::Bool(false),
            Self::Date => Value::String(format_date(today)),
        }
    }

    /// Lowercase name as it appears in column configs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "string" | "text" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" => Ok(Self::Date),
            other => Err(GridError::UnknownColumnType(other.to_owned())),
        }
    }
}

/// Describes one column of the grid.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDescriptor {
    /// Row key this column reads and writes.
    pub key: String,
    /// Header text.
    #[serde(default)]
    pub label: String,
    /// Declared semantic type.
    #[serde(rename = "type", default)]
    pub kind: ColumnType,
    /// Whether cells accept edits, pastes and drops.
    #[serde(default = "default_true")]
    pub is_editable: bool,
    /// Whether a blank value is a validation error.
    #[serde(default)]
    pub is_required: bool,
    /// Whether the value is a percentage in `[0, 100]` (or a tax cap).
    #[serde(default)]
    pub is_percentage: bool,
    /// Whether the value is a currency amount. Display hint only.
    #[serde(default)]
    pub is_currency: bool,
    /// The non-movable sequence-number column.
    #[serde(default)]
    pub fixed: bool,
}

fn default_true() -> bool {
    true
}

impl ColumnDescriptor {
    /// An editable, optional column.
    pub fn new(key: impl Into<String>, label: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
            is_editable: true,
            is_required: false,
            is_percentage: false,
            is_currency: false,
            fixed: false,
        }
    }

    /// The synthetic sequence-number column.
    #[must_use]
    pub fn sequence() -> Self {
        Self {
            key: FIXED_COLUMN_KEY.to_owned(),
            label: FIXED_COLUMN_LABEL.to_owned(),
            kind: ColumnType::Number,
            is_editable: false,
            is_required: false,
            is_percentage: false,
            is_currency: false,
            fixed: true,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    #[must_use]
    pub fn percentage(mut self) -> Self {
        self.is_percentage = true;
        self
    }

    #[must_use]
    pub fn currency(mut self) -> Self {
        self.is_currency = true;
        self
    }

    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.is_editable = false;
        self
    }

    /// Whether this column takes part in selection, drag, shift and reorder.
    #[must_use]
    pub fn is_movable(&self) -> bool {
        !self.fixed && self.key != FIXED_COLUMN_KEY
    }

    /// Whether cells in this column accept writes.
    #[must_use]
    pub fn accepts_writes(&self) -> bool {
        self.is_editable && self.is_movable()
    }
}

/// Stable identity of a row.
///
/// Backend ids are kept verbatim, including their JSON form: a numeric id
/// goes back out as a number. Ids compare by text, so `42` and `"42"` name
/// the same row. Client-inserted rows carry `new-<millis>` until a save
/// replaces it; an empty id is assigned one on load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct RowId {
    text: String,
    number: Option<Number>,
}

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { text: id.into(), number: None }
    }

    /// A client-side id stamped with the given epoch milliseconds.
    #[must_use]
    pub fn local(now_ms: i64) -> Self {
        Self::new(format!("{LOCAL_ID_PREFIX}{now_ms}"))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// No id has been assigned yet.
    #[must_use]
    pub fn is_unassigned(&self) -> bool {
        self.text.is_empty()
    }

    /// The backend has issued this id.
    #[must_use]
    pub fn is_persisted(&self) -> bool {
        !self.text.is_empty() && !self.text.starts_with(LOCAL_ID_PREFIX)
    }

    /// Read an id from its JSON form. `null` is an unassigned id.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidRowId`] for anything but a string, number
    /// or `null`.
    pub fn from_json(value: &Value) -> Result<Self, GridError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::String(s) => Ok(Self::new(s.clone())),
            Value::Number(n) => Ok(Self { text: n.to_string(), number: Some(n.clone()) }),
            other => Err(GridError::InvalidRowId(other.to_string())),
        }
    }

    /// The id in the JSON form it arrived in.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match &self.number {
            Some(n) => Value::Number(n.clone()),
            None => Value::String(self.text.clone()),
        }
    }
}

impl PartialEq for RowId {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for RowId {}

impl Hash for RowId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl TryFrom<Value> for RowId {
    type Error = GridError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl From<RowId> for Value {
    fn from(id: RowId) -> Self {
        id.to_json()
    }
}

impl From<Number> for RowId {
    fn from(n: Number) -> Self {
        Self { text: n.to_string(), number: Some(n) }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One line of the table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Row {
    /// Identity that never changes across edits or moves.
    pub id: RowId,
    /// Cell values keyed by column key, in source order.
    pub values: Map<String, Value>,
}

static NULL: Value = Value::Null;

impl Row {
    pub fn new(id: RowId) -> Self {
        Self { id, values: Map::new() }
    }

    /// Builder-style value insertion.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Value at `key`; `null` when the row has no such key.
    #[must_use]
    pub fn get(&self, key: &str) -> &Value {
        self.values.get(key).unwrap_or(&NULL)
    }

    /// Write `value` at `key`. Returns whether the stored value changed.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        if self.values.get(key) == Some(&value) {
            return false;
        }
        self.values.insert(key.to_owned(), value);
        true
    }

    /// Whether the backend has not assigned this row an id yet.
    #[must_use]
    pub fn is_unsaved(&self) -> bool {
        !self.id.is_persisted()
    }
}

impl TryFrom<Map<String, Value>> for Row {
    type Error = GridError;

    fn try_from(mut values: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match values.shift_remove("id") {
            Some(raw) => RowId::from_json(&raw)?,
            None => RowId::default(),
        };
        Ok(Self { id, values })
    }
}

impl From<Row> for Map<String, Value> {
    fn from(row: Row) -> Self {
        let mut out = Map::with_capacity(row.values.len() + 1);
        if !row.id.is_unassigned() {
            out.insert("id".to_owned(), row.id.to_json());
        }
        out.extend(row.values);
        out
    }
}

/// Parse a JSON array of row objects.
///
/// # Errors
///
/// Returns [`GridError::RowsNotArray`] when `value` is not an array,
/// [`GridError::RowNotObject`] for a non-object element and
/// [`GridError::InvalidRowId`] for an id that is neither string nor number.
pub fn rows_from_json(value: Value) -> Result<Vec<Row>, GridError> {
    let Value::Array(items) = value else {
        return Err(GridError::RowsNotArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Row::try_from(map),
            _ => Err(GridError::RowNotObject { index }),
        })
        .collect()
}

/// Whether a row key is bookkeeping rather than a displayable value.
#[must_use]
pub fn is_internal_key(key: &str) -> bool {
    INTERNAL_KEYS.contains(&key) || key.starts_with(INTERNAL_KEY_PREFIX)
}

/// Build the displayed column list.
///
/// The sequence column always comes first. An explicit `config` is used
/// verbatim apart from any copy of the sequence column; without one, columns
/// are inferred from the first row as editable strings. Duplicate keys keep
/// their first occurrence.
#[must_use]
pub fn derive_columns(config: Option<&[ColumnDescriptor]>, rows: &[Row]) -> Vec<ColumnDescriptor> {
    let candidates: Vec<ColumnDescriptor> = match config {
        Some(columns) => columns.iter().filter(|c| c.key != FIXED_COLUMN_KEY).cloned().collect(),
        None => rows
            .first()
            .map(|row| {
                row.values
                    .keys()
                    .filter(|key| !is_internal_key(key) && key.as_str() != FIXED_COLUMN_KEY)
                    .map(|key| ColumnDescriptor::new(key.clone(), key.clone(), ColumnType::String))
                    .collect()
            })
            .unwrap_or_default(),
    };

    let mut seen = HashSet::new();
    let mut columns = vec![ColumnDescriptor::sequence()];
    for column in candidates {
        if seen.insert(column.key.clone()) {
            columns.push(column);
        }
    }
    columns
}
