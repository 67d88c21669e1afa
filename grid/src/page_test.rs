use super::*;

fn view(n: usize) -> Vec<usize> {
    (0..n).collect()
}

// =============================================================
// Local mode
// =============================================================

#[test]
fn local_page_range_slices_view() {
    let mut pager = Pager::new(PaginationMode::Local, 10);
    assert_eq!(pager.page_range(25), 0..10);
    pager.page = 2;
    assert_eq!(pager.page_range(25), 20..25);
    assert_eq!(pager.page_len(25), 5);
}

#[test]
fn local_to_absolute_applies_page_offset() {
    let mut pager = Pager::new(PaginationMode::Local, 10);
    pager.page = 1;
    assert_eq!(pager.to_absolute(&view(25), 0), Some(10));
    assert_eq!(pager.to_absolute(&view(25), 9), Some(19));
    assert_eq!(pager.to_absolute(&view(15), 5), None);
}

#[test]
fn to_absolute_follows_filtered_view() {
    let pager = Pager::new(PaginationMode::Local, 2);
    let filtered = vec![3, 7, 8];
    assert_eq!(pager.to_absolute(&filtered, 1), Some(7));
    assert_eq!(pager.to_absolute(&filtered, 2), None);
    assert_eq!(pager.to_page_row(&filtered, 7), Some(1));
    assert_eq!(pager.to_page_row(&filtered, 8), None);
}

#[test]
fn page_count_rounds_up_and_is_never_zero() {
    let pager = Pager::new(PaginationMode::Local, 10);
    assert_eq!(pager.page_count(0), 1);
    assert_eq!(pager.page_count(10), 1);
    assert_eq!(pager.page_count(11), 2);
}

#[test]
fn sequence_numbers_continue_across_pages() {
    let mut pager = Pager::new(PaginationMode::Local, 5);
    pager.page = 2;
    assert_eq!(pager.sequence_number(0), 11);
    assert_eq!(pager.page_of(11), 2);
}

#[test]
fn unpaginated_size_does_not_overflow() {
    let pager = Pager::new(PaginationMode::Local, usize::MAX);
    assert_eq!(pager.page_range(3), 0..3);
    assert_eq!(pager.page_count(3), 1);
}

// =============================================================
// Remote mode
// =============================================================

#[test]
fn remote_rows_are_already_the_page() {
    let mut pager = Pager::new(PaginationMode::Remote, 10);
    pager.page = 4;
    assert_eq!(pager.page_range(10), 0..10);
    assert_eq!(pager.to_absolute(&view(10), 3), Some(3));
    assert_eq!(pager.sequence_number(0), 41);
}

#[test]
fn remote_page_count_uses_server_total() {
    let mut pager = Pager::new(PaginationMode::Remote, 10);
    pager.total = Some(95);
    assert_eq!(pager.page_count(10), 10);
}

#[test]
fn zero_page_size_is_bumped_to_one() {
    assert_eq!(Pager::new(PaginationMode::Local, 0).page_size, 1);
}
