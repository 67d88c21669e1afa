use super::*;

#[test]
fn new_history_has_one_snapshot() {
    let history = History::new(0, None);
    assert_eq!(history.len(), 1);
    assert_eq!(history.current(), Some(&0));
    assert!(!history.can_undo());
    assert!(!history.can_redo());
}

#[test]
fn undo_at_start_is_none() {
    let mut history = History::new("a", None);
    assert_eq!(history.undo(), None);
    assert_eq!(history.index(), 0);
}

#[test]
fn undo_then_redo_walks_snapshots() {
    let mut history = History::new(0, None);
    history.push(1);
    history.push(2);
    assert_eq!(history.undo(), Some(&1));
    assert_eq!(history.undo(), Some(&0));
    assert_eq!(history.undo(), None);
    assert_eq!(history.redo(), Some(&1));
    assert_eq!(history.redo(), Some(&2));
    assert_eq!(history.redo(), None);
}

#[test]
fn push_after_undo_drops_future() {
    let mut history = History::new(0, None);
    history.push(1);
    history.push(2);
    history.undo();
    history.push(9);
    assert_eq!(history.len(), 3);
    assert!(!history.can_redo());
    assert_eq!(history.undo(), Some(&1));
}

#[test]
fn limit_evicts_oldest() {
    let mut history = History::new(0, Some(3));
    for n in 1..=5 {
        history.push(n);
    }
    assert_eq!(history.len(), 3);
    assert_eq!(history.current(), Some(&5));
    assert_eq!(history.undo(), Some(&4));
    assert_eq!(history.undo(), Some(&3));
    assert_eq!(history.undo(), None);
}

#[test]
fn reset_starts_over() {
    let mut history = History::new(0, None);
    history.push(1);
    history.reset(7);
    assert_eq!(history.len(), 1);
    assert_eq!(history.current(), Some(&7));
}

#[test]
fn for_each_mut_rewrites_all() {
    let mut history = History::new(1, None);
    history.push(2);
    history.for_each_mut(|n| *n *= 10);
    assert_eq!(history.current(), Some(&20));
    assert_eq!(history.undo(), Some(&10));
}
