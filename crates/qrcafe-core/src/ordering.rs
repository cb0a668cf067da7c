// ── Drag-and-drop helpers ──
//
// `move_item` produces the reordered sibling list; the reorder commands then
// persist its id sequence in one call.

pub use qrcafe_api::sort_siblings;

/// Move the element at `from` to position `to`, shifting the rest.
///
/// Out-of-range indices are clamped to the last position. Returns a new list
/// and leaves `items` untouched.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    if out.is_empty() {
        return out;
    }
    let last = out.len() - 1;
    let from = from.min(last);
    let to = to.min(last);
    let item = out.remove(from);
    out.insert(to, item);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_forward_and_back() {
        assert_eq!(move_item(&[1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
        assert_eq!(move_item(&[1, 2, 3, 4], 3, 0), vec![4, 1, 2, 3]);
        assert_eq!(move_item(&[1, 2, 3], 1, 1), vec![1, 2, 3]);
    }

    #[test]
    fn clamps_out_of_range() {
        assert_eq!(move_item(&[3, 1, 2], 0, 99), vec![1, 2, 3]);
        assert!(move_item::<i64>(&[], 0, 1).is_empty());
    }
}
