/// Stable move of one element: remove it at `from` and reinsert it at `to`.
/// Indices past the end are clamped to the last slot.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
}
