/// Number of records matching `predicate`.
pub fn count_by<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}

/// Whole-number percentage of `completed` out of `total`, rounded half up.
///
/// Returns 0 when `total` is 0.
pub fn completion_rate(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(100c / t) == floor((200c + t) / 2t), kept in integers.
    let completed = completed as u64;
    let total = total as u64;
    ((200 * completed + total) / (2 * total)) as u32
}
