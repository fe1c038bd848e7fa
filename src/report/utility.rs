use std::collections::BTreeMap;

/// Arithmetic mean of integer values. Returns `None` for empty input.
///
/// The sum is accumulated in `i128` so no realistic input can overflow
/// before the single conversion to `f64`.
pub fn mean(values: impl IntoIterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0i128, 0u64), |(sum, count), v| (sum + v as i128, count + 1));

    if count == 0 {
        return None;
    }
    Some(sum as f64 / count as f64)
}

/// Counts occurrences of each key. Keys come back in lexicographic order.
pub fn count_by<'a, T: 'a, F>(
    items: impl IntoIterator<Item = &'a T>,
    key: F,
) -> BTreeMap<String, usize>
where
    F: Fn(&'a T) -> &'a str,
{
    items.into_iter().fold(BTreeMap::new(), |mut counts, item| {
        *counts.entry(key(item).to_string()).or_insert(0) += 1;
        counts
    })
}
