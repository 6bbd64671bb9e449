//! Neighbor ranking and majority vote.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

/// Indices of the `k` smallest entries of `distances`, nearest first.
///
/// The sort is stable, so equal distances keep their reference-set order.
pub fn nearest_indices(distances: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..distances.len()).collect();
    order.sort_by_key(|&i| OrderedFloat(distances[i]));
    order.truncate(k);
    order
}

/// Returns the most frequent label, or `None` when `labels` is empty.
///
/// When several labels share the highest count, the smallest of them wins,
/// independent of the order in which the labels were seen.
pub fn majority_vote<'a, L, I>(labels: I) -> Option<L>
where
    L: Ord + Clone + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let mut label_counts: BTreeMap<&L, usize> = BTreeMap::new();
    for label in labels {
        *label_counts.entry(label).or_insert(0) += 1;
    }

    // max_by keeps the last maximum; reversing the label order makes that the smallest label.
    label_counts
        .into_iter()
        .max_by(|(label_a, count_a), (label_b, count_b)| {
            count_a.cmp(count_b).then_with(|| label_b.cmp(label_a))
        })
        .map(|(label, _)| label.clone())
}
