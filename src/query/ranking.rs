/// Ordered `(dimension value, metric)` pairs.
pub type Scores<V> = Vec<(String, V)>;

pub const DEFAULT_TOP_N: usize = 10;

/// The `n` highest entries, descending. Ties keep their input order.
pub fn top_n<K, V>(entries: &[(K, V)], n: usize) -> Vec<(K, V)>
where
    K: Clone,
    V: Ord + Copy,
{
    let mut ranked = sorted_descending(entries);
    ranked.truncate(n);
    ranked
}

/// Every non-zero entry, descending. Ties keep their input order.
pub fn rank_all_nonzero<K, V>(entries: &[(K, V)]) -> Vec<(K, V)>
where
    K: Clone,
    V: Ord + Copy + Default,
{
    let zero = V::default();
    let mut ranked = sorted_descending(entries);
    ranked.retain(|(_, value)| *value != zero);
    ranked
}

fn sorted_descending<K: Clone, V: Ord + Copy>(entries: &[(K, V)]) -> Vec<(K, V)> {
    let mut ranked = entries.to_vec();
    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}
