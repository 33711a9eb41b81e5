use std::collections::HashMap;
use std::hash::Hash;

/// Groups items by key. Groups appear in the order their key was first seen
/// and items keep their relative order within a group.
pub fn group_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key_selector: F) -> Vec<(K, Vec<T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    let mut result: Vec<(K, Vec<T>)> = Vec::new();
    let mut positions: HashMap<K, usize> = HashMap::new();

    for item in items {
        let key = key_selector(&item);
        match positions.get(&key) {
            Some(&index) => result[index].1.push(item),
            None => {
                positions.insert(key.clone(), result.len());
                result.push((key, vec![item]));
            }
        }
    }

    result
}

/// Distinct keys in first-seen order.
pub fn distinct_by_key<T, K, F>(items: impl IntoIterator<Item = T>, key_selector: F) -> Vec<K>
where
    K: Eq + Hash + Clone,
    F: Fn(&T) -> K,
{
    group_by_key(items, key_selector)
        .into_iter()
        .map(|(key, _)| key)
        .collect()
}
