//! Reciprocal Rank Fusion over any number of ranked lists.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

pub const DEFAULT_RRF_K: f32 = 60.0;

/// Fuse rankings into `(key, Σ 1/(rank + rrf_k))`, highest first.
///
/// Ranks are 0-based. A key contributes once per list, at its best rank.
/// Equal fused scores keep first-seen order (earlier lists first).
pub fn reciprocal_rank_fusion<K>(lists: &[Vec<K>], rrf_k: f32, limit: usize) -> Vec<(K, f32)>
where
    K: Hash + Eq + Clone,
{
    let mut fused: Vec<(K, f32)> = Vec::new();
    let mut slot: HashMap<K, usize> = HashMap::new();
    for list in lists {
        let mut seen: HashSet<&K> = HashSet::with_capacity(list.len());
        for (rank, key) in list.iter().enumerate() {
            if !seen.insert(key) {
                continue;
            }
            let contribution = 1.0 / (rank as f32 + rrf_k);
            match slot.get(key) {
                Some(&i) => fused[i].1 += contribution,
                None => {
                    slot.insert(key.clone(), fused.len());
                    fused.push((key.clone(), contribution));
                }
            }
        }
    }
    fused.sort_by(|a, b| b.1.total_cmp(&a.1));
    fused.truncate(limit);
    fused
}
