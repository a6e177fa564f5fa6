// src/dag/levels.rs

use std::collections::BTreeMap;

use crate::dag::graph::DependencyMap;
use crate::dag::order::topological_indices;
use crate::dag::resolver::ResolvedDag;
use crate::types::TaskName;

/// Level of every task: 0 without dependencies, otherwise one more than
/// the highest level among its dependencies.
pub fn levels(dag: &ResolvedDag) -> BTreeMap<TaskName, usize> {
    let map = dag.map();
    let levels = level_vec(map);
    map.indices()
        .map(|idx| (map.name(idx).to_string(), levels[idx.index()]))
        .collect()
}

/// Tasks grouped by level, lowest level first.
///
/// Only levels that actually occur produce a group. Inside a group, tasks
/// keep declaration order.
pub fn parallel_groups(dag: &ResolvedDag) -> Vec<Vec<TaskName>> {
    let map = dag.map();
    let levels = level_vec(map);

    let mut buckets: BTreeMap<usize, Vec<TaskName>> = BTreeMap::new();
    for idx in map.indices() {
        buckets
            .entry(levels[idx.index()])
            .or_default()
            .push(map.name(idx).to_string());
    }

    buckets.into_values().collect()
}

/// Levels indexed by node index.
///
/// Walks the topological order, so every dependency already has its level
/// when a task is reached. No recursion, so deep chains are fine.
pub(crate) fn level_vec(map: &DependencyMap) -> Vec<usize> {
    let mut levels = vec![0usize; map.len()];

    for idx in topological_indices(map) {
        levels[idx.index()] = map
            .dependency_indices(idx)
            .into_iter()
            .map(|dep| levels[dep.index()] + 1)
            .max()
            .unwrap_or(0);
    }

    levels
}
