// src/dag/order.rs

use std::collections::VecDeque;

use petgraph::graph::NodeIndex;

use crate::dag::graph::DependencyMap;
use crate::dag::resolver::ResolvedDag;
use crate::types::TaskName;

/// A topological execution order for an acyclic dependency map.
///
/// Kahn's algorithm where a task's count is the number of its own
/// dependencies. Ready tasks are taken first-in first-out, seeded in
/// declaration order, and a finished task releases its dependents in
/// declaration order, so the output is reproducible.
pub fn execution_order(dag: &ResolvedDag) -> Vec<TaskName> {
    let map = dag.map();
    topological_indices(map)
        .into_iter()
        .map(|idx| map.name(idx).to_string())
        .collect()
}

/// Kahn's traversal by node index.
///
/// On a cyclic map the tasks on (or behind) a cycle never become ready and
/// are left out, which is why the public entry point takes a `ResolvedDag`.
pub(crate) fn topological_indices(map: &DependencyMap) -> Vec<NodeIndex> {
    let mut remaining: Vec<usize> = map.indices().map(|idx| map.dependency_count(idx)).collect();

    let mut ready: VecDeque<NodeIndex> = map
        .indices()
        .filter(|idx| remaining[idx.index()] == 0)
        .collect();

    let mut order = Vec::with_capacity(map.len());

    while let Some(idx) = ready.pop_front() {
        order.push(idx);

        for dependent in map.dependent_indices(idx) {
            let count = &mut remaining[dependent.index()];
            *count = count.saturating_sub(1);
            if *count == 0 {
                ready.push_back(dependent);
            }
        }
    }

    order
}
