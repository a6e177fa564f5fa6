// src/dag/cycle.rs

//! Cycle detection over a [`DependencyMap`].

use petgraph::graph::NodeIndex;
use tracing::debug;

use crate::dag::graph::DependencyMap;
use crate::errors::ResolveError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Finished,
}

/// One entry of the DFS path: a node and how far we got through its deps.
struct Frame {
    node: NodeIndex,
    deps: Vec<NodeIndex>,
    next: usize,
}

impl Frame {
    fn new(map: &DependencyMap, node: NodeIndex) -> Self {
        Self {
            node,
            deps: map.dependency_indices(node),
            next: 0,
        }
    }
}

/// Check a dependency map for cycles.
///
/// Depth-first search following dependency edges, with roots taken in
/// declaration order. The frame stack is the current path; when the search
/// reaches a node that is still on it, the reported cycle is the path from
/// that node's position to the end, followed by the node again. A path
/// `[A, B, C]` that reaches `B` reports `[B, C, B]`; a self-dependent task
/// reports `[A, A]`.
pub fn detect_cycle(map: &DependencyMap) -> Result<(), ResolveError> {
    let mut colors = vec![Color::Unvisited; map.len()];

    for root in map.indices() {
        if colors[root.index()] != Color::Unvisited {
            continue;
        }

        colors[root.index()] = Color::InProgress;
        let mut path: Vec<Frame> = vec![Frame::new(map, root)];

        while let Some(frame) = path.last_mut() {
            let node = frame.node;
            let next_dep = frame.deps.get(frame.next).copied();
            frame.next += 1;

            let Some(dep) = next_dep else {
                colors[node.index()] = Color::Finished;
                path.pop();
                continue;
            };

            match colors[dep.index()] {
                Color::Finished => {}
                Color::Unvisited => {
                    colors[dep.index()] = Color::InProgress;
                    path.push(Frame::new(map, dep));
                }
                Color::InProgress => {
                    let start = path.iter().position(|f| f.node == dep).unwrap_or(0);
                    let mut cycle: Vec<String> = path[start..]
                        .iter()
                        .map(|f| map.name(f.node).to_string())
                        .collect();
                    cycle.push(map.name(dep).to_string());

                    debug!(cycle = ?cycle, "cycle found in dependency map");
                    return Err(ResolveError::CircularDependency { cycle });
                }
            }
        }
    }

    Ok(())
}

/// Whether [`detect_cycle`] would succeed.
pub fn is_acyclic(map: &DependencyMap) -> bool {
    detect_cycle(map).is_ok()
}
