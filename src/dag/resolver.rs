// src/dag/resolver.rs

use std::collections::BTreeMap;
use std::ops::Deref;

use tracing::debug;

use crate::dag::cycle::detect_cycle;
use crate::dag::graph::{DependencyMap, TaskRecord};
use crate::dag::{levels, order};
use crate::errors::ResolveError;
use crate::types::TaskName;

/// A dependency map that is known to be acyclic.
///
/// The only ways to obtain one are [`resolve`] and
/// `ResolvedDag::try_from(DependencyMap)`, both of which run
/// [`detect_cycle`] first. The order / level / group views are therefore
/// total on this type.
#[derive(Debug, Clone, Default)]
pub struct ResolvedDag {
    map: DependencyMap,
}

impl ResolvedDag {
    pub fn map(&self) -> &DependencyMap {
        &self.map
    }

    pub fn execution_order(&self) -> Vec<TaskName> {
        order::execution_order(self)
    }

    pub fn levels(&self) -> BTreeMap<TaskName, usize> {
        levels::levels(self)
    }

    pub fn parallel_groups(&self) -> Vec<Vec<TaskName>> {
        levels::parallel_groups(self)
    }

    /// Highest level in the graph (0 for an empty graph).
    pub fn max_depth(&self) -> usize {
        levels::level_vec(&self.map).into_iter().max().unwrap_or(0)
    }

    /// Whether any task has at least one dependency.
    pub fn has_dependencies(&self) -> bool {
        self.map
            .indices()
            .any(|idx| self.map.dependency_count(idx) > 0)
    }
}

impl Deref for ResolvedDag {
    type Target = DependencyMap;

    fn deref(&self) -> &Self::Target {
        &self.map
    }
}

impl TryFrom<DependencyMap> for ResolvedDag {
    type Error = ResolveError;

    fn try_from(map: DependencyMap) -> Result<Self, Self::Error> {
        detect_cycle(&map)?;
        Ok(Self { map })
    }
}

/// Resolve task records into an acyclic dependency map.
///
/// Checks, in this order:
/// - duplicate task names,
/// - dependencies on undeclared tasks,
/// - cycles.
pub fn resolve(records: &[TaskRecord]) -> Result<ResolvedDag, ResolveError> {
    let map = DependencyMap::from_records(records)?;
    let dag = ResolvedDag::try_from(map)?;

    debug!(tasks = dag.len(), "resolved task dependencies");
    Ok(dag)
}
