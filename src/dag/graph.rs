// src/dag/graph.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::errors::ResolveError;
use crate::types::TaskName;

/// A task as the resolver sees it: a name plus its normalized prerequisites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub name: TaskName,
    pub depends_on: Vec<TaskName>,
}

impl TaskRecord {
    /// A task with no dependencies.
    pub fn new<N: Into<TaskName>>(name: N) -> Self {
        Self {
            name: name.into(),
            depends_on: Vec::new(),
        }
    }

    pub fn with_deps<N, I, D>(name: N, deps: I) -> Self
    where
        N: Into<TaskName>,
        I: IntoIterator<Item = D>,
        D: Into<TaskName>,
    {
        Self {
            name: name.into(),
            depends_on: deps.into_iter().map(Into::into).collect(),
        }
    }
}

/// Task name -> direct prerequisites, stored as an arena graph.
///
/// Node indices follow declaration order. Edges point from a dependency to
/// its dependent, so for
///
/// ```toml
/// [[tasks]]
/// name = "B"
/// depends_on = "A"
/// ```
///
/// there is an edge `A -> B`. A `DependencyMap` is referentially closed but
/// may still contain cycles; see [`crate::dag::resolve`] for the acyclic
/// wrapper.
#[derive(Debug, Clone, Default)]
pub struct DependencyMap {
    graph: DiGraph<TaskName, ()>,
    index: HashMap<TaskName, NodeIndex>,
}

impl DependencyMap {
    /// Build a map from task records.
    ///
    /// All names are registered before any dependency is looked at, so an
    /// unknown dependency is reported as [`ResolveError::MissingTask`] no
    /// matter where the referenced name would have appeared. Cycles are not
    /// checked here.
    pub fn from_records(records: &[TaskRecord]) -> Result<Self, ResolveError> {
        let mut graph: DiGraph<TaskName, ()> = DiGraph::with_capacity(records.len(), 0);
        let mut index: HashMap<TaskName, NodeIndex> = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.name) {
                return Err(ResolveError::DuplicateTaskName {
                    name: record.name.clone(),
                });
            }
            let idx = graph.add_node(record.name.clone());
            index.insert(record.name.clone(), idx);
        }

        for record in records {
            let task_idx = index[&record.name];
            let mut linked: HashSet<NodeIndex> = HashSet::with_capacity(record.depends_on.len());
            for dep in &record.depends_on {
                let dep_idx = index.get(dep).copied().ok_or_else(|| {
                    ResolveError::MissingTask {
                        task: record.name.clone(),
                        dependency: dep.clone(),
                    }
                })?;
                if !linked.insert(dep_idx) {
                    continue;
                }
                graph.add_edge(dep_idx, task_idx, ());
            }
        }

        debug!(
            tasks = graph.node_count(),
            edges = graph.edge_count(),
            "built dependency map"
        );

        Ok(Self { graph, index })
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All task names in declaration order.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.graph.node_indices().map(|idx| self.graph[idx].as_str())
    }

    /// Direct dependencies of a task, in the order they were declared.
    ///
    /// Unknown names have no dependencies.
    pub fn dependencies_of(&self, name: &str) -> Vec<&str> {
        match self.index.get(name) {
            Some(&idx) => self
                .dependency_indices(idx)
                .into_iter()
                .map(|dep| self.name(dep))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Direct dependents of a task (tasks that list it in `depends_on`),
    /// in declaration order.
    pub fn dependents_of(&self, name: &str) -> Vec<&str> {
        match self.index.get(name) {
            Some(&idx) => self
                .dependent_indices(idx)
                .into_iter()
                .map(|dep| self.name(dep))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Plain owned copy of the map, keyed by task name.
    pub fn to_map(&self) -> BTreeMap<TaskName, Vec<TaskName>> {
        self.graph
            .node_indices()
            .map(|idx| {
                let deps = self
                    .dependency_indices(idx)
                    .into_iter()
                    .map(|dep| self.graph[dep].clone())
                    .collect();
                (self.graph[idx].clone(), deps)
            })
            .collect()
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub(crate) fn name(&self, idx: NodeIndex) -> &str {
        self.graph[idx].as_str()
    }

    pub(crate) fn dependency_count(&self, idx: NodeIndex) -> usize {
        self.graph.edges_directed(idx, Direction::Incoming).count()
    }

    /// Dependencies by index; edge ids grow with insertion, so sorting by
    /// them restores declaration order.
    pub(crate) fn dependency_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| (edge.id(), edge.source()))
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, source)| source).collect()
    }

    pub(crate) fn dependent_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut dependents: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        dependents.sort();
        dependents
    }
}
