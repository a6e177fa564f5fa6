// tests/resolver_properties.rs

use std::collections::{HashMap, HashSet};

use flowdag::dag::{TaskRecord, is_acyclic, resolve};
use flowdag::errors::ResolveError;
use proptest::prelude::*;

// Acyclic by construction: task i may only depend on tasks 0..i.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<TaskRecord>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        );

        deps_strat.prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, potential)| {
                    let mut deps: Vec<String> = Vec::new();
                    if i > 0 {
                        for d in potential {
                            let name = format!("task_{}", d % i);
                            if !deps.contains(&name) {
                                deps.push(name);
                            }
                        }
                    }
                    TaskRecord::with_deps(format!("task_{i}"), deps)
                })
                .collect()
        })
    })
}

// Arbitrary graphs over a fixed name set; may or may not contain cycles.
fn any_graph_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<TaskRecord>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(0..num_tasks, 0..3),
            num_tasks,
        )
        .prop_map(|raw_deps| {
            raw_deps
                .into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    TaskRecord::with_deps(
                        format!("n{i}"),
                        deps.into_iter().map(|d| format!("n{d}")),
                    )
                })
                .collect()
        })
    })
}

fn dep_index(records: &[TaskRecord]) -> HashMap<&str, Vec<&str>> {
    records
        .iter()
        .map(|r| {
            (
                r.name.as_str(),
                r.depends_on.iter().map(String::as_str).collect(),
            )
        })
        .collect()
}

fn reaches(deps: &HashMap<&str, Vec<&str>>, from: &str, target: &str) -> bool {
    let mut stack: Vec<&str> = deps.get(from).cloned().unwrap_or_default();
    let mut seen: HashSet<&str> = HashSet::new();
    while let Some(current) = stack.pop() {
        if current == target {
            return true;
        }
        if seen.insert(current) {
            stack.extend(deps.get(current).cloned().unwrap_or_default());
        }
    }
    false
}

proptest! {
    #[test]
    fn resolved_maps_are_acyclic(records in dag_strategy(25)) {
        let dag = resolve(&records).expect("generated DAG must resolve");
        prop_assert!(is_acyclic(dag.map()));
    }

    #[test]
    fn execution_order_is_a_valid_permutation(records in dag_strategy(25)) {
        let dag = resolve(&records).expect("generated DAG must resolve");
        let order = dag.execution_order();

        prop_assert_eq!(order.len(), records.len());
        let unique: HashSet<&String> = order.iter().collect();
        prop_assert_eq!(unique.len(), records.len());

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();
        for record in &records {
            for dep in &record.depends_on {
                prop_assert!(position[dep.as_str()] < position[record.name.as_str()]);
            }
        }
    }

    #[test]
    fn levels_increase_along_every_dependency(records in dag_strategy(25)) {
        let dag = resolve(&records).expect("generated DAG must resolve");
        let levels = dag.levels();

        for record in &records {
            let level = levels[&record.name];
            if record.depends_on.is_empty() {
                prop_assert_eq!(level, 0);
            }
            for dep in &record.depends_on {
                prop_assert!(levels[dep] < level);
            }
        }
    }

    #[test]
    fn parallel_groups_partition_without_internal_dependencies(records in dag_strategy(25)) {
        let dag = resolve(&records).expect("generated DAG must resolve");
        let groups = dag.parallel_groups();
        let deps = dep_index(&records);

        let flat: Vec<&String> = groups.iter().flatten().collect();
        prop_assert_eq!(flat.len(), records.len());
        let unique: HashSet<&String> = flat.iter().copied().collect();
        prop_assert_eq!(unique.len(), records.len());

        for group in &groups {
            prop_assert!(!group.is_empty());
            for a in group {
                for b in group {
                    if a != b {
                        prop_assert!(!reaches(&deps, a, b), "{} reaches {} inside one group", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn resolve_is_idempotent(records in dag_strategy(25)) {
        let first = resolve(&records).expect("generated DAG must resolve").to_map();
        let second = resolve(&records).expect("generated DAG must resolve").to_map();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_graphs_either_resolve_or_report_a_real_cycle(records in any_graph_strategy(12)) {
        let deps = dep_index(&records);

        match resolve(&records) {
            Ok(dag) => {
                prop_assert!(is_acyclic(dag.map()));
                prop_assert_eq!(dag.execution_order().len(), records.len());
            }
            Err(ResolveError::CircularDependency { cycle }) => {
                prop_assert!(cycle.len() >= 2);
                prop_assert_eq!(cycle.first(), cycle.last());
                for pair in cycle.windows(2) {
                    let (task, dep) = (pair[0].as_str(), pair[1].as_str());
                    prop_assert!(deps[task].contains(&dep), "{} does not depend on {}", task, dep);
                }
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}
