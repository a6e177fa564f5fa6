// tests/resolver_scenarios.rs
mod common;
use crate::common::builders::records;
use crate::common::{TestResult, init_tracing};

use std::collections::BTreeMap;

use flowdag::dag::{
    DependencyMap, ResolvedDag, TaskRecord, detect_cycle, execution_order, is_acyclic, levels,
    parallel_groups, resolve,
};
use flowdag::errors::ResolveError;

fn level_map(pairs: &[(&str, usize)]) -> BTreeMap<String, usize> {
    pairs.iter().map(|(n, l)| (n.to_string(), *l)).collect()
}

#[test]
fn linear_chain_orders_levels_and_groups() -> TestResult {
    init_tracing();

    let dag = resolve(&records(&[("A", &[]), ("B", &["A"]), ("C", &["B"])]))?;

    assert_eq!(execution_order(&dag), vec!["A", "B", "C"]);
    assert_eq!(levels(&dag), level_map(&[("A", 0), ("B", 1), ("C", 2)]));
    assert_eq!(
        parallel_groups(&dag),
        vec![vec!["A".to_string()], vec!["B".to_string()], vec!["C".to_string()]]
    );
    Ok(())
}

#[test]
fn fan_out_fan_in_groups_middle_tasks_together() -> TestResult {
    init_tracing();

    let dag = resolve(&records(&[
        ("S", &[]),
        ("P1", &["S"]),
        ("P2", &["S"]),
        ("E", &["P1", "P2"]),
    ]))?;

    assert_eq!(
        dag.levels(),
        level_map(&[("S", 0), ("P1", 1), ("P2", 1), ("E", 2)])
    );

    let groups = dag.parallel_groups();
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0], vec!["S"]);
    let mut middle = groups[1].clone();
    middle.sort();
    assert_eq!(middle, vec!["P1", "P2"]);
    assert_eq!(groups[2], vec!["E"]);

    assert_eq!(dag.max_depth(), 2);
    assert!(dag.has_dependencies());
    Ok(())
}

#[test]
fn two_task_cycle_is_reported_from_repeated_node() {
    init_tracing();

    let err = resolve(&records(&[("A", &["B"]), ("B", &["A"])])).unwrap_err();

    match err {
        ResolveError::CircularDependency { ref cycle } => {
            let ab = vec!["A".to_string(), "B".to_string(), "A".to_string()];
            let ba = vec!["B".to_string(), "A".to_string(), "B".to_string()];
            assert!(cycle == &ab || cycle == &ba, "unexpected cycle {cycle:?}");
        }
        other => panic!("expected CircularDependency, got {other:?}"),
    }
    assert!(err.to_string().contains("A -> B -> A") || err.to_string().contains("B -> A -> B"));
}

#[test]
fn missing_dependency_names_both_tasks() {
    init_tracing();

    let err = resolve(&records(&[("A", &["ghost"])])).unwrap_err();

    assert_eq!(
        err,
        ResolveError::MissingTask {
            task: "A".to_string(),
            dependency: "ghost".to_string(),
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("'A'"));
    assert!(msg.contains("'ghost'"));
}

#[test]
fn self_dependency_is_a_cycle_of_one() {
    init_tracing();

    let err = resolve(&records(&[("A", &["A"])])).unwrap_err();
    assert_eq!(err.cycle(), Some(&["A".to_string(), "A".to_string()][..]));
}

#[test]
fn cycle_starts_at_earlier_occurrence_not_path_start() -> TestResult {
    init_tracing();

    // Path from A: A -> B -> C -> B.
    let map = DependencyMap::from_records(&records(&[
        ("A", &["B"]),
        ("B", &["C"]),
        ("C", &["B"]),
    ]))?;

    let err = detect_cycle(&map).unwrap_err();
    assert_eq!(
        err.cycle(),
        Some(&["B".to_string(), "C".to_string(), "B".to_string()][..])
    );
    assert!(!is_acyclic(&map));
    Ok(())
}

#[test]
fn missing_task_wins_over_cycle() {
    init_tracing();

    let err = resolve(&records(&[("A", &["B"]), ("B", &["A", "nope"])])).unwrap_err();
    assert!(matches!(err, ResolveError::MissingTask { ref dependency, .. } if dependency == "nope"));
}

#[test]
fn duplicate_names_are_rejected_not_merged() {
    init_tracing();

    let err = resolve(&records(&[("A", &[]), ("B", &[]), ("A", &["B"])])).unwrap_err();
    assert_eq!(
        err,
        ResolveError::DuplicateTaskName {
            name: "A".to_string()
        }
    );
}

#[test]
fn disjoint_cycles_report_a_cycle_of_truly_cyclic_tasks() {
    init_tracing();

    let input = records(&[
        ("root", &[]),
        ("X", &["Y", "root"]),
        ("Y", &["X"]),
        ("P", &["Q"]),
        ("Q", &["P"]),
    ]);
    let cyclic = ["X", "Y", "P", "Q"];

    let err = resolve(&input).unwrap_err();
    let cycle = err.cycle().expect("expected a cycle");
    assert!(cycle.len() >= 2);
    assert_eq!(cycle.first(), cycle.last());
    assert!(cycle.iter().all(|name| cyclic.contains(&name.as_str())));
}

#[test]
fn empty_input_resolves_to_empty_views() -> TestResult {
    let dag = resolve(&[])?;

    assert!(dag.is_empty());
    assert!(execution_order(&dag).is_empty());
    assert!(levels(&dag).is_empty());
    assert!(parallel_groups(&dag).is_empty());
    assert_eq!(dag.max_depth(), 0);
    assert!(!dag.has_dependencies());
    Ok(())
}

#[test]
fn independent_tasks_share_level_zero_in_declaration_order() -> TestResult {
    let dag = resolve(&records(&[("c", &[]), ("a", &[]), ("b", &[])]))?;

    assert_eq!(dag.execution_order(), vec!["c", "a", "b"]);
    assert_eq!(dag.parallel_groups(), vec![vec!["c", "a", "b"]]);
    Ok(())
}

#[test]
fn ready_tasks_are_released_first_in_first_out() -> TestResult {
    // Declared out of dependency order on purpose.
    let dag = resolve(&records(&[
        ("d", &["b", "c"]),
        ("c", &["a"]),
        ("b", &["a"]),
        ("a", &[]),
        ("e", &[]),
    ]))?;

    assert_eq!(dag.execution_order(), vec!["a", "e", "c", "b", "d"]);
    Ok(())
}

#[test]
fn level_uses_longest_chain_not_shortest() -> TestResult {
    let dag = resolve(&records(&[
        ("a", &[]),
        ("b", &["a"]),
        ("c", &["b"]),
        ("d", &["a", "c"]),
    ]))?;

    assert_eq!(dag.levels()["d"], 3);
    assert_eq!(dag.parallel_groups().len(), 4);
    Ok(())
}

#[test]
fn repeated_dependency_in_one_record_counts_once() -> TestResult {
    let input = vec![
        TaskRecord::new("a"),
        TaskRecord::with_deps("b", ["a", "a"]),
    ];
    let dag = resolve(&input)?;

    assert_eq!(dag.execution_order(), vec!["a", "b"]);
    assert_eq!(dag.dependencies_of("b"), vec!["a"]);
    Ok(())
}

#[test]
fn dependency_map_exposes_both_directions() -> TestResult {
    let dag = resolve(&records(&[
        ("S", &[]),
        ("P2", &["S"]),
        ("P1", &["S"]),
        ("E", &["P1", "P2"]),
    ]))?;

    assert_eq!(dag.dependencies_of("E"), vec!["P1", "P2"]);
    assert_eq!(dag.dependents_of("S"), vec!["P2", "P1"]);
    assert!(dag.dependencies_of("unknown").is_empty());
    assert!(dag.contains("P1"));
    assert_eq!(dag.tasks().collect::<Vec<_>>(), vec!["S", "P2", "P1", "E"]);
    Ok(())
}

#[test]
fn resolving_twice_gives_identical_maps() -> TestResult {
    let input = records(&[("A", &[]), ("B", &["A"]), ("C", &["A", "B"])]);

    let first = resolve(&input)?.to_map();
    let second = resolve(&input)?.to_map();
    assert_eq!(first, second);
    assert_eq!(first["C"], vec!["A", "B"]);
    Ok(())
}

#[test]
fn acyclic_map_converts_into_resolved_dag() -> TestResult {
    let map = DependencyMap::from_records(&records(&[("A", &[]), ("B", &["A"])]))?;
    assert!(is_acyclic(&map));

    let dag = ResolvedDag::try_from(map)?;
    assert_eq!(dag.execution_order(), vec!["A", "B"]);

    let cyclic = DependencyMap::from_records(&records(&[("A", &["B"]), ("B", &["A"])]))?;
    assert!(ResolvedDag::try_from(cyclic).is_err());
    Ok(())
}

#[test]
fn very_deep_chain_does_not_overflow_the_stack() -> TestResult {
    let depth = 50_000;
    let input: Vec<TaskRecord> = (0..depth)
        .map(|i| {
            if i == 0 {
                TaskRecord::new("t0")
            } else {
                TaskRecord::with_deps(format!("t{i}"), [format!("t{}", i - 1)])
            }
        })
        .collect();

    let dag = resolve(&input)?;
    assert_eq!(dag.max_depth(), depth - 1);
    assert_eq!(dag.execution_order().len(), depth);
    assert_eq!(dag.parallel_groups().len(), depth);
    Ok(())
}

#[test]
fn wide_fan_in_with_repeats_keeps_each_edge_once() -> TestResult {
    let width = 5_000;
    let mut input: Vec<TaskRecord> = (0..width).map(|i| TaskRecord::new(format!("src{i}"))).collect();
    let deps: Vec<String> = (0..width)
        .chain(0..width)
        .map(|i| format!("src{i}"))
        .collect();
    input.push(TaskRecord::with_deps("sink", deps));

    let dag = resolve(&input)?;

    let upstream = dag.dependencies_of("sink");
    assert_eq!(upstream.len(), width);
    assert_eq!(upstream[0], "src0");
    assert_eq!(upstream[width - 1], format!("src{}", width - 1));
    assert_eq!(dag.parallel_groups().len(), 2);
    assert_eq!(dag.execution_order().last().map(String::as_str), Some("sink"));
    Ok(())
}
