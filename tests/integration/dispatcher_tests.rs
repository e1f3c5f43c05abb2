//! Thread-pool dispatch contract tests

use parallel_runner::{CancelToken, DispatchConfig, Dispatcher, ItemErrorKind, RunnerError};

#[test]
fn results_align_with_input_indices() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(2));

    let results = dispatcher
        .run(vec!["a", "b", "c"], |s| Ok::<_, String>(s.to_uppercase()))
        .unwrap();

    let values: Vec<String> = results
        .into_values()
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(values, vec!["A", "B", "C"]);
}

#[test]
fn one_bad_item_does_not_poison_the_batch() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(2));

    let results = dispatcher
        .run(vec![1, 2, 3], |n: i32| {
            10i32.checked_div(n - 2).ok_or("division by zero")
        })
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results.get(0).unwrap().result.as_ref().unwrap(), &-10);
    assert!(results.get(1).unwrap().result.is_err());
    assert_eq!(results.get(2).unwrap().result.as_ref().unwrap(), &10);
}

#[test]
fn empty_batch_completes_immediately() {
    let dispatcher = Dispatcher::default();
    let results = dispatcher
        .run(Vec::<String>::new(), |s| Ok::<_, String>(s))
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn panics_become_typed_failures() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(4));

    let results = dispatcher
        .run((0..6).collect(), |n: i32| {
            assert!(n != 4, "unexpected sentinel row");
            Ok::<_, String>(n)
        })
        .unwrap();

    assert_eq!(results.failed(), 1);
    let (index, error) = results.failures().next().unwrap();
    assert_eq!(index, 4);
    assert_eq!(error.kind, ItemErrorKind::Panic);
}

#[test]
fn cancellation_reports_every_unresolved_index() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(1));
    let token = CancelToken::new();

    let result = dispatcher.run_with_token(
        (0..5).collect(),
        |n: i32| {
            token.cancel();
            Ok::<_, String>(n)
        },
        &token,
    );

    match result {
        Err(RunnerError::Incomplete {
            resolved,
            unresolved,
        }) => {
            assert_eq!(resolved, 1);
            assert_eq!(unresolved, vec![1, 2, 3, 4]);
        }
        other => panic!("expected Incomplete, got {other:?}"),
    }
}

#[test]
fn summary_serializes_for_reporting() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(2));

    let results = dispatcher
        .run((1..=4).collect(), |n: i32| {
            if n == 2 { Err("skip") } else { Ok(n) }
        })
        .unwrap();

    let summary = serde_json::to_value(results.summary()).unwrap();
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["succeeded"], 3);
    assert_eq!(summary["failed"], 1);
    assert!(summary["batch_id"].is_string());
}
