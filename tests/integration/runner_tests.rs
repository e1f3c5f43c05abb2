//! Keyed, chunked, and async run tests

use parallel_runner::{
    AsyncDispatchConfig, AsyncDispatcher, DispatchConfig, Dispatcher, ItemErrorKind, execute_batch,
};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    id: u32,
    text: String,
}

fn table(prefix: &str, rows: u32) -> Vec<Row> {
    (0..rows)
        .map(|id| Row {
            id,
            text: format!("{prefix}-{id}"),
        })
        .collect()
}

#[test]
fn keyed_tables_map_to_their_outcomes() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(2));
    let tables: HashMap<String, Vec<Row>> = HashMap::from([
        ("orders".to_string(), table("order", 3)),
        ("users".to_string(), table("user", 5)),
        ("empty".to_string(), Vec::new()),
    ]);

    let results = dispatcher
        .run_keyed(tables, |rows: Vec<Row>| {
            if rows.is_empty() {
                Err("nothing to process")
            } else {
                Ok(rows.len())
            }
        })
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results["orders"].as_ref().unwrap(), &3);
    assert_eq!(results["users"].as_ref().unwrap(), &5);
    assert!(results["empty"].is_err());
}

#[test]
fn chunked_table_round_trips_row_order() {
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(3));
    let rows = table("row", 11);
    let expected: Vec<u32> = rows.iter().map(|r| r.id * 2).collect();

    let results = dispatcher
        .run_chunked(rows, Some(4), |chunk: Vec<Row>| {
            Ok::<_, String>(chunk.into_iter().map(|r| r.id * 2).collect())
        })
        .unwrap();

    assert!(results.is_complete());
    assert_eq!(results.values, expected);
}

#[test]
fn async_batch_end_to_end() {
    let dispatcher = AsyncDispatcher::new(
        AsyncDispatchConfig::new()
            .with_concurrency(3)
            .with_item_timeout(Duration::from_millis(100)),
    );

    let results = tokio_test::block_on(dispatcher.execute(
        vec![5u64, 500, 5, 5],
        |delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok::<_, String>(delay * 2)
        },
    ))
    .unwrap();

    assert_eq!(results.len(), 4);
    assert_eq!(results.succeeded(), 3);
    let (index, error) = results.failures().next().unwrap();
    assert_eq!(index, 1);
    assert_eq!(error.kind, ItemErrorKind::Timeout);
}

#[test]
fn one_off_async_batch() {
    let results = tokio_test::block_on(execute_batch(
        vec!["a", "bb", "ccc"],
        |s: &str| async move { Ok::<_, String>(s.len()) },
        None,
    ))
    .unwrap();

    let lengths: Vec<usize> = results
        .into_values()
        .into_iter()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(lengths, vec![1, 2, 3]);
}
