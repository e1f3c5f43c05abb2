//! Configuration validation tests
//!
//! Invalid configurations must fail before any item is processed.

use parallel_runner::{
    AsyncDispatchConfig, AsyncDispatcher, DispatchConfig, Dispatcher, RunnerError, split_chunks,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn zero_workers_fails_fast() {
    let calls = AtomicUsize::new(0);
    let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(0));

    let result = dispatcher.run(vec!["table-a", "table-b"], |name| {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok::<_, String>(name.len())
    });

    match result {
        Err(RunnerError::Config(message)) => assert!(message.contains("max_workers")),
        other => panic!("expected Config error, got {other:?}"),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn zero_async_concurrency_fails_fast() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let dispatcher = AsyncDispatcher::new(AsyncDispatchConfig::new().with_concurrency(0));

    let result = tokio_test::block_on(dispatcher.execute(vec![1, 2], move |n: i32| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(n)
        }
    }));

    assert!(matches!(result, Err(RunnerError::Config(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn zero_splits_fails_fast() {
    let result = split_chunks(vec![1, 2, 3], 0);
    assert!(matches!(result, Err(RunnerError::Config(_))));
}

#[test]
fn auto_config_is_usable() {
    let dispatcher = Dispatcher::new(DispatchConfig::auto());
    let results = dispatcher
        .run((0..8).collect(), |n: i32| Ok::<_, String>(n))
        .unwrap();
    assert_eq!(results.len(), 8);
}
