//! Integration tests for transaction scopes.

use dgql_graph::{FaultPoint, GraphStats, Mutation};
use chrono::Utc;
use dgql_store::{Context, Emotion, Reaction, Store, StoreConfig, StoreError, Txn};
use dgql_testkit::prelude::*;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread;
use std::time::Duration;

fn note(txn: &mut Txn, text: &str) -> Result<(), StoreError> {
    txn.mutate(&Mutation::set(json!({"dgraph.type": "Note", "Note.text": text})))
        .map(|_| ())
}

fn notes(f: &Fixture) -> usize {
    let rows: Value = f
        .store
        .transact(&f.ctx, |txn| txn.query("{ node(func: type(Note)) { uid } }"))
        .unwrap();
    rows["node"].as_array().map_or(0, Vec::len)
}

fn terminal_calls(before: GraphStats, after: GraphStats) -> (u64, u64) {
    (after.commits - before.commits, after.discards - before.discards)
}

#[test]
fn failed_mutation_after_partial_success_leaves_nothing() {
    init_tracing();
    let f = Fixture::new();
    let before = f.graph.node_count();

    let err = f
        .store
        .transact(&f.ctx, |txn| {
            note(txn, "one")?;
            note(txn, "two")?;
            txn.mutate(&Mutation::set(json!({"uid": "0xffff", "Note.text": "x"})))?;
            Ok(())
        })
        .unwrap_err();

    assert!(matches!(err, StoreError::Mutation(_)));
    assert_eq!(f.graph.node_count(), before);
    assert_eq!(notes(&f), 0);
}

#[test]
fn every_path_issues_exactly_one_terminal_call() {
    init_tracing();
    let f = Fixture::new();

    // success
    let before = f.graph.stats();
    f.store.transact(&f.ctx, |txn| note(txn, "ok")).unwrap();
    assert_eq!(terminal_calls(before, f.graph.stats()), (1, 0));

    // early error
    let before = f.graph.stats();
    let _ = f.store.transact(&f.ctx, |txn| {
        note(txn, "early")?;
        Err::<(), _>(StoreError::invalid_operation("stop"))
    });
    assert_eq!(terminal_calls(before, f.graph.stats()), (0, 1));

    // cancellation mid-scope
    let before = f.graph.stats();
    let ctx = Context::new();
    let err = f
        .store
        .transact(&ctx, |txn| {
            note(txn, "first")?;
            ctx.cancel();
            note(txn, "second")
        })
        .unwrap_err();
    assert!(matches!(err, StoreError::Canceled));
    assert_eq!(terminal_calls(before, f.graph.stats()), (0, 1));

    // unwinding
    let before = f.graph.stats();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        f.store.transact(&f.ctx, |txn| -> Result<(), StoreError> {
            note(txn, "panics")?;
            panic!("operation panicked")
        })
    }));
    assert!(outcome.is_err());
    assert_eq!(terminal_calls(before, f.graph.stats()), (0, 1));

    assert_eq!(f.graph.stats().open(), 0);
    assert_eq!(f.graph.stats().abandoned, 0);
    assert_eq!(notes(&f), 1);
}

#[test]
fn expired_scope_timeout_rolls_back() {
    let f = Fixture::new();
    let store = Store::with_config(
        f.graph.clone(),
        StoreConfig::new().scope_timeout(Duration::ZERO),
    );
    let err = store.transact(&f.ctx, |txn| note(txn, "late")).unwrap_err();
    assert!(matches!(err, StoreError::Canceled));
    assert_eq!(f.graph.stats().open(), 0);
}

#[test]
fn commit_failure_is_an_error_and_nothing_is_visible() {
    let f = Fixture::new();
    f.graph.faults().fail_next(FaultPoint::Commit);

    let result = f.store.transact(&f.ctx, |txn| note(txn, "lost"));
    assert!(matches!(result, Err(StoreError::Commit(_))));
    assert_eq!(notes(&f), 0);
}

#[test]
fn rollback_failure_reports_both_errors() {
    init_tracing();
    let f = Fixture::new();
    f.graph.faults().fail_next(FaultPoint::Discard);

    let err = f
        .store
        .transact(&f.ctx, |txn| {
            note(txn, "x")?;
            Err::<(), _>(StoreError::not_found("user", "ghost"))
        })
        .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("rollback failed after: user ghost not found"));
    assert!(message.contains("injected discard failure"));
    assert!(matches!(err.root(), StoreError::NotFound { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn lost_connection_fails_before_opening() {
    let f = Fixture::new();
    f.graph.set_connected(false);
    let begun = f.graph.stats().begun;

    let err = f.store.transact(&f.ctx, |txn| note(txn, "x")).unwrap_err();
    assert!(matches!(err, StoreError::ConnectionInactive));
    assert_eq!(f.graph.stats().begun, begun);
}

#[test]
fn concurrent_scopes_are_isolated() {
    let f = Fixture::new();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = f.store.clone();
            let ctx = f.ctx.clone();
            thread::spawn(move || {
                store.transact(&ctx, |txn| {
                    note(txn, &format!("n{i}"))?;
                    if i % 2 == 0 {
                        Ok(())
                    } else {
                        Err(StoreError::invalid_operation("odd"))
                    }
                })
            })
        })
        .collect();
    let committed = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap().ok())
        .count();

    assert_eq!(committed, 4);
    assert_eq!(notes(&f), 4);
    assert_eq!(f.graph.stats().open(), 0);
}

#[test]
fn concurrent_reactions_on_one_post_are_all_listed() {
    init_tracing();
    let f = Fixture::new();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let store = f.store.clone();
            let ctx = f.ctx.clone();
            let author = if i % 2 == 0 { f.owner.id.clone() } else { f.other.id.clone() };
            let post = f.post.id.clone();
            thread::spawn(move || {
                store.create_reaction(
                    &ctx,
                    Utc::now(),
                    &author,
                    &post,
                    Emotion::Joy,
                    &format!("r{i}"),
                )
            })
        })
        .collect();
    let created: Vec<Reaction> = handles
        .into_iter()
        .filter_map(|h| h.join().unwrap().ok())
        .collect();

    assert_eq!(created.len(), 16);
    let listed = f.store.reactions_of(&f.ctx, &f.post.id).unwrap();
    assert_eq!(listed.len(), created.len());
    for reaction in &created {
        assert!(listed.iter().any(|r| r.id == reaction.id));
    }
    assert_eq!(f.graph.stats().open(), 0);
}

proptest! {
    #[test]
    fn scope_is_all_or_nothing(steps in steps_strategy()) {
        let f = Fixture::new();
        let before = f.graph.stats();

        let result = f.store.transact(&f.ctx, |txn| {
            for (i, step) in steps.iter().enumerate() {
                match step {
                    Step::Write => note(txn, &format!("s{i}"))?,
                    Step::Fail => return Err(StoreError::invalid_operation("step failed")),
                }
            }
            Ok(())
        });

        let (commits, discards) = terminal_calls(before, f.graph.stats());
        let failed = steps.contains(&Step::Fail);
        prop_assert_eq!(commits + discards, 1);
        prop_assert_eq!(discards, u64::from(failed));

        prop_assert_eq!(result.is_err(), failed);
        let expected = if failed { 0 } else { steps.len() };
        prop_assert_eq!(notes(&f), expected);
    }
}
