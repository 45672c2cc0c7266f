//! Integration tests for batches mixing successful and failing rows

use std::collections::HashSet;

use cashback_notifier::{BatchSummary, DispatchRecord, Error, process};
use serde_json::json;

use crate::support::{MemoryConnector, RecordingDispatcher, csv, member, statics};

fn run(
    input: &str,
    connector: &MemoryConnector,
    dispatcher: &RecordingDispatcher,
) -> (BatchSummary, Vec<Error>, Vec<DispatchRecord>) {
    let mut errors = Vec::new();
    let mut records = Vec::new();
    let summary = process(
        input.as_bytes(),
        connector,
        dispatcher,
        &statics(),
        |e| errors.push(e),
        |r| records.push(r),
    )
    .expect("batch runs");
    (summary, errors, records)
}

#[test]
fn single_row_produces_complete_request() {
    // Arrange
    let connector = MemoryConnector::default().with_member(
        "EXT-1",
        member("Ada", "Ufirst Private Plus", "NG-1"),
    );
    let dispatcher = RecordingDispatcher::answering(200);
    let input = csv(&["EXT-1,First,CB-1,X,,CB-4"]);

    // Act
    let (summary, errors, records) = run(&input, &connector, &dispatcher);

    // Assert
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    assert_eq!(
        summary,
        BatchSummary {
            rows: 1,
            dispatched: 1,
            delivered: 1,
            skipped: 0
        }
    );

    let sent = dispatcher.sent();
    assert_eq!(sent.len(), 1);
    let body = serde_json::to_value(&sent[0]).unwrap();
    assert_eq!(body["memberId"], "NG-1");
    assert_eq!(body["attributes"], json!({ "externalRefId": "EXT-1" }));
    assert_eq!(body["messageConfiguration"]["receiverIdentity"], "ada@example.com");
    assert_eq!(
        body["messageConfiguration"]["mergeFields"],
        json!({
            "params.firstName": "Ada",
            "params.packageName": "Ufirst Private",
            "params.cashbackCount": 2,
            "params.reffnumberList": [{ "reffNumbers": "CB-1" }, { "reffNumbers": "CB-4" }]
        })
    );

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].correlation_id, sent[0].correlation_id);
    assert!(records[0].is_delivered());
}

#[test]
fn n_rows_with_one_unknown_customer_make_n_minus_one_calls() {
    let connector = MemoryConnector::default()
        .with_member("A", member("Ann", "Gold", "1"))
        .with_member("B", member("Ben", "Gold", "2"))
        .with_member("D", member("Dan", "Gold", "4"))
        .with_member("E", member("Eve", "Gold", "5"));
    let dispatcher = RecordingDispatcher::answering(200);
    let input = csv(&[
        "A,First,R1,,,",
        "B,First,R1,,,",
        "C,First,R1,,,",
        "D,Reminder,R1,,,",
        "E,Reminder,R1,,,",
    ]);

    let (summary, errors, _) = run(&input, &connector, &dispatcher);

    assert_eq!(summary.rows, 5);
    assert_eq!(dispatcher.sent().len(), 4);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].customer_id().map(|c| c.as_str()), Some("C"));
    assert!(!errors[0].is_fatal());
}

#[test]
fn store_failures_and_bad_lines_are_skipped() {
    let connector = MemoryConnector::default()
        .with_member("A", member("Ann", "Standard", "1"))
        .with_member("B", member("Ben", "Standard", "2"))
        .with_failing_lookup("B");
    let dispatcher = RecordingDispatcher::answering(200);
    let input = csv(&["A,First,R1,,,", "B,First,R1,,,", "broken line", "A,Reminder,X,X,X,X"]);

    let (summary, errors, records) = run(&input, &connector, &dispatcher);

    assert_eq!(summary.rows, 4);
    assert_eq!(summary.dispatched, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(errors.len(), 2);
    assert!(matches!(errors[0], Error::Lookup { .. }));
    assert!(matches!(errors[1], Error::Csv(_)));

    let counts: Vec<usize> = dispatcher
        .sent()
        .iter()
        .map(|r| r.merge_fields().cashback_count)
        .collect();
    assert_eq!(counts, [1, 0]);
    assert_eq!(records.len(), 2);
}

#[test]
fn api_rejections_are_reported_as_processed_rows() {
    let connector = MemoryConnector::default().with_member("A", member("Ann", "Gold", "1"));
    let dispatcher = RecordingDispatcher::answering(400);

    let (summary, errors, records) = run(&csv(&["A,First,R1,,,"]), &connector, &dispatcher);

    assert!(errors.is_empty());
    assert_eq!(summary.dispatched, 1);
    assert_eq!(summary.delivered, 0);
    assert_eq!(records[0].status, Some(400));
}

#[test]
fn correlation_ids_are_unique_across_the_batch() {
    let connector = MemoryConnector::default().with_member("A", member("Ann", "Gold", "1"));
    let dispatcher = RecordingDispatcher::answering(200);
    let lines = vec!["A,First,R1,,,"; 25];

    let (summary, _, _) = run(&csv(&lines), &connector, &dispatcher);

    assert_eq!(summary.dispatched, 25);
    let ids: HashSet<_> = dispatcher.sent().iter().map(|r| r.correlation_id).collect();
    assert_eq!(ids.len(), 25);
}

#[test]
fn refused_store_connection_is_returned() {
    let connector = MemoryConnector::refusing();
    let dispatcher = RecordingDispatcher::answering(200);

    let result = process(
        csv(&["A,First,R1,,,"]).as_bytes(),
        &connector,
        &dispatcher,
        &statics(),
        |e| panic!("unexpected row error: {e}"),
        |r| panic!("unexpected dispatch: {r}"),
    );

    let err = result.expect_err("connection failure aborts the batch");
    assert!(err.is_fatal());
    assert!(dispatcher.sent().is_empty());
}
