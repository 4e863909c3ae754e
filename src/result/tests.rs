//! Cross-variant tests for result interpretation

use bson::{Bson, Document, doc};
use proptest::prelude::*;

use super::*;
use crate::error::ReplyError;
use crate::reply::Reply;

fn replies(docs: Vec<Document>) -> ReplyCollection {
    docs.into_iter().map(Reply::single).collect()
}

fn write_error(index: usize, code: i32) -> Bson {
    Bson::Document(doc! {
        "index": index as i32,
        "code": code,
        "errmsg": format!("error {code}"),
    })
}

// ===== Base result =====

#[test]
fn test_base_documents_flatten_replies() {
    let result = OperationResult::new(vec![
        Reply::new(vec![doc! { "a": 1 }, doc! { "a": 2 }]),
        Reply::single(doc! { "a": 3 }),
    ]);
    assert_eq!(
        result.documents(),
        vec![doc! { "a": 1 }, doc! { "a": 2 }, doc! { "a": 3 }]
    );
}

#[test]
fn test_base_cursor_id_from_last_reply() {
    let result = OperationResult::new(vec![
        Reply::single(doc! { "ok": 1 }).with_cursor_id(5),
        Reply::single(doc! { "ok": 1 }).with_cursor_id(8),
    ]);
    assert_eq!(result.cursor_id(), 8);
}

#[test]
fn test_base_unacknowledged_defaults() {
    let result = OperationResult::new(Reply::unacknowledged());
    assert!(!result.acknowledged());
    assert!(result.documents().is_empty());
    assert_eq!(result.cursor_id(), 0);
    assert_eq!(result.written_count(), 0);
    assert!(result.successful());
    assert!(result.validate().is_ok());
}

#[test]
fn test_base_written_count() {
    let result = OperationResult::new(replies(vec![doc! { "ok": 1, "n": 2 }, doc! { "ok": 1, "n": 4 }]));
    assert_eq!(result.written_count(), 6);
}

#[test]
fn test_base_validate_reports_failure() {
    let result = OperationResult::new(replies(vec![doc! {
        "ok": 0,
        "errmsg": "not master",
        "code": 10107,
    }]));

    assert!(!result.successful());
    let err = result.validate().unwrap_err();
    match err {
        ReplyError::Result(ResultError::OperationFailure { message, code }) => {
            assert_eq!(message, "not master");
            assert_eq!(code, Some(10107));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_base_ok_as_double() {
    let result = OperationResult::new(replies(vec![doc! { "ok": 1.0 }]));
    assert!(result.successful());
}

#[test]
fn test_index_map() {
    let map = IndexMap::new(vec![4, 2]);
    assert_eq!(map.original(0).unwrap(), 4);
    assert_eq!(map.original(1).unwrap(), 2);
    assert!(map.original(2).is_err());
    assert_eq!(IndexMap::identity(3), IndexMap::new(vec![0, 1, 2]));
    assert!(IndexMap::default().is_empty());
}

// ===== Variant selection =====

#[test]
fn test_update_result_modern_dispatch() {
    let result = UpdateResult::new(
        replies(vec![
            doc! { "ok": 1, "n": 5, "upserted": [{ "index": 0, "_id": 1 }] },
            doc! { "ok": 1, "n": 5, "nModified": 4 },
        ]),
        ServerCapability::WriteCommands,
    );

    assert_eq!(result.capability(), ServerCapability::WriteCommands);
    assert_eq!(result.matched_count(), 5);
    assert_eq!(result.modified_count(), Some(4));
    assert_eq!(result.upserted_count(), 1);
}

#[test]
fn test_update_result_legacy_dispatch() {
    let result = UpdateResult::new(
        replies(vec![
            doc! { "ok": 1, "n": 3, "updatedExisting": false },
            doc! { "ok": 1, "n": 3, "updatedExisting": true },
        ]),
        ServerCapability::Legacy,
    );

    assert_eq!(result.capability(), ServerCapability::Legacy);
    assert_eq!(result.matched_count(), 3);
    assert_eq!(result.modified_count(), None);
    assert_eq!(result.upserted_count(), 3);
}

#[test]
fn test_update_result_unacknowledged() {
    let modern = UpdateResult::new(Reply::unacknowledged(), ServerCapability::WriteCommands);
    assert!(!modern.acknowledged());
    assert_eq!(modern.matched_count(), 0);
    assert_eq!(modern.modified_count(), Some(0));
    assert_eq!(modern.upserted_count(), 0);

    let legacy = UpdateResult::new(Reply::unacknowledged(), ServerCapability::Legacy);
    assert_eq!(legacy.matched_count(), 0);
    assert_eq!(legacy.modified_count(), None);
    assert_eq!(legacy.upserted_count(), 0);
}

#[test]
fn test_update_result_indexes_chain() {
    let result = UpdateResult::new(
        replies(vec![doc! {
            "ok": 1,
            "n": 0,
            "writeErrors": [write_error(0, 11000)],
        }]),
        ServerCapability::WriteCommands,
    )
    .with_indexes(vec![12_usize]);

    let errors = result.aggregate_write_errors().unwrap();
    assert_eq!(errors[0].get_i32("index").unwrap(), 12);
}

#[test]
fn test_update_result_without_indexes_fails_fast() {
    let result = UpdateResult::new(
        replies(vec![doc! { "ok": 1, "errmsg": "bad", "code": 2 }]),
        ServerCapability::Legacy,
    );
    assert!(matches!(
        result.aggregate_write_errors(),
        Err(ReplyError::Result(ResultError::IndexesNotSet))
    ));
}

#[test]
fn test_accessors_are_idempotent() {
    let result = WriteResult::new(replies(vec![
        doc! { "ok": 1, "n": 2, "nModified": 2, "writeErrors": [write_error(1, 11000)] },
        doc! { "ok": 1, "n": 1, "upserted": [{ "index": 0, "_id": 3 }] },
    ]))
    .with_indexes(vec![0_usize, 1, 2]);

    for _ in 0..3 {
        assert_eq!(result.matched_count(), 2);
        assert_eq!(result.modified_count(), 2);
        assert_eq!(result.upserted_count(), 1);
        assert_eq!(result.aggregate_write_errors().unwrap().len(), 1);
    }
}

// ===== Properties =====

fn arb_batches() -> impl Strategy<Value = Vec<Vec<i32>>> {
    // Per batch: error codes of that batch's write errors, indexed 0..len
    prop::collection::vec(prop::collection::vec(1..20000_i32, 0..5), 1..6)
}

proptest! {
    #[test]
    fn unacknowledged_counts_are_defaults(n in 0..1000_i32, upserted in any::<bool>()) {
        let mut doc = doc! { "ok": 1, "n": n, "nModified": n, "updatedExisting": !upserted };
        if upserted {
            doc.insert("upserted", vec![Bson::Document(doc! { "index": 0, "_id": 1 })]);
        }
        let replies = ReplyCollection::new(vec![
            Reply::single(doc),
            Reply::unacknowledged(),
        ]);

        let modern = WriteResult::new(replies.clone());
        prop_assert_eq!(modern.matched_count(), 0);
        prop_assert_eq!(modern.modified_count(), 0);
        prop_assert_eq!(modern.upserted_count(), 0);

        let legacy = LegacyWriteResult::new(replies);
        prop_assert_eq!(legacy.matched_count(), 0);
        prop_assert_eq!(legacy.modified_count(), None);
        prop_assert_eq!(legacy.upserted_count(), 0);
    }

    #[test]
    fn write_errors_concatenate_and_remap(batches in arb_batches(), offset in 0..100_usize) {
        let docs: Vec<Document> = batches
            .iter()
            .map(|codes| {
                let entries: Vec<Bson> = codes
                    .iter()
                    .enumerate()
                    .map(|(index, code)| write_error(index, *code))
                    .collect();
                doc! { "ok": 1, "n": 0, "writeErrors": entries }
            })
            .collect();

        let widest = batches.iter().map(Vec::len).max().unwrap_or(0);
        let map: Vec<usize> = (0..widest).map(|i| i * 3 + offset).collect();
        let result = WriteResult::new(replies(docs)).with_indexes(map.clone());

        let errors = result.aggregate_write_errors().unwrap();
        let total: usize = batches.iter().map(Vec::len).sum();
        prop_assert_eq!(errors.len(), total);

        let expected: Vec<(usize, i32)> = batches
            .iter()
            .flat_map(|codes| codes.iter().enumerate().map(|(i, code)| (map[i], *code)))
            .collect();
        let actual: Vec<(usize, i32)> = errors
            .iter()
            .map(|e| (e.get_i32("index").unwrap() as usize, e.get_i32("code").unwrap()))
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn modern_counts_split_on_upsert(batches in prop::collection::vec((0..50_i32, any::<bool>()), 1..8)) {
        let docs: Vec<Document> = batches
            .iter()
            .map(|(n, upserted)| {
                let mut doc = doc! { "ok": 1, "n": *n };
                if *upserted {
                    doc.insert("upserted", vec![Bson::Document(doc! { "index": 0, "_id": 1 })]);
                }
                doc
            })
            .collect();
        let result = WriteResult::new(replies(docs));

        let matched: u64 = batches.iter().filter(|(_, u)| !u).map(|(n, _)| *n as u64).sum();
        let upserted = batches.iter().filter(|(_, u)| *u).count() as u64;
        prop_assert_eq!(result.matched_count(), matched);
        prop_assert_eq!(result.upserted_count(), upserted);
    }

    #[test]
    fn legacy_counts_split_on_flag(batches in prop::collection::vec((0..50_i32, any::<bool>()), 1..8)) {
        let docs: Vec<Document> = batches
            .iter()
            .map(|(n, existing)| doc! { "ok": 1, "n": *n, "updatedExisting": *existing })
            .collect();
        let result = LegacyWriteResult::new(replies(docs));

        let matched: u64 = batches.iter().filter(|(_, e)| *e).map(|(n, _)| *n as u64).sum();
        let upserted: u64 = batches.iter().filter(|(_, e)| !e).map(|(n, _)| *n as u64).sum();
        prop_assert_eq!(result.matched_count(), matched);
        prop_assert_eq!(result.upserted_count(), upserted);
    }
}
