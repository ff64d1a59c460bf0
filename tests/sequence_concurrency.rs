//! Concurrency tests for the document sequence counter.
//!
//! The counter is the one piece of shared mutable state whose correctness
//! the whole numbering scheme depends on, so it gets hammered here with
//! parallel allocations against a real on-disk database.

use std::collections::HashSet;

use comptoir::billing::{DocumentKind, next_document_number};
use comptoir::db::DbService;
use comptoir::db::repository::counter;
use tempfile::TempDir;

async fn test_db() -> (TempDir, DbService) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("concurrency-test.db");
    let db = DbService::new(path.to_str().unwrap())
        .await
        .expect("test database");
    (dir, db)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_allocations_never_collide() {
    let (_dir, db) = test_db().await;
    const TASKS: usize = 50;

    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let pool = db.pool.clone();
        handles.push(tokio::spawn(async move {
            counter::allocate(&pool, "invoice_2026").await.unwrap()
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        let seq = handle.await.unwrap();
        assert!(seen.insert(seq), "sequence value {seq} allocated twice");
    }

    assert_eq!(seen.len(), TASKS);
    assert_eq!(*seen.iter().min().unwrap(), 1);
    assert_eq!(*seen.iter().max().unwrap(), TASKS as i64);
    assert_eq!(counter::current(&db.pool, "invoice_2026").await.unwrap(), TASKS as i64);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_formatted_numbers_are_distinct() {
    let (_dir, db) = test_db().await;
    const TASKS: usize = 20;

    let mut handles = Vec::with_capacity(TASKS);
    for _ in 0..TASKS {
        let pool = db.pool.clone();
        handles.push(tokio::spawn(async move {
            next_document_number(&pool, DocumentKind::Invoice, 2026)
                .await
                .unwrap()
        }));
    }

    let mut numbers = HashSet::new();
    for handle in handles {
        let number = handle.await.unwrap();
        assert!(number.starts_with("FAC-2026-"), "unexpected format: {number}");
        assert!(numbers.insert(number.clone()), "number {number} issued twice");
    }
    assert_eq!(numbers.len(), TASKS);
}

#[tokio::test]
async fn counters_are_scoped_by_key() {
    let (_dir, db) = test_db().await;

    // Each (type, year) key runs its own sequence
    assert_eq!(counter::allocate(&db.pool, "invoice_2026").await.unwrap(), 1);
    assert_eq!(counter::allocate(&db.pool, "invoice_2026").await.unwrap(), 2);
    assert_eq!(counter::allocate(&db.pool, "quote_2026").await.unwrap(), 1);
    assert_eq!(counter::allocate(&db.pool, "invoice_2027").await.unwrap(), 1);
    assert_eq!(counter::allocate(&db.pool, "invoice_2026").await.unwrap(), 3);

    assert_eq!(counter::current(&db.pool, "quote_2026").await.unwrap(), 1);
    assert_eq!(counter::current(&db.pool, "quote_2027").await.unwrap(), 0);
}
