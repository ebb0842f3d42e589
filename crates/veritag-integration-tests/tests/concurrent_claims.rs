//! Integration test: concurrent callers racing on the same serial.
//!
//! The registry is the single serializer of mutations: N concurrent
//! claims on one serial yield exactly one winner, and concurrent
//! registrations of the same serial yield exactly one insert.

use std::sync::{Arc, Barrier};
use std::thread;

use veritag_registry::Registry;
use veritag_types::{Identity, RegistryError};

const RACERS: usize = 8;

fn identity(raw: &str) -> Identity {
    Identity::parse(raw).expect("parse identity")
}

#[test]
fn concurrent_claims_single_winner() {
    let registry = Arc::new(Registry::open_memory().expect("open"));
    registry
        .register(&identity("0xA"), "SN-001", "Alpha", "AcmeCo", "")
        .expect("register");

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let caller = identity(&format!("0xC{i}"));
                barrier.wait();
                registry.claim(&caller, "SN-001").map(|()| caller)
            })
        })
        .collect();

    let mut winners = Vec::new();
    let mut losers = 0;
    for handle in handles {
        match handle.join().expect("thread join") {
            Ok(caller) => winners.push(caller),
            Err(RegistryError::AlreadyClaimed { .. }) => losers += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(winners.len(), 1, "exactly one claim wins");
    assert_eq!(losers, RACERS - 1);

    // The winner is the recorded owner and appears in the ownership ledger
    let winner = &winners[0];
    let view = registry.product_details("SN-001").expect("details");
    assert_eq!(view.current_owner, winner.as_str());

    let owned = registry.user_products(winner).expect("owned");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].as_str(), "SN-001");
}

#[test]
fn concurrent_registers_single_insert() {
    let registry = Arc::new(Registry::open_memory().expect("open"));

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|i| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let caller = identity(&format!("0xM{i}"));
                barrier.wait();
                registry.register(&caller, "SN-002", "Beta", "AcmeCo", "")
            })
        })
        .collect();

    let mut ok = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.join().expect("thread join") {
            Ok(_) => ok += 1,
            Err(RegistryError::DuplicateSerial(_)) => duplicates += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(ok, 1, "exactly one registration wins");
    assert_eq!(duplicates, RACERS - 1);
    assert_eq!(
        registry.total_products().expect("count"),
        1,
        "counter bumped exactly once"
    );
}

#[test]
fn concurrent_scans_all_counted() {
    let registry = Arc::new(Registry::open_memory().expect("open"));
    registry
        .register(&identity("0xA"), "SN-001", "Alpha", "AcmeCo", "")
        .expect("register");

    let barrier = Arc::new(Barrier::new(RACERS));
    let handles: Vec<_> = (0..RACERS)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.verify("SN-001").expect("verify")
            })
        })
        .collect();

    for handle in handles {
        let view = handle.join().expect("thread join");
        assert!(view.registered);
    }

    assert_eq!(registry.total_scans().expect("scans"), RACERS as u64);
}
