//! Integration test: full registry lifecycle.
//!
//! Walks the product-authentication flow end to end the way the UI
//! drives it:
//! 1. Manufacturer registers a serialized product
//! 2. Consumer scans and verifies it
//! 3. Consumer claims ownership (warranty transfer)
//! 4. A second claim attempt loses
//! 5. A scan of an unknown serial comes back unregistered and is reported
//! 6. Counters reflect exactly what happened

use veritag_registry::Registry;
use veritag_types::{Identity, RegistryError};

fn identity(raw: &str) -> Identity {
    Identity::parse(raw).expect("parse identity")
}

#[test]
fn full_lifecycle_register_verify_claim_report() {
    let registry = Registry::open_memory().expect("open in-memory registry");

    let manufacturer = identity("0xA");
    let consumer = identity("0xB");
    let latecomer = identity("0xC");
    let reporter = identity("0xD");

    // =========================================================
    // Step 1: Register a product
    // =========================================================
    registry
        .register(&manufacturer, "SN-001", "Alpha", "AcmeCo", "QmAAA")
        .expect("registration should succeed");
    assert_eq!(registry.total_products().expect("count"), 1);

    let details = registry.product_details("SN-001").expect("details");
    assert_eq!(details.name, "Alpha");
    assert_eq!(details.manufacturer, "AcmeCo");
    assert_eq!(details.image_handle, "QmAAA");
    assert!(!details.is_claimed);
    assert_eq!(details.current_owner, "");

    // =========================================================
    // Step 2: Consumer scans the QR code
    // =========================================================
    let scanned = registry.verify("SN-001").expect("verify");
    assert!(scanned.registered);
    assert!(!scanned.is_claimed);
    assert_eq!(scanned.registered_at, details.registered_at);
    assert_eq!(registry.total_scans().expect("scans"), 1);

    // =========================================================
    // Step 3: Consumer claims ownership
    // =========================================================
    registry.claim(&consumer, "SN-001").expect("claim");

    let owned = registry.user_products(&consumer).expect("owned");
    assert_eq!(owned.len(), 1);
    assert_eq!(owned[0].as_str(), "SN-001");
    assert_eq!(
        registry.product_details("SN-001").expect("details").current_owner,
        "0xB"
    );

    // =========================================================
    // Step 4: A later claim loses; ownership is terminal
    // =========================================================
    let second = registry.claim(&latecomer, "SN-001");
    match second {
        Err(RegistryError::AlreadyClaimed { owner, .. }) => {
            assert_eq!(owner.as_str(), "0xB");
        }
        other => panic!("expected AlreadyClaimed, got {other:?}"),
    }
    assert_eq!(
        registry.product_details("SN-001").expect("details").current_owner,
        "0xB"
    );

    // =========================================================
    // Step 5: Unknown serial, the "counterfeit" path
    // =========================================================
    let miss = registry.verify("SN-999").expect("verify miss");
    assert!(!miss.registered);
    assert_eq!(registry.total_scans().expect("scans"), 1, "miss not counted");

    registry
        .report_fake(&reporter, "SN-999", "Mobile Scan")
        .expect("report");
    assert_eq!(registry.total_reports().expect("reports"), 1);

    let reports = registry.reports_for("SN-999").expect("reports for serial");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].reporter.as_str(), "0xD");
    assert_eq!(reports[0].note, "Mobile Scan");

    // =========================================================
    // Step 6: Register a second product; counters line up
    // =========================================================
    registry
        .register(&manufacturer, "SN-002", "Beta", "AcmeCo", "")
        .expect("second registration");
    let duplicate = registry.register(&latecomer, "SN-002", "Fake Beta", "Knockoff", "");
    assert!(matches!(duplicate, Err(RegistryError::DuplicateSerial(_))));

    let stats = registry.stats().expect("stats");
    assert_eq!(stats.total_products, 2);
    assert_eq!(stats.total_scans, 1);
    assert_eq!(stats.total_reports, 1);
}

#[test]
fn registered_at_is_stable_across_reads() {
    let registry = Registry::open_memory().expect("open");
    registry
        .register(&identity("0xA"), "SN-001", "Alpha", "AcmeCo", "")
        .expect("register");

    let first = registry.verify("SN-001").expect("verify");
    let second = registry.product_details("SN-001").expect("details");
    assert_eq!(first.registered_at, second.registered_at);
    assert!(first.registered_at > 0);
}

#[test]
fn owned_serials_survive_unrelated_mutations() {
    let registry = Registry::open_memory().expect("open");
    let owner = identity("0xB");

    registry
        .register(&identity("0xA"), "SN-001", "Alpha", "AcmeCo", "")
        .expect("register");
    registry.claim(&owner, "SN-001").expect("claim");

    // Unrelated serials transition independently
    registry
        .register(&identity("0xA"), "SN-002", "Beta", "AcmeCo", "")
        .expect("register other");
    registry.claim(&identity("0xC"), "SN-002").expect("claim other");
    registry
        .report_fake(&identity("0xD"), "SN-001", "")
        .expect("report");

    let owned = registry.user_products(&owner).expect("owned");
    assert_eq!(owned.len(), 1, "serial appears exactly once, forever");
    assert_eq!(owned[0].as_str(), "SN-001");
}
