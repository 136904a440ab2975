//! Lead capture tests.
//!
//! Captured emails are unique per (store, email) and the welcomed flag
//! tracks whether the welcome email actually went out.

use chrono::Utc;
use storeforge_core::{Email, LeadId, StoreId};
use storeforge_server::models::EmailLead;

#[test]
fn test_case_and_whitespace_variants_share_one_dedupe_key() {
    // The (store, email) uniqueness constraint sees the normalized form,
    // so resubmissions with different casing collapse to one lead
    let a = Email::parse("Ana@Example.COM").expect("valid email");
    let b = Email::parse("  ana@example.com ").expect("valid email");
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "ana@example.com");
}

#[test]
fn test_fresh_lead_reports_unwelcomed() {
    let lead = EmailLead {
        id: LeadId::new(1),
        store_id: StoreId::new(1),
        email: Email::parse("ana@example.com").expect("valid email"),
        source: "storefront".to_string(),
        welcomed: false,
        created_at: Utc::now(),
    };

    let json = serde_json::to_value(&lead).expect("lead serializes");
    assert_eq!(json["welcomed"], false);
}
