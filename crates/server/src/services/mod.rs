//! Business logic: idea parsing, provisioning, payments, email, analytics.

pub mod ai;
pub mod analytics;
pub mod email;
pub mod provisioning;
pub mod stripe;
