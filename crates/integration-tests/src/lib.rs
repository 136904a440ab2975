//! Cross-crate integration tests for StoreForge.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storeforge-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_lifecycle` - Order status transitions and completion-callback
//!   redelivery
//! - `price_snapshot` - Line-item prices frozen against later product edits
//! - `lead_capture` - Lead dedupe keys and the welcomed lifecycle

#![cfg_attr(not(test), forbid(unsafe_code))]
