//! Domain row types backing the repositories.

pub mod event;
pub mod lead;
pub mod order;
pub mod product;
pub mod store;

pub use event::AnalyticsEvent;
pub use lead::EmailLead;
pub use order::{Order, OrderItemDetail};
pub use product::Product;
pub use store::Store;
