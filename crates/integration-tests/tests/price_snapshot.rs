//! Price snapshot tests.
//!
//! Checkout copies each product's current price into the order's line items;
//! later product edits must never change what an existing order records.

use chrono::Utc;
use storeforge_core::{Cents, ProductId, ProductKind, StoreId};
use storeforge_server::db::NewOrderItem;
use storeforge_server::models::Product;

fn product(id: i32, price: Cents) -> Product {
    Product {
        id: ProductId::new(id),
        store_id: StoreId::new(1),
        name: format!("Offer {id}"),
        description: "A starter offer".to_string(),
        price,
        kind: ProductKind::Digital,
        image_url: None,
        active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// The snapshot step checkout performs for each purchased product.
fn snapshot(products: &[Product]) -> Vec<NewOrderItem> {
    products
        .iter()
        .map(|p| NewOrderItem {
            product_id: p.id,
            quantity: 1,
            price: p.price,
        })
        .collect()
}

#[test]
fn test_line_items_copy_the_price_at_checkout_time() {
    let mut products = vec![product(1, Cents::new(2900)), product(2, Cents::new(9900))];
    let items = snapshot(&products);

    // A later price edit leaves the snapshot untouched
    products[0].price = Cents::new(4900);
    products[1].price = Cents::new(19900);

    assert_eq!(items[0].price, Cents::new(2900));
    assert_eq!(items[1].price, Cents::new(9900));
}

#[test]
fn test_order_total_follows_the_snapshot_not_live_prices() {
    let mut products = vec![product(1, Cents::new(2900)), product(2, Cents::new(9900))];
    let items = snapshot(&products);
    let total: Cents = items.iter().map(|i| i.price).sum();

    products[0].price = Cents::new(100);
    let live_total: Cents = products.iter().map(|p| p.price).sum();

    assert_eq!(total, Cents::new(12800));
    assert_ne!(total, live_total);
}
