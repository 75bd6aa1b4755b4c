//! Workflows as a screen drives them: JSON from the backend into a cache,
//! query changes, paging, edits and invoice totals.

use std::num::NonZeroUsize;

use serde_json::json;

use shopdesk_core::billing::{format_amount, DiscountType, InvoiceDraft, LineItem};
use shopdesk_core::record::{Customer, Product, Record, RecordId, Shop, Value};
use shopdesk_core::screen::{LoadState, Screen};
use shopdesk_core::view::{derive, QueryState, SortOrder};

fn customers_json() -> serde_json::Value {
    json!([
        {"id": 1, "name": "Hana", "email": "hana@shop.io", "phone": "0101", "address": "1 Elm"},
        {"id": 2, "name": "alice", "email": "alice@shop.io", "phone": "0102", "address": "2 Elm"},
        {"id": 3, "name": "Bjorn", "email": "bjorn@shop.io", "phone": "0103", "address": "3 Elm"},
        {"id": 4, "name": "Chen", "email": "chen@shop.io", "phone": "0104", "address": "4 Elm"},
        {"id": 5, "name": "Dee", "email": "dee@shop.io", "phone": "0105", "address": "5 Elm"},
        {"id": 6, "name": "Emil", "email": "emil@shop.io", "phone": "0106", "address": "6 Elm"},
        {"id": 7, "name": "Fay", "email": "fay@shop.io", "phone": "0107", "address": "7 Elm"},
        {"id": 8, "name": "Gil", "email": "gil@shop.io", "phone": "0108", "address": "8 Elm"}
    ])
}

#[test]
fn test_customer_list_second_page() -> anyhow::Result<()> {
    let customers: Vec<Customer> = serde_json::from_value(customers_json())?;
    let query = QueryState::new(NonZeroUsize::new(5).unwrap()).at_page(NonZeroUsize::new(2).unwrap());

    let page = derive(&customers, &query);

    assert_eq!(page.total_pages, 2);
    let ids: Vec<_> = page.items.iter().map(|c| c.id.clone().unwrap()).collect();
    assert_eq!(
        ids,
        vec![RecordId::Number(6), RecordId::Number(7), RecordId::Number(8)]
    );
    Ok(())
}

#[test]
fn test_generic_records_behave_like_typed_entities() -> anyhow::Result<()> {
    let records = Record::list_from_json(&customers_json())?;
    let customers: Vec<Customer> = serde_json::from_value(customers_json())?;
    let query = QueryState::default()
        .with_search("ELM", ["name", "email", "phone", "address"])
        .sorted_by("name", SortOrder::Desc);

    let generic = derive(&records, &query);
    let typed = derive(&customers, &query);

    assert_eq!(generic.total_items, typed.total_items);
    let generic_names: Vec<_> = generic
        .items
        .iter()
        .map(|r| r.get("name").unwrap().to_string())
        .collect();
    let typed_names: Vec<_> = typed.items.iter().map(|c| c.name.clone()).collect();
    assert_eq!(generic_names, typed_names);
    assert_eq!(typed_names[0], "Hana");
    Ok(())
}

#[test]
fn test_shop_screen_filters_by_type_and_package() {
    let shops: Vec<Shop> = serde_json::from_value(json!([
        {"id": 1, "name": "Alpha Mart", "ownerName": "Ola", "location": "North", "shopType": "Grocery", "packageType": "Gold"},
        {"id": 2, "name": "Beta Wear", "ownerName": "Per", "location": "South", "shopType": "Clothing", "packageType": "Gold"},
        {"id": 3, "name": "Gamma Food", "ownerName": "Kari", "location": "North", "shopType": "Grocery", "packageType": "Silver"},
        {"id": 10, "name": "Delta Grocer", "ownerName": "Nils", "location": "East", "shopType": "Grocery", "packageType": "Gold"}
    ]))
    .unwrap();

    let mut screen = Screen::new(
        "shops",
        &["name", "ownerName", "location", "id", "shopType"],
        NonZeroUsize::new(5).unwrap(),
    )
    .sorted_by("name", SortOrder::Asc);
    screen.load(shops);

    screen.set_filter("shopType", "Grocery");
    screen.set_filter("packageType", "Gold");
    let names: Vec<_> = screen.visible().items.into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["Alpha Mart", "Delta Grocer"]);

    // id is searchable through its decimal form
    screen.set_search("10");
    let visible = screen.visible();
    assert_eq!(visible.items.len(), 1);
    assert_eq!(visible.items[0].owner_name, "Nils");
}

#[test]
fn test_product_screen_edit_then_search() {
    let products: Vec<Product> = serde_json::from_value(json!([
        {"id": 1, "name": "Sneakers", "description": "Running", "price": 100, "quantity": 4, "category": "Footwear"},
        {"id": 2, "name": "Kettle", "description": "Steel", "price": 45.5, "quantity": 2, "category": "Electronics"},
        {"id": 3, "name": "Jacket", "description": "Wool", "price": 100, "quantity": 1, "category": "Clothing"}
    ]))
    .unwrap();

    let mut screen = Screen::new(
        "products",
        &["name", "description", "category", "price"],
        NonZeroUsize::new(5).unwrap(),
    );
    screen.begin_load();
    screen.finish_load::<String>(Ok(products));
    assert_eq!(screen.state(), &LoadState::Loaded);

    screen.set_search("100");
    assert_eq!(screen.visible().total_items, 2);

    screen
        .update(&RecordId::Number(3), |old| Product {
            price: 120.0,
            ..old.clone()
        })
        .unwrap();
    assert_eq!(screen.visible().total_items, 1);

    screen.set_search("45.5");
    assert_eq!(screen.visible().items[0].name, "Kettle");
}

#[test]
fn test_record_edit_keeps_previous_version() {
    let records = Record::list_from_json(&customers_json()).unwrap();
    let mut screen = Screen::new("customers", &["name"], NonZeroUsize::new(5).unwrap());
    screen.load(records.clone());

    screen
        .update(&RecordId::Number(2), |old| old.with_field("name", "Alicia"))
        .unwrap();

    assert_eq!(records[1].get("name"), Some(&Value::from("alice")));
    let edited = screen.find(&RecordId::Number(2)).unwrap();
    assert_eq!(edited.get("name"), Some(&Value::from("Alicia")));
}

#[test]
fn test_invoice_form_flow() {
    let mut draft = InvoiceDraft {
        customer_id: Some(RecordId::Number(1)),
        ..InvoiceDraft::default()
    };
    draft
        .update_item(0, |item| {
            item.with_product(RecordId::Number(1), "Sneakers")
                .with_unit_price(100.0)
        })
        .unwrap();
    draft.add_item();
    draft
        .update_item(1, |_| {
            LineItem::new(2.0, 25.0).with_product(RecordId::Number(2), "Socks")
        })
        .unwrap();
    draft.discount = 10.0;
    draft.discount_type = DiscountType::Percentage;
    draft.tax_amount = 5.0;

    let summary = draft.validate().unwrap();
    assert_eq!(format_amount(summary.subtotal), "150.00");
    assert_eq!(format_amount(summary.discount_value), "15.00");
    assert_eq!(format_amount(summary.grand_total), "140.00");

    draft.tax_amount = -1.0;
    assert!(draft.validate().unwrap_err().is_validation());
}
