//! Randomized checks of the derivation pipeline's guarantees.

use std::num::NonZeroUsize;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shopdesk_core::record::{Record, Value};
use shopdesk_core::view::{derive, QueryState, SortOrder};

const ROUNDS: usize = 200;

fn random_records(rng: &mut StdRng, unique_scores: bool) -> Vec<Record> {
    let count = rng.gen_range(0..40);
    let mut scores: Vec<u32> = (0..count as u32).collect();
    (0..count)
        .map(|i| {
            let score = if unique_scores {
                let pick = rng.gen_range(0..scores.len());
                scores.swap_remove(pick)
            } else {
                rng.gen_range(0..5)
            };
            let category = ["Clothing", "Electronics", "Groceries"][rng.gen_range(0..3)];
            let record: Record = [
                ("id", Value::from(i as u64)),
                ("score", Value::from(score as f64)),
                ("category", Value::from(category)),
                ("name", Value::from(format!("item-{}", rng.gen_range(0..100)))),
            ]
            .into_iter()
            .collect();
            record
        })
        .collect()
}

fn random_query(rng: &mut StdRng) -> QueryState {
    let mut query = QueryState::new(NonZeroUsize::new(rng.gen_range(1..8)).unwrap())
        .at_page(NonZeroUsize::new(rng.gen_range(1..6)).unwrap());
    if rng.gen_bool(0.5) {
        query = query.with_search(format!("{}", rng.gen_range(0..10)), ["name", "score"]);
    }
    if rng.gen_bool(0.3) {
        query = query.with_filter("category", "Clothing");
    }
    if rng.gen_bool(0.7) {
        let order = if rng.gen_bool(0.5) { SortOrder::Asc } else { SortOrder::Desc };
        query = query.sorted_by("score", order);
    }
    query
}

#[test]
fn test_derive_is_pure() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..ROUNDS {
        let records = random_records(&mut rng, false);
        let snapshot = records.clone();
        let query = random_query(&mut rng);

        let first = derive(&records, &query);
        let second = derive(&records, &query);

        assert_eq!(first, second);
        assert_eq!(records, snapshot);
    }
}

#[test]
fn test_pages_beyond_total_are_empty() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..ROUNDS {
        let records = random_records(&mut rng, false);
        let query = random_query(&mut rng);
        let total_pages = derive(&records, &query).total_pages;

        let beyond = query.clone().at_page(NonZeroUsize::new(total_pages + 1).unwrap());
        let page = derive(&records, &beyond);

        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, total_pages);
    }
}

#[test]
fn test_page_counts_and_sizes() {
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..ROUNDS {
        let records = random_records(&mut rng, false);
        let query = random_query(&mut rng);
        let page = derive(&records, &query);
        let size = query.page_size.get();

        assert_eq!(page.total_pages, page.total_items.div_ceil(size));
        assert!(page.items.len() <= size);
        if query.page.get() < page.total_pages {
            assert_eq!(page.items.len(), size);
        }
    }
}

#[test]
fn test_ascending_is_reverse_of_descending_without_ties() {
    let mut rng = StdRng::seed_from_u64(17);
    for _ in 0..ROUNDS {
        let records = random_records(&mut rng, true);
        let size = NonZeroUsize::new(records.len().max(1)).unwrap();

        let asc = derive(&records, &QueryState::new(size).sorted_by("score", SortOrder::Asc));
        let desc = derive(&records, &QueryState::new(size).sorted_by("score", SortOrder::Desc));

        let mut reversed = desc.items.clone();
        reversed.reverse();
        assert_eq!(asc.items, reversed);
    }
}

#[test]
fn test_filters_are_idempotent() {
    let mut rng = StdRng::seed_from_u64(19);
    for _ in 0..ROUNDS {
        let records = random_records(&mut rng, false);
        let size = NonZeroUsize::new(64).unwrap();
        let query = QueryState::new(size).with_filter("category", "Groceries");

        let once = derive(&records, &query);
        let twice = derive(&once.items, &query);

        assert_eq!(once.items, twice.items);
        assert!(once
            .items
            .iter()
            .all(|r| r.get("category") == Some(&Value::from("Groceries"))));
    }
}
