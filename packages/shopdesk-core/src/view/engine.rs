//! The filter → sort → paginate pipeline.

use std::borrow::Cow;

use super::matcher::FieldMatcher;
use super::{ListPage, QueryState, SortOrder};
use crate::record::{compare_optional, FieldSource, Value};

/// Derives the visible page of `records` for `query`.
///
/// Stages run in a fixed order:
/// 1. keep records matching the search text over `query.search_fields`
/// 2. keep records equal to every non-blank entry of `query.filters`
/// 3. stable sort by `query.sort_field`, missing values first, reversed for `Desc`
/// 4. slice out `query.page`
///
/// The input is never mutated and an out-of-range page yields no rows.
pub fn derive<R: FieldSource + Clone>(records: &[R], query: &QueryState) -> ListPage<R> {
    let matcher = FieldMatcher::new(&query.search_text, &query.search_fields);
    let filters: Vec<(&str, &Value)> = query
        .filters
        .iter()
        .filter(|(_, value)| !value.is_blank())
        .map(|(field, value)| (field.as_str(), value))
        .collect();

    let mut matched: Vec<&R> = records
        .iter()
        .filter(|record| matcher.matches(*record))
        .filter(|record| passes_filters(*record, &filters))
        .collect();

    if let Some(sort_field) = &query.sort_field {
        matched = sort_records(matched, sort_field, query.sort_order);
    }

    let total_items = matched.len();
    let page_size = query.page_size.get();
    let total_pages = total_items.div_ceil(page_size);

    let items = matched
        .into_iter()
        .skip(query.offset())
        .take(page_size)
        .cloned()
        .collect();

    ListPage {
        items,
        total_pages,
        total_items,
        page: query.page.get(),
    }
}

fn passes_filters<R: FieldSource>(record: &R, filters: &[(&str, &Value)]) -> bool {
    filters.iter().all(|(field, expected)| {
        record
            .field(field)
            .is_some_and(|actual| actual.exact_eq(expected))
    })
}

fn sort_records<'a, R: FieldSource>(
    records: Vec<&'a R>,
    sort_field: &str,
    order: SortOrder,
) -> Vec<&'a R> {
    // One key lookup per record
    let mut keyed: Vec<(Option<Cow<'a, Value>>, &'a R)> = records
        .into_iter()
        .map(|record| (record.field(sort_field), record))
        .collect();

    // Stable: ties keep input order in both directions
    keyed.sort_by(|(a, _), (b, _)| {
        let ordering = compare_optional(a.as_deref(), b.as_deref());
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}
