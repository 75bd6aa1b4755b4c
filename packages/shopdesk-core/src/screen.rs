//! Per-screen view state: the record cache behind one list view and the
//! status of one form.
//!
//! A screen owns its records and query for as long as it is open and is
//! dropped on navigation. Nothing here is shared between screens.

use std::fmt;
use std::num::NonZeroUsize;

use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::record::{FieldSource, RecordId, Value};
use crate::view::{derive, ListPage, QueryState, SortOrder};

/// Status of the most recent network action on a screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    /// User-facing error message
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Table or card presentation of a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Card,
}

/// Records, query and load state of a single list screen.
#[derive(Debug, Clone)]
pub struct Screen<R> {
    name: &'static str,
    records: Vec<R>,
    query: QueryState,
    state: LoadState,
    view_mode: ViewMode,
}

impl<R: FieldSource + Clone> Screen<R> {
    /// Creates an empty screen searching over `search_fields`.
    pub fn new(name: &'static str, search_fields: &[&str], page_size: NonZeroUsize) -> Self {
        let query = QueryState::new(page_size).with_search("", search_fields.iter().copied());
        Self {
            name,
            records: Vec::new(),
            query,
            state: LoadState::Idle,
            view_mode: ViewMode::List,
        }
    }

    /// Sets the initial sort.
    pub fn sorted_by(mut self, field: &str, order: SortOrder) -> Self {
        self.query.sort_field = Some(field.to_string());
        self.query.sort_order = order;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Marks a fetch as in flight.
    pub fn begin_load(&mut self) {
        debug!(screen = self.name, "Loading records");
        self.state = LoadState::Loading;
    }

    /// Applies the outcome of a fetch.
    ///
    /// Whichever response completes last replaces the cache. Loading is
    /// cleared on both paths; a failure keeps the previous records.
    pub fn finish_load<E: fmt::Display>(&mut self, result: std::result::Result<Vec<R>, E>) {
        match result {
            Ok(records) => {
                debug!(screen = self.name, count = records.len(), "Records loaded");
                self.records = records;
                self.state = LoadState::Loaded;
            }
            Err(e) => {
                debug!(screen = self.name, error = %e, "Loading records failed");
                self.state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Replaces the cache directly, e.g. with records read from a file.
    pub fn load(&mut self, records: Vec<R>) {
        self.finish_load::<CoreError>(Ok(records));
    }

    /// Runs the derivation pipeline for the current query.
    pub fn visible(&self) -> ListPage<R> {
        derive(&self.records, &self.query)
    }

    /// Sets the search text and returns to page 1.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.query.search_text = text.into();
        self.query.reset_page();
    }

    /// Sets or clears (with a blank value) an exact-match filter and returns to page 1.
    pub fn set_filter(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.query.filters.insert(field.into(), value.into());
        self.query.reset_page();
    }

    /// Sets the sort field and direction and returns to page 1.
    pub fn set_sort(&mut self, field: impl Into<String>, order: SortOrder) {
        self.query.sort_field = Some(field.into());
        self.query.sort_order = order;
        self.query.reset_page();
    }

    /// Jumps to `page` without bounds checks; an out-of-range page shows no rows.
    pub fn go_to_page(&mut self, page: NonZeroUsize) {
        self.query.page = page;
    }

    /// Advances one page if there is one.
    pub fn next_page(&mut self) -> bool {
        let total_pages = self.visible().total_pages;
        self.query.next_page(total_pages)
    }

    /// Goes back one page if not on the first.
    pub fn previous_page(&mut self) -> bool {
        self.query.previous_page()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Switches between list and card presentation.
    pub fn toggle_view(&mut self) -> ViewMode {
        self.view_mode = match self.view_mode {
            ViewMode::List => ViewMode::Card,
            ViewMode::Card => ViewMode::List,
        };
        self.view_mode
    }

    /// Looks up a record for the view dialog.
    pub fn find(&self, id: &RecordId) -> Option<&R> {
        self.records
            .iter()
            .find(|r| r.record_id().as_ref() == Some(id))
    }

    /// Drops a record from the cache.
    ///
    /// # Errors
    /// `CoreError::RecordNotFound` when no record has `id`.
    pub fn remove(&mut self, id: &RecordId) -> Result<R> {
        let index = self.position(id)?;
        debug!(screen = self.name, %id, "Removing record");
        Ok(self.records.remove(index))
    }

    /// Replaces the record with `id` by a new value built from the old one.
    ///
    /// # Errors
    /// `CoreError::RecordNotFound` when no record has `id`.
    pub fn update<F>(&mut self, id: &RecordId, f: F) -> Result<&R>
    where
        F: FnOnce(&R) -> R,
    {
        let index = self.position(id)?;
        let updated = f(&self.records[index]);
        debug!(screen = self.name, %id, "Updating record");
        self.records[index] = updated;
        Ok(&self.records[index])
    }

    fn position(&self, id: &RecordId) -> Result<usize> {
        self.records
            .iter()
            .position(|r| r.record_id().as_ref() == Some(id))
            .ok_or_else(|| CoreError::RecordNotFound { id: id.to_string() })
    }
}

/// Whether a form message reports success or failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// A message shown above a form after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }
}

/// Submission status of a create form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    loading: bool,
    message: Option<Message>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Clears the previous message and disables the form.
    pub fn begin_submit(&mut self) {
        self.loading = true;
        self.message = None;
    }

    /// Records the outcome. Loading is cleared either way.
    ///
    /// Returns true on success so callers know to reset their fields.
    pub fn finish_submit<T, E: fmt::Display>(
        &mut self,
        result: std::result::Result<T, E>,
        success_text: &str,
    ) -> bool {
        self.loading = false;
        match result {
            Ok(_) => {
                self.message = Some(Message::success(success_text));
                true
            }
            Err(e) => {
                self.message = Some(Message::error(e.to_string()));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Customer;

    fn customers() -> Vec<Customer> {
        ["Dana", "Ari", "Cy", "Bo", "Eve", "Fay", "Gus"]
            .iter()
            .enumerate()
            .map(|(i, name)| Customer {
                id: Some(RecordId::Number(i as u64 + 1)),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
                phone: format!("555-{}", i),
                address: String::new(),
            })
            .collect()
    }

    fn screen() -> Screen<Customer> {
        let mut screen = Screen::new(
            "customers",
            &["name", "email", "phone"],
            NonZeroUsize::new(5).unwrap(),
        )
        .sorted_by("name", SortOrder::Asc);
        screen.load(customers());
        screen
    }

    #[test]
    fn test_load_lifecycle() {
        let mut screen: Screen<Customer> =
            Screen::new("customers", &["name"], NonZeroUsize::MIN);
        assert_eq!(screen.state(), &LoadState::Idle);

        screen.begin_load();
        assert!(screen.state().is_loading());

        screen.finish_load::<String>(Ok(customers()));
        assert_eq!(screen.state(), &LoadState::Loaded);
        assert_eq!(screen.records().len(), 7);

        screen.begin_load();
        screen.finish_load::<String>(Err("Error: Unable to connect to the server.".to_string()));
        assert_eq!(
            screen.state(),
            &LoadState::Failed("Error: Unable to connect to the server.".to_string())
        );
        assert_eq!(screen.records().len(), 7);
    }

    #[test]
    fn test_last_completed_response_wins() {
        let mut screen: Screen<Customer> = Screen::new("customers", &["name"], NonZeroUsize::MIN);
        screen.begin_load();
        screen.begin_load();
        screen.finish_load::<String>(Ok(customers()));
        screen.finish_load::<String>(Ok(customers().into_iter().take(2).collect()));

        assert_eq!(screen.records().len(), 2);
        assert!(!screen.state().is_loading());
    }

    #[test]
    fn test_visible_and_paging() {
        let mut screen = screen();
        let first = screen.visible();
        assert_eq!(first.total_pages, 2);
        let names: Vec<_> = first.items.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ari", "Bo", "Cy", "Dana", "Eve"]);

        assert!(screen.next_page());
        assert_eq!(screen.visible().items.len(), 2);
        assert!(!screen.next_page());
        assert!(screen.previous_page());
        assert!(!screen.previous_page());
    }

    #[test]
    fn test_query_changes_reset_page() {
        let mut screen = screen();
        assert!(screen.next_page());

        screen.set_search("e");
        assert_eq!(screen.query().page.get(), 1);
        let names: Vec<_> = screen.visible().items.into_iter().map(|c| c.name).collect();
        // every email contains "example"
        assert_eq!(names.len(), 5);

        screen.set_search("ev");
        let visible = screen.visible();
        assert_eq!(visible.items.len(), 1);
        assert_eq!(visible.items[0].name, "Eve");

        screen.set_search("");
        screen.set_sort("name", SortOrder::Desc);
        assert_eq!(screen.visible().items[0].name, "Gus");
    }

    #[test]
    fn test_update_builds_new_record() {
        let mut screen = screen();
        let id = RecordId::Number(2);
        let before = screen.find(&id).cloned().unwrap();

        let updated = screen
            .update(&id, |old| Customer {
                name: "Arianne".to_string(),
                ..old.clone()
            })
            .unwrap();
        assert_eq!(updated.name, "Arianne");
        assert_eq!(before.name, "Ari");
        assert_eq!(screen.find(&id).unwrap().email, before.email);

        let missing = screen.update(&RecordId::Number(99), |old| old.clone());
        assert_eq!(
            missing.unwrap_err(),
            CoreError::RecordNotFound { id: "99".to_string() }
        );
    }

    #[test]
    fn test_remove() {
        let mut screen = screen();
        let removed = screen.remove(&RecordId::from("3")).unwrap();
        assert_eq!(removed.name, "Cy");
        assert_eq!(screen.records().len(), 6);
        assert!(screen.find(&RecordId::Number(3)).is_none());
        assert!(screen.remove(&RecordId::Number(3)).is_err());
    }

    #[test]
    fn test_filter_and_view_mode() {
        let mut screen = screen();
        screen.set_filter("name", "Bo");
        assert_eq!(screen.visible().total_items, 1);
        screen.set_filter("name", "");
        assert_eq!(screen.visible().total_items, 7);

        assert_eq!(screen.view_mode(), ViewMode::List);
        screen.set_view_mode(ViewMode::Card);
        assert_eq!(screen.view_mode(), ViewMode::Card);
        assert_eq!(screen.toggle_view(), ViewMode::List);
        assert_eq!(screen.toggle_view(), ViewMode::Card);
    }

    #[test]
    fn test_form_state() {
        let mut form = FormState::new();
        form.begin_submit();
        assert!(form.is_loading());
        assert!(form.message().is_none());

        assert!(form.finish_submit::<(), String>(Ok(()), "Customer added successfully!"));
        assert!(!form.is_loading());
        assert_eq!(
            form.message(),
            Some(&Message::success("Customer added successfully!"))
        );

        form.begin_submit();
        assert!(form.message().is_none());
        assert!(!form.finish_submit::<(), String>(Err("Error: Could not add customer.".into()), ""));
        assert_eq!(form.message().unwrap().kind, MessageKind::Error);
        assert!(!form.is_loading());
    }
}
