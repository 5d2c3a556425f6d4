use std::collections::HashMap;

use tracing::debug;

use crate::form::{FormField, FormState};

pub const NO_ITEMS: &str = "No items available";
pub const NO_MATCHES: &str = "No matching items";

/// Selectable values for each picker-backed field, keyed by catalog key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldCatalog {
    items: HashMap<String, Vec<String>>,
}

impl FieldCatalog {
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.items.insert(key.into(), values);
    }

    /// Unknown keys resolve to an empty list.
    pub fn candidates(&self, key: &str) -> &[String] {
        self.items.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self, key: &str) -> usize {
        self.candidates(key).len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickerRow<'a> {
    Item(&'a str),
    /// Informational, cannot be selected.
    Placeholder(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerSession {
    pub target: FormField,
    pub title: String,
    pub search: String,
    candidates: Vec<String>,
    visible: Vec<String>,
    pub cursor: usize,
}

/// The single modal picker. `Open` exactly when the overlay is drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Picker {
    #[default]
    Closed,
    Open(PickerSession),
}

impl Picker {
    pub fn is_open(&self) -> bool {
        matches!(self, Picker::Open(_))
    }

    pub fn target(&self) -> Option<FormField> {
        match self {
            Picker::Open(session) => Some(session.target),
            Picker::Closed => None,
        }
    }

    pub fn session(&self) -> Option<&PickerSession> {
        match self {
            Picker::Open(session) => Some(session),
            Picker::Closed => None,
        }
    }

    /// Replaces any open session with a fresh one for `field`.
    pub fn open(&mut self, field: FormField, catalog_key: &str, title: &str, catalog: &FieldCatalog) {
        let candidates = catalog.candidates(catalog_key).to_vec();
        debug!(field = field.name(), candidates = candidates.len(), "picker opened");
        *self = Picker::Open(PickerSession {
            target: field,
            title: title.to_string(),
            search: String::new(),
            visible: candidates.clone(),
            candidates,
            cursor: 0,
        });
    }

    pub fn close(&mut self) {
        if let Picker::Open(session) = self {
            debug!(field = session.target.name(), "picker closed");
        }
        *self = Picker::Closed;
    }

    pub fn filter(&mut self, search: &str) {
        let Picker::Open(session) = self else {
            return;
        };
        let needle = search.to_lowercase();
        session.search = search.to_string();
        session.visible = session
            .candidates
            .iter()
            .filter(|item| item.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        session.cursor = 0;
    }

    pub fn push_search(&mut self, c: char) {
        if let Some(mut search) = self.session().map(|s| s.search.clone()) {
            search.push(c);
            self.filter(&search);
        }
    }

    pub fn pop_search(&mut self) {
        if let Some(mut search) = self.session().map(|s| s.search.clone()) {
            search.pop();
            self.filter(&search);
        }
    }

    pub fn move_up(&mut self) {
        if let Picker::Open(session) = self {
            session.cursor = session.cursor.saturating_sub(1);
        }
    }

    pub fn move_down(&mut self) {
        if let Picker::Open(session) = self {
            if session.cursor + 1 < session.visible.len() {
                session.cursor += 1;
            }
        }
    }

    /// Writes `value` into the target field and closes. No-op when closed.
    pub fn select(&mut self, value: &str, form: &mut FormState) {
        if let Some(target) = self.target() {
            debug!(field = target.name(), value, "picker selection");
            form.set_text(target, value);
        }
        self.close();
    }

    /// Selects the highlighted row. Placeholder rows are ignored.
    pub fn select_highlighted(&mut self, form: &mut FormState) {
        let Some(session) = self.session() else {
            return;
        };
        if let Some(value) = session.visible.get(session.cursor).cloned() {
            self.select(&value, form);
        }
    }

    pub fn rows(&self) -> Vec<PickerRow<'_>> {
        let Picker::Open(session) = self else {
            return Vec::new();
        };
        if session.candidates.is_empty() {
            return vec![PickerRow::Placeholder(NO_ITEMS)];
        }
        if session.visible.is_empty() {
            return vec![PickerRow::Placeholder(NO_MATCHES)];
        }
        session
            .visible
            .iter()
            .map(|item| PickerRow::Item(item.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FieldCatalog {
        let mut catalog = FieldCatalog::default();
        catalog.insert(
            "brand",
            vec!["Toyota".into(), "Honda".into(), "Nissan".into(), "Mitsubishi".into()],
        );
        catalog.insert("town", vec![]);
        catalog
    }

    fn open_brand(catalog: &FieldCatalog) -> Picker {
        let mut picker = Picker::default();
        picker.open(FormField::Brand, "brand", "Select Brand", catalog);
        picker
    }

    fn items<'a>(rows: &[PickerRow<'a>]) -> Vec<&'a str> {
        rows.iter()
            .filter_map(|row| match row {
                PickerRow::Item(s) => Some(*s),
                PickerRow::Placeholder(_) => None,
            })
            .collect()
    }

    #[test]
    fn starts_closed() {
        let picker = Picker::default();
        assert!(!picker.is_open());
        assert_eq!(picker.target(), None);
        assert!(picker.rows().is_empty());
    }

    #[test]
    fn open_then_empty_filter_shows_full_list() {
        let catalog = catalog();
        let mut picker = open_brand(&catalog);
        assert_eq!(picker.target(), Some(FormField::Brand));
        picker.filter("");
        assert_eq!(items(&picker.rows()), catalog.candidates("brand"));
    }

    #[test]
    fn filter_is_case_insensitive_substring_in_order() {
        let catalog = catalog();
        let mut picker = open_brand(&catalog);
        picker.filter("I");
        assert_eq!(items(&picker.rows()), vec!["Nissan", "Mitsubishi"]);
        picker.filter("hON");
        assert_eq!(items(&picker.rows()), vec!["Honda"]);
    }

    #[test]
    fn no_match_renders_placeholder() {
        let catalog = catalog();
        let mut picker = open_brand(&catalog);
        picker.filter("zzz");
        assert_eq!(picker.rows(), vec![PickerRow::Placeholder(NO_MATCHES)]);
    }

    #[test]
    fn empty_or_unknown_catalog_renders_no_items() {
        let catalog = catalog();
        let mut picker = Picker::default();
        picker.open(FormField::Town, "town", "Select Town", &catalog);
        assert_eq!(picker.rows(), vec![PickerRow::Placeholder(NO_ITEMS)]);
        picker.filter("col");
        assert_eq!(picker.rows(), vec![PickerRow::Placeholder(NO_ITEMS)]);

        picker.open(FormField::Model, "model", "Select Model", &catalog);
        assert_eq!(picker.rows(), vec![PickerRow::Placeholder(NO_ITEMS)]);
    }

    #[test]
    fn reopening_clears_previous_search() {
        let catalog = catalog();
        let mut picker = open_brand(&catalog);
        picker.push_search('t');
        picker.push_search('o');
        assert_eq!(picker.session().map(|s| s.search.as_str()), Some("to"));
        picker.open(FormField::Brand, "brand", "Select Brand", &catalog);
        assert_eq!(picker.session().map(|s| s.search.as_str()), Some(""));
        assert_eq!(items(&picker.rows()).len(), 4);
    }

    #[test]
    fn select_writes_target_and_close_is_idempotent() {
        let catalog = catalog();
        let mut form = FormState::default();
        let mut picker = open_brand(&catalog);
        picker.select("Honda", &mut form);
        assert_eq!(form.text(FormField::Brand), "Honda");
        assert_eq!(picker.target(), None);
        picker.close();
        assert_eq!(picker, Picker::Closed);
        picker.close();
        assert_eq!(picker, Picker::Closed);
    }

    #[test]
    fn select_without_session_is_noop() {
        let mut form = FormState::default();
        let mut picker = Picker::default();
        picker.select("Honda", &mut form);
        assert_eq!(form, FormState::default());
        assert!(!picker.is_open());
    }

    #[test]
    fn highlighted_selection_follows_cursor() {
        let catalog = catalog();
        let mut form = FormState::default();
        let mut picker = open_brand(&catalog);
        picker.move_down();
        picker.move_down();
        picker.move_down();
        picker.move_down();
        picker.select_highlighted(&mut form);
        assert_eq!(form.text(FormField::Brand), "Mitsubishi");
    }

    #[test]
    fn highlighted_placeholder_is_not_selectable() {
        let catalog = catalog();
        let mut form = FormState::default();
        let mut picker = open_brand(&catalog);
        picker.filter("zzz");
        picker.select_highlighted(&mut form);
        assert!(picker.is_open());
        assert_eq!(form.text(FormField::Brand), "");
    }

    #[test]
    fn backspace_refilters() {
        let catalog = catalog();
        let mut picker = open_brand(&catalog);
        picker.push_search('x');
        assert_eq!(picker.rows(), vec![PickerRow::Placeholder(NO_MATCHES)]);
        picker.pop_search();
        assert_eq!(items(&picker.rows()).len(), 4);
    }
}
