//! In-memory page state.

use super::{ElementId, SUBMIT_LABEL, View};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// State of a single element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub value: String,
    pub text: String,
    pub class: String,
    pub visible: bool,
    pub disabled: bool,
    pub options: Vec<String>,
}

/// Snapshot of every element on the page
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    elements: BTreeMap<ElementId, Element>,
}

impl Default for Document {
    /// The page as first loaded: result, error and spinner hidden, the
    /// submit button enabled with its idle label.
    fn default() -> Self {
        let mut elements: BTreeMap<ElementId, Element> = ElementId::ALL
            .into_iter()
            .map(|id| {
                (
                    id,
                    Element {
                        visible: true,
                        ..Element::default()
                    },
                )
            })
            .collect();

        for hidden in [ElementId::ResultCard, ElementId::ErrorMsg, ElementId::Spinner] {
            if let Some(element) = elements.get_mut(&hidden) {
                element.visible = false;
            }
        }
        if let Some(button) = elements.get_mut(&ElementId::GetWeatherBtn) {
            button.text = SUBMIT_LABEL.to_string();
        }

        Self { elements }
    }
}

impl Document {
    pub fn get(&self, id: ElementId) -> &Element {
        // Every id is inserted by `Default`
        &self.elements[&id]
    }

    fn get_mut(&mut self, id: ElementId) -> &mut Element {
        self.elements.entry(id).or_default()
    }

    pub fn text(&self, id: ElementId) -> &str {
        &self.get(id).text
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.get(id).visible
    }

    pub fn options(&self, id: ElementId) -> &[String] {
        &self.get(id).options
    }
}

/// [`View`] backed by a [`Document`]
#[derive(Debug, Default)]
pub struct MemoryView {
    document: Mutex<Document>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    fn doc(&self) -> MutexGuard<'_, Document> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Set an input's value, as a user typing into it would
    pub fn set_value(&self, id: ElementId, value: &str) {
        self.doc().get_mut(id).value = value.to_string();
    }

    pub fn snapshot(&self) -> Document {
        self.doc().clone()
    }

    pub fn text(&self, id: ElementId) -> String {
        self.doc().text(id).to_string()
    }

    pub fn class(&self, id: ElementId) -> String {
        self.doc().get(id).class.clone()
    }

    pub fn is_visible(&self, id: ElementId) -> bool {
        self.doc().is_visible(id)
    }

    pub fn is_disabled(&self, id: ElementId) -> bool {
        self.doc().get(id).disabled
    }

    pub fn options(&self, id: ElementId) -> Vec<String> {
        self.doc().options(id).to_vec()
    }
}

impl View for MemoryView {
    fn value(&self, id: ElementId) -> String {
        self.doc().get(id).value.clone()
    }

    fn set_text(&self, id: ElementId, text: &str) {
        self.doc().get_mut(id).text = text.to_string();
    }

    fn set_visible(&self, id: ElementId, visible: bool) {
        self.doc().get_mut(id).visible = visible;
    }

    fn set_class(&self, id: ElementId, class: &str) {
        self.doc().get_mut(id).class = class.to_string();
    }

    fn set_disabled(&self, id: ElementId, disabled: bool) {
        self.doc().get_mut(id).disabled = disabled;
    }

    fn clear_options(&self, id: ElementId) {
        self.doc().get_mut(id).options.clear();
    }

    fn replace_options(&self, id: ElementId, values: &[String]) {
        self.doc().get_mut(id).options = values.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::BUSY_LABEL;

    #[test]
    fn test_initial_page_state() {
        let view = MemoryView::new();
        assert!(!view.is_visible(ElementId::ResultCard));
        assert!(!view.is_visible(ElementId::ErrorMsg));
        assert!(!view.is_visible(ElementId::Spinner));
        assert!(view.is_visible(ElementId::WeatherForm));
        assert!(!view.is_disabled(ElementId::GetWeatherBtn));
        assert_eq!(view.text(ElementId::GetWeatherBtn), SUBMIT_LABEL);
        assert!(view.options(ElementId::CitySuggestions).is_empty());
    }

    #[test]
    fn test_view_operations() {
        let view = MemoryView::new();
        view.set_value(ElementId::City, " Paris ");
        assert_eq!(view.value(ElementId::City), " Paris ");

        view.set_disabled(ElementId::GetWeatherBtn, true);
        view.set_text(ElementId::GetWeatherBtn, BUSY_LABEL);
        assert!(view.is_disabled(ElementId::GetWeatherBtn));
        assert_eq!(view.text(ElementId::GetWeatherBtn), BUSY_LABEL);

        view.replace_options(
            ElementId::CitySuggestions,
            &["Paris, France".to_string(), "Paris, United States".to_string()],
        );
        assert_eq!(view.options(ElementId::CitySuggestions).len(), 2);
        view.replace_options(ElementId::CitySuggestions, &["Parma, Italy".to_string()]);
        assert_eq!(view.options(ElementId::CitySuggestions), vec!["Parma, Italy"]);
        view.clear_options(ElementId::CitySuggestions);
        assert!(view.options(ElementId::CitySuggestions).is_empty());

        view.set_class(ElementId::ResultType, "result-type forecast");
        assert_eq!(view.class(ElementId::ResultType), "result-type forecast");
    }

    #[test]
    fn test_snapshot_is_detached() {
        let view = MemoryView::new();
        let before = view.snapshot();
        view.set_visible(ElementId::ResultCard, true);
        assert!(!before.is_visible(ElementId::ResultCard));
        assert!(view.snapshot().is_visible(ElementId::ResultCard));
    }
}
