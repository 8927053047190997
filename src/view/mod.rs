//! The page the controller drives.
//!
//! [`View`] is the element-ID contract of the weather form page. Anything
//! that can show text, toggle visibility and hold a suggestion list can host
//! the controller: [`MemoryView`] keeps the page in memory and
//! [`terminal::render`] prints it.

pub mod memory;
pub mod terminal;

pub use memory::{Document, Element, MemoryView};

/// Label of the submit button while idle
pub const SUBMIT_LABEL: &str = "Get Weather";

/// Label of the submit button while a request is pending
pub const BUSY_LABEL: &str = "Loading...";

/// Elements of the weather form page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementId {
    WeatherForm,
    City,
    Date,
    ResultCard,
    ErrorMsg,
    Spinner,
    CitySuggestions,
    GetWeatherBtn,
    ResultCity,
    ResultDate,
    ResultPred,
    ResultAvg7d,
    ResultType,
}

impl ElementId {
    pub const ALL: [ElementId; 13] = [
        ElementId::WeatherForm,
        ElementId::City,
        ElementId::Date,
        ElementId::ResultCard,
        ElementId::ErrorMsg,
        ElementId::Spinner,
        ElementId::CitySuggestions,
        ElementId::GetWeatherBtn,
        ElementId::ResultCity,
        ElementId::ResultDate,
        ElementId::ResultPred,
        ElementId::ResultAvg7d,
        ElementId::ResultType,
    ];

    /// The element's `id` attribute
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementId::WeatherForm => "weather-form",
            ElementId::City => "city",
            ElementId::Date => "date",
            ElementId::ResultCard => "result-card",
            ElementId::ErrorMsg => "error-msg",
            ElementId::Spinner => "spinner",
            ElementId::CitySuggestions => "city-suggestions",
            ElementId::GetWeatherBtn => "get-weather-btn",
            ElementId::ResultCity => "result-city",
            ElementId::ResultDate => "result-date",
            ElementId::ResultPred => "result-pred",
            ElementId::ResultAvg7d => "result-avg7d",
            ElementId::ResultType => "result-type",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.as_str() == id)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations the controller performs on the page
///
/// Methods take `&self` because the view is shared between the event
/// handlers and the detached suggestion fetches.
pub trait View: Send + Sync + 'static {
    /// Current value of an input element
    fn value(&self, id: ElementId) -> String;

    fn set_text(&self, id: ElementId, text: &str);

    fn set_visible(&self, id: ElementId, visible: bool);

    fn set_class(&self, id: ElementId, class: &str);

    fn set_disabled(&self, id: ElementId, disabled: bool);

    /// Remove every option from a list element
    fn clear_options(&self, id: ElementId);

    /// Replace a list element's options in one step
    fn replace_options(&self, id: ElementId, values: &[String]);
}
