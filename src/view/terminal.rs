//! Plain-text rendering of the page for the terminal front-end.

use super::{Document, ElementId};
use std::fmt::Write;

/// Render the visible parts of the page, one element per line
pub fn render(doc: &Document) -> String {
    let mut out = String::new();

    let button = doc.get(ElementId::GetWeatherBtn);
    let _ = writeln!(
        out,
        "city: {:?}  date: {:?}  [{}{}]",
        doc.get(ElementId::City).value,
        doc.get(ElementId::Date).value,
        button.text,
        if button.disabled { ", disabled" } else { "" }
    );

    let suggestions = doc.options(ElementId::CitySuggestions);
    if !suggestions.is_empty() {
        let _ = writeln!(out, "suggestions:");
        for option in suggestions {
            let _ = writeln!(out, "  - {option}");
        }
    }

    if doc.is_visible(ElementId::Spinner) {
        let _ = writeln!(out, "loading...");
    }

    if doc.is_visible(ElementId::ErrorMsg) {
        let _ = writeln!(out, "error: {}", doc.text(ElementId::ErrorMsg));
    }

    if doc.is_visible(ElementId::ResultCard) {
        let _ = writeln!(
            out,
            "{} on {}: {} (7-day avg {})",
            doc.text(ElementId::ResultCity),
            doc.text(ElementId::ResultDate),
            doc.text(ElementId::ResultPred),
            doc.text(ElementId::ResultAvg7d)
        );
        let _ = writeln!(out, "  {}", doc.text(ElementId::ResultType));
    }

    out
}
