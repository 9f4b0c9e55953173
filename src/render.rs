use serde::Serialize;

use crate::{
    autocomplete::Snapshot,
    highlight::{highlight, Segment},
    models::AddressSuggestion,
};

pub const HINT_START_TYPING: &str = "Start typing your address...";
pub const HINT_NO_MATCHES: &str = "No matches";

/// One dropdown row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRow {
    /// Row key. Same as the suggestion id.
    pub id: i64,
    /// Full address split into highlighted and plain runs.
    pub segments: Vec<Segment>,
    /// Secondary line: suburb, state and postcode.
    pub locality: String,
}

impl SuggestionRow {
    pub fn new(s: &AddressSuggestion, input: &str) -> Self {
        Self {
            id: s.id,
            segments: highlight(&s.full_address, input),
            locality: s.locality(),
        }
    }
}

/// Dropdown rows for a snapshot. The selected value is left out of the rows
/// even though the option list keeps it at the front.
pub fn rows(snap: &Snapshot) -> Vec<SuggestionRow> {
    let selected = snap.selected.as_ref().map(|s| s.id);
    snap.options
        .iter()
        .filter(|o| Some(o.id) != selected)
        .map(|o| SuggestionRow::new(o, &snap.input_text))
        .collect()
}

/// Text shown in place of rows when there is nothing to list. Unlike the
/// search threshold, the raw input length is used here, so padded input
/// such as " 1 " already reads "No matches".
pub fn empty_hint(input: &str, min_chars: usize) -> &'static str {
    if input.chars().count() < min_chars {
        HINT_START_TYPING
    } else {
        HINT_NO_MATCHES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionList;

    fn sug(id: i64, addr: &str) -> AddressSuggestion {
        AddressSuggestion {
            id,
            unit: None,
            street_number: String::new(),
            street_name: String::new(),
            suburb: "Springfield".to_string(),
            state: "IL".to_string(),
            postcode: "62701".to_string(),
            full_address: addr.to_string(),
        }
    }

    #[test]
    fn test_row() {
        let row = SuggestionRow::new(&sug(7, "123 Main St, Springfield"), "main");
        assert_eq!(row.id, 7);
        assert_eq!(row.locality, "Springfield IL 62701");
        assert_eq!(
            row.segments,
            vec![
                Segment { text: "123 ".to_string(), highlighted: false },
                Segment { text: "Main".to_string(), highlighted: true },
                Segment { text: " St, Springfield".to_string(), highlighted: false },
            ]
        );
    }

    #[test]
    fn test_rows_skip_selected() {
        let sel = sug(1, "123 Main St");
        let snap = Snapshot {
            input_text: "123".to_string(),
            selected: Some(sel.clone()),
            options: OptionList::merge(Some(&sel), vec![sug(2, "123 Main Rd"), sug(1, "123 Main St")]),
            ..Snapshot::default()
        };

        let out = rows(&snap);
        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
        assert!(out[0].segments[0].highlighted);
    }

    #[test]
    fn test_empty_hint() {
        assert_eq!(empty_hint("", 2), HINT_START_TYPING);
        assert_eq!(empty_hint("1", 2), HINT_START_TYPING);
        assert_eq!(empty_hint("é", 2), HINT_START_TYPING);
        assert_eq!(empty_hint("12", 2), HINT_NO_MATCHES);

        // Whitespace counts toward the hint but not toward searching.
        assert_eq!(empty_hint("  1 ", 2), HINT_NO_MATCHES);
        assert!(!crate::autocomplete::is_searchable("  1 ", 2));
    }
}
