use std::fmt::Write;

use serde::Serialize;

use addrsuggest::{
    autocomplete::Snapshot,
    highlight::Segment,
    models::AddressSuggestion,
    render::{self, SuggestionRow},
};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// A line typed in interactive mode.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Replace the input text.
    Input(String),
    /// Select the Nth (1-based) listed row.
    Select(usize),
    Clear,
    Quit,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let Some(cmd) = line.strip_prefix(':') else {
        return Command::Input(line.to_string());
    };

    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("select" | "s"), Some(n)) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Command::Select(n),
            _ => Command::Invalid(format!("invalid row number: {}", n)),
        },
        (Some("clear" | "c"), None) => Command::Clear,
        (Some("quit" | "q"), None) => Command::Quit,
        _ => Command::Invalid(format!("unknown command: {}", line)),
    }
}

/// JSON output of a one-shot search.
#[derive(Serialize)]
pub struct SearchOutput<'a> {
    pub query: &'a str,
    pub suggestions: &'a [AddressSuggestion],
    pub rows: Vec<SuggestionRow>,
}

pub fn format_json(query: &str, found: &[AddressSuggestion]) -> Result<String, serde_json::Error> {
    let out = SearchOutput {
        query,
        suggestions: found,
        rows: found.iter().map(|s| SuggestionRow::new(s, query)).collect(),
    };
    serde_json::to_string_pretty(&out)
}

/// The suggestion behind the Nth (1-based) listed row. Listed rows leave out
/// the current selection, so N is not an index into the option list.
pub fn pick_row(snap: &Snapshot, n: usize) -> Option<AddressSuggestion> {
    let rows = render::rows(snap);
    let id = rows.get(n.checked_sub(1)?)?.id;
    snap.options.iter().find(|o| o.id == id).cloned()
}

/// Render segments, with highlighted runs in bold when `ansi` is set.
pub fn format_segments(segs: &[Segment], ansi: bool) -> String {
    let mut out = String::new();
    for s in segs {
        if s.highlighted && ansi {
            let _ = write!(out, "{}{}{}", BOLD, s.text, RESET);
        } else {
            out.push_str(&s.text);
        }
    }
    out
}

pub fn format_row(n: usize, row: &SuggestionRow, ansi: bool) -> String {
    format!(
        "{:>3}. {}\n     {}",
        n,
        format_segments(&row.segments, ansi),
        row.locality
    )
}

/// Render the whole widget state as text.
pub fn format_snapshot(snap: &Snapshot, min_chars: usize, ansi: bool) -> String {
    let mut out = String::new();

    let status = if snap.loading { " (searching...)" } else { "" };
    let _ = writeln!(out, "> {}{}", snap.input_text, status);

    if let Some(sel) = &snap.selected {
        let _ = writeln!(out, "  selected: {}", sel.label());
    }

    let rows = render::rows(snap);
    if rows.is_empty() && !snap.loading {
        let _ = writeln!(out, "  {}", render::empty_hint(&snap.input_text, min_chars));
    }
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "{}", format_row(i + 1, row, ansi));
    }

    out
}
