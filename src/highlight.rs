//! Highlight segmentation of suggestion labels against the typed query.
//!
//! All ranges are half-open and measured in characters, not bytes. Matching
//! ignores case and accents, so "cafe" highlights "Café".

use std::ops::Range;

use serde::Serialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Allow matches that start in the middle of a word.
    pub inside_words: bool,
    /// Keep matching each query word after its first occurrence.
    pub find_all_occurrences: bool,
    /// Return no ranges unless every query word matched.
    pub require_match_all: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            inside_words: true,
            find_all_occurrences: false,
            require_match_all: false,
        }
    }
}

/// A run of label text, either matched or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn new(chars: &[char], highlighted: bool) -> Self {
        Self {
            text: chars.iter().collect(),
            highlighted,
        }
    }
}

/// Find the character ranges of `text` matched by the words of `query`.
///
/// Matching is case-insensitive. Each word claims the characters it matched,
/// so later words never overlap earlier ones. Results are sorted by start.
pub fn match_ranges(text: &str, query: &str, opt: MatchOptions) -> Vec<Range<usize>> {
    let chars: Vec<char> = text.chars().collect();

    // Folded haystack. Claimed characters become None.
    let mut hay: Vec<Option<char>> = chars.iter().map(|c| Some(fold(*c))).collect();

    let mut out = Vec::new();
    for word in query.split_whitespace() {
        let needle: Vec<char> = word
            .chars()
            .filter(|c| !is_combining_mark(*c))
            .map(fold)
            .collect();

        let mut found = false;
        while let Some(start) = find(&hay, &needle, opt.inside_words) {
            found = true;
            let end = start + needle.len();
            hay[start..end].iter_mut().for_each(|c| *c = None);
            out.push(start..end);

            if !opt.find_all_occurrences {
                break;
            }
        }

        if !found && opt.require_match_all {
            return Vec::new();
        }
    }

    out.sort_by_key(|r| r.start);
    out
}

/// Split `text` into ordered segments given sorted, non-overlapping ranges.
pub fn segments(text: &str, ranges: &[Range<usize>]) -> Vec<Segment> {
    let chars: Vec<char> = text.chars().collect();
    if ranges.is_empty() {
        return vec![Segment::new(&chars, false)];
    }

    let mut out = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut pos = 0;
    for r in ranges {
        let start = r.start.clamp(pos, chars.len());
        let end = r.end.clamp(start, chars.len());

        if start > pos {
            out.push(Segment::new(&chars[pos..start], false));
        }
        if end > start {
            out.push(Segment::new(&chars[start..end], true));
        }
        pos = end;
    }

    if pos < chars.len() {
        out.push(Segment::new(&chars[pos..], false));
    }

    out
}

/// Segment `text` against `query` with the options used by the dropdown.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    segments(text, &match_ranges(text, query, MatchOptions::default()))
}

/// Lowercase and strip accents, one output char per input char so indices
/// stay aligned with the original text.
fn fold(c: char) -> char {
    let base = c
        .to_string()
        .nfd()
        .find(|d| !is_combining_mark(*d))
        .unwrap_or(c);
    base.to_lowercase().next().unwrap_or(base)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn find(hay: &[Option<char>], needle: &[char], inside_words: bool) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }

    // Only words starting with a word character are anchored to a boundary.
    let anchored = !inside_words && is_word_char(needle[0]);

    (0..=hay.len() - needle.len()).find(|&start| {
        if anchored && start > 0 && hay[start - 1].is_some_and(is_word_char) {
            return false;
        }

        hay[start..start + needle.len()]
            .iter()
            .zip(needle)
            .all(|(h, n)| *h == Some(*n))
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn marked(segs: &[Segment]) -> String {
        segs.iter()
            .map(|s| {
                if s.highlighted {
                    format!("[{}]", s.text)
                } else {
                    s.text.clone()
                }
            })
            .collect()
    }

    #[rstest]
    #[case("123 Main St, Springfield", "123 Main", "[123] [Main] St, Springfield")]
    #[case("123 Main St, Springfield", "main", "123 [Main] St, Springfield")]
    #[case("123 Main St, Springfield", "ring", "123 Main St, Sp[ring]field")]
    #[case("123 Main St, Springfield", "xyz", "123 Main St, Springfield")]
    #[case("123 Main St, Springfield", "   ", "123 Main St, Springfield")]
    #[case("123 Main St, Springfield", "", "123 Main St, Springfield")]
    #[case("12 Smith St", "s", "12 [S]mith St")]
    #[case("Königstraße 5", "straße", "König[straße] 5")]
    #[case("MAIN", "main", "[MAIN]")]
    #[case("Café Rd", "cafe", "[Café] Rd")]
    #[case("Cafe Rd", "café", "[Cafe] Rd")]
    #[case("Émile St, Gosford", "emile gos", "[Émile] St, [Gos]ford")]
    fn test_highlight(#[case] text: &str, #[case] query: &str, #[case] want: &str) {
        assert_eq!(marked(&highlight(text, query)), want);
    }

    #[test]
    fn test_words_claim_characters() {
        // The second "1" can't reuse the first word's match.
        let r = match_ranges("11 Elm", "1 1", MatchOptions::default());
        assert_eq!(r, vec![0..1, 1..2]);

        // Adjacent matches stay separate segments.
        let segs = segments("11 Elm", &r);
        assert_eq!(marked(&segs), "[1][1] Elm");
        assert_eq!(segs.len(), 3);
    }

    #[test]
    fn test_ranges_sorted_by_position() {
        let r = match_ranges("123 Main St", "st 123", MatchOptions::default());
        assert_eq!(r, vec![0..3, 9..11]);
    }

    #[test]
    fn test_word_boundaries() {
        let opt = MatchOptions {
            inside_words: false,
            ..MatchOptions::default()
        };
        assert!(match_ranges("Springfield", "ring", opt).is_empty());
        assert_eq!(match_ranges("Spring Rd, Ringwood", "ring", opt), vec![11..15]);
        assert_eq!(match_ranges("4/12 Oak", "12", opt), vec![2..4]);
        assert_eq!(match_ranges("4_12 Oak", "12", opt), Vec::<Range<usize>>::new());
        assert_eq!(match_ranges("Rue Élysée", "ely", opt), vec![4..7]);
    }

    #[rstest]
    #[case("4/12 Oak", "/12", vec![1..4])]
    #[case("Unit 4-12", "-12", vec![6..9])]
    #[case("Springfield", "ring", vec![])]
    fn test_word_boundaries_skip_non_word_start(
        #[case] text: &str,
        #[case] query: &str,
        #[case] want: Vec<Range<usize>>,
    ) {
        let opt = MatchOptions {
            inside_words: false,
            ..MatchOptions::default()
        };
        assert_eq!(match_ranges(text, query, opt), want);
    }

    #[test]
    fn test_find_all_occurrences() {
        let opt = MatchOptions {
            find_all_occurrences: true,
            ..MatchOptions::default()
        };
        assert_eq!(
            match_ranges("Main St, Mainfield", "main", opt),
            vec![0..4, 9..13]
        );
        assert_eq!(
            match_ranges("Main St, Mainfield", "main", MatchOptions::default()),
            vec![0..4]
        );
    }

    #[test]
    fn test_require_match_all() {
        let opt = MatchOptions {
            require_match_all: true,
            ..MatchOptions::default()
        };
        assert!(match_ranges("123 Main St", "123 Oak", opt).is_empty());
        assert_eq!(match_ranges("123 Main St", "123 main", opt), vec![0..3, 4..8]);
    }

    #[test]
    fn test_segments_char_indices() {
        let segs = segments("Café Rd", &[3..4]);
        assert_eq!(marked(&segs), "Caf[é] Rd");
    }

    #[test]
    fn test_segments_out_of_range() {
        let segs = segments("Oak", &[1..10]);
        assert_eq!(marked(&segs), "O[ak]");

        let segs = segments("", &[]);
        assert_eq!(segs, vec![Segment { text: String::new(), highlighted: false }]);
    }
}
