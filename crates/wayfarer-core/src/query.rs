//! Per-request query analysis.
//!
//! Turns the raw text of the input box into a [`QueryState`]: the normalized
//! text, the token currently being typed, and which booking keywords have
//! already been written. Keywords are matched as whole words over an explicit
//! tokenization, so "to" never matches inside "hotel".

/// Starter phrases that open a request, lowercase.
pub const STARTER_PREFIXES: &[&str] = &["i want to book a", "book me a", "find me a"];

/// Traveler count markers.
pub const PEOPLE_KEYWORDS: &[&str] = &["adult", "adults", "child", "children"];

/// Seat preference markers.
pub const SEAT_KEYWORDS: &[&str] = &["window", "aisle", "middle", "any"];

/// Meal preference markers. Multi-word entries match as consecutive words.
pub const MEAL_KEYWORDS: &[&str] = &[
    "vegetarian",
    "non-vegetarian",
    "vegan",
    "kosher",
    "halal",
    "no preference",
];

/// A word of the normalized query with its byte span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

/// Split `text` into maximal runs of alphanumeric characters.
pub fn words(text: &str) -> Vec<Word<'_>> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;

    for (i, ch) in text.char_indices() {
        match (ch.is_alphanumeric(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                out.push(Word {
                    text: &text[s..i],
                    start: s,
                    end: i,
                });
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(Word {
            text: &text[s..],
            start: s,
            end: text.len(),
        });
    }
    out
}

/// The word fragment being typed: the trailing run of non-whitespace
/// characters, or `""` when the input is empty or ends in whitespace.
pub fn current_token(raw: &str) -> &str {
    match raw.chars().next_back() {
        None => "",
        Some(last) if last.is_whitespace() => "",
        Some(_) => raw.rsplit(char::is_whitespace).next().unwrap_or(""),
    }
}

/// Whether `keyword` occurs in `haystack` as a sequence of whole words.
pub fn contains_keyword(haystack: &[Word<'_>], keyword: &str) -> bool {
    let needle: Vec<&str> = words(keyword).into_iter().map(|w| w.text).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack
        .windows(needle.len())
        .any(|window| window.iter().zip(&needle).all(|(w, n)| w.text == *n))
}

fn contains_any(haystack: &[Word<'_>], keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_keyword(haystack, k))
}

/// Everything the resolver needs to know about one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// Trimmed, lowercased input.
    pub normalized: String,
    /// Lowercased current token.
    pub token: String,
    /// Normalized text opens with one of [`STARTER_PREFIXES`].
    pub has_starter: bool,
    pub has_flight: bool,
    pub has_hotel: bool,
    /// Trimmed text after the first `from` word, if `from` was typed.
    pub after_from: Option<String>,
    /// Trimmed text after the first `to` word following `from`, if any.
    pub after_to: Option<String>,
    pub has_people: bool,
    pub has_seat: bool,
    pub has_meal: bool,
}

impl QueryState {
    /// Analyze a raw (untrimmed) query.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        let token = current_token(raw).to_lowercase();
        let tokens = words(&normalized);

        let has_starter = STARTER_PREFIXES.iter().any(|p| normalized.starts_with(p));

        let from_idx = tokens.iter().position(|w| w.text == "from");
        let after_from = from_idx.map(|i| normalized[tokens[i].end..].trim().to_string());

        // The destination connector only counts once the origin connector is
        // present; the "to" in "I want to book a" is not it.
        let after_to = from_idx.and_then(|i| {
            tokens[i + 1..]
                .iter()
                .find(|w| w.text == "to")
                .map(|w| normalized[w.end..].trim().to_string())
        });

        let has_flight = contains_keyword(&tokens, "flight");
        let has_hotel = contains_keyword(&tokens, "hotel");
        let has_people = contains_any(&tokens, PEOPLE_KEYWORDS);
        let has_seat = contains_any(&tokens, SEAT_KEYWORDS);
        let has_meal = contains_any(&tokens, MEAL_KEYWORDS);

        Self {
            normalized,
            token,
            has_starter,
            has_flight,
            has_hotel,
            after_from,
            after_to,
            has_people,
            has_seat,
            has_meal,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }

    pub fn has_from(&self) -> bool {
        self.after_from.is_some()
    }

    pub fn has_to(&self) -> bool {
        self.after_to.is_some()
    }

    /// Both connectors typed and something written after `to`.
    pub fn destination_selected(&self) -> bool {
        self.after_to.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Whether `segment` (text after a connector) is still being typed:
    /// nothing written yet, or exactly the current token.
    pub fn is_awaiting(&self, segment: &str) -> bool {
        segment.is_empty() || segment == self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_token() {
        assert_eq!(current_token(""), "");
        assert_eq!(current_token("I want to book a fl"), "fl");
        assert_eq!(current_token("I want to book a "), "");
        assert_eq!(current_token("flight\t"), "");
        assert_eq!(current_token("Mumbai"), "Mumbai");
        assert_eq!(current_token("from (BOM),"), "(BOM),");
    }

    #[test]
    fn test_words_split_on_punctuation() {
        let tokens: Vec<&str> = words("goa (goi), non-vegetarian")
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(tokens, vec!["goa", "goi", "non", "vegetarian"]);
    }

    #[test]
    fn test_words_spans_index_the_source() {
        let text = "fly from mumbai";
        for w in words(text) {
            assert_eq!(&text[w.start..w.end], w.text);
        }
    }

    #[test]
    fn test_keyword_is_whole_word() {
        let tokens = words("i want to book a hotel");
        assert!(contains_keyword(&tokens, "hotel"));
        assert!(!contains_keyword(&tokens, "hot"));
        assert!(!contains_keyword(&words("a hotel"), "to"));
    }

    #[test]
    fn test_multi_word_keyword() {
        assert!(contains_keyword(&words("meal: no preference"), "no preference"));
        assert!(!contains_keyword(&words("no real preference"), "no preference"));
        assert!(contains_keyword(&words("non-vegetarian meal"), "non-vegetarian"));
    }

    #[test]
    fn test_parse_tracks_connectors() {
        let state = QueryState::parse("I want to book a flight from Mumbai to Delhi ");
        assert!(state.has_starter);
        assert!(state.has_flight);
        assert_eq!(state.after_from.as_deref(), Some("mumbai to delhi"));
        assert_eq!(state.after_to.as_deref(), Some("delhi"));
        assert!(state.destination_selected());
        assert_eq!(state.token, "");
    }

    #[test]
    fn test_to_without_from_is_not_a_connector() {
        let state = QueryState::parse("I want to book a hotel");
        assert!(!state.has_from());
        assert!(!state.has_to());
        assert!(state.has_hotel);
        assert_eq!(state.token, "hotel");
    }

    #[test]
    fn test_from_inside_word_is_ignored() {
        let state = QueryState::parse("flight fromage");
        assert!(!state.has_from());
    }

    #[test]
    fn test_preference_markers() {
        let state = QueryState::parse("... to Goa 2 adults window seat halal meal");
        assert!(state.has_people);
        assert!(state.has_seat);
        assert!(state.has_meal);

        let state = QueryState::parse("... to Goa 2 ADULTS");
        assert!(state.has_people);
        assert!(!state.has_seat);
    }

    #[test]
    fn test_is_awaiting() {
        let state = QueryState::parse("flight from Mum");
        assert_eq!(state.after_from.as_deref(), Some("mum"));
        assert!(state.is_awaiting("mum"));
        assert!(state.is_awaiting(""));
        assert!(!state.is_awaiting("mumbai to"));
    }

    #[test]
    fn test_empty_and_blank_queries() {
        assert!(QueryState::parse("").is_empty());
        let blank = QueryState::parse("   ");
        assert!(blank.is_empty());
        assert_eq!(blank.token, "");
    }
}
