use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// The catalog a suggestion is drawn from.
///
/// Serialized in lowercase as the `type` field of a suggestion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Opening phrase of a request ("Book me a").
    Starter,
    /// Bookable service ("flight", "hotel").
    Service,
    /// Connector word between sentence parts ("from", "to").
    Connector,
    /// Origin or destination airport.
    City,
    /// Traveler count.
    People,
    /// Seat preference.
    Seat,
    /// Meal preference.
    Meal,
}

impl SuggestionKind {
    /// All kinds, in conversational order.
    pub const ALL: [SuggestionKind; 7] = [
        SuggestionKind::Starter,
        SuggestionKind::Service,
        SuggestionKind::Connector,
        SuggestionKind::City,
        SuggestionKind::People,
        SuggestionKind::Seat,
        SuggestionKind::Meal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionKind::Starter => "starter",
            SuggestionKind::Service => "service",
            SuggestionKind::Connector => "connector",
            SuggestionKind::City => "city",
            SuggestionKind::People => "people",
            SuggestionKind::Seat => "seat",
            SuggestionKind::Meal => "meal",
        }
    }
}

impl fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the booking conversation, as decided by the resolver.
///
/// Variants are listed in rule priority order: the first stage whose
/// predicate holds for a query is the one that answers it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing typed yet.
    Starter,
    /// A starter phrase is typed, no service chosen.
    Service,
    /// A flight is requested but no origin connector yet.
    FromConnector,
    /// Waiting for (or mid-typing) the origin airport.
    OriginCity,
    /// Origin given, destination connector missing.
    ToConnector,
    /// Waiting for (or mid-typing) the destination airport.
    DestinationCity,
    /// Route complete, traveler count missing.
    People,
    /// Traveler count given, seat preference missing.
    Seat,
    /// Seat given, meal preference missing.
    Meal,
    /// No stage matched.
    Fallback,
}

impl Stage {
    /// Whether candidates for this stage are narrowed by the current token.
    pub fn is_filtered(&self) -> bool {
        !matches!(self, Stage::Starter)
    }
}

// =============================================================================
// Suggestion
// =============================================================================

/// A single autocomplete candidate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Suggestion {
    /// Text shown to (and inserted for) the user.
    pub display: String,
    /// Catalog the suggestion belongs to.
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

impl Suggestion {
    pub fn new(display: impl Into<String>, kind: SuggestionKind) -> Self {
        Self {
            display: display.into(),
            kind,
        }
    }

    /// Case-insensitive prefix test. `folded_prefix` must already be lowercase.
    pub fn starts_with_folded(&self, folded_prefix: &str) -> bool {
        self.display.to_lowercase().starts_with(folded_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_serializes_kind_as_type() {
        let s = Suggestion::new("flight", SuggestionKind::Service);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"display":"flight","type":"service"}"#);

        let back: Suggestion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_kind_serialization_matches_as_str() {
        for kind in SuggestionKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn test_starts_with_folded_ignores_case() {
        let s = Suggestion::new("Book me a", SuggestionKind::Starter);
        assert!(s.starts_with_folded("boo"));
        assert!(s.starts_with_folded(""));
        assert!(!s.starts_with_folded("me"));
    }

    #[test]
    fn test_only_starter_stage_is_unfiltered() {
        assert!(!Stage::Starter.is_filtered());
        assert!(Stage::Service.is_filtered());
        assert!(Stage::Fallback.is_filtered());
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&Stage::DestinationCity).unwrap();
        assert_eq!(json, "\"destination_city\"");
    }
}
