//! The staged suggestion resolver.
//!
//! A query is classified by walking an ordered rule table; the first rule
//! whose predicate holds picks the stage, and the stage picks the candidate
//! catalog. Candidates are then narrowed by the token being typed.

use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalogs, FROM_CONNECTOR, TO_CONNECTOR};
use crate::query::QueryState;
use crate::types::{Stage, Suggestion, SuggestionKind};

/// A single entry of the stage chain.
pub struct Rule {
    pub stage: Stage,
    pub applies: fn(&QueryState) -> bool,
}

/// The stage chain, in priority order. The last rule always applies.
pub const RULES: &[Rule] = &[
    Rule {
        stage: Stage::Starter,
        applies: nothing_typed,
    },
    Rule {
        stage: Stage::Service,
        applies: needs_service,
    },
    Rule {
        stage: Stage::FromConnector,
        applies: needs_from,
    },
    Rule {
        stage: Stage::OriginCity,
        applies: awaiting_origin,
    },
    Rule {
        stage: Stage::ToConnector,
        applies: needs_to,
    },
    Rule {
        stage: Stage::DestinationCity,
        applies: awaiting_destination,
    },
    Rule {
        stage: Stage::People,
        applies: needs_people,
    },
    Rule {
        stage: Stage::Seat,
        applies: needs_seat,
    },
    Rule {
        stage: Stage::Meal,
        applies: needs_meal,
    },
    Rule {
        stage: Stage::Fallback,
        applies: always,
    },
];

fn nothing_typed(q: &QueryState) -> bool {
    q.is_empty()
}

fn needs_service(q: &QueryState) -> bool {
    q.has_starter && !q.has_flight && !q.has_hotel
}

fn needs_from(q: &QueryState) -> bool {
    q.has_flight && !q.has_from()
}

fn awaiting_origin(q: &QueryState) -> bool {
    q.after_from.as_deref().is_some_and(|s| q.is_awaiting(s))
}

// Only reached when awaiting_origin failed, so something other than the
// current token follows `from`. It is not checked against the city catalog.
fn needs_to(q: &QueryState) -> bool {
    q.has_from() && !q.has_to()
}

fn awaiting_destination(q: &QueryState) -> bool {
    q.after_to.as_deref().is_some_and(|s| q.is_awaiting(s))
}

fn needs_people(q: &QueryState) -> bool {
    q.destination_selected() && !q.has_people
}

fn needs_seat(q: &QueryState) -> bool {
    q.has_people && !q.has_seat
}

fn needs_meal(q: &QueryState) -> bool {
    q.has_seat && !q.has_meal
}

fn always(_: &QueryState) -> bool {
    true
}

/// Narrow `candidates` to those whose display starts with `token`,
/// ignoring case.
///
/// An empty token keeps every candidate. When nothing matches, every
/// candidate is returned so the input never dead-ends.
pub fn filter<'c>(token: &str, candidates: &[&'c Suggestion]) -> Vec<&'c Suggestion> {
    if token.is_empty() {
        return candidates.to_vec();
    }

    let folded = token.to_lowercase();
    let matched: Vec<&Suggestion> = candidates
        .iter()
        .copied()
        .filter(|s| s.starts_with_folded(&folded))
        .collect();

    if matched.is_empty() {
        candidates.to_vec()
    } else {
        matched
    }
}

/// Classify an already analyzed query.
pub fn classify_state(state: &QueryState) -> Stage {
    RULES
        .iter()
        .find(|rule| (rule.applies)(state))
        .map(|rule| rule.stage)
        .unwrap_or(Stage::Fallback)
}

/// Resolves in-progress queries to ranked suggestions.
///
/// Cheap to clone; the catalogs are shared.
#[derive(Debug, Clone)]
pub struct SuggestionResolver {
    catalogs: Arc<Catalogs>,
}

impl Default for SuggestionResolver {
    fn default() -> Self {
        Self::new(Arc::new(Catalogs::builtin()))
    }
}

impl SuggestionResolver {
    pub fn new(catalogs: Arc<Catalogs>) -> Self {
        Self { catalogs }
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    /// Which stage of the booking flow `query` is in.
    pub fn classify(&self, query: &str) -> Stage {
        classify_state(&QueryState::parse(query))
    }

    /// Suggestions for the raw, untrimmed text of the input box.
    pub fn resolve(&self, query: &str) -> Vec<Suggestion> {
        let state = QueryState::parse(query);
        let stage = classify_state(&state);
        let candidates = self.candidates(stage);

        let selected = if stage.is_filtered() {
            filter(&state.token, &candidates)
        } else {
            candidates
        };

        debug!(
            ?stage,
            token = %state.token,
            count = selected.len(),
            "Resolved suggestions"
        );

        selected.into_iter().cloned().collect()
    }

    /// Unfiltered candidates for a stage, in catalog order.
    pub fn candidates(&self, stage: Stage) -> Vec<&Suggestion> {
        let catalogs: &Catalogs = &self.catalogs;
        let all = move |kind: SuggestionKind| catalogs.get(kind).iter().collect::<Vec<_>>();
        match stage {
            Stage::Starter => all(SuggestionKind::Starter),
            Stage::Service => all(SuggestionKind::Service),
            Stage::FromConnector => catalogs.connector(FROM_CONNECTOR).into_iter().collect(),
            Stage::ToConnector => catalogs.connector(TO_CONNECTOR).into_iter().collect(),
            Stage::OriginCity | Stage::DestinationCity => all(SuggestionKind::City),
            Stage::People => all(SuggestionKind::People),
            Stage::Seat => all(SuggestionKind::Seat),
            Stage::Meal => all(SuggestionKind::Meal),
            Stage::Fallback => catalogs
                .get(SuggestionKind::Service)
                .iter()
                .chain(catalogs.get(SuggestionKind::City))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> SuggestionResolver {
        SuggestionResolver::default()
    }

    fn displays(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.display.as_str()).collect()
    }

    fn catalog(kind: SuggestionKind) -> Vec<Suggestion> {
        Catalogs::builtin().get(kind).to_vec()
    }

    // =========================================================================
    // filter
    // =========================================================================

    #[test]
    fn test_filter_empty_token_keeps_all() {
        let cities = catalog(SuggestionKind::City);
        let refs: Vec<&Suggestion> = cities.iter().collect();
        assert_eq!(filter("", &refs), refs);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let services = catalog(SuggestionKind::Service);
        let refs: Vec<&Suggestion> = services.iter().collect();
        let out = filter("HO", &refs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].display, "hotel");
    }

    #[test]
    fn test_filter_without_match_falls_back_to_all() {
        let services = catalog(SuggestionKind::Service);
        let refs: Vec<&Suggestion> = services.iter().collect();
        assert_eq!(filter("train", &refs), refs);
    }

    #[test]
    fn test_filter_of_empty_catalog_is_empty() {
        assert!(filter("x", &[]).is_empty());
    }

    // =========================================================================
    // Stage chain
    // =========================================================================

    #[test]
    fn test_empty_query_returns_starters_in_order() {
        let r = resolver();
        assert_eq!(r.resolve(""), catalog(SuggestionKind::Starter));
        assert_eq!(r.resolve("   "), catalog(SuggestionKind::Starter));
        assert_eq!(r.classify(""), Stage::Starter);
    }

    #[test]
    fn test_starter_offers_services_filtered() {
        let r = resolver();
        let out = r.resolve("I want to book a fl");
        assert_eq!(out, vec![Suggestion::new("flight", SuggestionKind::Service)]);

        let out = r.resolve("Book me a ");
        assert_eq!(out, catalog(SuggestionKind::Service));
    }

    #[test]
    fn test_flight_without_from_offers_from() {
        let r = resolver();
        let out = r.resolve("I want to book a flight ");
        assert_eq!(out, vec![Suggestion::new("from", SuggestionKind::Connector)]);
        // A single-entry catalog falls back to itself for any token.
        assert_eq!(r.resolve("I want to book a flight xyz"), out);
    }

    #[test]
    fn test_from_with_nothing_after_offers_all_cities() {
        let r = resolver();
        assert_eq!(
            r.resolve("I want to book a flight from "),
            catalog(SuggestionKind::City)
        );
        assert_eq!(r.classify("I want to book a flight from"), Stage::OriginCity);
    }

    #[test]
    fn test_origin_city_mid_token_is_filtered() {
        let r = resolver();
        let out = r.resolve("Find me a flight from Ke");
        assert_eq!(
            displays(&out),
            vec!["Kempegowda International Airport, Bengaluru (BLR)"]
        );
    }

    #[test]
    fn test_origin_typed_offers_to() {
        let r = resolver();
        let out = r.resolve("I want to book a flight from Mumbai ");
        assert_eq!(out, vec![Suggestion::new("to", SuggestionKind::Connector)]);
        assert_eq!(r.classify("I want to book a flight from Mumbai t"), Stage::ToConnector);
    }

    #[test]
    fn test_origin_is_not_validated_against_catalog() {
        // Any text after `from` counts as an origin.
        let r = resolver();
        assert_eq!(r.classify("book me a flight from Mumbia "), Stage::ToConnector);
    }

    #[test]
    fn test_to_with_nothing_after_offers_all_cities() {
        let r = resolver();
        assert_eq!(
            r.resolve("I want to book a flight from Mumbai to "),
            catalog(SuggestionKind::City)
        );
    }

    #[test]
    fn test_destination_mid_token_is_filtered() {
        let r = resolver();
        let out = r.resolve("I want to book a flight from Mumbai to go");
        assert_eq!(displays(&out), vec!["Goa Dabolim International Airport, Goa (GOI)"]);
        assert_eq!(
            r.classify("I want to book a flight from Mumbai to go"),
            Stage::DestinationCity
        );
    }

    #[test]
    fn test_destination_selected_offers_people() {
        let r = resolver();
        assert_eq!(
            r.resolve("I want to book a flight from Mumbai to Delhi "),
            catalog(SuggestionKind::People)
        );
        let out = r.resolve("I want to book a flight from Mumbai to Delhi 2");
        assert!(out.iter().all(|s| s.display.starts_with('2')));
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn test_people_then_seat_then_meal() {
        let r = resolver();
        let base = "I want to book a flight from Mumbai to Delhi";
        assert_eq!(
            r.resolve(&format!("{} 2 adults ", base)),
            catalog(SuggestionKind::Seat)
        );
        assert_eq!(
            displays(&r.resolve(&format!("{} 2 adults ai", base))),
            vec!["aisle seat"]
        );
        assert_eq!(
            r.resolve(&format!("{} 2 adults window seat ", base)),
            catalog(SuggestionKind::Meal)
        );
        assert_eq!(
            displays(&r.resolve(&format!("{} 1 adult any seat n", base))),
            vec!["non-vegetarian meal", "no preference"]
        );
    }

    #[test]
    fn test_completed_booking_falls_back() {
        let r = resolver();
        let q = "I want to book a flight from Mumbai to Delhi 2 adults window seat vegan meal ";
        assert_eq!(r.classify(q), Stage::Fallback);
        let out = r.resolve(q);
        let mut expected = catalog(SuggestionKind::Service);
        expected.extend(catalog(SuggestionKind::City));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_hotel_does_not_contain_to_keyword() {
        let r = resolver();
        assert_eq!(r.classify("I want to book a hotel"), Stage::Fallback);
        assert_eq!(
            r.resolve("I want to book a hotel"),
            vec![Suggestion::new("hotel", SuggestionKind::Service)]
        );
    }

    #[test]
    fn test_matching_ignores_case() {
        let r = resolver();
        assert_eq!(
            r.resolve("I WANT TO BOOK A FLIGHT FROM "),
            catalog(SuggestionKind::City)
        );
        assert_eq!(r.classify("BOOK ME A FLIGHT FROM GOA TO "), Stage::DestinationCity);
    }

    #[test]
    fn test_unknown_text_falls_back_to_services_and_cities() {
        let r = resolver();
        let out = r.resolve("Chen");
        assert_eq!(
            displays(&out),
            vec!["Chennai International Airport, Chennai (MAA)"]
        );
        assert_eq!(r.classify("hello"), Stage::Fallback);
    }

    #[test]
    fn test_rule_table_ends_with_catch_all() {
        let last = RULES.last().unwrap();
        assert_eq!(last.stage, Stage::Fallback);
        assert!((last.applies)(&QueryState::parse("anything")));
    }

    #[test]
    fn test_extra_cities_reach_city_stages() {
        let catalogs = Catalogs::builtin()
            .with_extra_cities(["Pune Airport, Pune (PNQ)"])
            .unwrap();
        let r = SuggestionResolver::new(Arc::new(catalogs));
        assert_eq!(
            displays(&r.resolve("Book me a flight from Pu")),
            vec!["Pune Airport, Pune (PNQ)"]
        );
    }
}
