//! Fixed suggestion catalogs.
//!
//! Catalogs are built once at startup (built-ins plus any configured extra
//! cities) and shared read-only for the lifetime of the process.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{Result, WayfarerError};
use crate::types::{Suggestion, SuggestionKind};

const STARTERS: &[&str] = &["I want to book a", "Book me a", "Find me a"];

const SERVICES: &[&str] = &["flight", "hotel"];

/// Connector shown once a flight is requested.
pub const FROM_CONNECTOR: &str = "from";
/// Connector shown once an origin airport is typed.
pub const TO_CONNECTOR: &str = "to";

const CONNECTORS: &[&str] = &[FROM_CONNECTOR, TO_CONNECTOR];

const CITIES: &[&str] = &[
    "Chhatrapati Shivaji Maharaj International Airport, Mumbai (BOM)",
    "Indira Gandhi International Airport, New Delhi (DEL)",
    "Kempegowda International Airport, Bengaluru (BLR)",
    "Chennai International Airport, Chennai (MAA)",
    "Goa Dabolim International Airport, Goa (GOI)",
];

const PEOPLE: &[&str] = &[
    "1 adult",
    "2 adults",
    "3 adults",
    "4 adults",
    "1 adult 1 child",
    "2 adults 1 child",
    "2 adults 2 children",
];

const SEATS: &[&str] = &["window seat", "aisle seat", "middle seat", "any seat"];

const MEALS: &[&str] = &[
    "vegetarian meal",
    "non-vegetarian meal",
    "vegan meal",
    "kosher meal",
    "halal meal",
    "no preference",
];

/// Ordered candidate lists, one per [`SuggestionKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogs {
    starters: Vec<Suggestion>,
    services: Vec<Suggestion>,
    connectors: Vec<Suggestion>,
    cities: Vec<Suggestion>,
    people: Vec<Suggestion>,
    seats: Vec<Suggestion>,
    meals: Vec<Suggestion>,
}

impl Default for Catalogs {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalogs {
    /// The compiled-in catalogs.
    pub fn builtin() -> Self {
        Self {
            starters: build(STARTERS, SuggestionKind::Starter),
            services: build(SERVICES, SuggestionKind::Service),
            connectors: build(CONNECTORS, SuggestionKind::Connector),
            cities: build(CITIES, SuggestionKind::City),
            people: build(PEOPLE, SuggestionKind::People),
            seats: build(SEATS, SuggestionKind::Seat),
            meals: build(MEALS, SuggestionKind::Meal),
        }
    }

    /// Append extra airports after the built-in cities.
    ///
    /// Blank entries are rejected. Entries that duplicate an existing city
    /// (ignoring case and surrounding whitespace) are skipped.
    pub fn with_extra_cities<I, S>(mut self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (index, city) in extra.into_iter().enumerate() {
            let city = city.as_ref().trim();
            if city.is_empty() {
                return Err(WayfarerError::Catalog(format!(
                    "extra city at index {} is blank",
                    index
                )));
            }

            let folded = city.to_lowercase();
            if self
                .cities
                .iter()
                .any(|c| c.display.to_lowercase() == folded)
            {
                warn!(city, "Skipping duplicate extra city");
                continue;
            }

            debug!(city, "Adding extra city");
            self.cities.push(Suggestion::new(city, SuggestionKind::City));
        }
        Ok(self)
    }

    /// All suggestions of one kind, in declared order.
    pub fn get(&self, kind: SuggestionKind) -> &[Suggestion] {
        match kind {
            SuggestionKind::Starter => &self.starters,
            SuggestionKind::Service => &self.services,
            SuggestionKind::Connector => &self.connectors,
            SuggestionKind::City => &self.cities,
            SuggestionKind::People => &self.people,
            SuggestionKind::Seat => &self.seats,
            SuggestionKind::Meal => &self.meals,
        }
    }

    /// Look up a single connector by its display text.
    pub fn connector(&self, display: &str) -> Option<&Suggestion> {
        self.connectors.iter().find(|c| c.display == display)
    }

    /// Number of entries per kind.
    pub fn sizes(&self) -> BTreeMap<SuggestionKind, usize> {
        SuggestionKind::ALL
            .iter()
            .map(|kind| (*kind, self.get(*kind).len()))
            .collect()
    }
}

fn build(entries: &[&str], kind: SuggestionKind) -> Vec<Suggestion> {
    entries
        .iter()
        .map(|display| Suggestion::new(*display, kind))
        .collect()
}
