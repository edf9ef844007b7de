use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{CoreError, CoreResult};

/// Airports offered by the search form
pub const AIRPORTS: [&str; 12] = [
    "Kathmandu (KTM)",
    "New York (JFK)",
    "Tokyo (NRT)",
    "London (LHR)",
    "Paris (CDG)",
    "Dubai (DXB)",
    "Singapore (SIN)",
    "Sydney (SYD)",
    "Mumbai (BOM)",
    "Delhi (DEL)",
    "Bangkok (BKK)",
    "Hong Kong (HKG)",
];

/// One-click routes shown under the form
pub const QUICK_ROUTES: [(&str, &str); 3] = [
    ("Kathmandu (KTM)", "Dubai (DXB)"),
    ("Kathmandu (KTM)", "Delhi (DEL)"),
    ("Kathmandu (KTM)", "Bangkok (BKK)"),
];

pub const MAX_PASSENGERS: u8 = 6;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FareClass {
    #[default]
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl FareClass {
    pub fn label(&self) -> &'static str {
        match self {
            FareClass::Economy => "Economy",
            FareClass::PremiumEconomy => "Premium Economy",
            FareClass::Business => "Business",
            FareClass::First => "First Class",
        }
    }
}

impl fmt::Display for FareClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    OneWay,
    #[default]
    RoundTrip,
}

/// An airport as displayed by the form, e.g. "New York (JFK)"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirportLabel<'a>(&'a str);

impl<'a> AirportLabel<'a> {
    pub fn new(label: &'a str) -> Self {
        Self(label)
    }

    /// City part of the label; the leading token when no code is present
    pub fn city(&self) -> Option<&'a str> {
        let label = self.0.trim();
        if label.is_empty() {
            return None;
        }

        match label.find('(') {
            Some(idx) if idx > 0 => Some(label[..idx].trim_end()),
            _ => label.split_whitespace().next(),
        }
    }

    /// IATA code between the parentheses
    pub fn code(&self) -> Option<&'a str> {
        let start = self.0.find('(')? + 1;
        let end = start + self.0[start..].find(')')?;
        let code = self.0[start..end].trim();
        (!code.is_empty()).then_some(code)
    }
}

/// A submitted flight search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    pub from: String,
    pub to: String,
    pub depart_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub passengers: u8,
    pub fare_class: FareClass,
    pub trip_type: TripType,
}

impl SearchRequest {
    pub fn validate(&self) -> CoreResult<()> {
        if self.from.trim().is_empty() {
            return Err(CoreError::ValidationError("origin is required".to_string()));
        }
        if self.to.trim().is_empty() {
            return Err(CoreError::ValidationError("destination is required".to_string()));
        }
        if !(1..=MAX_PASSENGERS).contains(&self.passengers) {
            return Err(CoreError::ValidationError(format!(
                "passenger count must be between 1 and {}, got {}",
                MAX_PASSENGERS, self.passengers
            )));
        }
        if let Some(return_date) = self.return_date {
            if return_date < self.depart_date {
                return Err(CoreError::ValidationError(format!(
                    "return date {} is before departure date {}",
                    return_date, self.depart_date
                )));
            }
        }
        Ok(())
    }

    /// "Kathmandu → New York"
    pub fn route_title(&self) -> String {
        let from = AirportLabel::new(&self.from).city().unwrap_or_default();
        let to = AirportLabel::new(&self.to).city().unwrap_or_default();
        format!("{} → {}", from, to)
    }
}

/// Editable search form state; `submit` turns it into a request
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub from: String,
    pub to: String,
    pub depart_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub passengers: u8,
    pub fare_class: FareClass,
    pub trip_type: TripType,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            from: AIRPORTS[0].to_string(),
            to: AIRPORTS[1].to_string(),
            depart_date: Some(Utc::now().date_naive()),
            return_date: None,
            passengers: 1,
            fare_class: FareClass::Economy,
            trip_type: TripType::RoundTrip,
        }
    }
}

impl SearchForm {
    /// Origin and destination may end up equal
    pub fn swap_airports(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
    }

    pub fn set_trip_type(&mut self, trip_type: TripType) {
        self.trip_type = trip_type;
        if trip_type == TripType::OneWay {
            self.return_date = None;
        }
    }

    /// Fill origin and destination from `QUICK_ROUTES[index]`
    pub fn apply_quick_route(&mut self, index: usize) -> bool {
        match QUICK_ROUTES.get(index) {
            Some((from, to)) => {
                self.from = from.to_string();
                self.to = to.to_string();
                true
            }
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.from.trim().is_empty() && !self.to.trim().is_empty() && self.depart_date.is_some()
    }

    pub fn submit(&self) -> CoreResult<SearchRequest> {
        let depart_date = self
            .depart_date
            .ok_or_else(|| CoreError::ValidationError("departure date is required".to_string()))?;

        let return_date = match self.trip_type {
            TripType::RoundTrip => self.return_date,
            TripType::OneWay => None,
        };

        let request = SearchRequest {
            from: self.from.clone(),
            to: self.to.clone(),
            depart_date,
            return_date,
            passengers: self.passengers,
            fare_class: self.fare_class,
            trip_type: self.trip_type,
        };
        request.validate()?;

        tracing::debug!(route = %request.route_title(), passengers = request.passengers, "search form submitted");
        Ok(request)
    }
}
