use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::FlightOffer;

/// Result ordering selected by the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    Duration,
    Departure,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Duration => "duration",
            SortKey::Departure => "departure",
        }
    }

    /// Lenient parse used by the results view; unknown names fall back to price
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: UnknownSortKey| {
            tracing::warn!("{}, falling back to {}", err, SortKey::default());
            SortKey::default()
        })
    }
}

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(SortKey::Price),
            "duration" => Ok(SortKey::Duration),
            "departure" => Ok(SortKey::Departure),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-side ordering of an offer batch
pub struct OfferSorter;

impl OfferSorter {
    /// Sorted copy of `offers`; equal keys keep their batch order
    pub fn sort(offers: &[FlightOffer], key: SortKey) -> Vec<FlightOffer> {
        let mut sorted = offers.to_vec();
        sorted.sort_by(|a, b| Self::compare(a, b, key));
        sorted
    }

    pub fn compare(a: &FlightOffer, b: &FlightOffer, key: SortKey) -> Ordering {
        match key {
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::Duration => compare_leading_hours(&a.duration, &b.duration),
            SortKey::Departure => a.departure_time.cmp(&b.departure_time),
        }
    }
}

/// Integer formed by the leading digits, so "9h 50m" and "9h 5m" both read 9
fn leading_hours(duration: &str) -> Option<u32> {
    let trimmed = duration.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

// Minutes are ignored; unparsable durations sort last
fn compare_leading_hours(a: &str, b: &str) -> Ordering {
    match (leading_hours(a), leading_hours(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::preview_offers;

    fn create_test_offers(values: &[(&str, i32, &str, &str)]) -> Vec<FlightOffer> {
        let template = preview_offers().remove(1);
        values
            .iter()
            .map(|(id, price, departure, duration)| FlightOffer {
                id: id.to_string(),
                price: *price,
                departure_time: departure.to_string(),
                duration: duration.to_string(),
                ..template.clone()
            })
            .collect()
    }

    fn ids(offers: &[FlightOffer]) -> Vec<&str> {
        offers.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_price() {
        let offers = create_test_offers(&[
            ("a", 900, "10:00", "5h 0m"),
            ("b", 450, "11:00", "6h 0m"),
            ("c", 900, "12:00", "7h 0m"),
            ("d", 300, "13:00", "8h 0m"),
        ]);

        let sorted = OfferSorter::sort(&offers, SortKey::Price);
        assert_eq!(ids(&sorted), vec!["d", "b", "a", "c"]);

        let again = OfferSorter::sort(&sorted, SortKey::Price);
        assert_eq!(sorted, again);
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let offers = create_test_offers(&[("a", 900, "10:00", "5h 0m"), ("b", 450, "11:00", "6h 0m")]);
        let snapshot = offers.clone();
        let _ = OfferSorter::sort(&offers, SortKey::Price);
        assert_eq!(offers, snapshot);
    }

    #[test]
    fn test_sort_by_departure() {
        let offers = create_test_offers(&[
            ("a", 500, "09:15", "5h 0m"),
            ("b", 500, "06:00", "5h 0m"),
            ("c", 500, "21:40", "5h 0m"),
        ]);

        let sorted = OfferSorter::sort(&offers, SortKey::Departure);
        let times: Vec<_> = sorted.iter().map(|o| o.departure_time.as_str()).collect();
        assert_eq!(times, vec!["06:00", "09:15", "21:40"]);
    }

    #[test]
    fn test_sort_by_duration_reads_hours_only() {
        let offers = create_test_offers(&[
            ("a", 500, "10:00", "9h 50m"),
            ("b", 500, "10:00", "9h 5m"),
            ("c", 500, "10:00", "10h 0m"),
        ]);

        assert_eq!(leading_hours("9h 50m"), Some(9));
        assert_eq!(leading_hours("9h 5m"), Some(9));
        assert_eq!(
            OfferSorter::compare(&offers[0], &offers[1], SortKey::Duration),
            Ordering::Equal
        );

        let sorted = OfferSorter::sort(&offers, SortKey::Duration);
        assert_eq!(ids(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_unparsable_duration_sorts_last() {
        let offers = create_test_offers(&[("a", 500, "10:00", "n/a"), ("b", 500, "10:00", "12h 0m")]);
        let sorted = OfferSorter::sort(&offers, SortKey::Duration);
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("Duration".parse::<SortKey>().unwrap(), SortKey::Duration);
        assert!("rating".parse::<SortKey>().is_err());
        assert_eq!(SortKey::from_name("departure"), SortKey::Departure);
        assert_eq!(SortKey::from_name("rating"), SortKey::Price);
        assert_eq!(SortKey::default(), SortKey::Price);
    }
}
