use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyfare_catalog::Amenity;
use skyfare_core::FareClass;

/// Direction of the last price movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceTrend {
    Up,
    Down,
    Unchanged,
}

/// A simulated fare shown in the results list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightOffer {
    pub id: String,
    pub airline: String,
    pub airline_code: String,
    pub from: String,
    pub to: String,
    /// "HH:MM"
    pub departure_time: String,
    /// "HH:MM", optionally suffixed with "+1"/"+2"
    pub arrival_time: String,
    /// "Xh Ym"
    pub duration: String,
    pub price: i32,
    /// Pre-sale price; always above `price` when present
    pub original_price: Option<i32>,
    pub stops: u8,
    pub aircraft: String,
    pub fare_class: FareClass,
    pub amenities: Vec<Amenity>,
    pub seats: u8,
    /// Empty until the first price refresh
    pub price_delta: Option<i32>,
    pub popular: bool,
    pub last_updated: DateTime<Utc>,
}

impl FlightOffer {
    /// Amount saved against the pre-sale price
    pub fn savings(&self) -> Option<i32> {
        self.original_price.map(|original| original - self.price)
    }

    pub fn price_trend(&self) -> PriceTrend {
        match self.price_delta {
            Some(delta) if delta > 0 => PriceTrend::Up,
            Some(delta) if delta < 0 => PriceTrend::Down,
            _ => PriceTrend::Unchanged,
        }
    }

    pub fn stops_label(&self) -> String {
        match self.stops {
            0 => "Direct".to_string(),
            1 => "1 Stop".to_string(),
            n => format!("{} Stops", n),
        }
    }

    pub fn is_on_sale(&self) -> bool {
        self.original_price.is_some_and(|original| original > self.price)
    }
}
