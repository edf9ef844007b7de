use serde::{Deserialize, Serialize};
use std::fmt;

/// Carrier offered by the live search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Airline {
    pub name: &'static str,
    pub code: &'static str,
}

pub const AIRLINES: [Airline; 8] = [
    Airline { name: "Nepal Airlines", code: "RA" },
    Airline { name: "Buddha Air", code: "U4" },
    Airline { name: "Yeti Airlines", code: "YT" },
    Airline { name: "Emirates", code: "EK" },
    Airline { name: "Qatar Airways", code: "QR" },
    Airline { name: "Singapore Airlines", code: "SQ" },
    Airline { name: "Thai Airways", code: "TG" },
    Airline { name: "Air India", code: "AI" },
];

pub const AIRCRAFT: [&str; 5] = [
    "Boeing 737",
    "Airbus A320",
    "Boeing 777",
    "Airbus A350",
    "Boeing 787",
];

/// On-board services
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Amenity {
    Wifi,
    Meals,
    Snacks,
    Entertainment,
    ExtraLegroom,
    LoungeAccess,
}

impl Amenity {
    pub fn label(&self) -> &'static str {
        match self {
            Amenity::Wifi => "Wifi",
            Amenity::Meals => "Meals",
            Amenity::Snacks => "Snacks",
            Amenity::Entertainment => "Entertainment",
            Amenity::ExtraLegroom => "Extra Legroom",
            Amenity::LoungeAccess => "Lounge Access",
        }
    }

    /// Amenities that get their own icon in the results list
    pub fn has_icon(&self) -> bool {
        matches!(self, Amenity::Wifi | Amenity::Meals | Amenity::Entertainment)
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub const AMENITY_BUNDLES: [&[Amenity]; 4] = [
    &[Amenity::Wifi, Amenity::Meals, Amenity::Entertainment],
    &[Amenity::Wifi, Amenity::Snacks],
    &[Amenity::Meals, Amenity::Entertainment, Amenity::ExtraLegroom],
    &[Amenity::Wifi, Amenity::Meals, Amenity::Entertainment, Amenity::LoungeAccess],
];
