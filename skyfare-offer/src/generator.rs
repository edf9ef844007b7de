use chrono::Utc;
use rand::Rng;
use skyfare_catalog::{Amenity, AIRCRAFT, AIRLINES, AMENITY_BUNDLES};
use skyfare_core::app_config::{PricingSettings, SessionSettings};
use skyfare_core::{AirportLabel, FareClass, SearchRequest};

use crate::models::FlightOffer;

const BASE_PRICE_MIN: i32 = 300;
const BASE_PRICE_SPAN: i32 = 1200;
/// Per-offer variation window, [-50, 49]
const PRICE_VARIATION: i32 = 50;

const DEFAULT_ORIGIN: &str = "KTM";
const DEFAULT_DESTINATION: &str = "JFK";

/// Builds synthetic offer batches for a search
#[derive(Debug, Clone)]
pub struct FlightOfferGenerator {
    batch_size: usize,
    discount_probability: f64,
    discount_markup: i32,
}

impl FlightOfferGenerator {
    pub fn new(batch_size: usize, pricing: &PricingSettings) -> Self {
        let discount_probability = if pricing.discount_probability.is_finite() {
            pricing.discount_probability.clamp(0.0, 1.0)
        } else {
            PricingSettings::default().discount_probability
        };

        Self {
            batch_size,
            discount_probability,
            discount_markup: pricing.discount_markup,
        }
    }

    pub fn from_settings(session: &SessionSettings, pricing: &PricingSettings) -> Self {
        Self::new(session.batch_size, pricing)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Generate a fresh batch; a missing request falls back to KTM → JFK economy
    pub fn generate<R: Rng + ?Sized>(
        &self,
        request: Option<&SearchRequest>,
        rng: &mut R,
    ) -> Vec<FlightOffer> {
        let from = request
            .and_then(|r| AirportLabel::new(&r.from).city())
            .unwrap_or(DEFAULT_ORIGIN);
        let to = request
            .and_then(|r| AirportLabel::new(&r.to).city())
            .unwrap_or(DEFAULT_DESTINATION);
        let fare_class = request.map(|r| r.fare_class).unwrap_or_default();

        (0..self.batch_size)
            .map(|i| self.create_offer(i, from, to, fare_class, rng))
            .collect()
    }

    fn create_offer<R: Rng + ?Sized>(
        &self,
        index: usize,
        from: &str,
        to: &str,
        fare_class: FareClass,
        rng: &mut R,
    ) -> FlightOffer {
        let airline = AIRLINES[rng.gen_range(0..AIRLINES.len())];
        let base_price = BASE_PRICE_MIN + rng.gen_range(0..BASE_PRICE_SPAN);
        let variation = rng.gen_range(-PRICE_VARIATION..PRICE_VARIATION);
        let price = base_price + variation;

        let departure_time = clock_time(rng.gen_range(6..=21), rng.gen_range(0..60));
        let mut arrival_time = clock_time(rng.gen_range(8..=21), rng.gen_range(0..60));
        if rng.gen_bool(0.5) {
            arrival_time.push_str("+1");
        }
        let duration = format!("{}h {}m", rng.gen_range(5..=19), rng.gen_range(0..60));

        let original_price = rng
            .gen_bool(self.discount_probability)
            .then_some(price + self.discount_markup);

        FlightOffer {
            id: format!("flight-{}", index + 1),
            airline: airline.name.to_string(),
            airline_code: airline.code.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            departure_time,
            arrival_time,
            duration,
            price,
            original_price,
            stops: rng.gen_range(0..=2),
            aircraft: AIRCRAFT[rng.gen_range(0..AIRCRAFT.len())].to_string(),
            fare_class,
            amenities: AMENITY_BUNDLES[rng.gen_range(0..AMENITY_BUNDLES.len())].to_vec(),
            seats: rng.gen_range(5..=24),
            price_delta: None,
            popular: false,
            last_updated: Utc::now(),
        }
    }
}

fn clock_time(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// The fixed three-offer band shown before any search
pub fn preview_offers() -> Vec<FlightOffer> {
    let now = Utc::now();
    let offer = |id: &str,
                 airline: &str,
                 airline_code: &str,
                 times: (&str, &str, &str),
                 price: i32,
                 original_price: Option<i32>,
                 stops: u8,
                 aircraft: &str,
                 fare_class: FareClass| FlightOffer {
        id: id.to_string(),
        airline: airline.to_string(),
        airline_code: airline_code.to_string(),
        from: "NYC".to_string(),
        to: "NRT".to_string(),
        departure_time: times.0.to_string(),
        arrival_time: times.1.to_string(),
        duration: times.2.to_string(),
        price,
        original_price,
        stops,
        aircraft: aircraft.to_string(),
        fare_class,
        amenities: Vec::<Amenity>::new(),
        seats: 9,
        price_delta: None,
        popular: false,
        last_updated: now,
    };

    let mut skyline = offer(
        "1",
        "SkyLine Airways",
        "SL",
        ("14:30", "18:45+1", "14h 15m"),
        899,
        Some(1299),
        1,
        "Boeing 787",
        FareClass::Economy,
    );
    skyline.popular = true;

    vec![
        skyline,
        offer(
            "2",
            "Pacific Express",
            "PX",
            ("22:15", "02:30+2", "16h 15m"),
            1249,
            None,
            0,
            "Airbus A350",
            FareClass::Business,
        ),
        offer(
            "3",
            "Global Wings",
            "GW",
            ("08:45", "12:30+1", "15h 45m"),
            749,
            Some(999),
            1,
            "Boeing 777",
            FareClass::Economy,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use skyfare_core::TripType;
    use std::collections::HashSet;

    fn generator() -> FlightOfferGenerator {
        FlightOfferGenerator::from_settings(&SessionSettings::default(), &PricingSettings::default())
    }

    fn create_test_request() -> SearchRequest {
        SearchRequest {
            from: "Kathmandu (KTM)".to_string(),
            to: "New York (JFK)".to_string(),
            depart_date: NaiveDate::from_ymd_opt(2026, 12, 1).unwrap(),
            return_date: None,
            passengers: 1,
            fare_class: FareClass::Business,
            trip_type: TripType::RoundTrip,
        }
    }

    fn leading_number(s: &str) -> u32 {
        s.chars()
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse()
            .unwrap()
    }

    #[test]
    fn test_batch_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let request = create_test_request();
        let offers = generator().generate(Some(&request), &mut rng);

        assert_eq!(offers.len(), 8);
        let ids: HashSet<_> = offers.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids.len(), 8);

        for offer in &offers {
            assert_eq!(offer.from, "Kathmandu");
            assert_eq!(offer.to, "New York");
            assert_eq!(offer.fare_class, FareClass::Business);
            assert!(offer.price_delta.is_none());
        }
    }

    #[test]
    fn test_field_ranges() {
        let mut rng = StdRng::seed_from_u64(9);
        let generator = FlightOfferGenerator::new(500, &PricingSettings::default());

        for offer in generator.generate(None, &mut rng) {
            assert!((250..=1548).contains(&offer.price), "price {}", offer.price);
            if let Some(original) = offer.original_price {
                assert_eq!(original, offer.price + 150);
            }
            assert!(offer.stops <= 2);
            assert!((5..=24).contains(&offer.seats));
            assert!(AIRLINES.iter().any(|a| a.name == offer.airline && a.code == offer.airline_code));

            assert_eq!(offer.departure_time.len(), 5);
            assert!((6..=21).contains(&leading_number(&offer.departure_time)));
            assert!((8..=21).contains(&leading_number(&offer.arrival_time)));
            let arrival = offer.arrival_time.trim_end_matches("+1");
            assert_eq!(arrival.len(), 5);

            let hours = leading_number(&offer.duration);
            assert!((5..=19).contains(&hours));
            assert!(offer.duration.ends_with('m'));
        }
    }

    #[test]
    fn test_missing_request_defaults() {
        let mut rng = StdRng::seed_from_u64(3);
        let offers = generator().generate(None, &mut rng);
        assert!(offers.iter().all(|o| o.from == "KTM" && o.to == "JFK"));
        assert!(offers.iter().all(|o| o.fare_class == FareClass::Economy));

        let mut request = create_test_request();
        request.from = "  ".to_string();
        let offers = generator().generate(Some(&request), &mut rng);
        assert!(offers.iter().all(|o| o.from == "KTM" && o.to == "New York"));
    }

    #[test]
    fn test_pinned_draws() {
        // Every draw at the bottom of its range
        let mut rng = StepRng::new(0, 0);
        let offers = FlightOfferGenerator::new(1, &PricingSettings::default()).generate(None, &mut rng);
        let offer = &offers[0];

        assert_eq!(offer.airline, "Nepal Airlines");
        assert_eq!(offer.airline_code, "RA");
        assert_eq!(offer.price, 250);
        assert_eq!(offer.original_price, Some(400));
        assert_eq!(offer.departure_time, "06:00");
        assert_eq!(offer.arrival_time, "08:00+1");
        assert_eq!(offer.duration, "5h 0m");
        assert_eq!(offer.stops, 0);
        assert_eq!(offer.aircraft, "Boeing 737");
        assert_eq!(offer.amenities, AMENITY_BUNDLES[0].to_vec());
        assert_eq!(offer.seats, 5);
    }

    #[test]
    fn test_same_seed_same_batch() {
        let request = create_test_request();
        let a = generator().generate(Some(&request), &mut StdRng::seed_from_u64(5));
        let b = generator().generate(Some(&request), &mut StdRng::seed_from_u64(5));

        let strip = |offers: Vec<FlightOffer>| {
            offers
                .into_iter()
                .map(|o| (o.id, o.airline, o.price, o.duration))
                .collect::<Vec<_>>()
        };
        assert_eq!(strip(a), strip(b));
    }

    #[test]
    fn test_non_finite_discount_probability_falls_back() {
        let pricing = PricingSettings {
            discount_probability: f64::NAN,
            ..Default::default()
        };
        let generator = FlightOfferGenerator::new(8, &pricing);
        assert_eq!(generator.discount_probability, 0.4);

        let offers = generator.generate(None, &mut StdRng::seed_from_u64(12));
        assert_eq!(offers.len(), 8);

        let pricing = PricingSettings {
            discount_probability: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(FlightOfferGenerator::new(1, &pricing).discount_probability, 0.4);

        let pricing = PricingSettings {
            discount_probability: 1.7,
            ..Default::default()
        };
        assert_eq!(FlightOfferGenerator::new(1, &pricing).discount_probability, 1.0);
    }

    #[test]
    fn test_preview_offers() {
        let offers = preview_offers();
        assert_eq!(offers.len(), 3);
        assert_eq!(offers.iter().filter(|o| o.popular).count(), 1);
        assert!(offers[0].popular);
        assert_eq!(offers[0].savings(), Some(400));
        assert!(offers.iter().all(|o| o.original_price.map_or(true, |p| p > o.price)));

        let json = serde_json::to_value(&offers[1]).unwrap();
        assert_eq!(json["fare_class"], "business");
        assert_eq!(json["original_price"], serde_json::Value::Null);
    }
}
