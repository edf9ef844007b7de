pub mod product;
pub mod pricing;

pub use product::{Airline, Amenity, AIRCRAFT, AIRLINES, AMENITY_BUNDLES};
pub use pricing::{PriceChange, PricingEngine};
