pub mod models;
pub mod generator;
pub mod mutation;
pub mod sorter;

pub use models::{FlightOffer, PriceTrend};
pub use generator::{preview_offers, FlightOfferGenerator};
pub use mutation::PriceMutationEngine;
pub use sorter::{OfferSorter, SortKey};
