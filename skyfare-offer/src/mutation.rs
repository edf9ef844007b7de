use chrono::Utc;
use rand::Rng;
use skyfare_catalog::PricingEngine;

use crate::models::FlightOffer;

/// Applies one round of price movement to a batch
#[derive(Debug, Clone)]
pub struct PriceMutationEngine {
    pricing: PricingEngine,
}

impl PriceMutationEngine {
    pub fn new(pricing: PricingEngine) -> Self {
        Self { pricing }
    }

    /// New batch with the same ids in the same order; only price, delta and
    /// timestamp differ
    pub fn mutate<R: Rng + ?Sized>(&self, offers: &[FlightOffer], rng: &mut R) -> Vec<FlightOffer> {
        let now = Utc::now();

        offers
            .iter()
            .map(|offer| {
                let change = self.pricing.next_price(offer.price, offer.original_price, rng);
                FlightOffer {
                    price: change.price,
                    price_delta: Some(change.delta),
                    last_updated: now,
                    ..offer.clone()
                }
            })
            .collect()
    }
}
