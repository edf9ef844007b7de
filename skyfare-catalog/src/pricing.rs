use rand::Rng;
use skyfare_core::app_config::PricingSettings;

/// Outcome of one price movement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceChange {
    pub price: i32,
    /// Drawn movement, recorded even when the floor or cap absorbs it
    pub delta: i32,
}

/// Random-walk pricing for simulated fares
#[derive(Debug, Clone)]
pub struct PricingEngine {
    price_floor: i32,
    swing: i32,
}

impl PricingEngine {
    pub fn new(price_floor: i32, swing: i32) -> Self {
        Self { price_floor, swing }
    }

    /// Engine for live search results
    pub fn live(settings: &PricingSettings) -> Self {
        Self::new(settings.price_floor, settings.live_swing)
    }

    /// Engine for the static preview band
    pub fn preview(settings: &PricingSettings) -> Self {
        Self::new(settings.price_floor, settings.preview_swing)
    }

    pub fn price_floor(&self) -> i32 {
        self.price_floor
    }

    /// Uniform integer in `[-swing/2, swing - swing/2)`, i.e. [-25, 24] for a swing of 50
    pub fn draw_delta<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        if self.swing <= 0 {
            return 0;
        }
        let half = self.swing / 2;
        rng.gen_range(-half..self.swing - half)
    }

    /// Apply `delta` to `current`, keeping the price above the floor and
    /// strictly below `original` when a discount is shown
    pub fn apply(&self, current: i32, original: Option<i32>, delta: i32) -> PriceChange {
        let mut price = current.saturating_add(delta);
        if let Some(original) = original {
            price = price.min(original - 1);
        }
        price = price.max(self.price_floor);

        PriceChange {
            price,
            delta,
        }
    }

    pub fn next_price<R: Rng + ?Sized>(
        &self,
        current: i32,
        original: Option<i32>,
        rng: &mut R,
    ) -> PriceChange {
        let delta = self.draw_delta(rng);
        self.apply(current, original, delta)
    }
}
