use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use skyfare_catalog::PricingEngine;
use skyfare_core::app_config::{PricingSettings, PreviewSettings};
use skyfare_offer::{preview_offers, FlightOffer, PriceMutationEngine};
use skyfare_shared::models::events::PreviewEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

const EVENT_CAPACITY: usize = 16;

struct PreviewInner {
    offers: Vec<FlightOffer>,
    updating: bool,
    last_updated: DateTime<Utc>,
    refresh_count: u64,
    timer: Option<JoinHandle<()>>,
    rng: StdRng,
}

struct PreviewShared {
    inner: Mutex<PreviewInner>,
    events: broadcast::Sender<PreviewEvent>,
    mutation: PriceMutationEngine,
}

impl PreviewShared {
    fn lock(&self) -> MutexGuard<'_, PreviewInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_update(&self) {
        self.lock().updating = true;
        let _ = self.events.send(PreviewEvent::Updating {
            started_at: Utc::now(),
        });
    }

    fn apply_update(&self) {
        let mut inner = self.lock();
        let PreviewInner { offers, rng, .. } = &mut *inner;
        let mutated = self.mutation.mutate(offers, rng);
        *offers = mutated;

        let updated_at = Utc::now();
        inner.updating = false;
        inner.last_updated = updated_at;
        inner.refresh_count += 1;
        let tick = inner.refresh_count;

        debug!(tick, "preview fares refreshed");
        let _ = self.events.send(PreviewEvent::Refreshed { tick, updated_at });
    }
}

/// The fixed "live prices" band: three hand-picked fares repriced on a slow
/// cadence, with a short settle window flagged as `updating`.
pub struct PreviewBand {
    shared: Arc<PreviewShared>,
}

impl PreviewBand {
    pub fn start(settings: &PreviewSettings, pricing: &PricingSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::start_with_rng(settings, pricing, rng)
    }

    pub fn start_with_rng(settings: &PreviewSettings, pricing: &PricingSettings, rng: StdRng) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let shared = Arc::new(PreviewShared {
            inner: Mutex::new(PreviewInner {
                offers: preview_offers(),
                updating: false,
                last_updated: Utc::now(),
                refresh_count: 0,
                timer: None,
                rng,
            }),
            events,
            mutation: PriceMutationEngine::new(PricingEngine::preview(pricing)),
        });

        let period = Duration::from_millis(settings.refresh_interval_ms.max(1));
        let settle = Duration::from_millis(settings.settle_ms);
        let timer = spawn_refresh_loop(Arc::clone(&shared), period, settle);
        shared.lock().timer = Some(timer);

        Self { shared }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreviewEvent> {
        self.shared.events.subscribe()
    }

    pub fn offers(&self) -> Vec<FlightOffer> {
        self.shared.lock().offers.clone()
    }

    /// True during the settle window before new prices land
    pub fn is_updating(&self) -> bool {
        self.shared.lock().updating
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.shared.lock().last_updated
    }

    pub fn refresh_count(&self) -> u64 {
        self.shared.lock().refresh_count
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .lock()
            .timer
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Freeze the band at its current prices
    pub fn stop(&self) {
        let mut inner = self.shared.lock();
        if let Some(handle) = inner.timer.take() {
            handle.abort();
            debug!("preview band stopped");
        }
        inner.updating = false;
    }
}

impl Drop for PreviewBand {
    fn drop(&mut self) {
        self.stop();
    }
}

fn spawn_refresh_loop(shared: Arc<PreviewShared>, period: Duration, settle: Duration) -> JoinHandle<()> {
    let start = Instant::now() + period;
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(start, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            shared.begin_update();
            tokio::time::sleep(settle).await;
            shared.apply_update();
        }
    })
}
