use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use skyfare_catalog::PricingEngine;
use skyfare_core::app_config::{PricingSettings, SessionSettings};
use skyfare_core::SearchRequest;
use skyfare_offer::{FlightOffer, FlightOfferGenerator, OfferSorter, PriceMutationEngine, SortKey};
use skyfare_shared::models::events::SessionEvent;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 100;

/// Lifecycle of the live results view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    Idle,
    Searching,
    ResultsShown,
}

/// Timers currently pending for the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveTimers {
    pub latency: bool,
    pub refresh: bool,
}

struct SessionInner {
    session_id: Option<Uuid>,
    state: SessionState,
    request: Option<SearchRequest>,
    offers: Vec<FlightOffer>,
    sort_key: SortKey,
    auto_update: bool,
    last_updated: Option<DateTime<Utc>>,
    refresh_count: u64,
    /// Bumped whenever the refresh timer is replaced or cancelled
    refresh_epoch: u64,
    latency_timer: Option<JoinHandle<()>>,
    refresh_timer: Option<JoinHandle<()>>,
    rng: StdRng,
}

impl SessionInner {
    fn cancel_refresh(&mut self) {
        self.refresh_epoch += 1;
        if let Some(handle) = self.refresh_timer.take() {
            handle.abort();
        }
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.latency_timer.take() {
            handle.abort();
        }
        self.cancel_refresh();
    }

    fn is_current(&self, session_id: Uuid) -> bool {
        self.session_id == Some(session_id)
    }
}

struct Shared {
    inner: Mutex<SessionInner>,
    events: broadcast::Sender<SessionEvent>,
    generator: FlightOfferGenerator,
    mutation: PriceMutationEngine,
    search_latency: Duration,
    refresh_interval: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: SessionEvent) {
        // Nobody listening is not an error
        let _ = self.events.send(event);
    }

    fn spawn_latency_timer(self: &Arc<Self>, session_id: Uuid) -> JoinHandle<()> {
        let shared = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(shared.search_latency).await;
            shared.deliver_results(session_id);
        })
    }

    fn deliver_results(self: &Arc<Self>, session_id: Uuid) {
        let mut inner = self.lock();
        if !inner.is_current(session_id) || inner.state != SessionState::Searching {
            return;
        }
        inner.latency_timer = None;

        let SessionInner { request, rng, .. } = &mut *inner;
        let offers = self.generator.generate(request.as_ref(), rng);
        let generated_at = Utc::now();

        inner.offers = offers;
        inner.state = SessionState::ResultsShown;
        inner.last_updated = Some(generated_at);
        inner.refresh_count = 0;

        if inner.auto_update {
            inner.cancel_refresh();
            let epoch = inner.refresh_epoch;
            inner.refresh_timer = Some(self.spawn_refresh_timer(session_id, epoch));
        }

        info!(%session_id, offers = inner.offers.len(), "search results ready");
        self.publish(SessionEvent::ResultsReady {
            session_id,
            offer_count: inner.offers.len(),
            generated_at,
        });
    }

    fn spawn_refresh_timer(self: &Arc<Self>, session_id: Uuid, epoch: u64) -> JoinHandle<()> {
        let shared = Arc::clone(self);
        let period = self.refresh_interval;
        let start = Instant::now() + period;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !shared.refresh_prices(session_id, epoch) {
                    break;
                }
            }
        })
    }

    /// One mutation tick; false once the timer no longer belongs to the session
    fn refresh_prices(&self, session_id: Uuid, epoch: u64) -> bool {
        let mut inner = self.lock();
        if !inner.is_current(session_id)
            || inner.refresh_epoch != epoch
            || inner.state != SessionState::ResultsShown
            || !inner.auto_update
        {
            return false;
        }
        if inner.offers.is_empty() {
            return true;
        }

        let SessionInner { offers, rng, .. } = &mut *inner;
        let mutated = self.mutation.mutate(offers, rng);
        *offers = mutated;

        let updated_at = Utc::now();
        inner.last_updated = Some(updated_at);
        inner.refresh_count += 1;
        let tick = inner.refresh_count;

        debug!(%session_id, tick, "prices refreshed");
        self.publish(SessionEvent::PricesRefreshed {
            session_id,
            tick,
            updated_at,
        });
        true
    }
}

/// Drives one live search at a time: latency, generation, periodic repricing.
///
/// Timers are tokio tasks, so the controller must be used inside a runtime.
/// Dropping the controller tears the session down.
pub struct SearchSessionController {
    shared: Arc<Shared>,
}

impl SearchSessionController {
    pub fn new(session: &SessionSettings, pricing: &PricingSettings) -> Self {
        let rng = match session.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(session, pricing, rng)
    }

    /// Controller drawing from a caller-supplied random source
    pub fn with_rng(session: &SessionSettings, pricing: &PricingSettings, rng: StdRng) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let inner = SessionInner {
            session_id: None,
            state: SessionState::Idle,
            request: None,
            offers: Vec::new(),
            sort_key: SortKey::default(),
            auto_update: session.auto_update,
            last_updated: None,
            refresh_count: 0,
            refresh_epoch: 0,
            latency_timer: None,
            refresh_timer: None,
            rng,
        };

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(inner),
                events,
                generator: FlightOfferGenerator::from_settings(session, pricing),
                mutation: PriceMutationEngine::new(PricingEngine::live(pricing)),
                search_latency: Duration::from_millis(session.search_latency_ms),
                // interval_at rejects a zero period
                refresh_interval: Duration::from_millis(session.refresh_interval_ms.max(1)),
            }),
        }
    }

    /// Register an observer for state transitions and refresh ticks
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.shared.events.subscribe()
    }

    /// Begin a new session, superseding any previous one and its timers
    pub fn start_search(&self, request: SearchRequest) -> Uuid {
        let session_id = Uuid::new_v4();
        let route = request.route_title();

        let mut inner = self.shared.lock();
        inner.cancel_timers();
        inner.session_id = Some(session_id);
        inner.state = SessionState::Searching;
        inner.request = Some(request);
        inner.offers.clear();
        inner.refresh_count = 0;
        inner.latency_timer = Some(self.shared.spawn_latency_timer(session_id));

        info!(%session_id, route = %route, "search started");
        self.shared.publish(SessionEvent::SearchStarted {
            session_id,
            route,
            started_at: Utc::now(),
        });
        session_id
    }

    /// Pause or resume repricing; the current batch is kept either way
    pub fn set_auto_update(&self, enabled: bool) {
        let mut inner = self.shared.lock();
        if inner.auto_update == enabled {
            return;
        }
        inner.auto_update = enabled;
        inner.cancel_refresh();

        if enabled && inner.state == SessionState::ResultsShown {
            if let Some(session_id) = inner.session_id {
                let epoch = inner.refresh_epoch;
                inner.refresh_timer = Some(self.shared.spawn_refresh_timer(session_id, epoch));
            }
        }

        info!(enabled, "auto-update toggled");
        self.shared.publish(SessionEvent::AutoUpdateChanged { enabled });
    }

    pub fn set_sort_key(&self, key: SortKey) {
        let mut inner = self.shared.lock();
        if inner.sort_key == key {
            return;
        }
        inner.sort_key = key;

        debug!(sort_key = %key, "sort key changed");
        self.shared.publish(SessionEvent::SortChanged {
            sort_key: key.to_string(),
        });
    }

    /// Select the ordering by name; unknown names fall back to price
    pub fn set_sort_key_name(&self, name: &str) -> SortKey {
        let key = SortKey::from_name(name);
        self.set_sort_key(key);
        key
    }

    /// Current batch in display order
    pub fn current_offers(&self) -> Vec<FlightOffer> {
        let inner = self.shared.lock();
        OfferSorter::sort(&inner.offers, inner.sort_key)
    }

    pub fn current_state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn session_id(&self) -> Option<Uuid> {
        self.shared.lock().session_id
    }

    pub fn request(&self) -> Option<SearchRequest> {
        self.shared.lock().request.clone()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.shared.lock().last_updated
    }

    pub fn auto_update(&self) -> bool {
        self.shared.lock().auto_update
    }

    pub fn sort_key(&self) -> SortKey {
        self.shared.lock().sort_key
    }

    pub fn offer_count(&self) -> usize {
        self.shared.lock().offers.len()
    }

    /// Ticks applied since the current batch was generated
    pub fn refresh_count(&self) -> u64 {
        self.shared.lock().refresh_count
    }

    /// Results header, e.g. "Kathmandu → New York"
    pub fn route_title(&self) -> Option<String> {
        self.shared.lock().request.as_ref().map(SearchRequest::route_title)
    }

    pub fn active_timers(&self) -> ActiveTimers {
        let inner = self.shared.lock();
        let pending = |handle: &Option<JoinHandle<()>>| {
            handle.as_ref().is_some_and(|h| !h.is_finished())
        };
        ActiveTimers {
            latency: pending(&inner.latency_timer),
            refresh: pending(&inner.refresh_timer),
        }
    }

    /// Release all timers and discard the session. Safe to call repeatedly.
    pub fn teardown(&self) {
        let mut inner = self.shared.lock();
        inner.cancel_timers();

        let Some(session_id) = inner.session_id.take() else {
            return;
        };
        inner.state = SessionState::Idle;
        inner.request = None;
        inner.offers.clear();
        inner.last_updated = None;

        info!(%session_id, "session torn down");
        self.shared.publish(SessionEvent::TornDown { session_id });
    }
}

impl Drop for SearchSessionController {
    fn drop(&mut self) {
        self.teardown();
    }
}
