use anyhow::Context;
use skyfare_core::app_config::Config;
use skyfare_core::SearchForm;
use skyfare_offer::FlightOffer;
use skyfare_session::{PreviewBand, SearchSessionController};
use skyfare_shared::models::events::{PreviewEvent, SessionEvent};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyfare_app=info,skyfare_session=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!(
        latency_ms = config.session.search_latency_ms,
        refresh_ms = config.session.refresh_interval_ms,
        "Starting Skyfare"
    );

    let preview = PreviewBand::start(&config.preview, &config.pricing);
    let mut preview_events = preview.subscribe();

    let controller = SearchSessionController::new(&config.session, &config.pricing);
    let mut events = controller.subscribe();

    let request = SearchForm::default().submit()?;
    controller.start_search(request);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(SessionEvent::ResultsReady { .. }) => {
                    render(&controller)?;
                    if !controller.auto_update() {
                        break;
                    }
                }
                Ok(SessionEvent::PricesRefreshed { tick, .. }) => {
                    render(&controller)?;
                    if tick >= config.app.ticks {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => tracing::warn!(skipped, "renderer fell behind"),
                Err(RecvError::Closed) => break,
            },
            event = preview_events.recv() => {
                if let Ok(PreviewEvent::Refreshed { tick, .. }) = event {
                    tracing::info!(tick, "preview band refreshed");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    controller.teardown();
    preview.stop();
    Ok(())
}

/// One JSON line per view update
fn render(controller: &SearchSessionController) -> anyhow::Result<()> {
    let offers: Vec<serde_json::Value> = controller
        .current_offers()
        .iter()
        .map(offer_row)
        .collect();

    let snapshot = serde_json::json!({
        "route": controller.route_title(),
        "state": controller.current_state(),
        "sort": controller.sort_key(),
        "last_updated": controller.last_updated(),
        "offers": offers,
    });
    println!("{}", serde_json::to_string(&snapshot)?);
    Ok(())
}

fn offer_row(offer: &FlightOffer) -> serde_json::Value {
    serde_json::json!({
        "id": offer.id,
        "airline": format!("{} ({})", offer.airline, offer.airline_code),
        "departure": offer.departure_time,
        "arrival": offer.arrival_time,
        "duration": offer.duration,
        "stops": offer.stops_label(),
        "price": offer.price,
        "trend": offer.price_trend(),
        "savings": offer.savings(),
        "seats": offer.seats,
    })
}
