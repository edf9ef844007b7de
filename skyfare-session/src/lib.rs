pub mod orchestrator;
pub mod preview;

pub use orchestrator::{ActiveTimers, SearchSessionController, SessionState};
pub use preview::PreviewBand;
