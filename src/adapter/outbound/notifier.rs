//! Notification adapters.
//!
//! Implements the `port::Notifier` trait for logging backends.

use tracing::info;

use crate::domain::Event;
use crate::port::Notifier;

/// A logging notifier that logs events via tracing.
///
/// Each event is rendered as a JSON payload alongside a few indexed fields,
/// so it reads well under both pretty and JSON log formats.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        let market_id = event.market_id().map(ToString::to_string).unwrap_or_default();
        let payload = serde_json::to_string(&event).unwrap_or_else(|e| format!("<{e}>"));
        info!(
            event = event.name(),
            market_id = %market_id,
            payload = %payload,
            "Market event"
        );
    }
}
