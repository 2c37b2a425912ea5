//! Time source port.

use chrono::{DateTime, Utc};

/// Source of the current time for deadline checks.
///
/// Implementations must be monotonic: a later call never returns an
/// earlier instant than a previous one.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
