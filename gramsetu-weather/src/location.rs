use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;
use crate::model::Coordinate;

/// Best-effort source of the caller's coordinates.
///
/// `None` means "location unavailable" (permission denied, nothing
/// configured, or a platform lookup failure) and must not be treated as a
/// loud error; the facade degrades gracefully on it. Implementations make a
/// single attempt, with no retry.
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn resolve(&self) -> Option<Coordinate>;
}

/// Location source backed by the on-disk configuration.
///
/// The mobile app asks the OS for a GPS fix behind a permission prompt; on
/// the command line the equivalent is a coordinate pair the user has stored
/// via `gramsetu configure`. An unset pair is the "permission denied" case.
#[derive(Debug, Clone)]
pub struct ConfiguredLocation {
    coordinate: Option<Coordinate>,
}

impl ConfiguredLocation {
    pub fn new(config: &Config) -> Self {
        Self { coordinate: config.coordinate() }
    }
}

#[async_trait]
impl LocationSource for ConfiguredLocation {
    async fn resolve(&self) -> Option<Coordinate> {
        if self.coordinate.is_none() {
            debug!("no coordinate configured, reporting location unavailable");
        }
        self.coordinate
    }
}
