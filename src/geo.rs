// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Best-effort device location for tagging new and edited transactions.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Rounded to six decimal places (about 0.1 m).
    pub fn rounded(self) -> Self {
        let round = |v: f64| (v * 1e6).round() / 1e6;
        Self {
            latitude: round(self.latitude),
            longitude: round(self.longitude),
        }
    }
}

/// Source of the device position. Denial or unavailability is `None`.
pub trait Locator {
    fn locate(&self) -> impl Future<Output = Option<Coordinates>> + Send;
}

/// A position known up front (for example from command-line flags), or none.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StaticLocation(pub Option<Coordinates>);

impl Locator for StaticLocation {
    async fn locate(&self) -> Option<Coordinates> {
        self.0
    }
}

/// Asks the locator with a deadline. Never fails: timeout, denial and
/// missing hardware all come back as `None`.
pub async fn resolve<L: Locator>(locator: &L, timeout: Duration) -> Option<Coordinates> {
    match tokio::time::timeout(timeout, locator.locate()).await {
        Ok(Some(position)) => Some(position.rounded()),
        Ok(None) => {
            debug!("location unavailable");
            None
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "location lookup timed out");
            None
        }
    }
}
