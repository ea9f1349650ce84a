//! Geolocation provider for ticket position capture.
//!
//! The provider supplies a single latitude/longitude reading per request.
//! Failure surfaces as a human-readable error presented to the operator;
//! there is no retry. In production this wraps the device or browser
//! geolocation service; the fixed implementations here back development
//! and tests.

use crate::types::GeoPoint;
use std::future::Future;
use std::pin::Pin;

/// Geolocation result
pub type GeoResult = Result<GeoPoint, GeoError>;

/// Geolocation provider error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeoError {
    /// The operator denied the position request
    PermissionDenied,
    /// No position fix could be obtained
    PositionUnavailable {
        /// Human-readable reason
        reason: String,
    },
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "Location permission denied"),
            Self::PositionUnavailable { reason } => {
                write!(f, "Unable to determine location: {reason}")
            },
        }
    }
}

impl std::error::Error for GeoError {}

/// Geolocation provider trait
///
/// Abstraction over whatever supplies position readings for the current
/// operator (device GPS, browser API, dispatcher entry).
pub trait GeoLocator: Send + Sync {
    /// Request one position reading
    fn locate(&self) -> Pin<Box<dyn Future<Output = GeoResult> + Send>>;
}

/// Geolocator that always reports the same position (development/tests)
#[derive(Clone, Copy, Debug)]
pub struct FixedGeoLocator {
    /// The position every request returns
    pub position: GeoPoint,
}

impl FixedGeoLocator {
    /// Creates a locator pinned to the given position
    #[must_use]
    pub const fn new(position: GeoPoint) -> Self {
        Self { position }
    }
}

impl GeoLocator for FixedGeoLocator {
    fn locate(&self) -> Pin<Box<dyn Future<Output = GeoResult> + Send>> {
        let position = self.position;
        Box::pin(async move { Ok(position) })
    }
}

/// Geolocator that always fails (tests of the failure path)
#[derive(Clone, Debug)]
pub struct FailingGeoLocator {
    /// The failure every request returns
    pub error: GeoError,
}

impl FailingGeoLocator {
    /// Creates a locator that always reports `error`
    #[must_use]
    pub const fn new(error: GeoError) -> Self {
        Self { error }
    }
}

impl GeoLocator for FailingGeoLocator {
    fn locate(&self) -> Pin<Box<dyn Future<Output = GeoResult> + Send>> {
        let error = self.error.clone();
        Box::pin(async move { Err(error) })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn fixed_locator_reports_its_position() {
        let position = GeoPoint::new(29.9511, -90.0715).unwrap();
        let locator = FixedGeoLocator::new(position);
        let reading = tokio_test::block_on(locator.locate()).unwrap();
        assert_eq!(reading, position);
    }

    #[test]
    fn failing_locator_reports_a_readable_error() {
        let locator = FailingGeoLocator::new(GeoError::PositionUnavailable {
            reason: "no GPS fix".to_string(),
        });
        let err = tokio_test::block_on(locator.locate()).unwrap_err();
        assert_eq!(err.to_string(), "Unable to determine location: no GPS fix");
    }
}
