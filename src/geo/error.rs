//! Geometry error types

use thiserror::Error;

/// Errors raised while validating coordinates or building a sector
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or not finite
    #[error("latitude {0} is outside [-90, 90]")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite
    #[error("longitude {0} is outside [-180, 180]")]
    InvalidLongitude(f64),

    /// Heading outside [0, 360) or not finite
    #[error("heading {0} is outside [0, 360)")]
    InvalidHeading(f64),

    /// Sector radius that is not a positive finite number
    #[error("sector radius {0} km must be positive and finite")]
    InvalidRadius(f64),

    /// Sector bound that is not finite
    #[error("sector bound {0} is not a finite angle")]
    InvalidBound(f64),

    /// Cone width that is not a positive finite number
    #[error("sector width {0} must be positive and finite")]
    InvalidWidth(f64),
}

impl GeoError {
    /// Whether the error concerns caller-supplied coordinates rather than
    /// sector construction
    pub fn is_coordinate_error(&self) -> bool {
        matches!(
            self,
            GeoError::InvalidLatitude(_) | GeoError::InvalidLongitude(_) | GeoError::InvalidHeading(_)
        )
    }
}
