//! Spherical geometry helpers
//!
//! Great-circle distance, initial bearing and destination point on a spherical
//! Earth, plus the pie-slice [`Sector`] used for field-of-view containment.
//! Everything here is pure; no state is kept between calls.

pub mod error;
pub mod sector;

pub use error::GeoError;
pub use sector::{cone, sector, Sector};

use serde::Serialize;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A validated WGS84 coordinate in degrees
///
/// Construction goes through [`Position::new`], so a `Position` always holds a
/// finite latitude in [-90, 90] and a finite longitude in [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    latitude: f64,
    longitude: f64,
}

impl Position {
    /// Create a position, rejecting out-of-range or non-finite values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Validate a compass heading, which must lie in [0, 360)
pub fn validate_heading(heading: f64) -> Result<f64, GeoError> {
    if heading.is_finite() && (0.0..360.0).contains(&heading) {
        Ok(heading)
    } else {
        Err(GeoError::InvalidHeading(heading))
    }
}

/// Map any finite angle in degrees onto [0, 360)
pub fn normalize_bearing(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}

/// Great-circle distance between two positions (haversine)
pub fn distance_km(from: &Position, to: &Position) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_phi = (to.latitude - from.latitude).to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial great-circle bearing from `from` towards `to`, in [0, 360)
///
/// The result is meaningless when both positions coincide; callers that care
/// must check the distance first.
pub fn bearing(from: &Position, to: &Position) -> f64 {
    let phi1 = from.latitude.to_radians();
    let phi2 = to.latitude.to_radians();
    let d_lambda = (to.longitude - from.longitude).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Point reached by travelling `distance_km` from `origin` along `bearing_deg`
pub fn destination(origin: &Position, distance_km: f64, bearing_deg: f64) -> Position {
    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.latitude.to_radians();
    let lambda1 = origin.longitude.to_radians();

    let sin_phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).clamp(-1.0, 1.0);
    let phi2 = sin_phi2.asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);

    Position {
        latitude: phi2.to_degrees().clamp(-90.0, 90.0),
        longitude: (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(lat: f64, lon: f64) -> Position {
        Position::new(lat, lon).unwrap()
    }

    #[test]
    fn test_position_rejects_out_of_range() {
        assert!(matches!(
            Position::new(91.0, 0.0),
            Err(GeoError::InvalidLatitude(_))
        ));
        assert!(matches!(
            Position::new(0.0, -180.5),
            Err(GeoError::InvalidLongitude(_))
        ));
        assert!(Position::new(f64::NAN, 0.0).is_err());
        assert!(Position::new(90.0, 180.0).is_ok());
    }

    #[test]
    fn test_validate_heading() {
        assert!(validate_heading(0.0).is_ok());
        assert!(validate_heading(359.9).is_ok());
        assert!(validate_heading(360.0).is_err());
        assert!(validate_heading(-0.1).is_err());
        assert!(validate_heading(f64::INFINITY).is_err());
    }

    #[test]
    fn test_normalize_bearing_range() {
        for raw in [-720.0, -360.0, -22.5, -1e-15, 0.0, 22.5, 359.999, 360.0, 382.5, 1080.0] {
            let n = normalize_bearing(raw);
            assert!((0.0..360.0).contains(&n), "{} normalized to {}", raw, n);
        }
        assert_eq!(normalize_bearing(-22.5), 337.5);
        assert_eq!(normalize_bearing(382.5), 22.5);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(&pos(51.859528, 4.645805), &pos(52.859528, 4.645805));
        assert!((d - 111.2).abs() < 0.1, "got {}", d);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = pos(51.859528, 4.645805);
        assert!(bearing(&origin, &pos(52.859528, 4.645805)).abs() < 1e-9);
        assert!((bearing(&origin, &pos(50.859528, 4.645805)) - 180.0).abs() < 1e-9);

        let east = bearing(&origin, &pos(51.859528, 5.645805));
        assert!((east - 90.0).abs() < 1.0, "got {}", east);
    }

    #[test]
    fn test_destination_round_trips_distance_and_bearing() {
        let origin = pos(51.859528, 4.645805);
        let target = destination(&origin, 250.0, 130.0);

        assert!((distance_km(&origin, &target) - 250.0).abs() < 1e-6);
        assert!((bearing(&origin, &target) - 130.0).abs() < 1e-6);
    }

    #[test]
    fn test_destination_wraps_antimeridian() {
        let origin = pos(0.0, 179.5);
        let target = destination(&origin, 200.0, 90.0);
        assert!(target.longitude() < 0.0);
        assert!((-180.0..=180.0).contains(&target.longitude()));
    }
}
