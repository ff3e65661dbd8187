//! Pie-slice sectors on the sphere

use super::{bearing, destination, distance_km, normalize_bearing, GeoError, Position};

/// Points closer than this to the center have no usable bearing (1 mm)
const COINCIDENT_KM: f64 = 1e-6;

/// A disk sector: every point within `radius_km` of `center` whose bearing
/// from the center lies clockwise between `lower` and `upper`
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    center: Position,
    radius_km: f64,
    lower: f64,
    upper: f64,
    span: f64,
}

/// Build a sector from `center` out to `radius_km`, spanning bearings
/// clockwise from `lower_deg` to `upper_deg`
///
/// Bounds are taken modulo 360. When `lower > upper` the span wraps through
/// north; equal bounds describe the full disk.
pub fn sector(
    center: Position,
    radius_km: f64,
    lower_deg: f64,
    upper_deg: f64,
) -> Result<Sector, GeoError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }
    for bound in [lower_deg, upper_deg] {
        if !bound.is_finite() {
            return Err(GeoError::InvalidBound(bound));
        }
    }

    let lower = normalize_bearing(lower_deg);
    let upper = normalize_bearing(upper_deg);
    let span = match normalize_bearing(upper - lower) {
        s if s == 0.0 => 360.0,
        s => s,
    };

    Ok(Sector {
        center,
        radius_km,
        lower,
        upper,
        span,
    })
}

/// Build a sector of total width `width_deg` centered on bearing `heading`
///
/// The span is taken from the width itself rather than from the rounded
/// bounds, so a 360 degree width is always the full disk and a narrow width
/// never collapses into one. Widths above 360 are capped at the full disk.
pub fn cone(
    center: Position,
    radius_km: f64,
    heading: f64,
    width_deg: f64,
) -> Result<Sector, GeoError> {
    if !radius_km.is_finite() || radius_km <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_km));
    }
    if !heading.is_finite() {
        return Err(GeoError::InvalidBound(heading));
    }
    if !width_deg.is_finite() || width_deg <= 0.0 {
        return Err(GeoError::InvalidWidth(width_deg));
    }

    let span = width_deg.min(360.0);
    let lower = normalize_bearing(heading - span / 2.0);
    let upper = normalize_bearing(heading + span / 2.0);

    Ok(Sector {
        center,
        radius_km,
        lower,
        upper,
        span,
    })
}

impl Sector {
    /// Center of the sector
    pub fn center(&self) -> &Position {
        &self.center
    }

    /// Radius in kilometers
    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    /// Normalized (lower, upper) bearings
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    /// Angular width in degrees, in (0, 360]
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Whether `point` lies inside the sector
    ///
    /// Both the radius and the angular edges are inclusive. A point on top of
    /// the center has no direction and is never contained.
    pub fn contains(&self, point: &Position) -> bool {
        let distance = distance_km(&self.center, point);
        if distance > self.radius_km || distance < COINCIDENT_KM {
            return false;
        }

        let offset = normalize_bearing(bearing(&self.center, point) - self.lower);
        offset <= self.span
    }

    /// Closed polygon ring tracing the sector outline: center, `steps + 1`
    /// arc vertices from `lower` to `upper`, then center again
    pub fn outline(&self, steps: usize) -> Vec<Position> {
        let steps = steps.max(1);
        let mut ring = Vec::with_capacity(steps + 3);
        ring.push(self.center);
        for i in 0..=steps {
            let step_bearing = self.lower + self.span * (i as f64) / (steps as f64);
            ring.push(destination(&self.center, self.radius_km, step_bearing));
        }
        ring.push(self.center);
        ring
    }
}
