//! Catalog angular coordinates to a point on the sky sphere, plus the
//! brightness-to-size policies.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Radius of the sphere every star is placed on.
pub const SKY_RADIUS: f64 = 9000.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PlacementError {
    #[error("non-finite position ({}, {}, {})", .0.x, .0.y, .0.z)]
    NonFinitePosition(DVec3),
    #[error("non-finite visual radius {0}")]
    NonFiniteRadius(f64),
    #[error("non-finite magnitude {0}")]
    NonFiniteMagnitude(f64),
}

/// How a star's visual radius is derived from its brightness.
///
/// Catalog variants were calibrated for one formula or the other, so the
/// policy is chosen explicitly and never blended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SizePolicy {
    /// `min + (max - min) * size` using the catalog's pre-normalized size.
    Linear { min: f64, max: f64 },
    /// `base * 10^(-exponent * magnitude)` clamped to `[min, max]`.
    PowerLaw {
        base: f64,
        exponent: f64,
        min: f64,
        max: f64,
    },
}

impl Default for SizePolicy {
    fn default() -> Self {
        SizePolicy::Linear {
            min: 5.0,
            max: 350.0,
        }
    }
}

impl SizePolicy {
    pub fn power_law() -> Self {
        SizePolicy::PowerLaw {
            base: 120.0,
            exponent: 0.2,
            min: 5.0,
            max: 350.0,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let (min, max) = match *self {
            SizePolicy::Linear { min, max } => (min, max),
            SizePolicy::PowerLaw {
                base,
                exponent,
                min,
                max,
            } => {
                if !(base.is_finite() && base > 0.0) {
                    return Err(format!("power-law base must be positive, got {base}"));
                }
                if !exponent.is_finite() {
                    return Err(format!("power-law exponent must be finite, got {exponent}"));
                }
                (min, max)
            }
        };
        if !(min.is_finite() && max.is_finite() && 0.0 <= min && min <= max) {
            return Err(format!("size range must satisfy 0 <= min <= max, got [{min}, {max}]"));
        }
        Ok(())
    }

    pub fn visual_radius(&self, magnitude: f64, size: f64) -> f64 {
        match *self {
            // NaN passes through clamp and is rejected by place_star
            SizePolicy::Linear { min, max } => min + (max - min) * size.clamp(0.0, 1.0),
            SizePolicy::PowerLaw {
                base,
                exponent,
                min,
                max,
            } => (base * 10f64.powf(-exponent * magnitude)).clamp(min, max),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: DVec3,
    pub visual_radius: f64,
}

/// Unit direction for RA/DE in degrees. The sky's local frame has the
/// celestial pole on +Y and RA 0 on +Z.
pub fn direction(ra_deg: f64, de_deg: f64) -> DVec3 {
    let ra = ra_deg / 360.0 * std::f64::consts::TAU;
    let de = de_deg / 360.0 * std::f64::consts::TAU;
    DVec3::new(de.cos() * ra.sin(), de.sin(), de.cos() * ra.cos())
}

pub fn place_star(
    ra_deg: f64,
    de_deg: f64,
    magnitude: f64,
    size: f64,
    policy: &SizePolicy,
) -> Result<Placement, PlacementError> {
    let raw = direction(ra_deg, de_deg);
    if !raw.is_finite() {
        return Err(PlacementError::NonFinitePosition(raw));
    }
    // trig composition drifts off the unit sphere; snap back before scaling
    let position = raw.normalize_or_zero() * SKY_RADIUS;
    if position == DVec3::ZERO {
        return Err(PlacementError::NonFinitePosition(raw));
    }

    if !magnitude.is_finite() {
        return Err(PlacementError::NonFiniteMagnitude(magnitude));
    }

    let visual_radius = policy.visual_radius(magnitude, size);
    if !visual_radius.is_finite() {
        return Err(PlacementError::NonFiniteRadius(visual_radius));
    }

    Ok(Placement {
        position,
        visual_radius,
    })
}
