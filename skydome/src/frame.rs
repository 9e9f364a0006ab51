//! The rotation shared by everything drawn on the sky.
//!
//! Stars, constellation links and labels are all children of one
//! [`SkyFrame`], so their relative orientation is identity by construction:
//! there is a single quaternion, not three that have to be kept in sync.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};

/// Fixed world axis latitude changes rotate about.
pub const REFERENCE_AXIS: DVec3 = DVec3::X;
/// Celestial pole direction in the sky's local frame.
pub const POLE_AXIS: DVec3 = DVec3::Y;

pub const DEFAULT_LATITUDE_DEG: f64 = 32.18;
pub const DEFAULT_SPIN_RATE: f64 = 0.00005;

/// Converts an observer latitude to the frame's tilt about [`REFERENCE_AXIS`].
pub fn latitude_to_offset(latitude_deg: f64) -> f64 {
    (90.0 - latitude_deg) / 180.0 * PI
}

pub fn offset_to_latitude(offset: f64) -> f64 {
    90.0 - offset / PI * 180.0
}

/// The pole direction in world space for a given tilt. Always derived from
/// the fixed axes, never accumulated.
pub fn polar_axis_for(offset: f64) -> DVec3 {
    DQuat::from_axis_angle(REFERENCE_AXIS, offset) * POLE_AXIS
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct FrameSnapshot {
    orientation: DQuat,
    latitude_offset: f64,
}

#[derive(Debug, Clone)]
pub struct SkyFrame {
    orientation: DQuat,
    latitude_offset: f64,
    polar_axis: DVec3,
    spin_rate: f64,
    rotating: bool,
    origin: FrameSnapshot,
}

impl Default for SkyFrame {
    fn default() -> Self {
        Self::new(DEFAULT_LATITUDE_DEG, DEFAULT_SPIN_RATE)
    }
}

impl SkyFrame {
    /// The origin snapshot is the unrotated frame (pole at zenith); the
    /// initial latitude is applied on top of it.
    pub fn new(latitude_deg: f64, spin_rate: f64) -> Self {
        let origin = FrameSnapshot {
            orientation: DQuat::IDENTITY,
            latitude_offset: 0.0,
        };
        let mut frame = Self {
            orientation: origin.orientation,
            latitude_offset: origin.latitude_offset,
            polar_axis: polar_axis_for(origin.latitude_offset),
            spin_rate: DEFAULT_SPIN_RATE,
            rotating: true,
            origin,
        };
        frame.set_spin_rate(spin_rate);
        frame.set_latitude(latitude_deg);
        frame
    }

    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    pub fn polar_axis(&self) -> DVec3 {
        self.polar_axis
    }

    pub fn latitude_offset(&self) -> f64 {
        self.latitude_offset
    }

    pub fn latitude_deg(&self) -> f64 {
        offset_to_latitude(self.latitude_offset)
    }

    pub fn spin_rate(&self) -> f64 {
        self.spin_rate
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    /// Tilts the sky to the given observer latitude, clamped to [-90, 90].
    /// Returns the latitude actually applied.
    pub fn set_latitude(&mut self, latitude_deg: f64) -> f64 {
        if !latitude_deg.is_finite() {
            tracing::warn!("Ignoring non-finite latitude {}", latitude_deg);
            return self.latitude_deg();
        }

        let latitude_deg = latitude_deg.clamp(-90.0, 90.0);
        let target = latitude_to_offset(latitude_deg);
        let delta = target - self.latitude_offset;

        self.rotate_on_world_axis(REFERENCE_AXIS, delta);
        self.latitude_offset = target;
        self.polar_axis = polar_axis_for(target);

        tracing::debug!("Sky latitude set to {:.2} deg", latitude_deg);
        latitude_deg
    }

    /// Sets the per-tick spin. Negative or non-finite rates are rejected.
    pub fn set_spin_rate(&mut self, rate: f64) -> bool {
        if !rate.is_finite() || rate < 0.0 {
            tracing::warn!("Ignoring invalid spin rate {}", rate);
            return false;
        }
        self.spin_rate = rate;
        true
    }

    pub fn tick(&mut self) {
        if self.rotating {
            self.rotate_on_world_axis(self.polar_axis, -self.spin_rate);
        }
    }

    /// Stops the spin and puts the sky back to the origin view so drawing
    /// always starts from the same orientation.
    pub fn pause_and_reset(&mut self) {
        self.rotating = false;
        self.orientation = self.origin.orientation;
        self.latitude_offset = self.origin.latitude_offset;
        self.polar_axis = polar_axis_for(self.latitude_offset);
    }

    pub fn resume(&mut self) {
        self.rotating = true;
    }

    /// Sky-local point to world space.
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.orientation * local
    }

    /// World-space point to sky-local.
    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.orientation.inverse() * world
    }

    fn rotate_on_world_axis(&mut self, axis: DVec3, angle: f64) {
        self.orientation = (DQuat::from_axis_angle(axis, angle) * self.orientation).normalize();
    }
}
