//! Photometric colour model: colour index -> effective temperature -> RGB.
//!
//! The temperature fit and the two-regime blackbody approximation are the
//! usual display-oriented curves; the two correction bands push mid-range
//! stars toward yellow and white so the sky does not look uniformly orange.

use serde::{Deserialize, Serialize};

const MIN_TEMPERATURE_K: f64 = 1000.0;
const MAX_TEMPERATURE_K: f64 = 40000.0;

/// Scaled temperature (kelvin / 100) splitting the cool and hot regimes.
const REGIME_SPLIT: f64 = 66.0;
/// Below this scaled temperature the blue channel is forced to zero.
const BLUE_CUTOFF: f64 = 19.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels scaled to [0, 1] for shader uniforms.
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Estimates effective temperature in kelvin from a colour index.
pub fn color_index_to_temperature(bv: f64) -> f64 {
    4600.0 * (1.0 / (0.92 * bv + 1.7) + 1.0 / (0.92 * bv + 0.62))
}

pub fn temperature_to_rgb(kelvin: f64) -> Rgb {
    let kelvin = if kelvin.is_nan() {
        MIN_TEMPERATURE_K
    } else {
        kelvin.clamp(MIN_TEMPERATURE_K, MAX_TEMPERATURE_K)
    };
    let t = kelvin / 100.0;

    let (mut red, mut green, mut blue) = if t <= REGIME_SPLIT {
        let green = clamp_channel(99.4708025861 * t.ln() - 161.1195681661);
        let blue = if t <= BLUE_CUTOFF {
            0.0
        } else {
            clamp_channel(138.5177312231 * (t - 10.0).ln() - 305.0447927307)
        };
        (255.0, green, blue)
    } else {
        let red = clamp_channel(329.698727446 * (t - 60.0).powf(-0.1332047592));
        let green = clamp_channel(288.1221695283 * t.powf(-0.0755148492));
        (red, green, 255.0)
    };

    if (20.0..=40.0).contains(&t) {
        // red -> yellow
        red *= 0.9;
        green *= 1.2;
        blue *= 0.8;
    } else if t > 40.0 && t <= 60.0 {
        // yellow -> white
        red *= 1.1;
        green *= 1.1;
    }

    Rgb::new(to_channel(red), to_channel(green), to_channel(blue))
}

/// Perceptual star colour for a colour index. Pure and total: any input,
/// including NaN, yields a valid colour.
pub fn color_index_to_rgb(bv: f64) -> Rgb {
    temperature_to_rgb(color_index_to_temperature(bv))
}

fn clamp_channel(value: f64) -> f64 {
    value.clamp(0.0, 255.0)
}

fn to_channel(value: f64) -> u8 {
    clamp_channel(value).round() as u8
}
