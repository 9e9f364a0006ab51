use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotation::DEFAULT_LINK_RADIUS;
use crate::catalog::CatalogConfig;
use crate::error::{Result, SkyError};
use crate::frame::{DEFAULT_LATITUDE_DEG, DEFAULT_SPIN_RATE};
use crate::picking::CameraConfig;

pub const DEFAULT_LABEL_PICK_RADIUS: f64 = 150.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub catalog: CatalogConfig,
    pub latitude_deg: f64,
    /// Radians of spin about the polar axis per tick.
    pub spin_rate: f64,
    pub link_radius: f64,
    pub label_pick_radius: f64,
    pub camera: CameraConfig,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            latitude_deg: DEFAULT_LATITUDE_DEG,
            spin_rate: DEFAULT_SPIN_RATE,
            link_radius: DEFAULT_LINK_RADIUS,
            label_pick_radius: DEFAULT_LABEL_PICK_RADIUS,
            camera: CameraConfig::default(),
        }
    }
}

impl SkyConfig {
    /// Falls back to defaults when the file is missing or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(
                    "Using default config, could not load {}: {:#}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Self = common::serde::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        common::serde::write_file(self, path)
    }

    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;

        if !self.latitude_deg.is_finite() {
            return Err(SkyError::Config("latitude must be finite".to_string()));
        }
        if !self.spin_rate.is_finite() || self.spin_rate < 0.0 {
            return Err(SkyError::Config(format!(
                "spin rate must be a non-negative number, got {}",
                self.spin_rate
            )));
        }
        for (name, value) in [
            ("link radius", self.link_radius),
            ("label pick radius", self.label_pick_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SkyError::Config(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let camera = &self.camera;
        if !(camera.fov_y_deg > 0.0 && camera.fov_y_deg < 180.0) {
            return Err(SkyError::Config(format!(
                "camera fov must be in (0, 180), got {}",
                camera.fov_y_deg
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(SkyError::Config(format!(
                "camera clip planes out of order: near {}, far {}",
                camera.near, camera.far
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::placement::SizePolicy;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("skydome-{}-{}", std::process::id(), name))
    }

    #[test]
    fn defaults_are_valid() {
        let config = SkyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.latitude_deg, 32.18);
        assert_eq!(config.link_radius, 20.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() -> anyhow::Result<()> {
        let text = "\
latitude_deg: -33.9
catalog:
  size_policy:
    kind: power_law
    base: 120.0
    exponent: 0.2
    min: 5.0
    max: 350.0
";
        let config: SkyConfig =
            common::serde::deserialize(text.as_bytes(), common::FileFormat::Yaml)?;

        assert_eq!(config.latitude_deg, -33.9);
        assert_eq!(config.catalog.size_policy, SizePolicy::power_law());
        assert_eq!(config.spin_rate, DEFAULT_SPIN_RATE);
        assert_eq!(config.camera, CameraConfig::default());
        Ok(())
    }

    #[test]
    fn save_then_load() -> anyhow::Result<()> {
        let path = temp_path("config.yaml");
        let config = SkyConfig {
            latitude_deg: 51.5,
            spin_rate: 0.0,
            ..Default::default()
        };
        config.save(&path)?;
        let loaded = SkyConfig::load(&path);
        std::fs::remove_file(&path)?;

        assert_eq!(loaded?, config);
        Ok(())
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = SkyConfig::load_or_default(&temp_path("missing.yaml"));
        assert_eq!(config, SkyConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            SkyConfig {
                spin_rate: -1.0,
                ..Default::default()
            },
            SkyConfig {
                link_radius: 0.0,
                ..Default::default()
            },
            SkyConfig {
                latitude_deg: f64::NAN,
                ..Default::default()
            },
            SkyConfig {
                camera: CameraConfig {
                    near: 10.0,
                    far: 1.0,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(SkyError::Config(_))));
        }
    }
}
