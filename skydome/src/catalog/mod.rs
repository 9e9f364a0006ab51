//! Star catalog loading: rows -> placed, coloured star entities.

mod record;
#[cfg(test)]
mod tests;

use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use hashbrown::HashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::{color_index_to_rgb, Rgb};
use crate::error::{Result, SkyError};
use crate::placement::{place_star, SizePolicy};

pub use record::{RawCatalog, StarRecord};

pub const DEFAULT_TWINKLE_PROBABILITY: f64 = 0.2;

/// Index of a star in the loaded catalog. Stable until the next reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StarId(pub u32);

impl fmt::Display for StarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "star#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub size_policy: SizePolicy,
    pub twinkle_probability: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            size_policy: SizePolicy::default(),
            twinkle_probability: DEFAULT_TWINKLE_PROBABILITY,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        self.size_policy.validate().map_err(SkyError::Config)?;
        if !(0.0..=1.0).contains(&self.twinkle_probability) {
            return Err(SkyError::Config(format!(
                "twinkle probability must be in [0, 1], got {}",
                self.twinkle_probability
            )));
        }
        Ok(())
    }
}

/// What the info overlay shows for a star.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StarInfo {
    pub id: String,
    pub ra: f64,
    pub de: f64,
    pub color_index: f64,
    pub magnitude: f64,
    pub visual_radius: f64,
}

/// Per-star render descriptor, laid out for direct upload as instance data.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct StarInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub base_color: [f32; 3],
    pub should_twinkle: u32,
    pub time: f32,
}

#[derive(Debug, Clone)]
pub struct StarEntity {
    pub id: StarId,
    pub record: StarRecord,
    /// Position in the sky's local frame. Never changes after load.
    pub position: DVec3,
    pub visual_radius: f64,
    pub color: Rgb,
    pub twinkle: bool,
    /// Seconds of twinkle phase; only consumed by the star shader.
    pub twinkle_time: f32,
}

impl StarEntity {
    pub fn info(&self) -> StarInfo {
        StarInfo {
            id: self.record.name.clone(),
            ra: self.record.ra,
            de: self.record.de,
            color_index: self.record.color_index,
            magnitude: self.record.magnitude,
            visual_radius: self.visual_radius,
        }
    }

    pub fn instance(&self) -> StarInstance {
        StarInstance {
            position: self.position.as_vec3().to_array(),
            radius: self.visual_radius as f32,
            base_color: self.color.to_unit(),
            should_twinkle: self.twinkle as u32,
            time: self.twinkle_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    /// Rows considered, header excluded.
    pub rows: usize,
    pub loaded: usize,
    pub malformed: usize,
}

#[derive(Debug, Default)]
pub struct StarCatalog {
    entities: Vec<StarEntity>,
    by_name: HashMap<String, StarId>,
    loaded: bool,
}

impl StarCatalog {
    /// Builds one entity per valid row. The first row is a header-like
    /// entry and is skipped. Bad rows are logged and counted, never fatal.
    /// Calling this again replaces the whole star set.
    pub fn load<R: Rng>(
        &mut self,
        raw: &RawCatalog,
        config: &CatalogConfig,
        rng: &mut R,
    ) -> LoadReport {
        if self.loaded {
            tracing::info!("Reloading star catalog, dropping {} stars", self.entities.len());
        }
        self.entities.clear();
        self.by_name.clear();

        let twinkle_probability = if config.twinkle_probability.is_finite() {
            config.twinkle_probability.clamp(0.0, 1.0)
        } else {
            tracing::warn!(
                "Twinkle probability {} is not a number, using {}",
                config.twinkle_probability,
                DEFAULT_TWINKLE_PROBABILITY
            );
            DEFAULT_TWINKLE_PROBABILITY
        };
        let mut report = LoadReport::default();

        for row in raw.rows().iter().skip(1) {
            report.rows += 1;

            let id = StarId(self.entities.len() as u32);
            let entity = StarRecord::from_value(row).and_then(|record| {
                Self::build_entity(id, record, &config.size_policy, twinkle_probability, rng)
            });

            match entity {
                Ok(entity) => {
                    if self.by_name.contains_key(&entity.record.name) {
                        tracing::debug!("Duplicate star name {:?}, keeping first", entity.record.name);
                    } else {
                        self.by_name.insert(entity.record.name.clone(), id);
                    }
                    self.entities.push(entity);
                    report.loaded += 1;
                }
                Err(err) => {
                    tracing::warn!("Skipping star: {}", err);
                    report.malformed += 1;
                }
            }
        }

        self.loaded = true;
        tracing::info!(
            "Loaded {} stars ({} malformed rows skipped)",
            report.loaded,
            report.malformed
        );
        report
    }

    fn build_entity<R: Rng>(
        id: StarId,
        record: StarRecord,
        size_policy: &SizePolicy,
        twinkle_probability: f64,
        rng: &mut R,
    ) -> Result<StarEntity> {
        let placement = place_star(
            record.ra,
            record.de,
            record.magnitude,
            record.size,
            size_policy,
        )
        .map_err(|err| SkyError::malformed(record.name.as_str(), err.to_string()))?;

        Ok(StarEntity {
            id,
            color: color_index_to_rgb(record.color_index),
            twinkle: rng.random_bool(twinkle_probability),
            twinkle_time: 0.0,
            position: placement.position,
            visual_radius: placement.visual_radius,
            record,
        })
    }

    /// True once a catalog has been ingested, even if it held no stars.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, id: StarId) -> Option<&StarEntity> {
        self.entities.get(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&StarEntity> {
        self.by_name.get(name).and_then(|&id| self.get(id))
    }

    /// Everything hit-testing may return.
    pub fn pickables(&self) -> &[StarEntity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StarEntity> {
        self.entities.iter()
    }

    pub fn advance_twinkle(&mut self, dt: f32) {
        for star in self.entities.iter_mut() {
            star.twinkle_time += dt;
        }
    }

    pub fn instances(&self) -> Vec<StarInstance> {
        self.entities.iter().map(StarEntity::instance).collect()
    }
}
