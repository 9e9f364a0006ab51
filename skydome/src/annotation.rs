//! User-drawn constellation links and labels.
//!
//! Both live in the sky's local frame, next to the stars, so they co-rotate
//! with them. Removal is explicit: a removed annotation has its render
//! resources released and its id queued for the renderer to free.

use common::id_type;
use glam::DVec3;

id_type!(LinkId);
id_type!(LabelId);

pub const DEFAULT_LINK_RADIUS: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationId {
    Link(LinkId),
    Label(LabelId),
}

/// Geometry and material the renderer allocated for one annotation.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RenderResources {
    geometry_released: bool,
    material_released: bool,
}

impl RenderResources {
    fn release(&mut self) {
        self.geometry_released = true;
        self.material_released = true;
    }

    pub fn is_released(&self) -> bool {
        self.geometry_released && self.material_released
    }
}

#[derive(Debug)]
pub struct ConstellationLink {
    pub id: LinkId,
    pub start: DVec3,
    pub end: DVec3,
    /// Tube radius.
    pub radius: f64,
    pub resources: RenderResources,
}

impl ConstellationLink {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

#[derive(Debug)]
pub struct ConstellationLabel {
    pub id: LabelId,
    pub name: String,
    pub anchor: DVec3,
    pub resources: RenderResources,
}

#[derive(Debug, Default)]
pub struct Annotations {
    links: Vec<ConstellationLink>,
    labels: Vec<ConstellationLabel>,
    released: Vec<AnnotationId>,
}

impl Annotations {
    pub fn add_link(&mut self, start: DVec3, end: DVec3, radius: f64) -> LinkId {
        let id = LinkId::unique();
        self.links.push(ConstellationLink {
            id,
            start,
            end,
            radius,
            resources: RenderResources::default(),
        });
        tracing::debug!("Link {} added, {} links total", id, self.links.len());
        id
    }

    pub fn add_label(&mut self, name: impl Into<String>, anchor: DVec3) -> LabelId {
        let id = LabelId::unique();
        let name = name.into();
        tracing::info!("Label {:?} added", name);
        self.labels.push(ConstellationLabel {
            id,
            name,
            anchor,
            resources: RenderResources::default(),
        });
        id
    }

    pub fn remove_link(&mut self, id: LinkId) -> Option<ConstellationLink> {
        let idx = self.links.iter().position(|link| link.id == id)?;
        let mut link = self.links.remove(idx);
        link.resources.release();
        self.released.push(AnnotationId::Link(id));
        tracing::debug!("Link {} removed, {} links left", id, self.links.len());
        Some(link)
    }

    pub fn remove_label(&mut self, id: LabelId) -> Option<ConstellationLabel> {
        let idx = self.labels.iter().position(|label| label.id == id)?;
        let mut label = self.labels.remove(idx);
        label.resources.release();
        self.released.push(AnnotationId::Label(id));
        tracing::info!("Label {:?} removed", label.name);
        Some(label)
    }

    /// Removes either kind of annotation. Returns false if it was not present.
    pub fn remove(&mut self, id: AnnotationId) -> bool {
        match id {
            AnnotationId::Link(id) => self.remove_link(id).is_some(),
            AnnotationId::Label(id) => self.remove_label(id).is_some(),
        }
    }

    pub fn links(&self) -> &[ConstellationLink] {
        &self.links
    }

    pub fn labels(&self) -> &[ConstellationLabel] {
        &self.labels
    }

    pub fn link(&self, id: LinkId) -> Option<&ConstellationLink> {
        self.links.iter().find(|link| link.id == id)
    }

    pub fn label(&self, id: LabelId) -> Option<&ConstellationLabel> {
        self.labels.iter().find(|label| label.id == id)
    }

    /// Ids removed since the last call, for the renderer to free.
    pub fn take_released(&mut self) -> Vec<AnnotationId> {
        std::mem::take(&mut self.released)
    }
}
