//! Pointer interaction state machine.
//!
//! In [`InteractionMode::Orbit`] the pointer belongs to the camera controls
//! and clicks are ignored here. In [`InteractionMode::Annotate`] clicks pick
//! stars to chain into constellation links, or hit existing annotations to
//! delete them. Marquee selection works in either mode.

mod marquee;
mod session;

use glam::{DVec2, DVec3};
use strum_macros::Display;

use crate::annotation::{AnnotationId, Annotations, LabelId, LinkId};
use crate::catalog::{StarCatalog, StarId};
use crate::frame::SkyFrame;
use crate::picking::{Camera, Hit, HitTarget, Viewport};

pub use marquee::{select_in_rect, Marquee, Rect};
pub use session::{InteractionSession, RecentHits, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
pub enum InteractionMode {
    /// Pointer drives the camera only.
    #[default]
    Orbit,
    /// Pointer picks stars and annotations.
    Annotate,
}

/// A finished drawing session waiting for the user to name it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPrompt {
    /// Sky-local centroid of every click in the session.
    pub centroid: DVec3,
    pub star_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickOutcome {
    /// Not annotating; the click belongs to the camera.
    Ignored,
    Missed,
    StarPicked {
        star: StarId,
        link: Option<LinkId>,
    },
    AnnotationHit(AnnotationId),
    AnnotationRemoved(AnnotationId),
}

#[derive(Debug, Default)]
pub struct PointerInteraction {
    mode: InteractionMode,
    session: Option<InteractionSession>,
    pending_label: Option<LabelPrompt>,
    marquee: Marquee,
    selection: Vec<StarId>,
}

impl PointerInteraction {
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn is_annotating(&self) -> bool {
        self.mode == InteractionMode::Annotate
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn pending_label(&self) -> Option<&LabelPrompt> {
        self.pending_label.as_ref()
    }

    pub fn marquee(&self) -> &Marquee {
        &self.marquee
    }

    /// Stars picked by the last completed marquee drag.
    pub fn selection(&self) -> &[StarId] {
        &self.selection
    }

    /// Flips between orbiting and annotating. Leaving annotation mode may
    /// produce a label prompt.
    pub fn toggle_mode(&mut self, frame: &mut SkyFrame) -> Option<LabelPrompt> {
        match self.mode {
            InteractionMode::Orbit => {
                self.enter_annotate(frame);
                None
            }
            InteractionMode::Annotate => self.leave_annotate(frame),
        }
    }

    pub fn enter_annotate(&mut self, frame: &mut SkyFrame) {
        if self.is_annotating() {
            return;
        }
        frame.pause_and_reset();
        // an unanswered prompt from the previous session is dropped
        self.pending_label = None;
        self.session = Some(InteractionSession::default());
        self.transition_to(InteractionMode::Annotate);
    }

    /// Aborts the session. The chain is discarded; only a session with at
    /// least two distinct stars turns into a label prompt.
    pub fn leave_annotate(&mut self, frame: &mut SkyFrame) -> Option<LabelPrompt> {
        if !self.is_annotating() {
            return None;
        }
        frame.resume();
        self.transition_to(InteractionMode::Orbit);

        let session = self.session.take()?;
        let star_count = session.distinct_star_count();
        if star_count < 2 {
            tracing::debug!("Discarding session with {} distinct stars", star_count);
            return None;
        }

        let prompt = LabelPrompt {
            centroid: session.centroid()?,
            star_count,
        };
        self.pending_label = Some(prompt);
        Some(prompt)
    }

    /// Names the pending constellation. Blank names and calls without a
    /// pending prompt are ignored.
    pub fn submit_label(&mut self, name: &str, annotations: &mut Annotations) -> Option<LabelId> {
        let prompt = self.pending_label.take()?;
        let name = name.trim();
        if name.is_empty() {
            tracing::debug!("Empty constellation name, label discarded");
            return None;
        }
        Some(annotations.add_label(name, prompt.centroid))
    }

    /// Handles a primary click given the hits under the pointer, nearest
    /// first. Stars take priority over annotations.
    pub fn primary_action(
        &mut self,
        hits: &[Hit],
        catalog: &StarCatalog,
        annotations: &mut Annotations,
        link_radius: f64,
    ) -> ClickOutcome {
        if !self.is_annotating() {
            return ClickOutcome::Ignored;
        }
        let Some(session) = self.session.as_mut() else {
            return ClickOutcome::Ignored;
        };

        let star_hit = hits.iter().find_map(|hit| match hit.target {
            HitTarget::Star(id) => catalog.get(id),
            _ => None,
        });
        if let Some(star) = star_hit {
            let link = session
                .record_star_click(star.id, star.position)
                .map(|segment| annotations.add_link(segment.start, segment.end, link_radius));
            tracing::debug!("Picked {} ({:?})", star.id, star.record.name);
            return ClickOutcome::StarPicked {
                star: star.id,
                link,
            };
        }

        let annotation_hit = hits.iter().find_map(|hit| match hit.target {
            HitTarget::Link(id) => Some(AnnotationId::Link(id)),
            HitTarget::Label(id) => Some(AnnotationId::Label(id)),
            HitTarget::Star(_) => None,
        });
        let Some(id) = annotation_hit else {
            return ClickOutcome::Missed;
        };

        if let Some(id) = session.record_annotation_hit(id) {
            if annotations.remove(id) {
                return ClickOutcome::AnnotationRemoved(id);
            }
        }
        ClickOutcome::AnnotationHit(id)
    }

    pub fn start_marquee(&mut self, pointer: DVec2) {
        self.marquee.start(pointer);
    }

    pub fn drag_marquee(&mut self, pointer: DVec2) {
        self.marquee.drag(pointer);
    }

    pub fn finish_marquee(
        &mut self,
        pointer: DVec2,
        viewport: &Viewport,
        camera: &dyn Camera,
        catalog: &StarCatalog,
        frame: &SkyFrame,
    ) -> &[StarId] {
        self.selection = self
            .marquee
            .finish(pointer, viewport, camera, catalog.pickables(), frame);
        tracing::info!("Marquee selected {} stars", self.selection.len());
        &self.selection
    }

    /// Star ids do not survive a catalog reload.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.marquee.cancel();
    }

    fn transition_to(&mut self, mode: InteractionMode) {
        tracing::info!("Interaction transitioning to {}", mode);
        self.mode = mode;
    }
}
