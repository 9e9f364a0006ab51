//! The per-frame driver tying catalog, frame, annotations and interaction
//! together.
//!
//! Input is queued as [`InputEvent`]s and drained in order at the start of
//! each [`SkyScene::tick`]; everything runs on the caller's thread.


use std::collections::VecDeque;

use glam::{DQuat, DVec2};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::annotation::{AnnotationId, Annotations, LabelId, LinkId};
use crate::catalog::{LoadReport, RawCatalog, StarCatalog, StarId, StarInfo};
use crate::config::SkyConfig;
use crate::frame::SkyFrame;
use crate::interaction::{ClickOutcome, InteractionMode, LabelPrompt, PointerInteraction};
use crate::picking::{Camera, HitTarget, HitTester, SceneView, Viewport};

/// Pointer positions are in pixels, relative to the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    PointerMoved(DVec2),
    PrimaryAction(DVec2),
    DragStart(DVec2),
    Drag(DVec2),
    DragEnd(DVec2),
    ToggleMode,
    SetLatitude(f64),
    SetSpinRate(f64),
    SubmitLabel(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneOutcome {
    ModeChanged(InteractionMode),
    LabelPrompt(LabelPrompt),
    LabelCreated(LabelId),
    StarPicked(StarId),
    LinkCreated(LinkId),
    AnnotationRemoved(AnnotationId),
    Selection(Vec<StarId>),
    LatitudeChanged(f64),
    SpinRateChanged(f64),
}

/// What the renderer needs after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    /// Shared by stars, links and labels.
    pub orientation: DQuat,
    pub redraw: bool,
    pub outcomes: Vec<SceneOutcome>,
    /// Annotations whose GPU resources can be freed.
    pub released: Vec<AnnotationId>,
}

#[derive(Debug)]
pub struct SkyScene {
    config: SkyConfig,
    viewport: Viewport,
    catalog: StarCatalog,
    frame: SkyFrame,
    annotations: Annotations,
    interaction: PointerInteraction,
    events: VecDeque<InputEvent>,
    pointer: Option<DVec2>,
    hovered: Option<StarInfo>,
    ticks: u64,
}

impl SkyScene {
    pub fn new(config: SkyConfig, viewport: Viewport) -> Self {
        let frame = SkyFrame::new(config.latitude_deg, config.spin_rate);
        Self {
            config,
            viewport,
            catalog: StarCatalog::default(),
            frame,
            annotations: Annotations::default(),
            interaction: PointerInteraction::default(),
            events: VecDeque::new(),
            pointer: None,
            hovered: None,
            ticks: 0,
        }
    }

    pub fn load_catalog<R: Rng>(&mut self, raw: &RawCatalog, rng: &mut R) -> LoadReport {
        self.hovered = None;
        self.interaction.clear_selection();
        self.catalog.load(raw, &self.config.catalog, rng)
    }

    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn scene_view(&self) -> SceneView<'_> {
        SceneView {
            stars: self.catalog.pickables(),
            annotations: &self.annotations,
            frame: &self.frame,
            label_pick_radius: self.config.label_pick_radius,
        }
    }

    pub fn tick(&mut self, dt: f32, hit_tester: &dyn HitTester, camera: &dyn Camera) -> FrameOutput {
        let mut outcomes = Vec::new();
        while let Some(event) = self.events.pop_front() {
            self.handle_event(event, hit_tester, camera, &mut outcomes);
        }

        self.frame.tick();
        self.catalog.advance_twinkle(dt);
        self.update_hover(hit_tester);
        self.ticks += 1;

        FrameOutput {
            orientation: self.frame.orientation(),
            redraw: true,
            outcomes,
            released: self.annotations.take_released(),
        }
    }

    fn handle_event(
        &mut self,
        event: InputEvent,
        hit_tester: &dyn HitTester,
        camera: &dyn Camera,
        outcomes: &mut Vec<SceneOutcome>,
    ) {
        tracing::trace!("Tick {}: {:?}", self.ticks, event);

        match event {
            InputEvent::PointerMoved(pointer) => self.pointer = Some(pointer),
            InputEvent::PrimaryAction(pointer) => {
                self.pointer = Some(pointer);
                let ndc = self.viewport.to_ndc(pointer);
                let hits = hit_tester.hit_test(ndc, &self.scene_view());

                match self.interaction.primary_action(
                    &hits,
                    &self.catalog,
                    &mut self.annotations,
                    self.config.link_radius,
                ) {
                    ClickOutcome::StarPicked { star, link } => {
                        outcomes.push(SceneOutcome::StarPicked(star));
                        if let Some(link) = link {
                            outcomes.push(SceneOutcome::LinkCreated(link));
                        }
                    }
                    ClickOutcome::AnnotationRemoved(id) => {
                        outcomes.push(SceneOutcome::AnnotationRemoved(id))
                    }
                    ClickOutcome::Ignored | ClickOutcome::Missed | ClickOutcome::AnnotationHit(_) => {}
                }
            }
            InputEvent::DragStart(pointer) => {
                self.pointer = Some(pointer);
                self.interaction.start_marquee(pointer);
            }
            InputEvent::Drag(pointer) => {
                self.pointer = Some(pointer);
                self.interaction.drag_marquee(pointer);
            }
            InputEvent::DragEnd(pointer) => {
                self.pointer = Some(pointer);
                let selection = self.interaction.finish_marquee(
                    pointer,
                    &self.viewport,
                    camera,
                    &self.catalog,
                    &self.frame,
                );
                outcomes.push(SceneOutcome::Selection(selection.to_vec()));
            }
            InputEvent::ToggleMode => {
                let prompt = self.interaction.toggle_mode(&mut self.frame);
                outcomes.push(SceneOutcome::ModeChanged(self.interaction.mode()));
                if let Some(prompt) = prompt {
                    outcomes.push(SceneOutcome::LabelPrompt(prompt));
                }
            }
            InputEvent::SetLatitude(latitude) => {
                let applied = self.frame.set_latitude(latitude);
                outcomes.push(SceneOutcome::LatitudeChanged(applied));
            }
            InputEvent::SetSpinRate(rate) => {
                if self.frame.set_spin_rate(rate) {
                    outcomes.push(SceneOutcome::SpinRateChanged(rate));
                }
            }
            InputEvent::SubmitLabel(name) => {
                if let Some(id) = self.interaction.submit_label(&name, &mut self.annotations) {
                    outcomes.push(SceneOutcome::LabelCreated(id));
                }
            }
        }
    }

    /// Hover works in both modes; only stars produce info.
    fn update_hover(&mut self, hit_tester: &dyn HitTester) {
        let Some(pointer) = self.pointer else {
            self.hovered = None;
            return;
        };

        let ndc = self.viewport.to_ndc(pointer);
        let hits = hit_tester.hit_test(ndc, &self.scene_view());
        self.hovered = hits
            .iter()
            .find_map(|hit| match hit.target {
                HitTarget::Star(id) => self.catalog.get(id),
                _ => None,
            })
            .map(|star| star.info());
    }

    pub fn hovered(&self) -> Option<&StarInfo> {
        self.hovered.as_ref()
    }

    pub fn star_info(&self, id: StarId) -> Option<StarInfo> {
        self.catalog.get(id).map(|star| star.info())
    }

    /// Result of the last marquee drag.
    pub fn selection(&self) -> &[StarId] {
        self.interaction.selection()
    }

    pub fn interaction(&self) -> &PointerInteraction {
        &self.interaction
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn frame(&self) -> &SkyFrame {
        &self.frame
    }

    pub fn catalog(&self) -> &StarCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SkyConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}
