use glam::DVec2;

use crate::catalog::{StarEntity, StarId};
use crate::frame::SkyFrame;
use crate::picking::{Camera, Viewport};

/// Axis-aligned rectangle, in whatever space its corners are given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn from_corners(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn has_area(&self) -> bool {
        let size = self.size();
        size.x > 0.0 && size.y > 0.0
    }

    /// Inclusive on every edge.
    pub fn contains(&self, point: DVec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Drag-to-select box in screen space.
#[derive(Debug, Default, Clone)]
pub struct Marquee {
    start: Option<DVec2>,
    current: DVec2,
}

impl Marquee {
    pub fn start(&mut self, pointer: DVec2) {
        self.start = Some(pointer);
        self.current = pointer;
    }

    pub fn drag(&mut self, pointer: DVec2) {
        if self.start.is_some() {
            self.current = pointer;
        }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// The box to draw, in pixels.
    pub fn pixel_rect(&self) -> Option<Rect> {
        self.start.map(|start| Rect::from_corners(start, self.current))
    }

    /// Finishes the drag and returns every star whose projected position
    /// falls inside the box. A drag that never started selects nothing.
    pub fn finish(
        &mut self,
        pointer: DVec2,
        viewport: &Viewport,
        camera: &dyn Camera,
        stars: &[StarEntity],
        frame: &SkyFrame,
    ) -> Vec<StarId> {
        let Some(start) = self.start.take() else {
            return Vec::new();
        };
        self.current = pointer;

        let ndc_rect = Rect::from_corners(viewport.to_ndc(start), viewport.to_ndc(pointer));
        select_in_rect(&ndc_rect, camera, stars, frame)
    }

    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Stars are treated as points: only their projected centre is tested.
pub fn select_in_rect(
    ndc_rect: &Rect,
    camera: &dyn Camera,
    stars: &[StarEntity],
    frame: &SkyFrame,
) -> Vec<StarId> {
    if !ndc_rect.has_area() {
        return Vec::new();
    }

    stars
        .iter()
        .filter(|star| {
            camera
                .project(frame.to_world(star.position))
                .is_some_and(|ndc| ndc_rect.contains(ndc.truncate()))
        })
        .map(|star| star.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_normalizes_corners() {
        let rect = Rect::from_corners(DVec2::new(5.0, -1.0), DVec2::new(-3.0, 2.0));
        assert_eq!(rect.min, DVec2::new(-3.0, -1.0));
        assert_eq!(rect.max, DVec2::new(5.0, 2.0));
        assert!(rect.has_area());
    }

    #[test]
    fn containment_is_inclusive() {
        let rect = Rect::from_corners(DVec2::ZERO, DVec2::ONE);
        assert!(rect.contains(DVec2::ZERO));
        assert!(rect.contains(DVec2::ONE));
        assert!(rect.contains(DVec2::new(0.5, 1.0)));
        assert!(!rect.contains(DVec2::new(1.0001, 0.5)));
    }

    #[test]
    fn zero_area_rect_has_no_area() {
        assert!(!Rect::from_corners(DVec2::ONE, DVec2::ONE).has_area());
        assert!(!Rect::from_corners(DVec2::ZERO, DVec2::new(4.0, 0.0)).has_area());
    }

    #[test]
    fn drag_updates_the_pixel_box() {
        let mut marquee = Marquee::default();
        assert!(marquee.pixel_rect().is_none());
        marquee.drag(DVec2::new(10.0, 10.0));
        assert!(!marquee.is_active());

        marquee.start(DVec2::new(100.0, 50.0));
        marquee.drag(DVec2::new(40.0, 80.0));
        let rect = marquee.pixel_rect().expect("active");
        assert_eq!(rect.min, DVec2::new(40.0, 50.0));
        assert_eq!(rect.size(), DVec2::new(60.0, 30.0));
    }
}
