//! Camera projection and hit-testing seams.
//!
//! The renderer normally answers hit tests from its own scene graph; the
//! [`Raycaster`] here does the same job on the CPU against the core's data
//! so the interaction layer can run headless.

use glam::{DMat4, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotations, LabelId, LinkId};
use crate::catalog::{StarEntity, StarId};
use crate::frame::SkyFrame;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::sized(1920.0, 1080.0)
    }
}

impl Viewport {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Pixel position to normalized device coordinates, y up.
    pub fn to_ndc(&self, pixel: DVec2) -> DVec2 {
        DVec2::new(
            (pixel.x - self.left) / self.width * 2.0 - 1.0,
            -((pixel.y - self.top) / self.height) * 2.0 + 1.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Unit length.
    pub direction: DVec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the nearest sphere intersection in front
    /// of the origin.
    pub fn intersect_sphere(&self, center: DVec3, radius: f64) -> Option<f64> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        [-b - sqrt_d, -b + sqrt_d].into_iter().find(|&t| t >= 0.0)
    }

    /// Closest approach between the ray and segment `a..b`, as
    /// `(distance between them, distance along the ray)`.
    pub fn closest_to_segment(&self, a: DVec3, b: DVec3) -> (f64, f64) {
        let seg = b - a;
        let seg_len_sq = seg.length_squared();

        let t = if seg_len_sq <= f64::EPSILON {
            0.0
        } else {
            let w0 = self.origin - a;
            let b_ = self.direction.dot(seg);
            let d_ = self.direction.dot(w0);
            let e_ = seg.dot(w0);
            let denom = seg_len_sq - b_ * b_;
            let t = if denom.abs() <= f64::EPSILON * seg_len_sq {
                e_ / seg_len_sq
            } else {
                let s = (b_ * e_ - seg_len_sq * d_) / denom;
                if s < 0.0 {
                    e_ / seg_len_sq
                } else {
                    (e_ - b_ * d_) / denom
                }
            };
            t.clamp(0.0, 1.0)
        };

        let on_segment = a + seg * t;
        let s = (on_segment - self.origin).dot(self.direction).max(0.0);
        (self.at(s).distance(on_segment), s)
    }
}

pub trait Camera {
    /// World point to NDC. `None` when the point is behind the camera.
    fn project(&self, world: DVec3) -> Option<DVec3>;
    /// Pick ray through a point given in NDC.
    fn ray(&self, ndc: DVec2) -> Ray;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_deg: 60.0,
            near: 0.1,
            far: 150000.0,
        }
    }
}

/// A camera sitting just off the sphere centre; orbit controls only change
/// where it looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub position: DVec3,
    pub direction: DVec3,
    pub up: DVec3,
    pub fov_y_deg: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(&CameraConfig::default(), &Viewport::default())
    }
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, viewport: &Viewport) -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, -0.01),
            direction: DVec3::Z,
            up: DVec3::Y,
            fov_y_deg: config.fov_y_deg,
            aspect: viewport.aspect(),
            near: config.near,
            far: config.far,
        }
    }

    pub fn look_at(&mut self, target: DVec3) {
        let direction = (target - self.position).normalize_or_zero();
        if direction != DVec3::ZERO {
            self.direction = direction;
        }
    }

    pub fn view(&self) -> DMat4 {
        DMat4::look_to_rh(self.position, self.direction, self.up)
    }

    pub fn projection(&self) -> DMat4 {
        DMat4::perspective_rh_gl(self.fov_y_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> DMat4 {
        self.projection() * self.view()
    }
}

impl Camera for PerspectiveCamera {
    fn project(&self, world: DVec3) -> Option<DVec3> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    fn ray(&self, ndc: DVec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let near = inverse.project_point3(DVec3::new(ndc.x, ndc.y, -1.0));
        let far = inverse.project_point3(DVec3::new(ndc.x, ndc.y, 1.0));
        Ray {
            origin: self.position,
            direction: (far - near).normalize(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    Star(StarId),
    Link(LinkId),
    Label(LabelId),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: HitTarget,
    /// World-space intersection point.
    pub point: DVec3,
    /// Distance from the ray origin.
    pub distance: f64,
}

/// Read-only view of everything hit-testing may report.
#[derive(Clone, Copy)]
pub struct SceneView<'a> {
    pub stars: &'a [StarEntity],
    pub annotations: &'a Annotations,
    pub frame: &'a SkyFrame,
    pub label_pick_radius: f64,
}

pub trait HitTester {
    /// All hits under `ndc`, nearest first.
    fn hit_test(&self, ndc: DVec2, scene: &SceneView<'_>) -> Vec<Hit>;
}

pub struct Raycaster<'a> {
    camera: &'a dyn Camera,
}

impl<'a> Raycaster<'a> {
    pub fn new(camera: &'a dyn Camera) -> Self {
        Self { camera }
    }
}

impl HitTester for Raycaster<'_> {
    fn hit_test(&self, ndc: DVec2, scene: &SceneView<'_>) -> Vec<Hit> {
        let ray = self.camera.ray(ndc);
        let frame = scene.frame;
        let mut hits = Vec::new();

        for star in scene.stars {
            let center = frame.to_world(star.position);
            if let Some(distance) = ray.intersect_sphere(center, star.visual_radius) {
                hits.push(Hit {
                    target: HitTarget::Star(star.id),
                    point: ray.at(distance),
                    distance,
                });
            }
        }

        for link in scene.annotations.links() {
            let (gap, distance) =
                ray.closest_to_segment(frame.to_world(link.start), frame.to_world(link.end));
            if gap <= link.radius {
                hits.push(Hit {
                    target: HitTarget::Link(link.id),
                    point: ray.at(distance),
                    distance,
                });
            }
        }

        for label in scene.annotations.labels() {
            let center = frame.to_world(label.anchor);
            if let Some(distance) = ray.intersect_sphere(center, scene.label_pick_radius) {
                hits.push(Hit {
                    target: HitTarget::Label(label.id),
                    point: ray.at(distance),
                    distance,
                });
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

#[cfg(test)]
mod tests {
    use common::float_ext::FloatExt;

    use super::*;

    #[test]
    fn viewport_to_ndc() {
        let viewport = Viewport {
            left: 10.0,
            top: 20.0,
            width: 200.0,
            height: 100.0,
        };
        assert!(viewport.to_ndc(DVec2::new(10.0, 20.0)).approximately_eq(DVec2::new(-1.0, 1.0)));
        assert!(viewport.to_ndc(DVec2::new(210.0, 120.0)).approximately_eq(DVec2::new(1.0, -1.0)));
        assert!(viewport.to_ndc(DVec2::new(110.0, 70.0)).approximately_eq(DVec2::ZERO));
    }

    #[test]
    fn camera_projects_forward_points_to_centre() {
        let camera = PerspectiveCamera::default();
        let ndc = camera.project(DVec3::new(0.0, 0.0, 9000.0)).expect("in front");
        assert!(ndc.truncate().approximately_eq(DVec2::ZERO));
        assert!(camera.project(DVec3::new(0.0, 0.0, -9000.0)).is_none());
    }

    #[test]
    fn ray_and_projection_agree() {
        let camera = PerspectiveCamera::default();
        let target = DVec3::new(1200.0, -800.0, 8800.0);
        let ndc = camera.project(target).expect("in front").truncate();
        let ray = camera.ray(ndc);
        let expected = (target - camera.position).normalize();
        assert!(ray.direction.approximately_eq_eps(expected, 1e-6));
    }

    #[test]
    fn sphere_intersection() {
        let ray = Ray {
            origin: DVec3::ZERO,
            direction: DVec3::Z,
        };
        let t = ray.intersect_sphere(DVec3::new(0.0, 0.0, 100.0), 10.0);
        assert_eq!(t, Some(90.0));
        assert!(ray.intersect_sphere(DVec3::new(50.0, 0.0, 100.0), 10.0).is_none());
        assert!(ray.intersect_sphere(DVec3::new(0.0, 0.0, -100.0), 10.0).is_none());
    }

    #[test]
    fn segment_closest_approach() {
        let ray = Ray {
            origin: DVec3::ZERO,
            direction: DVec3::Z,
        };
        // segment crossing the ray 5 units to the side at depth 100
        let (gap, along) =
            ray.closest_to_segment(DVec3::new(-50.0, 5.0, 100.0), DVec3::new(50.0, 5.0, 100.0));
        assert!(gap.approximately_eq(5.0));
        assert!(along.approximately_eq(100.0));

        // segment ending before it reaches the ray
        let (gap, _) =
            ray.closest_to_segment(DVec3::new(10.0, 0.0, 50.0), DVec3::new(30.0, 0.0, 50.0));
        assert!(gap.approximately_eq(10.0));

        // parallel segment
        let (gap, _) =
            ray.closest_to_segment(DVec3::new(3.0, 0.0, 10.0), DVec3::new(3.0, 0.0, 20.0));
        assert!(gap.approximately_eq(3.0));
    }
}
