use glam::{DVec2, DVec3};

pub trait FloatExt {
    fn approximately_eq(self, other: Self) -> bool;
    fn approximately_eq_eps(self, other: Self, eps: f64) -> bool;
}

impl FloatExt for f32 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_eps(other, crate::EPSILON)
    }

    fn approximately_eq_eps(self, other: Self, eps: f64) -> bool {
        ((self - other).abs() as f64) < eps
    }
}

impl FloatExt for f64 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_eps(other, crate::EPSILON)
    }

    fn approximately_eq_eps(self, other: Self, eps: f64) -> bool {
        (self - other).abs() < eps
    }
}

impl FloatExt for DVec2 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_eps(other, crate::EPSILON)
    }

    fn approximately_eq_eps(self, other: Self, eps: f64) -> bool {
        (self - other).abs().cmplt(DVec2::splat(eps)).all()
    }
}

impl FloatExt for DVec3 {
    fn approximately_eq(self, other: Self) -> bool {
        self.approximately_eq_eps(other, crate::EPSILON)
    }

    fn approximately_eq_eps(self, other: Self, eps: f64) -> bool {
        (self - other).abs().cmplt(DVec3::splat(eps)).all()
    }
}
