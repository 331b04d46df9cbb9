//! Vector helpers on top of `nalgebra::Vector3<f64>`
//!
//! nalgebra already covers add/sub/scale/negate, `norm`, `norm_squared`,
//! `dot` and `cross`. This adds the axis rotations, distance, and the one
//! normalization policy used everywhere in the engine: a (near-)zero vector
//! normalizes to the zero vector instead of producing NaNs.

use crate::simulation::states::NVec3;

/// Below this length a vector has no usable direction
pub const DEGENERATE_NORM: f64 = 1e-300;

pub trait VectorExt {
    /// `v / |v|`, or zero when `|v|` is below [`DEGENERATE_NORM`]
    fn normalize_or_zero(&self) -> NVec3;
    /// Right-handed rotation about +X by `angle` radians
    fn rotate_x(&self, angle: f64) -> NVec3;
    /// Right-handed rotation about +Y by `angle` radians
    fn rotate_y(&self, angle: f64) -> NVec3;
    /// Right-handed rotation about +Z by `angle` radians
    fn rotate_z(&self, angle: f64) -> NVec3;
    fn distance_to(&self, other: &NVec3) -> f64;
    fn all_finite(&self) -> bool;
}

impl VectorExt for NVec3 {
    fn normalize_or_zero(&self) -> NVec3 {
        let n = self.norm();
        if n < DEGENERATE_NORM {
            NVec3::zeros()
        } else {
            self / n
        }
    }

    fn rotate_x(&self, angle: f64) -> NVec3 {
        let (sin, cos) = angle.sin_cos();
        NVec3::new(self.x, self.y * cos - self.z * sin, self.y * sin + self.z * cos)
    }

    fn rotate_y(&self, angle: f64) -> NVec3 {
        let (sin, cos) = angle.sin_cos();
        NVec3::new(self.x * cos + self.z * sin, self.y, -self.x * sin + self.z * cos)
    }

    fn rotate_z(&self, angle: f64) -> NVec3 {
        let (sin, cos) = angle.sin_cos();
        NVec3::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos, self.z)
    }

    fn distance_to(&self, other: &NVec3) -> f64 {
        (self - other).norm()
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|c| c.is_finite())
    }
}
