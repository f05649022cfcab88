use bitflags::bitflags;

use crate::bounds::BoundingBox;
use crate::entity::DelimiterId;
use crate::error::{Result, WorldError};
use crate::geometry::{Face, Vec3, add, dot, scale, sub};

bitflags! {
    /// In-plane directions along which a delimiter plane is treated as unbounded.
    ///
    /// `U` and `V` are the two tangent axes of the face, cycling forward from its normal axis:
    /// an X face spans (Y, Z), a Y face spans (Z, X), a Z face spans (X, Y).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct VirtualExtension: u8 {
        const POSITIVE_U = 0b0001;
        const NEGATIVE_U = 0b0010;
        const POSITIVE_V = 0b0100;
        const NEGATIVE_V = 0b1000;
        const U = Self::POSITIVE_U.bits() | Self::NEGATIVE_U.bits();
        const V = Self::POSITIVE_V.bits() | Self::NEGATIVE_V.bits();
        const ALL = Self::U.bits() | Self::V.bits();
    }
}

impl VirtualExtension {
    /// Parses raw flags as they arrive from the JS/FFI side, rejecting unknown bits.
    pub fn from_raw(bits: u8) -> Result<Self> {
        Self::from_bits(bits).ok_or(WorldError::InvalidExtension(bits))
    }
}

/// One face of a delimiter that blocks flood fill.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DelimiterPlane {
    pub face: Face,
    /// The plane runs through the delimiter center instead of lying on the face.
    pub centered: bool,
    pub extension: VirtualExtension,
}

/// A delimiter plane resolved into world space: a rectangle `origin + s*u + t*v`
/// with `s` in `u_range` and `t` in `v_range`.
#[derive(Clone, Copy, Debug)]
pub struct PlaneRect {
    pub delimiter: DelimiterId,
    pub face: Face,
    pub origin: Vec3,
    pub normal: Vec3,
    pub u_axis: Vec3,
    pub v_axis: Vec3,
    pub u_range: [f64; 2],
    pub v_range: [f64; 2],
}

impl PlaneRect {
    pub fn point(&self, s: f64, t: f64) -> Vec3 {
        add(self.origin, add(scale(self.u_axis, s), scale(self.v_axis, t)))
    }

    /// Corners in winding order.
    pub fn corners(&self) -> [Vec3; 4] {
        let [u0, u1] = self.u_range;
        let [v0, v1] = self.v_range;
        [self.point(u0, v0), self.point(u1, v0), self.point(u1, v1), self.point(u0, v1)]
    }

    pub fn center(&self) -> Vec3 {
        self.point(
            0.5 * (self.u_range[0] + self.u_range[1]),
            0.5 * (self.v_range[0] + self.v_range[1]),
        )
    }

    pub fn bounds(&self) -> BoundingBox<3> {
        let mut b = BoundingBox::empty();
        for corner in self.corners() {
            b.expand(&corner);
        }
        b
    }

    /// Conservative overlap test against the closed axis-aligned box `center ± half`.
    ///
    /// Separating axes are tested for the world axes, the plane normal and both tangents. Boxes
    /// that touch the rectangle count as overlapping; `epsilon` widens every interval.
    pub fn overlaps_box(&self, center: Vec3, half: Vec3, epsilon: f64) -> bool {
        let rect = self.bounds();
        for i in 0..3 {
            if center[i] + half[i] + epsilon < rect.min[i] || center[i] - half[i] - epsilon > rect.max[i] {
                return false;
            }
        }

        let radius = |axis: Vec3| -> f64 {
            axis[0].abs() * half[0] + axis[1].abs() * half[1] + axis[2].abs() * half[2]
        };
        let d = sub(center, self.origin);

        if dot(d, self.normal).abs() > radius(self.normal) + epsilon {
            return false;
        }
        let s = dot(d, self.u_axis);
        let r = radius(self.u_axis) + epsilon;
        if s + r < self.u_range[0] || s - r > self.u_range[1] {
            return false;
        }
        let t = dot(d, self.v_axis);
        let r = radius(self.v_axis) + epsilon;
        if t + r < self.v_range[0] || t - r > self.v_range[1] {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x_wall() -> PlaneRect {
        PlaneRect {
            delimiter: DelimiterId::null(),
            face: Face::PositiveX,
            origin: [5.0, 0.0, 0.0],
            normal: [1.0, 0.0, 0.0],
            u_axis: [0.0, 1.0, 0.0],
            v_axis: [0.0, 0.0, 1.0],
            u_range: [-5.0, 5.0],
            v_range: [-5.0, 5.0],
        }
    }

    #[test]
    fn test_extension_bits() {
        assert_eq!(VirtualExtension::ALL.bits(), 15);
        assert_eq!(VirtualExtension::V.bits(), 12);
        assert_eq!(VirtualExtension::from_raw(3).unwrap(), VirtualExtension::U);
        assert_eq!(VirtualExtension::from_raw(16), Err(WorldError::InvalidExtension(16)));
    }

    #[test]
    fn test_touching_cells_overlap() {
        let rect = x_wall();
        assert!(rect.overlaps_box([4.5, 0.5, 0.5], [0.5; 3], 1e-5));
        assert!(rect.overlaps_box([5.5, 0.5, 0.5], [0.5; 3], 1e-5));
        assert!(!rect.overlaps_box([3.5, 0.5, 0.5], [0.5; 3], 1e-5));
        // Beyond the rectangle edge along U.
        assert!(!rect.overlaps_box([5.0, 6.5, 0.0], [0.5; 3], 1e-5));
    }

    #[test]
    fn test_rotated_rect_bounds() {
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let rect = PlaneRect {
            normal: [h, h, 0.0],
            u_axis: [-h, h, 0.0],
            origin: [0.0; 3],
            u_range: [-1.0, 1.0],
            v_range: [-1.0, 1.0],
            ..x_wall()
        };
        let b = rect.bounds();
        assert!((b.max[0] - h).abs() < 1e-12);
        assert!((b.min[1] + h).abs() < 1e-12);
        assert!(rect.overlaps_box([0.0, 0.0, 0.0], [0.1; 3], 0.0));
        assert!(!rect.overlaps_box([0.6, 0.6, 0.0], [0.1; 3], 0.0));
    }
}
