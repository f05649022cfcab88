//! Small vector and quaternion helpers on plain `[f64; 3]` arrays.

use crate::error::{Result, WorldError};

pub type Vec3 = [f64; 3];

pub const UNIT_AXES: [Vec3; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn length_sq(a: Vec3) -> f64 {
    dot(a, a)
}

#[inline]
pub fn distance_sq(a: Vec3, b: Vec3) -> f64 {
    length_sq(sub(a, b))
}

pub fn is_finite(a: Vec3) -> bool {
    a.iter().all(|v| v.is_finite())
}

/// A rotation quaternion stored as `(x, y, z, w)`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around `axis`. The axis does not need to be normalized.
    pub fn from_axis_angle(axis: Vec3, angle: f64) -> Self {
        let len = length_sq(axis).sqrt();
        if len == 0.0 {
            return Self::IDENTITY;
        }
        let (s, c) = (0.5 * angle).sin_cos();
        let k = s / len;
        Self::new(axis[0] * k, axis[1] * k, axis[2] * k, c)
    }

    /// Euler angles given in turns (1.0 = 360 degrees), applied as X, then Y, then Z.
    pub fn from_euler_turns(turns: Vec3) -> Self {
        let tau = std::f64::consts::TAU;
        let qx = Self::from_axis_angle(UNIT_AXES[0], turns[0] * tau);
        let qy = Self::from_axis_angle(UNIT_AXES[1], turns[1] * tau);
        let qz = Self::from_axis_angle(UNIT_AXES[2], turns[2] * tau);
        qz.mul(&qy).mul(&qx)
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Unit-length copy of this quaternion. Zero or non-finite input is rejected.
    pub fn normalized(&self) -> Result<Self> {
        let q = self.as_array();
        let len_sq: f64 = q.iter().map(|v| v * v).sum();
        if !len_sq.is_finite() || len_sq <= f64::EPSILON {
            return Err(WorldError::InvalidOrientation(q));
        }
        let inv = 1.0 / len_sq.sqrt();
        Ok(Self::new(self.x * inv, self.y * inv, self.z * inv, self.w * inv))
    }

    /// Hamilton product `self * other`, rotating by `other` first.
    pub fn mul(&self, o: &Self) -> Self {
        Self::new(
            self.w * o.x + self.x * o.w + self.y * o.z - self.z * o.y,
            self.w * o.y - self.x * o.z + self.y * o.w + self.z * o.x,
            self.w * o.z + self.x * o.y - self.y * o.x + self.z * o.w,
            self.w * o.w - self.x * o.x - self.y * o.y - self.z * o.z,
        )
    }

    /// Rotates `v`, assuming `self` is normalized.
    pub fn rotate(&self, v: Vec3) -> Vec3 {
        // v' = v + 2w (q x v) + 2 q x (q x v)
        let q = [self.x, self.y, self.z];
        let t = scale(cross(q, v), 2.0);
        add(add(v, scale(t, self.w)), cross(q, t))
    }
}

/// One of the six faces of a box in its local frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Face {
    PositiveX = 0,
    PositiveY = 1,
    PositiveZ = 2,
    NegativeX = 3,
    NegativeY = 4,
    NegativeZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PositiveX,
        Face::PositiveY,
        Face::PositiveZ,
        Face::NegativeX,
        Face::NegativeY,
        Face::NegativeZ,
    ];

    pub fn from_index(index: u8) -> Result<Self> {
        Self::ALL
            .get(index as usize)
            .copied()
            .ok_or(WorldError::InvalidFaceIndex(index))
    }

    pub fn from_axis(axis: usize, positive: bool) -> Self {
        Self::ALL[axis % 3 + if positive { 0 } else { 3 }]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// The local axis this face is normal to.
    pub fn axis(self) -> usize {
        self.index() % 3
    }

    pub fn sign(self) -> f64 {
        if self.index() < 3 { 1.0 } else { -1.0 }
    }

    /// The two in-plane axes `(u, v)`, cycling forward from the normal axis.
    pub fn tangent_axes(self) -> (usize, usize) {
        let n = self.axis();
        ((n + 1) % 3, (n + 2) % 3)
    }

    pub fn label(self) -> &'static str {
        ["+X", "+Y", "+Z", "-X", "-Y", "-Z"][self.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let q = Quaternion::from_axis_angle([0.0, 0.0, 1.0], std::f64::consts::FRAC_PI_2);
        assert_close(q.rotate([1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
        assert_close(q.rotate([0.0, 0.0, 2.0]), [0.0, 0.0, 2.0]);
    }

    #[test]
    fn test_euler_turns_match_axis_angle() {
        let a = Quaternion::from_euler_turns([0.0, 0.25, 0.0]);
        let b = Quaternion::from_axis_angle([0.0, 1.0, 0.0], std::f64::consts::FRAC_PI_2);
        assert_close(a.rotate([1.0, 2.0, 3.0]), b.rotate([1.0, 2.0, 3.0]));
        assert_close(a.rotate([1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
    }

    #[test]
    fn test_normalize_rejects_zero() {
        assert!(Quaternion::new(0.0, 0.0, 0.0, 0.0).normalized().is_err());
        assert!(Quaternion::new(f64::NAN, 0.0, 0.0, 1.0).normalized().is_err());
        let q = Quaternion::new(0.0, 0.0, 0.0, 2.0).normalized().unwrap();
        assert_eq!(q, Quaternion::IDENTITY);
    }

    #[test]
    fn test_face_layout() {
        assert_eq!(Face::from_index(4).unwrap(), Face::NegativeY);
        assert!(Face::from_index(6).is_err());
        assert_eq!(Face::NegativeZ.axis(), 2);
        assert_eq!(Face::NegativeZ.sign(), -1.0);
        assert_eq!(Face::PositiveZ.tangent_axes(), (0, 1));
        assert_eq!(Face::from_axis(1, false), Face::NegativeY);
    }
}
