mod plane;

pub use plane::{DelimiterPlane, PlaneRect, VirtualExtension};

use crate::bounds::BoundingBox;
use crate::entity::DelimiterId;
use crate::geometry::{Face, Quaternion, UNIT_AXES, Vec3, add, dot, scale, sub};

/// An oriented box that seals space through up to six [`DelimiterPlane`]s.
#[derive(Clone, Debug, PartialEq)]
pub struct Delimiter {
    pub position: Vec3,
    pub half_extents: Vec3,
    /// Normalized orientation.
    pub rotation: Quaternion,
    /// Caller-defined grouping such as a floor number.
    pub level: i32,
    pub name: Option<String>,
    /// Local X, Y and Z axes in world space.
    pub axes: [Vec3; 3],
    pub planes: [Option<DelimiterPlane>; 6],
}

impl Delimiter {
    pub(crate) fn new(position: Vec3, half_extents: Vec3, rotation: Quaternion, level: i32) -> Self {
        Self {
            position,
            half_extents,
            rotation,
            level,
            name: None,
            axes: UNIT_AXES.map(|axis| rotation.rotate(axis)),
            planes: [None; 6],
        }
    }

    pub fn plane(&self, face: Face) -> Option<&DelimiterPlane> {
        self.planes[face.index()].as_ref()
    }

    pub fn plane_count(&self) -> usize {
        self.planes.iter().flatten().count()
    }

    /// Whether the oriented box contains `point`, faces included.
    pub fn contains(&self, point: Vec3, epsilon: f64) -> bool {
        let d = sub(point, self.position);
        (0..3).all(|i| dot(d, self.axes[i]).abs() <= self.half_extents[i] + epsilon)
    }

    /// The eight corners of the oriented box, bit `i` of the corner index selecting `+axis[i]`.
    pub fn corners(&self) -> [Vec3; 8] {
        let mut out = [[0.0; 3]; 8];
        for (c, corner) in out.iter_mut().enumerate() {
            let mut p = self.position;
            for i in 0..3 {
                let s = if c & (1 << i) != 0 { 1.0 } else { -1.0 };
                p = add(p, scale(self.axes[i], s * self.half_extents[i]));
            }
            *corner = p;
        }
        out
    }

    /// World-space axis-aligned bounds of the oriented box.
    pub fn bounds(&self) -> BoundingBox<3> {
        let mut half = [0.0; 3];
        for (i, h) in half.iter_mut().enumerate() {
            *h = (0..3).map(|a| self.axes[a][i].abs() * self.half_extents[a]).sum();
        }
        BoundingBox::from_center(self.position, half)
    }

    /// Resolves every attached plane into a world-space rectangle.
    ///
    /// `reach` is the distance an extended side is pushed out to; it must cover the whole world.
    pub fn plane_rects(&self, id: DelimiterId, reach: f64) -> impl Iterator<Item = PlaneRect> + '_ {
        self.planes
            .iter()
            .flatten()
            .map(move |plane| self.plane_rect(id, plane, reach))
    }

    fn plane_rect(&self, id: DelimiterId, plane: &DelimiterPlane, reach: f64) -> PlaneRect {
        let face = plane.face;
        let n = face.axis();
        let (u, v) = face.tangent_axes();
        let normal = scale(self.axes[n], face.sign());
        let origin = if plane.centered {
            self.position
        } else {
            add(self.position, scale(normal, self.half_extents[n]))
        };

        let side = |flag: VirtualExtension, half: f64| {
            if plane.extension.contains(flag) { reach } else { half }
        };
        PlaneRect {
            delimiter: id,
            face,
            origin,
            normal,
            u_axis: self.axes[u],
            v_axis: self.axes[v],
            u_range: [
                -side(VirtualExtension::NEGATIVE_U, self.half_extents[u]),
                side(VirtualExtension::POSITIVE_U, self.half_extents[u]),
            ],
            v_range: [
                -side(VirtualExtension::NEGATIVE_V, self.half_extents[v]),
                side(VirtualExtension::POSITIVE_V, self.half_extents[v]),
            ],
        }
    }
}
