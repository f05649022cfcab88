//! Owned snapshots of internal state as simple draw primitives.

use bitflags::bitflags;

use crate::algorithm::SpatialIndex;
use crate::bounds::BoundingBox;
use crate::geometry::{Vec3, add, scale};
use crate::grid::flood::BLOCKED;
use crate::world::World;

bitflags! {
    /// Categories selected for a [`World::debug_draw`] snapshot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct DebugDrawOptions: u32 {
        /// Node bounds of the volume index, or of the delimiter index before the first computation.
        const SPATIAL_INDEX = 0x1;
        const ANCHORS = 0x2;
        const DELIMITERS = 0x4;
        const DELIMITER_FACES = 0x8;
        const DELIMITER_WIREFRAMES = 0x10;
        const VOLUME_FACES = 0x20;
        const VOLUME_WIREFRAMES = 0x40;
        /// Blocked cells of the last computation.
        const FLOOD_FILL = 0x80;
        const LABELS = 0x1000;
        const NORMALS = 0x2000;
        const AXIS_GIZMO = 0x4000;
        /// The world boundary.
        const ROOT_PLANES = 0x8000;
        const EVERYTHING = 0x00ff | 0xf000;
    }
}

const DEPTH_COLORS: [[u8; 3]; 8] = [
    [0, 255, 0],
    [60, 220, 90],
    [40, 200, 100],
    [40, 180, 130],
    [40, 140, 180],
    [40, 100, 220],
    [40, 80, 240],
    [20, 30, 255],
];
const DEPTH_THICKNESS: [f64; 8] = [0.25, 0.15, 0.10, 0.08, 0.06, 0.05, 0.035, 0.02];

const ANCHOR_RADIUS: f64 = 0.3;
const UNASSIGNED_COLOR: [u8; 3] = [255, 60, 60];
const DELIMITER_COLOR: [u8; 3] = [150, 150, 150];
const PLANE_COLOR: [u8; 3] = [220, 60, 60];
const BLOCKED_COLOR: [u8; 3] = [90, 90, 90];
const TEXT_COLOR: [u8; 3] = [255, 255, 255];

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugLine {
    pub p0: Vec3,
    pub p1: Vec3,
    pub thickness: f64,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugTriangle {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
    /// RGB plus alpha.
    pub color: [u8; 4],
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugText {
    pub position: Vec3,
    pub text: String,
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugCuboid {
    pub position: Vec3,
    /// Full edge lengths along the local axes.
    pub size: Vec3,
    /// Quaternion as `[x, y, z, w]`.
    pub rotation: [f64; 4],
    pub color: [u8; 3],
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugSphere {
    pub position: Vec3,
    pub radius: f64,
    pub color: [u8; 3],
}

/// A snapshot of draw primitives. It owns its buffers and is released by dropping it.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebugDrawData {
    pub lines: Vec<DebugLine>,
    pub triangles: Vec<DebugTriangle>,
    pub texts: Vec<DebugText>,
    pub cuboids: Vec<DebugCuboid>,
    pub spheres: Vec<DebugSphere>,
}

impl DebugDrawData {
    pub fn is_empty(&self) -> bool {
        self.primitive_count() == 0
    }

    pub fn primitive_count(&self) -> usize {
        self.lines.len() + self.triangles.len() + self.texts.len() + self.cuboids.len() + self.spheres.len()
    }

    fn line(&mut self, p0: Vec3, p1: Vec3, thickness: f64, color: [u8; 3]) {
        self.lines.push(DebugLine { p0, p1, thickness, color });
    }

    fn text(&mut self, position: Vec3, text: String) {
        self.texts.push(DebugText {
            position,
            text,
            color: TEXT_COLOR,
        });
    }

    fn quad(&mut self, corners: [Vec3; 4], color: [u8; 4]) {
        let [a, b, c, d] = corners;
        self.triangles.push(DebugTriangle { p0: a, p1: b, p2: c, color });
        self.triangles.push(DebugTriangle { p0: a, p1: c, p2: d, color });
    }

    fn outline(&mut self, corners: [Vec3; 4], thickness: f64, color: [u8; 3]) {
        for i in 0..4 {
            self.line(corners[i], corners[(i + 1) % 4], thickness, color);
        }
    }

    fn box_edges(&mut self, b: &BoundingBox<3>, thickness: f64, color: [u8; 3]) {
        let corners = b.corners();
        for i in 0..8 {
            for axis in 0..3 {
                let j = i | (1 << axis);
                if j != i {
                    self.line(corners[i], corners[j], thickness, color);
                }
            }
        }
    }
}

/// A stable, well spread color per volume.
pub fn volume_color(index: usize) -> [u8; 3] {
    let hue = (index as f64 * 0.618_033_988_75).fract() * 6.0;
    let x = 1.0 - (hue % 2.0 - 1.0).abs();
    let (r, g, b) = match hue as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    let c = |v: f64| (60.0 + v * 195.0) as u8;
    [c(r), c(g), c(b)]
}

/// Corners of the face of a cube at `center` pointing along `+axis` or `-axis`.
fn cube_face(center: Vec3, half: f64, axis: usize, positive: bool) -> [Vec3; 4] {
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    let mut base = center;
    base[axis] += if positive { half } else { -half };
    let corner = |su: f64, sv: f64| {
        let mut p = base;
        p[u] += su * half;
        p[v] += sv * half;
        p
    };
    [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)]
}

impl<I: SpatialIndex> World<I> {
    /// Builds a snapshot of the categories selected in `options`.
    pub fn debug_draw(&self, options: DebugDrawOptions) -> DebugDrawData {
        let mut data = DebugDrawData::default();
        let labels = options.contains(DebugDrawOptions::LABELS);
        let set = self.volume_set();

        if options.contains(DebugDrawOptions::SPATIAL_INDEX) {
            let mut draw_node = |bounds: &BoundingBox<3>, depth: usize| {
                let d = depth.min(DEPTH_COLORS.len() - 1);
                data.box_edges(bounds, DEPTH_THICKNESS[d], DEPTH_COLORS[d]);
            };
            match set {
                Some(set) => set.index.visit_nodes(&mut draw_node),
                None => self.delimiter_index().visit_nodes(&mut draw_node),
            }
        }

        if options.contains(DebugDrawOptions::ANCHORS) {
            for (slot, anchor) in self.anchor_slice().iter().enumerate() {
                let volume = set.and_then(|s| s.anchor_volumes.get(slot).copied().flatten());
                data.spheres.push(DebugSphere {
                    position: anchor.position,
                    radius: ANCHOR_RADIUS,
                    color: volume.map_or(UNASSIGNED_COLOR, |v| volume_color(v.index())),
                });
                if labels {
                    let text = anchor.name.clone().unwrap_or_else(|| format!("Anchor {}", slot));
                    data.text(add(anchor.position, [0.0, 2.0 * ANCHOR_RADIUS, 0.0]), text);
                }
            }
        }

        if options.contains(DebugDrawOptions::DELIMITERS) {
            for (id, delimiter) in self.delimiters() {
                data.cuboids.push(DebugCuboid {
                    position: delimiter.position,
                    size: scale(delimiter.half_extents, 2.0),
                    rotation: delimiter.rotation.as_array(),
                    color: DELIMITER_COLOR,
                });
                if labels {
                    let name = delimiter
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("Delimiter {}", id.index()));
                    data.text(delimiter.position, format!("{} (level {})", name, delimiter.level));
                }
            }
        }

        let face_options = DebugDrawOptions::DELIMITER_FACES | DebugDrawOptions::DELIMITER_WIREFRAMES;
        if options.intersects(face_options) {
            for rect in self.plane_rects() {
                let corners = rect.corners();
                if options.contains(DebugDrawOptions::DELIMITER_FACES) {
                    let [r, g, b] = PLANE_COLOR;
                    data.quad(corners, [r, g, b, 90]);
                    if options.contains(DebugDrawOptions::NORMALS) {
                        let center = rect.center();
                        data.line(center, add(center, rect.normal), 0.05, PLANE_COLOR);
                    }
                }
                if options.contains(DebugDrawOptions::DELIMITER_WIREFRAMES) {
                    data.outline(corners, 0.05, PLANE_COLOR);
                }
                if labels {
                    data.text(rect.center(), rect.face.label().to_string());
                }
            }
        }

        if let Some(set) = set {
            let grid = &set.grid;
            let half = 0.5 * grid.cell_size;

            if options.contains(DebugDrawOptions::VOLUME_FACES) {
                for (cell, &label) in set.labels.iter().enumerate() {
                    if label == BLOCKED {
                        continue;
                    }
                    let coords = grid.coords(cell);
                    let center = grid.cell_center(coords);
                    let [r, g, b] = volume_color(label as usize);
                    for axis in 0..3 {
                        for positive in [true, false] {
                            let neighbor = if positive {
                                (coords[axis] + 1 < grid.res[axis]).then(|| {
                                    let mut c = coords;
                                    c[axis] += 1;
                                    c
                                })
                            } else {
                                (coords[axis] > 0).then(|| {
                                    let mut c = coords;
                                    c[axis] -= 1;
                                    c
                                })
                            };
                            let same = neighbor.is_some_and(|c| set.labels[grid.index(c[0], c[1], c[2])] == label);
                            if !same {
                                data.quad(cube_face(center, half, axis, positive), [r, g, b, 120]);
                            }
                        }
                    }
                }
            }

            if options.contains(DebugDrawOptions::VOLUME_WIREFRAMES) {
                for volume in &set.volumes {
                    data.box_edges(&volume.bounds, 0.1, volume_color(volume.id.index()));
                    if labels {
                        data.text(
                            volume.bounds.center(),
                            format!("Volume {} ({} cells)", volume.id.0, volume.cell_count),
                        );
                    }
                }
            }

            if options.contains(DebugDrawOptions::FLOOD_FILL) {
                for (cell, _) in set.labels.iter().enumerate().filter(|(_, l)| **l == BLOCKED) {
                    data.cuboids.push(DebugCuboid {
                        position: grid.cell_center(grid.coords(cell)),
                        size: [grid.cell_size; 3],
                        rotation: [0.0, 0.0, 0.0, 1.0],
                        color: BLOCKED_COLOR,
                    });
                }
            }
        }

        if options.contains(DebugDrawOptions::ROOT_PLANES) {
            data.box_edges(&self.bounds(), 0.1, TEXT_COLOR);
        }

        if options.contains(DebugDrawOptions::AXIS_GIZMO) {
            let length = 0.1 * self.half_extents().iter().copied().fold(0.0, f64::max);
            let colors = [[255, 0, 0], [0, 255, 0], [0, 0, 255]];
            for (axis, color) in colors.into_iter().enumerate() {
                let mut tip = [0.0; 3];
                tip[axis] = length;
                data.line([0.0; 3], tip, 0.05, color);
            }
        }

        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiter::VirtualExtension;
    use crate::geometry::Quaternion;

    fn boxed_world() -> World {
        let mut world: World = World::new([10.0; 3]).unwrap();
        let d = world
            .add_named_delimiter("Box", [0.0; 3], [5.0; 3], Quaternion::IDENTITY, 2)
            .unwrap();
        for face in 0..6 {
            world.add_delimiter_plane(d, face, false, VirtualExtension::empty()).unwrap();
        }
        world.add_named_anchor("Inside", [0.0; 3]);
        world.add_anchor([30.0, 0.0, 0.0]);
        world
    }

    #[test]
    fn test_empty_options_draw_nothing() {
        let world = boxed_world();
        assert!(world.debug_draw(DebugDrawOptions::empty()).is_empty());
    }

    #[test]
    fn test_everything_covers_all_flags() {
        assert_eq!(DebugDrawOptions::EVERYTHING.bits(), 0xf0ff);
        assert!(DebugDrawOptions::EVERYTHING.contains(DebugDrawOptions::ROOT_PLANES | DebugDrawOptions::FLOOD_FILL));
    }

    #[test]
    fn test_entity_primitives() {
        let world = boxed_world();
        let data = world.debug_draw(DebugDrawOptions::ANCHORS | DebugDrawOptions::DELIMITERS | DebugDrawOptions::LABELS);
        assert_eq!(data.spheres.len(), 2);
        assert_eq!(data.cuboids.len(), 1);
        assert_eq!(data.cuboids[0].size, [10.0; 3]);
        let texts: Vec<_> = data.texts.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Inside", "Anchor 1", "Box (level 2)"]);
        assert!(data.spheres.iter().all(|s| s.color == UNASSIGNED_COLOR));
    }

    #[test]
    fn test_plane_primitives() {
        let world = boxed_world();
        let data = world.debug_draw(
            DebugDrawOptions::DELIMITER_FACES | DebugDrawOptions::DELIMITER_WIREFRAMES | DebugDrawOptions::NORMALS,
        );
        assert_eq!(data.triangles.len(), 12);
        assert_eq!(data.lines.len(), 6 * 4 + 6);
    }

    #[test]
    fn test_spatial_index_before_and_after_computation() {
        let mut world = boxed_world();
        let before = world.debug_draw(DebugDrawOptions::SPATIAL_INDEX);
        assert_eq!(before.lines.len(), 12);
        assert_eq!(before.lines[0].color, DEPTH_COLORS[0]);

        world.calculate_volumes(1.0).unwrap();
        let after = world.debug_draw(DebugDrawOptions::SPATIAL_INDEX);
        assert_eq!(after.lines.len(), 12);
    }

    #[test]
    fn test_volume_faces_of_open_world() {
        let mut world: World = World::new([1.0; 3]).unwrap();
        world.calculate_volumes(1.0).unwrap();
        let data = world.debug_draw(DebugDrawOptions::VOLUME_FACES | DebugDrawOptions::VOLUME_WIREFRAMES);
        // A 2x2x2 block shows 4 cell faces per side.
        assert_eq!(data.triangles.len(), 6 * 4 * 2);
        assert_eq!(data.lines.len(), 12);
    }

    #[test]
    fn test_flood_fill_and_gizmo() {
        let mut world = boxed_world();
        world.calculate_volumes(1.0).unwrap();
        let summary_blocked = world.grid().map(|g| g.cell_count()).unwrap()
            - world.volumes().iter().map(|v| v.cell_count).sum::<usize>();
        let data = world.debug_draw(DebugDrawOptions::FLOOD_FILL | DebugDrawOptions::AXIS_GIZMO);
        assert_eq!(data.cuboids.len(), summary_blocked);
        assert_eq!(data.lines.len(), 3);
        assert_eq!(data.lines[0].p1, [1.0, 0.0, 0.0]);
    }
}
