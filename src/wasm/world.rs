use crate::debug_draw::{DebugDrawData, DebugDrawOptions};
use crate::delimiter::VirtualExtension;
use crate::entity::EntityId;
use crate::geometry::Quaternion;
use crate::volume::VolumeId;
use crate::wasm::utils::get_seed;
use crate::world::World;
use js_sys::Array;
use wasm_bindgen::prelude::*;

// --- Entity references ---

/// Opaque reference to an anchor or delimiter of a `World3D`.
#[wasm_bindgen(js_name = EntityRef3D)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityRef3D {
    index: u32,
    generation: u32,
}

#[wasm_bindgen(js_class = EntityRef3D)]
impl EntityRef3D {
    #[wasm_bindgen(getter)]
    pub fn index(&self) -> u32 { self.index }
    #[wasm_bindgen(getter)]
    pub fn generation(&self) -> u32 { self.generation }
}

impl<T> From<EntityId<T>> for EntityRef3D {
    fn from(id: EntityId<T>) -> Self {
        EntityRef3D { index: id.index(), generation: id.generation() }
    }
}

impl EntityRef3D {
    fn id<T>(&self) -> EntityId<T> {
        EntityId::new(self.index, self.generation)
    }
}

// --- Debug draw ---

/// Flattened debug draw buffers, ready to upload to GPU buffers.
#[wasm_bindgen(js_name = DebugDraw3D)]
pub struct DebugDraw3D {
    inner: DebugDrawData,
}

#[wasm_bindgen(js_class = DebugDraw3D)]
impl DebugDraw3D {
    /// `[x0, y0, z0, x1, y1, z1, thickness]` per line.
    #[wasm_bindgen(getter)]
    pub fn lines(&self) -> Vec<f64> {
        self.inner.lines.iter().flat_map(|l| l.p0.into_iter().chain(l.p1).chain([l.thickness])).collect()
    }
    #[wasm_bindgen(getter)]
    pub fn line_colors(&self) -> Vec<u8> {
        self.inner.lines.iter().flat_map(|l| l.color).collect()
    }
    /// Nine coordinates per triangle.
    #[wasm_bindgen(getter)]
    pub fn triangles(&self) -> Vec<f64> {
        self.inner.triangles.iter().flat_map(|t| t.p0.into_iter().chain(t.p1).chain(t.p2)).collect()
    }
    /// RGBA per triangle.
    #[wasm_bindgen(getter)]
    pub fn triangle_colors(&self) -> Vec<u8> {
        self.inner.triangles.iter().flat_map(|t| t.color).collect()
    }
    /// `[x, y, z, sx, sy, sz, qx, qy, qz, qw]` per cuboid.
    #[wasm_bindgen(getter)]
    pub fn cuboids(&self) -> Vec<f64> {
        self.inner.cuboids.iter().flat_map(|c| c.position.into_iter().chain(c.size).chain(c.rotation)).collect()
    }
    #[wasm_bindgen(getter)]
    pub fn cuboid_colors(&self) -> Vec<u8> {
        self.inner.cuboids.iter().flat_map(|c| c.color).collect()
    }
    /// `[x, y, z, radius]` per sphere.
    #[wasm_bindgen(getter)]
    pub fn spheres(&self) -> Vec<f64> {
        self.inner.spheres.iter().flat_map(|s| s.position.into_iter().chain([s.radius])).collect()
    }
    #[wasm_bindgen(getter)]
    pub fn sphere_colors(&self) -> Vec<u8> {
        self.inner.spheres.iter().flat_map(|s| s.color).collect()
    }
    #[wasm_bindgen(getter)]
    pub fn text_positions(&self) -> Vec<f64> {
        self.inner.texts.iter().flat_map(|t| t.position).collect()
    }
    #[wasm_bindgen(getter)]
    pub fn text_colors(&self) -> Vec<u8> {
        self.inner.texts.iter().flat_map(|t| t.color).collect()
    }
    // Workaround for the fact that wasm-bindgen does not support Vec<String> getters on older versions
    #[wasm_bindgen(getter)]
    pub fn texts(&self) -> Array {
        self.inner.texts.iter().map(|t| JsValue::from_str(&t.text)).collect()
    }
}

// --- World ---

#[wasm_bindgen(js_name = World3D)]
pub struct World3D {
    inner: World,
}

#[wasm_bindgen(js_class = World3D)]
impl World3D {
    #[wasm_bindgen(constructor)]
    pub fn new(half_x: f64, half_y: f64, half_z: f64) -> Result<World3D, JsError> {
        Ok(World3D { inner: World::new([half_x, half_y, half_z])? })
    }
    pub fn reset(&mut self) { self.inner.reset(); }
    pub fn reserve_objects(&mut self, anchors: usize, delimiters: usize) { self.inner.reserve_objects(anchors, delimiters); }
    pub fn add_anchor(&mut self, x: f64, y: f64, z: f64) -> EntityRef3D { self.inner.add_anchor([x, y, z]).into() }
    pub fn add_named_anchor(&mut self, name: String, x: f64, y: f64, z: f64) -> EntityRef3D { self.inner.add_named_anchor(name, [x, y, z]).into() }
    pub fn random_anchors(&mut self, count: usize) { self.inner.random_anchors(count, get_seed()); }
    #[allow(clippy::too_many_arguments)]
    pub fn add_delimiter(&mut self, x: f64, y: f64, z: f64, hx: f64, hy: f64, hz: f64, qx: f64, qy: f64, qz: f64, qw: f64, level: i32) -> Result<EntityRef3D, JsError> {
        Ok(self.inner.add_delimiter([x, y, z], [hx, hy, hz], Quaternion::new(qx, qy, qz, qw), level)?.into())
    }
    /// Rotation as Euler angles in turns, applied X, then Y, then Z.
    #[allow(clippy::too_many_arguments)]
    pub fn add_delimiter_euler(&mut self, x: f64, y: f64, z: f64, hx: f64, hy: f64, hz: f64, tx: f64, ty: f64, tz: f64, level: i32) -> Result<EntityRef3D, JsError> {
        Ok(self.inner.add_delimiter_euler([x, y, z], [hx, hy, hz], [tx, ty, tz], level)?.into())
    }
    pub fn add_delimiter_plane(&mut self, delimiter: &EntityRef3D, face: u8, centered: bool, extension: u8) -> Result<(), JsError> {
        let extension = VirtualExtension::from_raw(extension)?;
        Ok(self.inner.add_delimiter_plane(delimiter.id(), face, centered, extension)?)
    }
    /// Returns the number of volumes.
    pub fn calculate_volumes(&mut self, cell_size: f64) -> Result<usize, JsError> {
        Ok(self.inner.calculate_volumes(cell_size)?.volume_count)
    }
    pub fn query_point(&self, x: f64, y: f64, z: f64) -> Option<EntityRef3D> { self.inner.query_point([x, y, z]).map(Into::into) }
    pub fn query_volume(&self, x: f64, y: f64, z: f64) -> Option<u32> { self.inner.query_volume([x, y, z]).map(|v| v.0) }
    pub fn anchor_volume(&self, anchor: &EntityRef3D) -> Result<Option<u32>, JsError> {
        Ok(self.inner.anchor_volume(anchor.id())?.map(|v| v.0))
    }
    /// `[min_x, min_y, min_z, max_x, max_y, max_z]` of a volume.
    pub fn volume_bounds(&self, volume: u32) -> Option<Vec<f64>> {
        self.inner.volume(VolumeId(volume)).map(|v| v.bounds.min.into_iter().chain(v.bounds.max).collect())
    }
    #[wasm_bindgen(getter)]
    pub fn count_volumes(&self) -> usize { self.inner.volumes().len() }
    #[wasm_bindgen(getter)]
    pub fn count_anchors(&self) -> usize { self.inner.anchor_count() }
    #[wasm_bindgen(getter)]
    pub fn count_delimiters(&self) -> usize { self.inner.delimiter_count() }
    pub fn debug_draw(&self, options: u32) -> DebugDraw3D {
        DebugDraw3D { inner: self.inner.debug_draw(DebugDrawOptions::from_bits_truncate(options)) }
    }
    /// One `[name, inclusive_ms, exclusive_ms, count]` entry per profiling zone name.
    pub fn profiling_summary(&self) -> Array {
        self.inner
            .profiling_data()
            .summary
            .iter()
            .map(|s| {
                JsValue::from(Array::of4(
                    &JsValue::from_str(&s.name),
                    &JsValue::from_f64(s.inclusive_ns as f64 * 1e-6),
                    &JsValue::from_f64(s.exclusive_ns as f64 * 1e-6),
                    &JsValue::from_f64(s.count as f64),
                ))
            })
            .collect()
    }
}
