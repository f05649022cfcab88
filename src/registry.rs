//! Handle-based access to many worlds, for hosts that cannot hold Rust references.

use crate::debug_draw::{DebugDrawData, DebugDrawOptions};
use crate::delimiter::VirtualExtension;
use crate::entity::{AnchorId, DelimiterId};
use crate::error::{Result, WorldError};
use crate::geometry::{Quaternion, Vec3};
use crate::profiling::TimingData;
use crate::volume::VolumeSummary;
use crate::world::World;

/// Opaque world handle with generation tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldHandle {
    index: u32,
    generation: u32,
}

impl WorldHandle {
    /// A handle that is never valid.
    pub const fn null() -> Self {
        Self {
            index: u32::MAX,
            generation: 0,
        }
    }

    pub const fn is_null(&self) -> bool {
        self.index == u32::MAX
    }
}

impl Default for WorldHandle {
    fn default() -> Self {
        Self::null()
    }
}

struct Slot {
    world: Option<World>,
    generation: u32,
}

/// Owns worlds behind generational handles.
///
/// Destroying a world bumps its slot's generation, so stale copies of the handle fail with
/// [`WorldError::InvalidWorldHandle`] even after the slot is reused.
#[derive(Default)]
pub struct WorldRegistry {
    slots: Vec<Slot>,
    free_list: Vec<u32>,
    len: usize,
}

impl WorldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live worlds.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn create_world(&mut self, half_x: f64, half_y: f64, half_z: f64) -> Result<WorldHandle> {
        let world = World::new([half_x, half_y, half_z])?;
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.world = Some(world);
            return Ok(WorldHandle {
                index,
                generation: slot.generation,
            });
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            world: Some(world),
            generation: 0,
        });
        Ok(WorldHandle { index, generation: 0 })
    }

    /// Drops the world and invalidates `handle` and every copy of it.
    pub fn destroy_world(&mut self, handle: WorldHandle) -> Result<()> {
        let slot = self.slot_mut(handle)?;
        slot.world = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.len -= 1;
        log::debug!("destroyed world {:?}", handle);
        Ok(())
    }

    pub fn is_valid(&self, handle: WorldHandle) -> bool {
        self.world(handle).is_ok()
    }

    pub fn world(&self, handle: WorldHandle) -> Result<&World> {
        self.slots
            .get(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.world.as_ref())
            .ok_or(WorldError::InvalidWorldHandle)
    }

    pub fn world_mut(&mut self, handle: WorldHandle) -> Result<&mut World> {
        self.slot_mut(handle)?
            .world
            .as_mut()
            .ok_or(WorldError::InvalidWorldHandle)
    }

    fn slot_mut(&mut self, handle: WorldHandle) -> Result<&mut Slot> {
        self.slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.generation == handle.generation && slot.world.is_some())
            .ok_or(WorldError::InvalidWorldHandle)
    }

    pub fn add_anchor(&mut self, handle: WorldHandle, position: Vec3) -> Result<AnchorId> {
        Ok(self.world_mut(handle)?.add_anchor(position))
    }

    pub fn add_delimiter(
        &mut self,
        handle: WorldHandle,
        position: Vec3,
        half_extents: Vec3,
        rotation: Quaternion,
        level: i32,
    ) -> Result<DelimiterId> {
        self.world_mut(handle)?
            .add_delimiter(position, half_extents, rotation, level)
    }

    /// Like [`World::add_delimiter_plane`] with the extension given as raw bits.
    pub fn add_delimiter_plane(
        &mut self,
        handle: WorldHandle,
        delimiter: DelimiterId,
        face_index: u8,
        centered: bool,
        extension_bits: u8,
    ) -> Result<()> {
        let world = self.world_mut(handle)?;
        let extension = VirtualExtension::from_raw(extension_bits)?;
        world.add_delimiter_plane(delimiter, face_index, centered, extension)
    }

    pub fn calculate_volumes(&mut self, handle: WorldHandle, cell_size: f64) -> Result<VolumeSummary> {
        self.world_mut(handle)?.calculate_volumes(cell_size)
    }

    pub fn query_point(&self, handle: WorldHandle, point: Vec3) -> Result<Option<AnchorId>> {
        Ok(self.world(handle)?.query_point(point))
    }

    pub fn debug_draw(&self, handle: WorldHandle, options: DebugDrawOptions) -> Result<DebugDrawData> {
        Ok(self.world(handle)?.debug_draw(options))
    }

    pub fn profiling_data(&self, handle: WorldHandle) -> Result<TimingData> {
        Ok(self.world(handle)?.profiling_data())
    }
}
