use std::sync::OnceLock;

use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::algorithm::SpatialIndex;
use crate::algorithm::bvh::Bvh;
use crate::algorithm::kdtree::KdTree;
use crate::bounds::BoundingBox;
use crate::delimiter::{Delimiter, DelimiterPlane, PlaneRect, VirtualExtension};
use crate::entity::{Anchor, AnchorId, DelimiterId, EntityStore};
use crate::error::{Result, WorldError};
use crate::geometry::{Face, Quaternion, Vec3, is_finite};
use crate::grid::VoxelGrid;
use crate::grid::flood;
use crate::profiling::{Profiler, TimingData};
use crate::settings::WorldSettings;
use crate::volume::{Volume, VolumeId, VolumeSet, VolumeSummary};

/// The main container for partitioning a box-shaped region of space into volumes.
///
/// This struct manages:
/// - The **bounds** of the world, a box of the given half-extents centered at the origin.
/// - The **anchors**, labeled points whose enclosing volume is looked up.
/// - The **delimiters**, oriented boxes whose planes seal space.
/// - The **volumes** produced by [`calculate_volumes`](World::calculate_volumes) and the
///   spatial index `I` used to answer point queries against them.
///
/// Entities are append-only. [`reset`](World::reset) drops them all and invalidates their ids.
pub struct World<I: SpatialIndex = Bvh> {
    half_extents: Vec3,
    settings: WorldSettings,
    anchors: EntityStore<Anchor>,
    delimiters: EntityStore<Delimiter>,
    delimiter_index: OnceLock<I>,
    volumes: Option<VolumeSet<I>>,
    profiler: Profiler,
}

impl<I: SpatialIndex> World<I> {
    /// Creates an empty world spanning `[-half_extents, +half_extents]` with default settings.
    pub fn new(half_extents: Vec3) -> Result<Self> {
        Self::with_settings(half_extents, WorldSettings::default())
    }

    /// Creates an empty world. Every half-extent must be finite and strictly positive.
    pub fn with_settings(half_extents: Vec3, settings: WorldSettings) -> Result<Self> {
        if !half_extents.iter().all(|h| h.is_finite() && *h > 0.0) {
            return Err(WorldError::InvalidHalfExtents(half_extents));
        }
        log::debug!("created world with half extents {:?}", half_extents);
        Ok(Self {
            half_extents,
            profiler: Profiler::new(settings.profiling),
            settings,
            anchors: EntityStore::default(),
            delimiters: EntityStore::default(),
            delimiter_index: OnceLock::new(),
            volumes: None,
        })
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn bounds(&self) -> BoundingBox<3> {
        BoundingBox::from_center([0.0; 3], self.half_extents)
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    /// Drops all anchors, delimiters and volumes. Ids issued before the reset no longer resolve.
    pub fn reset(&mut self) {
        self.anchors.clear();
        self.delimiters.clear();
        self.delimiter_index = OnceLock::new();
        self.volumes = None;
        self.profiler.clear();
        log::debug!("world reset");
    }

    pub fn reserve_objects(&mut self, anchors: usize, delimiters: usize) {
        self.anchors.reserve(anchors);
        self.delimiters.reserve(delimiters);
    }

    // --- Anchors ---

    /// Adds an anchor. Positions outside the world are accepted but never land in a volume.
    pub fn add_anchor(&mut self, position: Vec3) -> AnchorId {
        self.anchors.push(Anchor { position, name: None })
    }

    pub fn add_named_anchor(&mut self, name: impl Into<String>, position: Vec3) -> AnchorId {
        self.anchors.push(Anchor {
            position,
            name: Some(name.into()),
        })
    }

    /// Adds `count` anchors uniformly distributed inside the world bounds.
    pub fn random_anchors(&mut self, count: usize, seed: u64) -> Vec<AnchorId> {
        let mut rng = StdRng::seed_from_u64(seed);
        let h = self.half_extents;
        self.anchors.reserve(count);
        (0..count)
            .map(|_| {
                let position = [
                    rng.gen_range(-h[0]..=h[0]),
                    rng.gen_range(-h[1]..=h[1]),
                    rng.gen_range(-h[2]..=h[2]),
                ];
                self.add_anchor(position)
            })
            .collect()
    }

    pub fn anchor(&self, id: AnchorId) -> Result<&Anchor> {
        self.anchors.get(id).ok_or(WorldError::UnknownAnchor(id))
    }

    pub fn anchors(&self) -> impl Iterator<Item = (AnchorId, &Anchor)> + '_ {
        self.anchors.iter()
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    // --- Delimiters ---

    /// Adds a delimiter box. The rotation is normalized before use.
    ///
    /// Half-extents must be finite and non-negative; zero is allowed and flattens the box.
    pub fn add_delimiter(&mut self, position: Vec3, half_extents: Vec3, rotation: Quaternion, level: i32) -> Result<DelimiterId> {
        if !is_finite(half_extents) || half_extents.iter().any(|h| *h < 0.0) {
            return Err(WorldError::InvalidHalfExtents(half_extents));
        }
        let rotation = rotation.normalized()?;
        let id = self.delimiters.push(Delimiter::new(position, half_extents, rotation, level));
        self.delimiter_index = OnceLock::new();
        log::debug!("added delimiter {:?} at {:?}, level {}", id, position, level);
        Ok(id)
    }

    /// Adds a delimiter with its rotation given as Euler angles in turns (X, then Y, then Z).
    pub fn add_delimiter_euler(&mut self, position: Vec3, half_extents: Vec3, turns: Vec3, level: i32) -> Result<DelimiterId> {
        self.add_delimiter(position, half_extents, Quaternion::from_euler_turns(turns), level)
    }

    pub fn add_named_delimiter(
        &mut self,
        name: impl Into<String>,
        position: Vec3,
        half_extents: Vec3,
        rotation: Quaternion,
        level: i32,
    ) -> Result<DelimiterId> {
        let id = self.add_delimiter(position, half_extents, rotation, level)?;
        if let Some(delimiter) = self.delimiters.get_mut(id) {
            delimiter.name = Some(name.into());
        }
        Ok(id)
    }

    /// Attaches a blocking plane to face `face_index` (0..=5 for +X, +Y, +Z, -X, -Y, -Z).
    ///
    /// An occupied face is replaced, or rejected when `replace_duplicate_planes` is off.
    pub fn add_delimiter_plane(&mut self, id: DelimiterId, face_index: u8, centered: bool, extension: VirtualExtension) -> Result<()> {
        let face = Face::from_index(face_index)?;
        let replace = self.settings.replace_duplicate_planes;
        let delimiter = self.delimiters.get_mut(id).ok_or(WorldError::UnknownDelimiter(id))?;

        let slot = &mut delimiter.planes[face.index()];
        if slot.is_some() && !replace {
            return Err(WorldError::DuplicatePlane { delimiter: id, face: face_index });
        }
        *slot = Some(DelimiterPlane { face, centered, extension });
        log::debug!("delimiter {:?}: plane on {} (centered: {}, extension: {:?})", id, face.label(), centered, extension);
        Ok(())
    }

    /// Adds the positive and negative face along local `axis` (0, 1 or 2).
    pub fn add_both_delimiter_planes(&mut self, id: DelimiterId, axis: u8, extension: VirtualExtension) -> Result<()> {
        if axis > 2 {
            return Err(WorldError::InvalidFaceIndex(axis));
        }
        // Validate both faces up front so a rejected duplicate leaves nothing half added.
        let delimiter = self.delimiters.get(id).ok_or(WorldError::UnknownDelimiter(id))?;
        if !self.settings.replace_duplicate_planes {
            for positive in [true, false] {
                let face = Face::from_axis(axis as usize, positive);
                if delimiter.plane(face).is_some() {
                    return Err(WorldError::DuplicatePlane { delimiter: id, face: face as u8 });
                }
            }
        }
        self.add_delimiter_plane(id, axis, false, extension)?;
        self.add_delimiter_plane(id, axis + 3, false, extension)
    }

    pub fn delimiter(&self, id: DelimiterId) -> Result<&Delimiter> {
        self.delimiters.get(id).ok_or(WorldError::UnknownDelimiter(id))
    }

    pub fn delimiters(&self) -> impl Iterator<Item = (DelimiterId, &Delimiter)> + '_ {
        self.delimiters.iter()
    }

    pub fn delimiter_count(&self) -> usize {
        self.delimiters.len()
    }

    /// Delimiters whose oriented box contains `point`, in id order.
    pub fn delimiters_at(&self, point: Vec3) -> Vec<DelimiterId> {
        let delimiters = self.delimiters.as_slice();
        let mut hits = Vec::new();
        self.delimiter_index().visit_containing(&point, |i| {
            if delimiters[i].contains(point, self.settings.epsilon) {
                hits.push(self.delimiters.id_at(i));
            }
        });
        hits.sort();
        hits
    }

    /// Index over the delimiters' world-space bounds, rebuilt lazily after additions.
    pub(crate) fn delimiter_index(&self) -> &I {
        self.delimiter_index.get_or_init(|| {
            let bounds: Vec<_> = self.delimiters.as_slice().iter().map(Delimiter::bounds).collect();
            let mut index = I::default();
            index.build(&bounds, self.settings.bvh_leaf_size);
            index
        })
    }

    /// Every delimiter plane resolved into world space, in delimiter then face order.
    pub fn plane_rects(&self) -> Vec<PlaneRect> {
        let reach = 2.0 * self.half_extents.iter().copied().fold(0.0, f64::max);
        self.delimiters
            .iter()
            .flat_map(|(id, d)| d.plane_rects(id, reach))
            .collect()
    }

    // --- Volumes ---

    /// Partitions the world into volumes at the given cell size.
    ///
    /// Space is voxelized into cubic cells of edge `cell_size`, every cell touching a delimiter
    /// plane is blocked, and the remaining cells are flood filled into 6-connected volumes.
    /// Anchors are then assigned to the volume of the cell they fall in and the volume index is
    /// rebuilt.
    ///
    /// The previous volumes are replaced only when the whole computation succeeds; on error
    /// they stay untouched.
    pub fn calculate_volumes(&mut self, cell_size: f64) -> Result<VolumeSummary> {
        let mut profiler = std::mem::take(&mut self.profiler);
        profiler.clear();
        let result = profiler.scope("calculate_volumes", |p| self.compute_volumes(cell_size, p));
        self.profiler = profiler;

        match result {
            Ok(set) => {
                let summary = set.summary();
                log::info!(
                    "computed {} volumes on a {:?} grid ({} blocked cells, {} unassigned anchors)",
                    summary.volume_count,
                    summary.grid_resolution,
                    summary.blocked_cells,
                    summary.unassigned_anchors
                );
                self.volumes = Some(set);
                Ok(summary)
            }
            Err(err) => {
                log::warn!("volume computation failed: {}", err);
                Err(err)
            }
        }
    }

    fn compute_volumes(&self, cell_size: f64, p: &mut Profiler) -> Result<VolumeSet<I>> {
        let grid = VoxelGrid::new(self.half_extents, cell_size, self.settings.max_cell_count)?;
        let leaf_size = self.settings.bvh_leaf_size;
        log::debug!("voxel grid {:?} at cell size {}", grid.res, cell_size);

        let planes = p.scope("collect_planes", |_| self.plane_rects());

        let mut labels = p.scope("rasterize", |_| {
            let bounds: Vec<_> = planes.iter().map(PlaneRect::bounds).collect();
            let mut plane_index = I::default();
            plane_index.build(&bounds, leaf_size);
            flood::rasterize(&grid, &planes, &plane_index, self.settings.epsilon)
        });

        let components = p.scope("flood_fill", |_| flood::flood_fill(&grid, &mut labels));
        let mut volumes: Vec<Volume> = components
            .into_iter()
            .enumerate()
            .map(|(i, c)| Volume {
                id: VolumeId(i as u32),
                bounds: c.bounds,
                cell_count: c.cell_count,
                anchors: Vec::new(),
            })
            .collect();

        // Per volume, the positions of its anchors in the order they were assigned.
        let mut positions: Vec<Vec<Vec3>> = vec![Vec::new(); volumes.len()];
        let anchor_volumes: Vec<Option<VolumeId>> = p.scope("assign_anchors", |_| {
            self.anchors
                .iter()
                .map(|(id, anchor)| {
                    let Some(cell) = grid.cell_of(&anchor.position) else {
                        log::warn!("anchor {:?} at {:?} is outside the world", id, anchor.position);
                        return None;
                    };
                    let label = labels[grid.index(cell[0], cell[1], cell[2])];
                    let volume = volumes.get_mut(label as usize)?;
                    volume.anchors.push(id);
                    positions[label as usize].push(anchor.position);
                    Some(volume.id)
                })
                .collect()
        });

        // Anchors were assigned in id order, so the lowest tree index is the lowest id.
        let anchor_trees = p.scope("build_anchor_trees", |_| {
            positions
                .par_iter()
                .map(|points| {
                    let mut tree = KdTree::new();
                    tree.build(points);
                    tree
                })
                .collect::<Vec<_>>()
        });

        let index = p.scope("build_bvh", |_| {
            let bounds: Vec<_> = volumes.iter().map(|v| v.bounds).collect();
            let mut index = I::default();
            index.build(&bounds, leaf_size);
            index
        });

        Ok(VolumeSet {
            grid,
            labels,
            volumes,
            anchor_volumes,
            anchor_trees,
            index,
        })
    }

    pub fn is_computed(&self) -> bool {
        self.volumes.is_some()
    }

    /// Volumes of the last successful computation, empty before the first one.
    pub fn volumes(&self) -> &[Volume] {
        match &self.volumes {
            Some(set) => &set.volumes,
            None => &[],
        }
    }

    pub fn volume(&self, id: VolumeId) -> Option<&Volume> {
        self.volumes().get(id.index())
    }

    /// Grid of the last successful computation.
    pub fn grid(&self) -> Option<&VoxelGrid> {
        self.volumes.as_ref().map(|set| &set.grid)
    }

    /// Volume the anchor was assigned to by the last computation.
    ///
    /// `None` for anchors outside the world, on a blocked cell, or added after the computation.
    pub fn anchor_volume(&self, id: AnchorId) -> Result<Option<VolumeId>> {
        let slot = self.anchors.slot(id).ok_or(WorldError::UnknownAnchor(id))?;
        Ok(self
            .volumes
            .as_ref()
            .and_then(|set| set.anchor_volumes.get(slot).copied().flatten()))
    }

    /// Volume containing `point`, or `None` outside the world, on a blocked cell or before
    /// the first computation.
    pub fn query_volume(&self, point: Vec3) -> Option<VolumeId> {
        self.volumes.as_ref()?.locate(&point)
    }

    /// The anchor nearest to `point` among those sharing its volume.
    ///
    /// Equal distances resolve to the lowest anchor id. Returns `None` when the point is in no
    /// volume or its volume has no anchors.
    pub fn query_point(&self, point: Vec3) -> Option<AnchorId> {
        self.volumes.as_ref()?.nearest_anchor(&point)
    }

    // --- Diagnostics ---

    /// Timing zones of the last volume computation.
    pub fn profiling_data(&self) -> TimingData {
        self.profiler.data()
    }

    pub(crate) fn volume_set(&self) -> Option<&VolumeSet<I>> {
        self.volumes.as_ref()
    }

    pub(crate) fn anchor_slice(&self) -> &[Anchor] {
        self.anchors.as_slice()
    }
}
