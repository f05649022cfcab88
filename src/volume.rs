use crate::algorithm::SpatialIndex;
use crate::algorithm::kdtree::KdTree;
use crate::bounds::BoundingBox;
use crate::entity::AnchorId;
use crate::grid::VoxelGrid;
use crate::grid::flood::BLOCKED;

/// Identifier of a volume within one computation. Ids restart from zero on every recompute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeId(pub u32);

impl VolumeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A maximal connected region of passable cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Volume {
    pub id: VolumeId,
    /// World-space bounds of the volume's cells.
    pub bounds: BoundingBox<3>,
    pub cell_count: usize,
    /// Anchors inside this volume, in insertion order.
    pub anchors: Vec<AnchorId>,
}

/// Totals of a successful volume computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolumeSummary {
    pub volume_count: usize,
    pub grid_resolution: [usize; 3],
    pub blocked_cells: usize,
    /// Anchors outside the world or on a blocked cell.
    pub unassigned_anchors: usize,
}

/// Everything one computation produced. Replaced as a whole on every successful recompute.
#[derive(Debug)]
pub(crate) struct VolumeSet<I> {
    pub grid: VoxelGrid,
    /// Per cell: the volume index, or [`BLOCKED`].
    pub labels: Vec<u32>,
    pub volumes: Vec<Volume>,
    /// Per anchor slot at computation time.
    pub anchor_volumes: Vec<Option<VolumeId>>,
    /// Per volume: the positions of `Volume::anchors`, in the same order.
    pub anchor_trees: Vec<KdTree>,
    pub index: I,
}

impl<I: SpatialIndex> VolumeSet<I> {
    /// Volume containing `point`.
    ///
    /// The index is searched at the center of the cell holding `point`, which lies inside the
    /// bounds of whichever volume owns that cell. A bounds hit only counts when the cell is
    /// labeled with that volume, and the search stops at the first one.
    pub fn locate(&self, point: &[f64; 3]) -> Option<VolumeId> {
        let cell = self.grid.cell_of(point)?;
        let label = self.labels[self.grid.index(cell[0], cell[1], cell[2])];
        if label == BLOCKED {
            return None;
        }
        let center = self.grid.cell_center(cell);
        self.index
            .find_containing(&center, |i| i as u32 == label)
            .map(|i| VolumeId(i as u32))
    }

    /// Nearest anchor to `point` within its volume. Ties go to the lowest anchor id.
    pub fn nearest_anchor(&self, point: &[f64; 3]) -> Option<AnchorId> {
        let id = self.locate(point)?;
        let nearest = self.anchor_trees.get(id.index())?.nearest(point)?;
        self.volumes.get(id.index())?.anchors.get(nearest).copied()
    }

    pub fn summary(&self) -> VolumeSummary {
        VolumeSummary {
            volume_count: self.volumes.len(),
            grid_resolution: self.grid.res,
            blocked_cells: self.labels.iter().filter(|&&l| l == BLOCKED).count(),
            unassigned_anchors: self.anchor_volumes.iter().filter(|v| v.is_none()).count(),
        }
    }
}
