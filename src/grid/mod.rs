//! Regular voxel grid covering the world region.

pub mod flood;

use crate::bounds::BoundingBox;
use crate::error::{Result, WorldError};
use crate::geometry::Vec3;

/// Largest grid any computation may allocate, whatever the configured limit. Larger grids
/// would hand out volume labels that collide with the flood fill sentinels.
pub const MAX_GRID_CELLS: usize = flood::UNVISITED as usize - 1;

/// A uniform grid of cubic cells anchored at the world minimum corner.
///
/// The last layer along an axis may overhang the world when its extent is not a multiple
/// of the cell size.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    /// Number of cells along X, Y and Z.
    pub res: [usize; 3],
    /// Edge length of one cell.
    pub cell_size: f64,
    /// Minimum corner of the grid, equal to the world minimum.
    pub min: Vec3,
    /// The world region the grid was built for.
    pub world: BoundingBox<3>,
}

impl VoxelGrid {
    /// Creates a grid over `[-half, +half]`, rejecting invalid cell sizes and grids above `max_cells`.
    ///
    /// `max_cells` is capped at [`MAX_GRID_CELLS`].
    pub fn new(half_extents: Vec3, cell_size: f64, max_cells: usize) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(WorldError::InvalidCellSize(cell_size));
        }

        let mut res_f = [0.0; 3];
        for i in 0..3 {
            res_f[i] = (2.0 * half_extents[i] / cell_size).ceil().max(1.0);
        }
        let limit = max_cells.min(MAX_GRID_CELLS);
        let requested = res_f[0] * res_f[1] * res_f[2];
        if !requested.is_finite() || requested > limit as f64 {
            return Err(WorldError::CellLimitExceeded {
                requested: requested as u128,
                limit,
            });
        }

        let world = BoundingBox::from_center([0.0; 3], half_extents);
        Ok(Self {
            res: res_f.map(|r| r as usize),
            cell_size,
            min: world.min,
            world,
        })
    }

    pub fn cell_count(&self) -> usize {
        self.res[0] * self.res[1] * self.res[2]
    }

    /// Number of cells in one XY slab.
    pub fn slab_len(&self) -> usize {
        self.res[0] * self.res[1]
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.res[0] + z * self.res[0] * self.res[1]
    }

    #[inline]
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let slab = self.slab_len();
        let z = index / slab;
        let rem = index % slab;
        [rem % self.res[0], rem / self.res[0], z]
    }

    pub fn cell_min(&self, c: [usize; 3]) -> Vec3 {
        let mut p = [0.0; 3];
        for i in 0..3 {
            p[i] = self.min[i] + c[i] as f64 * self.cell_size;
        }
        p
    }

    pub fn cell_center(&self, c: [usize; 3]) -> Vec3 {
        let mut p = self.cell_min(c);
        for v in &mut p {
            *v += 0.5 * self.cell_size;
        }
        p
    }

    pub fn cell_bounds(&self, c: [usize; 3]) -> BoundingBox<3> {
        BoundingBox::from_center(self.cell_center(c), [0.5 * self.cell_size; 3])
    }

    /// The cell containing `point`, or `None` outside the world bounds.
    ///
    /// Coordinates on a cell boundary floor toward negative infinity; the world maximum
    /// itself maps to the last cell.
    pub fn cell_of(&self, point: &Vec3) -> Option<[usize; 3]> {
        if !self.world.contains(point) {
            return None;
        }
        let mut c = [0; 3];
        for i in 0..3 {
            let f = ((point[i] - self.min[i]) / self.cell_size).floor();
            c[i] = (f.max(0.0) as usize).min(self.res[i] - 1);
        }
        Some(c)
    }

    /// Inclusive cell index range along `axis` touched by `[lo, hi]`, clamped to the grid.
    pub fn axis_range(&self, axis: usize, lo: f64, hi: f64) -> Option<(usize, usize)> {
        let a = ((lo - self.min[axis]) / self.cell_size).floor();
        let b = ((hi - self.min[axis]) / self.cell_size).floor();
        let last = (self.res[axis] - 1) as f64;
        if b < 0.0 || a > last || a.is_nan() || b.is_nan() {
            return None;
        }
        Some((a.max(0.0) as usize, b.min(last) as usize))
    }

    /// The face-adjacent neighbours of `index`, skipping those outside the grid.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        let [x, y, z] = self.coords(index);
        let [nx, ny, nz] = self.res;
        let slab = self.slab_len();
        [
            (x + 1 < nx).then(|| index + 1),
            (x > 0).then(|| index - 1),
            (y + 1 < ny).then(|| index + nx),
            (y > 0).then(|| index - nx),
            (z + 1 < nz).then(|| index + slab),
            (z > 0).then(|| index - slab),
        ]
        .into_iter()
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_rounds_up() {
        let grid = VoxelGrid::new([10.0, 10.0, 1.0], 3.0, 1 << 20).unwrap();
        assert_eq!(grid.res, [7, 7, 1]);
        assert_eq!(grid.min, [-10.0, -10.0, -1.0]);
    }

    #[test]
    fn test_invalid_cell_sizes() {
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                VoxelGrid::new([1.0; 3], size, 100),
                Err(WorldError::InvalidCellSize(_))
            ));
        }
        assert_eq!(
            VoxelGrid::new([10.0; 3], 1.0, 1000),
            Err(WorldError::CellLimitExceeded { requested: 8000, limit: 1000 })
        );
        assert!(matches!(
            VoxelGrid::new([1e200; 3], 1e-200, usize::MAX),
            Err(WorldError::CellLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_cell_limit_is_capped_below_label_sentinels() {
        // 2e5^3 cells fit in usize but not in a u32 label.
        assert_eq!(
            VoxelGrid::new([1e5; 3], 1.0, usize::MAX),
            Err(WorldError::CellLimitExceeded {
                requested: 8_000_000_000_000_000,
                limit: MAX_GRID_CELLS,
            })
        );
        assert_eq!(MAX_GRID_CELLS as u32, u32::MAX - 2);
        assert!((MAX_GRID_CELLS as u32) < flood::UNVISITED);
    }

    #[test]
    fn test_cell_of_floors_and_clamps() {
        let grid = VoxelGrid::new([10.0; 3], 1.0, 1 << 20).unwrap();
        assert_eq!(grid.cell_of(&[0.0, 0.0, 0.0]), Some([10, 10, 10]));
        assert_eq!(grid.cell_of(&[-0.0001, 0.0, 0.0]), Some([9, 10, 10]));
        assert_eq!(grid.cell_of(&[10.0, -10.0, 0.5]), Some([19, 0, 10]));
        assert_eq!(grid.cell_of(&[10.0001, 0.0, 0.0]), None);
        assert_eq!(grid.cell_of(&[f64::NAN, 0.0, 0.0]), None);
    }

    #[test]
    fn test_index_round_trip_and_neighbors() {
        let grid = VoxelGrid::new([2.0, 1.0, 1.5], 1.0, 1 << 20).unwrap();
        assert_eq!(grid.res, [4, 2, 3]);
        let i = grid.index(3, 1, 2);
        assert_eq!(grid.coords(i), [3, 1, 2]);

        let mut n: Vec<_> = grid.neighbors(i).map(|j| grid.coords(j)).collect();
        n.sort();
        assert_eq!(n, vec![[2, 1, 2], [3, 0, 2], [3, 1, 1]]);
        assert_eq!(grid.neighbors(grid.index(1, 0, 1)).count(), 5);
    }

    #[test]
    fn test_axis_range_clamps() {
        let grid = VoxelGrid::new([10.0; 3], 1.0, 1 << 20).unwrap();
        assert_eq!(grid.axis_range(0, -100.0, 100.0), Some((0, 19)));
        assert_eq!(grid.axis_range(1, 4.5, 5.0), Some((14, 15)));
        assert_eq!(grid.axis_range(2, 11.0, 12.0), None);
    }
}
