//! World configuration

/// Default ceiling for the number of voxels a single computation may allocate (2^26).
pub const DEFAULT_MAX_CELL_COUNT: usize = 1 << 26;

/// Tunables for a [`World`](crate::World).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldSettings {
    /// Grids with more cells than this are rejected with `CellLimitExceeded`. Values above
    /// [`MAX_GRID_CELLS`](crate::MAX_GRID_CELLS) act as that limit.
    pub max_cell_count: usize,

    /// Maximum number of entries in a BVH leaf.
    pub bvh_leaf_size: usize,

    /// Geometric tolerance used by plane rasterization and containment tests.
    pub epsilon: f64,

    /// Adding a plane on an occupied face replaces it; otherwise it fails with `DuplicatePlane`.
    pub replace_duplicate_planes: bool,

    /// Record profiling zones during volume computation.
    pub profiling: bool,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            max_cell_count: DEFAULT_MAX_CELL_COUNT,
            bvh_leaf_size: 4,
            epsilon: 1e-5,
            replace_duplicate_planes: true,
            profiling: true,
        }
    }
}

impl WorldSettings {
    pub fn with_max_cell_count(mut self, max_cell_count: usize) -> Self {
        self.max_cell_count = max_cell_count;
        self
    }

    pub fn with_bvh_leaf_size(mut self, bvh_leaf_size: usize) -> Self {
        self.bvh_leaf_size = bvh_leaf_size.max(1);
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_replace_duplicate_planes(mut self, replace: bool) -> Self {
        self.replace_duplicate_planes = replace;
        self
    }

    pub fn with_profiling(mut self, profiling: bool) -> Self {
        self.profiling = profiling;
        self
    }
}
