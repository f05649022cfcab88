use crate::bounds::BoundingBox;

pub mod bvh;
pub mod kdtree;
pub mod linear;

/// Trait defining a spatial acceleration structure over axis-aligned boxes.
/// This allows swapping between the BVH and a brute-force reference scan.
pub trait SpatialIndex: Default + Send + Sync {
    /// Rebuild the index over `entries`. Visitors report positions in this slice.
    ///
    /// # Arguments
    /// * `entries` - The boxes to index. Empty boxes are never reported.
    /// * `leaf_size` - Maximum number of entries per leaf, for structures that have leaves.
    fn build(&mut self, entries: &[BoundingBox<3>], leaf_size: usize);

    /// Number of indexed entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visit every entry whose box contains `point`.
    fn visit_containing<F>(&self, point: &[f64; 3], visitor: F)
    where
        F: FnMut(usize);

    /// The first entry whose box contains `point` and that `accept` agrees to. The search
    /// stops there.
    fn find_containing<F>(&self, point: &[f64; 3], accept: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool;

    /// Visit every entry whose box intersects `region`.
    fn visit_overlapping<F>(&self, region: &BoundingBox<3>, visitor: F)
    where
        F: FnMut(usize);

    /// Visit the internal structure for diagnostics: node bounds and tree depth.
    fn visit_nodes<F>(&self, visitor: F)
    where
        F: FnMut(&BoundingBox<3>, usize);
}
