use crate::algorithm::SpatialIndex;
use crate::bounds::BoundingBox;

/// Brute-force index that tests every entry.
///
/// Used as the reference implementation when checking [`Bvh`](crate::Bvh) results.
#[derive(Debug, Default)]
pub struct LinearIndex {
    entries: Vec<BoundingBox<3>>,
}

impl SpatialIndex for LinearIndex {
    fn build(&mut self, entries: &[BoundingBox<3>], _leaf_size: usize) {
        self.entries = entries.to_vec();
    }

    fn len(&self) -> usize {
        self.entries.iter().filter(|b| !b.is_empty()).count()
    }

    fn visit_containing<F>(&self, point: &[f64; 3], mut visitor: F)
    where
        F: FnMut(usize),
    {
        for (i, b) in self.entries.iter().enumerate() {
            if b.contains(point) {
                visitor(i);
            }
        }
    }

    fn find_containing<F>(&self, point: &[f64; 3], mut accept: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        self.entries
            .iter()
            .enumerate()
            .position(|(i, b)| b.contains(point) && accept(i))
    }

    fn visit_overlapping<F>(&self, region: &BoundingBox<3>, mut visitor: F)
    where
        F: FnMut(usize),
    {
        for (i, b) in self.entries.iter().enumerate() {
            if b.intersects(region) {
                visitor(i);
            }
        }
    }

    fn visit_nodes<F>(&self, mut visitor: F)
    where
        F: FnMut(&BoundingBox<3>, usize),
    {
        for b in self.entries.iter().filter(|b| !b.is_empty()) {
            visitor(b, 0);
        }
    }
}
