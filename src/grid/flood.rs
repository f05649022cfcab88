use std::collections::VecDeque;

use rayon::prelude::*;

use crate::algorithm::SpatialIndex;
use crate::bounds::BoundingBox;
use crate::delimiter::PlaneRect;
use crate::grid::VoxelGrid;

/// Label of a cell that intersects a delimiter plane.
pub const BLOCKED: u32 = u32::MAX;
/// Label of a passable cell that no flood fill has reached yet.
pub const UNVISITED: u32 = u32::MAX - 1;

/// A maximal face-connected set of passable cells.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// Lowest cell index of the component, where its fill started.
    pub seed: usize,
    pub cell_count: usize,
    /// World-space bounds of the component's cells.
    pub bounds: BoundingBox<3>,
}

/// Marks every cell that touches one of `rects` as [`BLOCKED`], all others as [`UNVISITED`].
///
/// Z slabs are processed in parallel. Each slab asks `index` (built over the rects' bounds)
/// which rectangles can reach it and only tests cells inside their bounds.
pub fn rasterize<I: SpatialIndex>(grid: &VoxelGrid, rects: &[PlaneRect], index: &I, epsilon: f64) -> Vec<u32> {
    let mut labels = vec![UNVISITED; grid.cell_count()];
    if rects.is_empty() {
        return labels;
    }

    let half = [0.5 * grid.cell_size; 3];
    let pad = 0.5 * grid.cell_size + epsilon;

    labels
        .par_chunks_mut(grid.slab_len())
        .enumerate()
        .for_each_init(
            || Vec::new(),
            |candidates, (z, slab)| {
                let z_lo = grid.min[2] + z as f64 * grid.cell_size;
                let slab_box = BoundingBox::new(
                    [f64::NEG_INFINITY, f64::NEG_INFINITY, z_lo - epsilon],
                    [f64::INFINITY, f64::INFINITY, z_lo + grid.cell_size + epsilon],
                );
                candidates.clear();
                index.visit_overlapping(&slab_box, |i| candidates.push(i));

                for &i in candidates.iter() {
                    let rect = &rects[i];
                    let b = rect.bounds();
                    let Some((x0, x1)) = grid.axis_range(0, b.min[0] - pad, b.max[0] + pad) else { continue };
                    let Some((y0, y1)) = grid.axis_range(1, b.min[1] - pad, b.max[1] + pad) else { continue };
                    for y in y0..=y1 {
                        for x in x0..=x1 {
                            let cell = x + y * grid.res[0];
                            if slab[cell] == BLOCKED {
                                continue;
                            }
                            if rect.overlaps_box(grid.cell_center([x, y, z]), half, epsilon) {
                                slab[cell] = BLOCKED;
                            }
                        }
                    }
                }
            },
        );

    labels
}

/// Labels every passable cell with the index of its 6-connected component.
///
/// Seeds are taken in cell index order and each component is grown with a FIFO queue,
/// so numbering is deterministic for a given blocked set.
pub fn flood_fill(grid: &VoxelGrid, labels: &mut [u32]) -> Vec<Component> {
    let mut components = Vec::new();
    let mut queue = VecDeque::new();
    for seed in 0..labels.len() {
        if labels[seed] != UNVISITED {
            continue;
        }
        let label = components.len() as u32;
        let mut component = Component {
            seed,
            cell_count: 0,
            bounds: BoundingBox::empty(),
        };

        labels[seed] = label;
        queue.push_back(seed);
        while let Some(cell) = queue.pop_front() {
            component.cell_count += 1;
            component.bounds = component.bounds.union(&grid.cell_bounds(grid.coords(cell)));

            for next in grid.neighbors(cell) {
                if labels[next] == UNVISITED {
                    labels[next] = label;
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components
}
