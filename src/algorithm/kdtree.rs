use crate::geometry::{Vec3, distance_sq};

/// Points per leaf.
const LEAF_SIZE: usize = 8;

#[derive(Clone, Copy, Debug)]
struct KdNode {
    min: Vec3,
    max: Vec3,
    left: u32, // u32::MAX if leaf
    right: u32,
    // Leaf data: indices[start..end]
    start: u32,
    end: u32,
    // Internal node data
    split_val: f64,
    axis: u8,
}

/// A kd-tree over a fixed set of points, stored as a flat node array.
///
/// Reported indices are positions in the slice given to [`build`](KdTree::build).
#[derive(Debug, Default)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    indices: Vec<usize>,
    points: Vec<Vec3>,
}

impl KdTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn build(&mut self, points: &[Vec3]) {
        self.points = points.to_vec();
        self.indices = (0..points.len()).collect();
        self.nodes.clear();

        if points.is_empty() {
            return;
        }

        // A balanced tree has 2*N/LEAF_SIZE nodes roughly
        self.nodes.reserve(2 * points.len() / LEAF_SIZE + 1);
        self.build_recursive(0, points.len());
    }

    fn build_recursive(&mut self, start: usize, end: usize) -> u32 {
        let count = end - start;

        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for &idx in &self.indices[start..end] {
            let p = self.points[idx];
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if count <= LEAF_SIZE {
            let node_idx = self.nodes.len() as u32;
            self.nodes.push(KdNode {
                min,
                max,
                left: u32::MAX,
                right: u32::MAX,
                start: start as u32,
                end: end as u32,
                split_val: 0.0,
                axis: 0,
            });
            return node_idx;
        }

        let axis = if (max[0] - min[0]) >= (max[1] - min[1]) && (max[0] - min[0]) >= (max[2] - min[2]) {
            0
        } else if (max[1] - min[1]) >= (max[2] - min[2]) {
            1
        } else {
            2
        };

        // Median split
        let mid = start + count / 2;
        let points = &self.points;
        self.indices[start..end].select_nth_unstable_by(count / 2, |&a, &b| points[a][axis].total_cmp(&points[b][axis]));
        let split_val = self.points[self.indices[mid]][axis];

        let left = self.build_recursive(start, mid);
        let right = self.build_recursive(mid, end);

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(KdNode {
            min,
            max,
            left,
            right,
            start: 0,
            end: 0,
            split_val,
            axis: axis as u8,
        });
        node_idx
    }

    /// Calls `callback(index, distance_sq)` for every point that may lie within the search
    /// radius. The callback returns the new squared radius, so the search shrinks as closer
    /// points are found. Points exactly on the radius are still reported.
    pub fn query<F>(&self, point: &Vec3, mut max_dist_sq: f64, callback: &mut F)
    where
        F: FnMut(usize, f64) -> f64,
    {
        if self.nodes.is_empty() {
            return;
        }
        // Root is the last node pushed in our recursive build
        let root_idx = (self.nodes.len() - 1) as u32;
        self.query_recursive(root_idx, point, &mut max_dist_sq, callback);
    }

    fn query_recursive<F>(&self, node_idx: u32, point: &Vec3, max_dist_sq: &mut f64, callback: &mut F)
    where
        F: FnMut(usize, f64) -> f64,
    {
        let node = &self.nodes[node_idx as usize];

        let mut d2 = 0.0;
        for i in 0..3 {
            let v = point[i];
            if v < node.min[i] {
                d2 += (node.min[i] - v).powi(2);
            } else if v > node.max[i] {
                d2 += (v - node.max[i]).powi(2);
            }
        }
        if d2 > *max_dist_sq {
            return;
        }

        if node.left == u32::MAX {
            for &idx in &self.indices[node.start as usize..node.end as usize] {
                *max_dist_sq = callback(idx, distance_sq(self.points[idx], *point));
            }
            return;
        }

        let axis = node.axis as usize;
        let diff = point[axis] - node.split_val;

        // Visit nearest child first
        let (first, second) = if diff <= 0.0 { (node.left, node.right) } else { (node.right, node.left) };

        self.query_recursive(first, point, max_dist_sq, callback);
        if diff * diff <= *max_dist_sq {
            self.query_recursive(second, point, max_dist_sq, callback);
        }
    }

    /// Index of the point closest to `point`. Equal distances resolve to the lowest index.
    pub fn nearest(&self, point: &Vec3) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        self.query(point, f64::INFINITY, &mut |idx, d2| {
            let closer = match best {
                Some((best_idx, best_d2)) => d2 < best_d2 || (d2 == best_d2 && idx < best_idx),
                None => true,
            };
            if closer {
                best = Some((idx, d2));
            }
            best.map_or(f64::INFINITY, |(_, d2)| d2)
        });
        best.map(|(idx, _)| idx)
    }
}
