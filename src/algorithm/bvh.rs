use crate::algorithm::SpatialIndex;
use crate::bounds::BoundingBox;

/// Recursion stops here even if a node holds more than `leaf_size` entries.
pub const MAX_DEPTH: usize = 32;

#[derive(Clone, Copy, Debug)]
struct BvhNode {
    bounds: BoundingBox<3>,
    left: u32, // u32::MAX if leaf
    right: u32,
    // Leaf data: indices[start..end]
    start: u32,
    end: u32,
}

/// A bounding volume hierarchy stored as a flat node array.
///
/// Nodes split at the median of the entry centers along the longest axis of the node
/// bounds, until a node holds at most `leaf_size` entries.
#[derive(Debug, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    indices: Vec<usize>,
    entries: Vec<BoundingBox<3>>,
}

impl Bvh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Depth of the deepest leaf, 0 for a single leaf or an empty tree.
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        self.visit_nodes(|_, depth| max_depth = max_depth.max(depth));
        max_depth
    }

    fn root(&self) -> Option<u32> {
        // Root is the last node pushed in our recursive build
        self.nodes.len().checked_sub(1).map(|i| i as u32)
    }

    fn build_recursive(&mut self, start: usize, end: usize, leaf_size: usize, depth: usize) -> u32 {
        let count = end - start;

        let mut bounds = BoundingBox::empty();
        for &idx in &self.indices[start..end] {
            bounds = bounds.union(&self.entries[idx]);
        }

        if count <= leaf_size || depth >= MAX_DEPTH {
            let node_idx = self.nodes.len() as u32;
            self.nodes.push(BvhNode {
                bounds,
                left: u32::MAX,
                right: u32::MAX,
                start: start as u32,
                end: end as u32,
            });
            return node_idx;
        }

        // Median split
        let axis = bounds.longest_axis();
        let entries = &self.entries;
        self.indices[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            let va = entries[a].center()[axis];
            let vb = entries[b].center()[axis];
            va.total_cmp(&vb)
        });
        let mid = start + count / 2;

        let left = self.build_recursive(start, mid, leaf_size, depth + 1);
        let right = self.build_recursive(mid, end, leaf_size, depth + 1);

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(BvhNode {
            bounds,
            left,
            right,
            start: 0,
            end: 0,
        });
        node_idx
    }

    /// Walks every node `prune` accepts. Stops at the first entry `visitor` returns true for.
    fn descend<P, F>(&self, prune: P, mut visitor: F) -> Option<usize>
    where
        P: Fn(&BoundingBox<3>) -> bool,
        F: FnMut(usize) -> bool,
    {
        let root = self.root()?;
        let mut stack = vec![root];
        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            if !prune(&node.bounds) {
                continue;
            }
            if node.left == u32::MAX {
                for &idx in &self.indices[node.start as usize..node.end as usize] {
                    if prune(&self.entries[idx]) && visitor(idx) {
                        return Some(idx);
                    }
                }
                continue;
            }
            // Both children may qualify.
            stack.push(node.right);
            stack.push(node.left);
        }
        None
    }
}

impl SpatialIndex for Bvh {
    fn build(&mut self, entries: &[BoundingBox<3>], leaf_size: usize) {
        self.nodes.clear();
        self.entries = entries.to_vec();
        self.indices = (0..entries.len())
            .filter(|&i| !entries[i].is_empty())
            .collect();

        if self.indices.is_empty() {
            return;
        }

        // A balanced tree has 2*N/leaf_size nodes roughly
        let leaf_size = leaf_size.max(1);
        self.nodes.reserve(2 * self.indices.len() / leaf_size + 1);

        self.build_recursive(0, self.indices.len(), leaf_size, 0);
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    fn visit_containing<F>(&self, point: &[f64; 3], mut visitor: F)
    where
        F: FnMut(usize),
    {
        self.descend(|b| b.contains(point), |i| {
            visitor(i);
            false
        });
    }

    fn find_containing<F>(&self, point: &[f64; 3], accept: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        self.descend(|b| b.contains(point), accept)
    }

    fn visit_overlapping<F>(&self, region: &BoundingBox<3>, mut visitor: F)
    where
        F: FnMut(usize),
    {
        self.descend(|b| b.intersects(region), |i| {
            visitor(i);
            false
        });
    }

    fn visit_nodes<F>(&self, mut visitor: F)
    where
        F: FnMut(&BoundingBox<3>, usize),
    {
        let Some(root) = self.root() else { return };
        let mut stack = vec![(root, 0)];
        while let Some((node_idx, depth)) = stack.pop() {
            let node = &self.nodes[node_idx as usize];
            visitor(&node.bounds, depth);
            if node.left != u32::MAX {
                stack.push((node.right, depth + 1));
                stack.push((node.left, depth + 1));
            }
        }
    }
}
