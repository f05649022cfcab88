/// Generic axis-aligned bounding box for N-dimensional space.
///
/// Boxes are closed: a point on a face is contained. An [`empty`](BoundingBox::empty) box has
/// `min > max` on every axis and grows through [`expand`](BoundingBox::expand).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox<const D: usize> {
    pub min: [f64; D],
    pub max: [f64; D],
}

impl<const D: usize> BoundingBox<D> {
    pub fn new(min: [f64; D], max: [f64; D]) -> Self {
        Self { min, max }
    }

    /// A box that contains nothing and is the identity for [`union`](BoundingBox::union).
    pub fn empty() -> Self {
        Self {
            min: [f64::INFINITY; D],
            max: [f64::NEG_INFINITY; D],
        }
    }

    /// A box centered at `center` with the given half-extents.
    pub fn from_center(center: [f64; D], half: [f64; D]) -> Self {
        let mut b = Self::empty();
        for i in 0..D {
            b.min[i] = center[i] - half[i];
            b.max[i] = center[i] + half[i];
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    pub fn contains(&self, point: &[f64; D]) -> bool {
        (0..D).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    pub fn intersects(&self, other: &Self) -> bool {
        (0..D).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    pub fn expand(&mut self, point: &[f64; D]) {
        for i in 0..D {
            if point[i] < self.min[i] { self.min[i] = point[i]; }
            if point[i] > self.max[i] { self.max[i] = point[i]; }
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut b = *self;
        for i in 0..D {
            b.min[i] = b.min[i].min(other.min[i]);
            b.max[i] = b.max[i].max(other.max[i]);
        }
        b
    }

    pub fn center(&self) -> [f64; D] {
        let mut c = [0.0; D];
        for i in 0..D {
            c[i] = 0.5 * (self.min[i] + self.max[i]);
        }
        c
    }

    pub fn size(&self) -> [f64; D] {
        let mut s = [0.0; D];
        for i in 0..D {
            s[i] = self.max[i] - self.min[i];
        }
        s
    }

    /// Index of the axis with the largest extent, the first one on ties.
    pub fn longest_axis(&self) -> usize {
        let size = self.size();
        let mut axis = 0;
        for i in 1..D {
            if size[i] > size[axis] {
                axis = i;
            }
        }
        axis
    }
}

impl BoundingBox<3> {
    /// The eight corners, bit `i` of the corner index selecting `max` on axis `i`.
    pub fn corners(&self) -> [[f64; 3]; 8] {
        let mut out = [[0.0; 3]; 8];
        for (c, corner) in out.iter_mut().enumerate() {
            for i in 0..3 {
                corner[i] = if c & (1 << i) != 0 { self.max[i] } else { self.min[i] };
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_and_union() {
        let mut b = BoundingBox::<3>::empty();
        assert!(b.is_empty());
        b.expand(&[1.0, -2.0, 3.0]);
        b.expand(&[-1.0, 2.0, 0.0]);
        assert_eq!(b.min, [-1.0, -2.0, 0.0]);
        assert_eq!(b.max, [1.0, 2.0, 3.0]);

        let u = b.union(&BoundingBox::new([0.0, 0.0, 0.0], [5.0, 1.0, 1.0]));
        assert_eq!(u.max, [5.0, 2.0, 3.0]);
        assert_eq!(BoundingBox::<3>::empty().union(&b), b);
    }

    #[test]
    fn test_closed_containment() {
        let b = BoundingBox::from_center([0.0; 3], [1.0; 3]);
        assert!(b.contains(&[1.0, -1.0, 0.0]));
        assert!(!b.contains(&[1.0 + 1e-9, 0.0, 0.0]));
        assert!(b.intersects(&BoundingBox::new([1.0, 1.0, 1.0], [2.0, 2.0, 2.0])));
    }

    #[test]
    fn test_longest_axis() {
        let b = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 3.0, 2.0]);
        assert_eq!(b.longest_axis(), 1);
        assert_eq!(BoundingBox::new([0.0; 3], [1.0; 3]).longest_axis(), 0);
    }
}
