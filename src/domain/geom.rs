/// Axis-aligned boxes in world units. Y grows downward.

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Aabb {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Aabb {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Aabb { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Overlap on both axes. Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        if other.x > self.right() || other.right() < self.x {
            return false;
        }
        if other.y > self.bottom() || other.bottom() < self.y {
            return false;
        }
        true
    }

    /// Strict point containment: points on an edge are outside.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px > self.x && px < self.right() && py > self.y && py < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_boxes_overlap() {
        let a = Aabb::new(0.0, 0.0, 16.0, 16.0);
        let b = Aabb::new(16.0, 0.0, 16.0, 16.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn separated_on_one_axis_is_enough() {
        let a = Aabb::new(0.0, 0.0, 16.0, 16.0);
        let b = Aabb::new(4.0, 16.5, 4.0, 4.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn contains_excludes_edges() {
        let a = Aabb::new(96.0, 116.0, 16.0, 16.0);
        assert!(a.contains(100.0, 118.0));
        assert!(!a.contains(100.0, 116.0));
        assert!(!a.contains(112.0, 120.0));
    }
}
