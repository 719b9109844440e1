use super::geometry::{Rect, RectExt};

/// A set of pixels stored as pairwise disjoint, non-empty rectangles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    rects: Vec<Rect>,
}

impl Region {
    pub fn new() -> Self { Region::default() }

    pub fn from_rects(rects: impl IntoIterator<Item = Rect>) -> Self {
        let mut region = Region::new();
        for rect in rects {
            region.union_rect(rect);
        }
        region
    }

    pub fn rects(&self) -> &[Rect] { &self.rects }

    pub fn is_empty(&self) -> bool { self.rects.is_empty() }

    pub fn area(&self) -> i64 { self.rects.iter().map(RectExt::area).sum() }

    pub fn bounds(&self) -> Rect {
        self.rects.iter().fold(Rect::default(), |acc, r| acc.union(r))
    }

    pub fn union_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        let mut pieces = vec![rect];
        for existing in &self.rects {
            pieces = pieces.into_iter().flat_map(|p| difference(p, *existing)).collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    pub fn subtract_rect(&mut self, rect: Rect) {
        if rect.is_empty() {
            return;
        }
        self.rects = self.rects.iter().flat_map(|r| difference(*r, rect)).collect();
    }

    /// Area of `rect` covered by the region.
    pub fn covered_area(&self, rect: Rect) -> i64 {
        self.rects.iter().map(|r| r.intersection(&rect).area()).sum()
    }

    /// True if every pixel of `rect` lies inside the region.
    pub fn contains_rect(&self, rect: Rect) -> bool {
        if rect.is_empty() {
            return self.rects.iter().any(|r| r.contains_rect(rect));
        }
        self.covered_area(rect) == rect.area()
    }
}

/// `a` minus `b`, split into at most four disjoint bands.
fn difference(a: Rect, b: Rect) -> Vec<Rect> {
    let cut = a.intersection(&b);
    if cut.is_empty() {
        return vec![a];
    }
    let mut out = Vec::with_capacity(4);
    let bands = [
        Rect::new(a.min_x(), a.min_y(), a.size.width, cut.min_y() - a.min_y()),
        Rect::new(a.min_x(), cut.max_y(), a.size.width, a.max_y() - cut.max_y()),
        Rect::new(a.min_x(), cut.min_y(), cut.min_x() - a.min_x(), cut.size.height),
        Rect::new(cut.max_x(), cut.min_y(), a.max_x() - cut.max_x(), cut.size.height),
    ];
    out.extend(bands.into_iter().filter(|r| !r.is_empty()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_overlapping_rects_has_no_double_counting() {
        let region = Region::from_rects([Rect::new(0, 0, 100, 100), Rect::new(50, 50, 100, 100)]);
        assert_eq!(region.area(), 100 * 100 * 2 - 50 * 50);
        assert_eq!(region.bounds(), Rect::new(0, 0, 150, 150));
    }

    #[test]
    fn union_of_contained_rect_is_a_no_op() {
        let mut region = Region::from_rects([Rect::new(0, 0, 100, 100)]);
        region.union_rect(Rect::new(10, 10, 10, 10));
        assert_eq!(region.rects(), &[Rect::new(0, 0, 100, 100)]);
    }

    #[test]
    fn subtracting_a_strut_leaves_the_rest() {
        let mut region = Region::from_rects([Rect::new(0, 0, 1000, 800)]);
        region.subtract_rect(Rect::new(0, 0, 1000, 30));
        assert_eq!(region.area(), 1000 * 770);
        assert!(region.contains_rect(Rect::new(0, 30, 1000, 770)));
        assert!(!region.contains_rect(Rect::new(0, 29, 100, 100)));
    }

    #[test]
    fn contains_rect_spanning_two_outputs() {
        let region = Region::from_rects([Rect::new(0, 0, 100, 100), Rect::new(100, 0, 100, 100)]);
        assert!(region.contains_rect(Rect::new(50, 10, 100, 50)));
        assert!(!region.contains_rect(Rect::new(150, 10, 100, 50)));
    }

    #[test]
    fn subtracting_everything_empties_the_region() {
        let mut region = Region::from_rects([Rect::new(0, 0, 100, 100)]);
        region.subtract_rect(Rect::new(-10, -10, 200, 200));
        assert!(region.is_empty());
        assert!(!region.contains_rect(Rect::new(0, 0, 1, 1)));
    }

    #[test]
    fn hole_in_the_middle() {
        let mut region = Region::from_rects([Rect::new(0, 0, 300, 300)]);
        region.subtract_rect(Rect::new(100, 100, 100, 100));
        assert_eq!(region.area(), 300 * 300 - 100 * 100);
        assert!(region.contains_rect(Rect::new(0, 0, 300, 100)));
        assert!(!region.contains_rect(Rect::new(50, 50, 100, 100)));
    }
}
