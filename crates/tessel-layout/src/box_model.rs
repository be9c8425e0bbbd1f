//! CSS Box Model

/// Rectangle, relative to the parent's border box
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether any component differs by more than `epsilon`
    pub fn differs(&self, other: &Rect, epsilon: f32) -> bool {
        (self.x - other.x).abs() > epsilon
            || (self.y - other.y).abs() > epsilon
            || (self.width - other.width).abs() > epsilon
            || (self.height - other.height).abs() > epsilon
    }
}

/// Width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size<T = f32> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

/// Edge sizes (top, right, bottom, left)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeSizes {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl EdgeSizes {
    /// left + right
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// top + bottom
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn add(&self, other: &EdgeSizes) -> EdgeSizes {
        EdgeSizes {
            top: self.top + other.top,
            right: self.right + other.right,
            bottom: self.bottom + other.bottom,
            left: self.left + other.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differs_uses_epsilon() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.differs(&Rect::new(0.005, 0.0, 10.0, 10.0), 0.01));
        assert!(a.differs(&Rect::new(0.0, 0.0, 10.5, 10.0), 0.01));
    }

    #[test]
    fn test_edges() {
        let e = EdgeSizes {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(e.horizontal(), 6.0);
        assert_eq!(e.vertical(), 4.0);
        assert_eq!(e.add(&e).left, 8.0);
    }
}
