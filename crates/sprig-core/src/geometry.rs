use std::ops::{Add, Mul};

/// An axis-aligned rectangle described by its top-left corner and size.
///
/// Used for both source rectangles (pixels within a texture) and destination
/// rectangles (pixels on the render surface). Y grows downwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect<T> {
    pub x: T,
    pub y: T,
    pub width: T,
    pub height: T,
}

impl<T> Rect<T> {
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

impl<T: Copy + Add<Output = T>> Rect<T> {
    pub fn left(&self) -> T {
        self.x
    }

    pub fn top(&self) -> T {
        self.y
    }

    pub fn right(&self) -> T {
        self.x + self.width
    }

    pub fn bottom(&self) -> T {
        self.y + self.height
    }

    pub fn size(&self) -> Size<T> {
        Size {
            width: self.width,
            height: self.height,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub const fn new(width: T, height: T) -> Self {
        Size { width, height }
    }

    pub fn cast<U: From<T>>(self) -> Size<U> {
        Size {
            width: U::from(self.width),
            height: U::from(self.height),
        }
    }
}

impl<T: Default + PartialEq> Size<T> {
    /// Whether either dimension is zero, e.g. a minimized window.
    pub fn is_empty(&self) -> bool {
        self.width == T::default() || self.height == T::default()
    }
}

impl<T: Mul + Copy> Mul<T> for Size<T> {
    type Output = Size<<T as Mul>::Output>;

    fn mul(self, rhs: T) -> Self::Output {
        Size {
            width: self.width * rhs,
            height: self.height * rhs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10, 20, 30, 40);

        assert_eq!(rect.left(), 10);
        assert_eq!(rect.top(), 20);
        assert_eq!(rect.right(), 40);
        assert_eq!(rect.bottom(), 60);
        assert_eq!(rect.size(), Size::new(30, 40));
    }

    #[test]
    fn test_default_rect_is_zero() {
        assert_eq!(Rect::<i32>::default(), Rect::new(0, 0, 0, 0));
    }

    #[test]
    fn test_size_cast_and_scale() {
        let size: Size<f64> = Size::new(800u32, 600u32).cast();
        assert_eq!(size, Size::new(800.0, 600.0));
        assert_eq!(Size::new(2, 3) * 4, Size::new(8, 12));
    }

    #[test]
    fn test_size_is_empty() {
        assert!(Size::new(0u32, 0u32).is_empty());
        assert!(Size::new(800u32, 0u32).is_empty());
        assert!(!Size::new(1u32, 1u32).is_empty());
    }
}
