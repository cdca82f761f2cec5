use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl<T: std::ops::Add<Output = T> + Copy> Rect<T> {
    pub fn max(&self) -> Vec2<T> {
        self.origin + self.size
    }
}

impl<T: std::ops::Sub<Output = T> + Copy> Rect<T> {
    pub fn from_min_max(min: Vec2<T>, max: Vec2<T>) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }
}

impl Rect<f32> {
    pub fn center(&self) -> Vec2<f32> {
        Vec2::new(
            self.origin.x + self.size.x / 2.0,
            self.origin.y + self.size.y / 2.0,
        )
    }

    /// Smallest rectangle containing every point, or `None` for an empty set.
    pub fn bounding(points: impl IntoIterator<Item = Vec2<f32>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_min_max(min, max))
    }

    /// Shrink the rectangle so it lies inside `bounds`. Sizes never go negative.
    pub fn clamp_to(&self, bounds: Rect<f32>) -> Self {
        let bounds_max = bounds.max();
        let min = self.origin.max(bounds.origin).min(bounds_max);
        let max = self.max().min(bounds_max).max(min);
        Self::from_min_max(min, max)
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }
}
