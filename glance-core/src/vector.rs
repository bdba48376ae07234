use std::ops::{Add, Div, Mul, Sub};

/// A 2-D vector in viewport pixels or image-space units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// -- Arithmetic operators --

impl Add for Vector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Vector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Scalar multiplication: `Vector * f64`.
impl Mul<f64> for Vector {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

/// Scalar division: `Vector / f64`.
impl Div<f64> for Vector {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f64) -> Self {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
        }
    }
}

impl From<(f64, f64)> for Vector {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Vector::new(150.0, 130.0);
        let b = Vector::new(100.0, 100.0);
        assert_eq!(a - b, Vector::new(50.0, 30.0));
        assert_eq!(a + b, Vector::new(250.0, 230.0));
        assert_eq!((a - b) / 2.0, Vector::new(25.0, 15.0));
        assert_eq!(b * 0.5, Vector::new(50.0, 50.0));
    }

    #[test]
    fn from_tuple() {
        assert_eq!(Vector::from((1.0, -2.0)), Vector::new(1.0, -2.0));
        assert_eq!(Vector::default(), Vector::ZERO);
    }
}
