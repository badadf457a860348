//! World-space math.
//!
//! The game is planar, so the only vector type is [`Vec2`].

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 2D Vector - world positions, cursor positions, move targets
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Creates a new Vec2
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Distance to another point
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or zero for a zero-length input.
    #[must_use]
    pub fn normalize_or_zero(self) -> Self {
        let length = self.length();
        if length <= f32::EPSILON {
            Self::ZERO
        } else {
            self * (1.0 / length)
        }
    }

    /// Angle of this vector in degrees, counter-clockwise from +X.
    #[must_use]
    pub fn angle_degrees(self) -> f32 {
        self.y.atan2(self.x).to_degrees()
    }

    /// Moves `self` toward `target` by at most `max_step`.
    ///
    /// # Returns
    ///
    /// `target` itself once the remaining distance is within `max_step`.
    #[must_use]
    pub fn move_towards(self, target: Self, max_step: f32) -> Self {
        let delta = target - self;
        let distance = delta.length();
        if distance <= max_step || distance <= f32::EPSILON {
            target
        } else {
            self + delta * (max_step / distance)
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}
