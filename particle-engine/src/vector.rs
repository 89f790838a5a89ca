// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Three-component vector algebra
//!
//! [`Vector3`] is the only geometric type the engine needs: positions,
//! velocities, accelerations, forces and contact normals are all expressed
//! with it. Components are double precision.
//!
//! # Equality
//!
//! `PartialEq` compares components exactly, which is what unit tests on
//! literal vectors want. Anything that has been through numerical
//! integration should be compared with [`Vector3::approx_eq`] (relative
//! tolerance [`VECTOR_TOLERANCE`]) or the `approx` macros, for which
//! `Vector3` implements [`AbsDiffEq`] and [`RelativeEq`].

use crate::error::{PhysicsError, Result};
use approx::{AbsDiffEq, RelativeEq};
use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// Relative tolerance used by [`Vector3::approx_eq`]
pub const VECTOR_TOLERANCE: f64 = 1e-3;

/// Absolute floor below which component differences are always equal
///
/// Needed because a relative comparison against an exact zero never passes.
const ABSOLUTE_FLOOR: f64 = 1e-9;

/// A vector in three-dimensional space
///
/// # Examples
///
/// ```
/// use particle_engine::Vector3;
///
/// let v = Vector3::new(3.0, 4.0, 0.0);
/// assert_eq!(v.magnitude(), 5.0);
/// assert_eq!(v.normalize() * 5.0, v);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    /// X component
    pub x: f64,
    /// Y component
    pub y: f64,
    /// Z component
    pub z: f64,
}

impl Vector3 {
    /// The zero vector
    pub const ZERO: Vector3 = Vector3::new(0.0, 0.0, 0.0);
    /// Unit vector along X
    pub const X: Vector3 = Vector3::new(1.0, 0.0, 0.0);
    /// Unit vector along Y
    pub const Y: Vector3 = Vector3::new(0.0, 1.0, 0.0);
    /// Unit vector along Z
    pub const Z: Vector3 = Vector3::new(0.0, 0.0, 1.0);
    /// Up direction of the simulation (positive Y)
    pub const UP: Vector3 = Vector3::Y;
    /// Standard gravity at the Earth's surface, pointing down Y (m/s²)
    pub const GRAVITY: Vector3 = Vector3::new(0.0, -9.81, 0.0);
    /// Twice standard gravity, handy for snappier demos
    pub const HIGH_GRAVITY: Vector3 = Vector3::new(0.0, -19.62, 0.0);

    /// Create a new vector from its components
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3 { x, y, z }
    }

    /// Create the zero vector
    pub const fn zero() -> Self {
        Vector3::ZERO
    }

    /// Reset every component to zero
    pub fn clear(&mut self) {
        *self = Vector3::ZERO;
    }

    /// Flip the sign of every component in place
    pub fn invert(&mut self) {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
    }

    /// Squared length, cheaper than [`Vector3::magnitude`] when only
    /// comparing lengths
    pub fn square_magnitude(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f64 {
        self.square_magnitude().sqrt()
    }

    /// Distance between the points described by two vectors
    pub fn distance(&self, other: &Vector3) -> f64 {
        (*self - *other).magnitude()
    }

    /// Unit vector pointing the same way
    ///
    /// The zero vector has no direction and normalizes to itself.
    pub fn normalize(&self) -> Vector3 {
        let magnitude = self.magnitude();
        if magnitude > 0.0 {
            Vector3::new(self.x / magnitude, self.y / magnitude, self.z / magnitude)
        } else {
            *self
        }
    }

    /// Scalar (dot) product
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Vector (cross) product
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Element-wise product
    pub fn component_product(&self, other: &Vector3) -> Vector3 {
        Vector3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Element-wise product, in place
    pub fn component_product_update(&mut self, other: &Vector3) {
        self.x *= other.x;
        self.y *= other.y;
        self.z *= other.z;
    }

    /// Add `other * scale` to this vector in place
    pub fn add_scaled_vector(&mut self, other: &Vector3, scale: f64) {
        self.x += other.x * scale;
        self.y += other.y * scale;
        self.z += other.z * scale;
    }

    /// Divide by a scalar
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidArgument`] if `scalar` is zero.
    pub fn checked_div(&self, scalar: f64) -> Result<Vector3> {
        if scalar == 0.0 {
            return Err(PhysicsError::invalid("cannot divide a vector by zero"));
        }
        Ok(Vector3::new(self.x / scalar, self.y / scalar, self.z / scalar))
    }

    /// Check if all components are finite (not NaN or infinite)
    pub fn is_valid(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Tolerance-based equality for values produced by simulation
    ///
    /// Components are equal when their relative error is within
    /// [`VECTOR_TOLERANCE`].
    pub fn approx_eq(&self, other: &Vector3) -> bool {
        self.relative_eq(other, ABSOLUTE_FLOOR, VECTOR_TOLERANCE)
    }

    /// Get the vector as an array
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(arr: [f64; 3]) -> Self {
        Vector3::new(arr[0], arr[1], arr[2])
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, scalar: f64) -> Vector3 {
        Vector3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, vector: Vector3) -> Vector3 {
        vector * self
    }
}

impl MulAssign<f64> for Vector3 {
    fn mul_assign(&mut self, scalar: f64) {
        self.x *= scalar;
        self.y *= scalar;
        self.z *= scalar;
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vector3 {
    type Output = f64;

    fn index(&self, axis: usize) -> &f64 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 axis out of range: {}", axis),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, axis: usize) -> &mut f64 {
        match axis {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 axis out of range: {}", axis),
        }
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_vector() {
        assert_eq!(Vector3::zero(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(Vector3::default(), Vector3::ZERO);
    }

    #[test]
    fn test_negation() {
        let v = Vector3::new(1.0, -2.0, 3.0);
        assert_eq!(-v, Vector3::new(-1.0, 2.0, -3.0));

        let mut w = v;
        w.invert();
        assert_eq!(w, -v);
    }

    #[test]
    fn test_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(a - b, Vector3::new(-3.0, -3.0, -3.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);

        let mut c = a;
        c += b;
        c -= a;
        c *= 0.5;
        assert_eq!(c, Vector3::new(2.0, 2.5, 3.0));
    }

    #[test]
    fn test_products() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a.dot(&b), 32.0);
        assert_eq!(a.cross(&b), Vector3::new(-3.0, 6.0, -3.0));
        assert_eq!(a.component_product(&b), Vector3::new(4.0, 10.0, 18.0));

        let mut c = a;
        c.component_product_update(&b);
        assert_eq!(c, a.component_product(&b));
    }

    #[test]
    fn test_cross_product_is_orthogonal() {
        let a = Vector3::new(0.3, -1.2, 2.5);
        let b = Vector3::new(-4.0, 0.5, 1.0);
        let c = a.cross(&b);
        assert_relative_eq!(c.dot(&a), 0.0, epsilon = 1e-12);
        assert_relative_eq!(c.dot(&b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);

        let v = Vector3::new(3.0, 0.0, 4.0);
        let n = v.normalize();
        assert_relative_eq!(n.magnitude(), 1.0);
        assert_relative_eq!(n * v.magnitude(), v);
    }

    #[test]
    fn test_add_scaled_vector() {
        let mut v = Vector3::new(1.0, 1.0, 1.0);
        v.add_scaled_vector(&Vector3::new(2.0, 0.0, -2.0), 0.5);
        assert_eq!(v, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_checked_div() {
        let v = Vector3::new(2.0, 4.0, 6.0);
        assert_eq!(v.checked_div(2.0).unwrap(), Vector3::new(1.0, 2.0, 3.0));
        assert!(matches!(
            v.checked_div(0.0),
            Err(PhysicsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_approx_eq_tolerance() {
        let v = Vector3::new(100.0, -50.0, 0.0);
        assert!(v.approx_eq(&Vector3::new(100.05, -50.02, 0.0)));
        assert!(!v.approx_eq(&Vector3::new(101.0, -50.0, 0.0)));
        assert!(Vector3::ZERO.approx_eq(&Vector3::new(1e-12, 0.0, -1e-12)));
    }

    #[test]
    fn test_magnitudes_and_distance() {
        let v = Vector3::new(1.0, 2.0, 2.0);
        assert_eq!(v.square_magnitude(), 9.0);
        assert_eq!(v.magnitude(), 3.0);
        assert_eq!(v.distance(&Vector3::ZERO), 3.0);
    }

    #[test]
    fn test_indexing_and_conversion() {
        let mut v = Vector3::from([1.0, 2.0, 3.0]);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[2], 3.0);
        v[1] = 7.0;
        assert_eq!(v.as_array(), [1.0, 7.0, 3.0]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Vector3::new(1.0, 2.5, -3.0).to_string(), "(1, 2.5, -3)");
    }

    #[test]
    fn test_clear_and_validity() {
        let mut v = Vector3::new(f64::NAN, 0.0, 0.0);
        assert!(!v.is_valid());
        v.clear();
        assert!(v.is_valid());
        assert_eq!(v, Vector3::ZERO);
    }
}
