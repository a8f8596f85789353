//! Math utilities and types
//!
//! Captured transforms are stored as fixed-size float arrays so that a draw
//! record can copy them by value. `nalgebra` types are used for any actual
//! arithmetic.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3x4, Matrix4, Point3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Number of floats in an affine view transform
pub const AFFINE_LEN: usize = 12;

/// Number of floats in a projection transform
pub const PROJECTION_LEN: usize = 16;

/// Affine view transform, row-major 3x4
///
/// The implicit fourth row is `(0, 0, 0, 1)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct AffineMatrix(pub [f32; AFFINE_LEN]);

impl AffineMatrix {
    /// Identity transform
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0,
    ]);

    /// Pure translation
    pub const fn translation(x: f32, y: f32, z: f32) -> Self {
        Self([
            1.0, 0.0, 0.0, x, //
            0.0, 1.0, 0.0, y, //
            0.0, 0.0, 1.0, z,
        ])
    }

    /// Row-major element access
    pub const fn get(&self, row: usize, col: usize) -> f32 {
        self.0[row * 4 + col]
    }

    /// Raw row-major floats
    pub const fn as_array(&self) -> &[f32; AFFINE_LEN] {
        &self.0
    }

    /// Overwrite every element from `other`
    pub fn copy_from(&mut self, other: &Self) {
        self.0.copy_from_slice(&other.0);
    }

    /// Expand to a homogeneous `nalgebra` matrix
    pub fn to_mat4(&self) -> Mat4 {
        let upper = Matrix3x4::from_row_slice(&self.0);
        let mut m = Mat4::identity();
        m.fixed_view_mut::<3, 4>(0, 0).copy_from(&upper);
        m
    }

    /// Take the upper 3x4 block of a homogeneous matrix
    pub fn from_mat4(m: &Mat4) -> Self {
        let mut out = [0.0; AFFINE_LEN];
        for row in 0..3 {
            for col in 0..4 {
                out[row * 4 + col] = m[(row, col)];
            }
        }
        Self(out)
    }

    /// Apply rotation, scale and translation to a point
    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            m[0] * p[0] + m[1] * p[1] + m[2] * p[2] + m[3],
            m[4] * p[0] + m[5] * p[1] + m[6] * p[2] + m[7],
            m[8] * p[0] + m[9] * p[1] + m[10] * p[2] + m[11],
        ]
    }

    /// Apply only the linear part (no translation) to a direction
    pub fn transform_direction(&self, d: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        [
            m[0] * d[0] + m[1] * d[1] + m[2] * d[2],
            m[4] * d[0] + m[5] * d[1] + m[6] * d[2],
            m[8] * d[0] + m[9] * d[1] + m[10] * d[2],
        ]
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Projection transform, row-major 4x4
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct ProjectionMatrix(pub [f32; PROJECTION_LEN]);

impl ProjectionMatrix {
    /// Identity projection
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Right-handed perspective projection (OpenGL clip conventions)
    pub fn perspective(aspect: f32, fovy: f32, near: f32, far: f32) -> Self {
        Self::from_mat4(&Mat4::new_perspective(aspect, fovy, near, far))
    }

    /// Raw row-major floats
    pub const fn as_array(&self) -> &[f32; PROJECTION_LEN] {
        &self.0
    }

    /// Overwrite every element from `other`
    pub fn copy_from(&mut self, other: &Self) {
        self.0.copy_from_slice(&other.0);
    }

    /// Convert to an `nalgebra` matrix
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_row_slice(&self.0)
    }

    /// Convert from an `nalgebra` matrix
    pub fn from_mat4(m: &Mat4) -> Self {
        let mut out = [0.0; PROJECTION_LEN];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = m[(row, col)];
            }
        }
        Self(out)
    }
}

impl Default for ProjectionMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}
