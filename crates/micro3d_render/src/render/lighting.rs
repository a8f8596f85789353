//! Lighting state captured into draw records

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Ambient plus single directional light
///
/// Each draw record owns its own `Light`. Records never share a light by
/// reference; refreshing a record overwrites its light in place.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Light {
    /// Ambient intensity
    pub ambient_intensity: f32,
    /// Directional intensity
    pub directional_intensity: f32,
    /// Light direction x
    pub x: f32,
    /// Light direction y
    pub y: f32,
    /// Light direction z
    pub z: f32,
}

impl Light {
    /// Create a light from intensities and a direction
    pub const fn new(ambient_intensity: f32, directional_intensity: f32, direction: [f32; 3]) -> Self {
        Self {
            ambient_intensity,
            directional_intensity,
            x: direction[0],
            y: direction[1],
            z: direction[2],
        }
    }

    /// Overwrite every field in place
    pub fn set(&mut self, ambient_intensity: f32, directional_intensity: f32, x: f32, y: f32, z: f32) {
        self.ambient_intensity = ambient_intensity;
        self.directional_intensity = directional_intensity;
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Overwrite every field from `other`
    pub fn copy_from(&mut self, other: &Self) {
        self.set(
            other.ambient_intensity,
            other.directional_intensity,
            other.x,
            other.y,
            other.z,
        );
    }

    /// Direction as a vector
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl Default for Light {
    /// Full ambient, no directional contribution, pointing down -z
    fn default() -> Self {
        Self::new(1.0, 0.0, [0.0, 0.0, -1.0])
    }
}
