use glam::{EulerRot, Quat, Vec3};

/// Local TRS transform of a scene entity, relative to its parent.
///
/// Entities without a parent are positioned relative to the world origin.
///
/// # Example
///
/// ```
/// use scene_workbench::Transform;
/// use glam::{Vec3, Quat};
///
/// let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
///     .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2))
///     .with_scale(Vec3::splat(2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to the parent (or world origin if no parent).
    pub translation: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Scale relative to the parent.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform with no translation, no rotation, and uniform scale of 1.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Creates a transform with the given translation.
    #[inline]
    pub const fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Creates a transform from translation, XYZ Euler rotation (radians),
    /// and scale, the shape in which the edit surface receives values.
    #[inline]
    pub fn from_trs_euler(translation: Vec3, euler: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z),
            scale,
        }
    }

    /// Returns this transform with a different translation.
    #[inline]
    #[must_use]
    pub const fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Returns this transform with a different rotation.
    #[inline]
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Returns this transform with a different scale.
    #[inline]
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Returns the rotation as XYZ Euler angles in radians, the shape in
    /// which display surfaces show it.
    #[inline]
    pub fn euler_angles(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }
}
