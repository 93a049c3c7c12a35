//! Host-owned actor pose.
//!
//! The mover never owns the transform it animates. It reads and writes the
//! live pose through [`ActorPose`], which the Bevy host implements for
//! [`Transform`] and tests implement with the plain [`Pose`] value.
use bevy::prelude::Transform;
use glam::{Quat, Vec3};

/// Read/write access to the position and orientation of an actor.
pub trait ActorPose {
    /// Current world position.
    fn position(&self) -> Vec3;
    /// Overwrites the world position.
    fn set_position(&mut self, position: Vec3);
    /// Current orientation.
    fn rotation(&self) -> Quat;
    /// Overwrites the orientation.
    fn set_rotation(&mut self, rotation: Quat);
}

/// Standalone pose, useful when no engine transform is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
}

impl Pose {
    /// Creates a pose from its parts.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

impl ActorPose for Pose {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

impl ActorPose for Transform {
    fn position(&self) -> Vec3 {
        self.translation
    }

    fn set_position(&mut self, position: Vec3) {
        self.translation = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}
