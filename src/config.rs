//! Runtime configuration for grid movement.
//!
//! Settings load from JSON using the camel-case keys level designers already
//! know (`gridSize`, `freelookAngle`, ...). Every loader validates before it
//! returns, so a [`GridMovementSettings`] obtained through [`from_json_str`]
//! or [`load`] is always usable by the animator.
//!
//! [`from_json_str`]: GridMovementSettings::from_json_str
//! [`load`]: GridMovementSettings::load

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_FREELOOK_ANGLE, DEFAULT_FREELOOK_SENSITIVITY, DEFAULT_FREELOOK_SNAPBACK_SPEED,
    DEFAULT_GRID_SIZE, DEFAULT_MOVEMENT_SPEED, DEFAULT_ROTATION_SPEED, FREELOOK_ANGLE_RANGE,
};

/// Errors raised while loading or validating [`GridMovementSettings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings from {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// The document was not valid settings JSON.
    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but falls outside its permitted range.
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        /// JSON key of the offending value.
        field: &'static str,
        /// Value that was supplied.
        value: f32,
        /// Human readable description of the permitted range.
        expected: &'static str,
    },
}

/// How the animator closes the gap between the live and the target pose.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Accumulate `delta * speed` into a progress value and interpolate from
    /// the pose held when the step began; the step lasts `1 / speed` seconds.
    #[default]
    Timed,
    /// Move at a constant `movement_speed` units per second and slerp the
    /// live rotation toward its target every frame.
    Continuous,
}

/// Orientation of the actor's local frame.
///
/// Both conventions keep `+Y` up and `+X` on the actor's right; they differ in
/// which way the actor faces and therefore in the sign of a right turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    /// Bevy's convention: actors face local `-Z`.
    #[default]
    Right,
    /// Left-handed engines: actors face local `+Z`.
    Left,
}

impl Handedness {
    /// Local axis the actor faces.
    #[must_use]
    pub const fn forward(self) -> Vec3 {
        match self {
            Self::Right => Vec3::NEG_Z,
            Self::Left => Vec3::Z,
        }
    }

    /// Local axis on the actor's right.
    #[must_use]
    pub const fn right(self) -> Vec3 {
        Vec3::X
    }

    /// Sign of a yaw (rotation about `+Y`) that turns the actor to its right.
    #[must_use]
    pub const fn right_turn_sign(self) -> f32 {
        match self {
            Self::Right => -1.0,
            Self::Left => 1.0,
        }
    }

    /// Yaw rotation turning the actor right by `degrees` (negative turns left).
    #[must_use]
    pub fn yaw(self, degrees: f32) -> Quat {
        Quat::from_rotation_y((self.right_turn_sign() * degrees).to_radians())
    }
}

/// Tunable parameters of the grid mover.
///
/// # Examples
///
/// ```
/// use gridstep::config::GridMovementSettings;
///
/// let settings = GridMovementSettings::from_json_str(r#"{ "gridSize": 4.0 }"#)
///     .unwrap_or_default();
/// assert!((settings.grid_size - 4.0).abs() < f32::EPSILON);
/// ```
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource, Default)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GridMovementSettings {
    /// Distance per discrete step.
    pub grid_size: f32,
    /// Interpolation rate of 90° turns.
    pub rotation_speed: f32,
    /// Interpolation rate of grid steps.
    pub movement_speed: f32,
    /// Degrees of free-look rotation per unit of look input.
    pub freelook_sensitivity: f32,
    /// Half-width of the free-look yaw and pitch windows, in degrees.
    pub freelook_angle: f32,
    /// Interpolation rate of the return to the committed facing.
    pub freelook_snapback_speed: f32,
    /// Animation style.
    pub interpolation: Interpolation,
    /// Local frame convention of the animated transform.
    pub handedness: Handedness,
}

impl Default for GridMovementSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            freelook_sensitivity: DEFAULT_FREELOOK_SENSITIVITY,
            freelook_angle: DEFAULT_FREELOOK_ANGLE,
            freelook_snapback_speed: DEFAULT_FREELOOK_SNAPBACK_SPEED,
            interpolation: Interpolation::default(),
            handedness: Handedness::default(),
        }
    }
}

impl GridMovementSettings {
    /// Parses and validates settings from a JSON document.
    ///
    /// Missing keys take their defaults; unknown keys are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] for malformed JSON and
    /// [`SettingsError::OutOfRange`] for values [`validate`](Self::validate)
    /// rejects.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Read`] when the file cannot be read, otherwise
    /// the same errors as [`from_json_str`](Self::from_json_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Checks every value against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::OutOfRange`] naming the first offending key.
    pub fn validate(&self) -> Result<(), SettingsError> {
        positive("gridSize", self.grid_size)?;
        positive("rotationSpeed", self.rotation_speed)?;
        positive("movementSpeed", self.movement_speed)?;
        positive("freelookSnapbackSpeed", self.freelook_snapback_speed)?;

        if !self.freelook_sensitivity.is_finite() {
            return Err(SettingsError::OutOfRange {
                field: "freelookSensitivity",
                value: self.freelook_sensitivity,
                expected: "a finite value",
            });
        }

        if !FREELOOK_ANGLE_RANGE.contains(&self.freelook_angle) {
            return Err(SettingsError::OutOfRange {
                field: "freelookAngle",
                value: self.freelook_angle,
                expected: "between 45 and 89 degrees",
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), SettingsError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::OutOfRange {
            field,
            value,
            expected: "a finite value greater than zero",
        })
    }
}
