//! Default tunables for grid movement.
//!
//! These mirror the values a hand-tuned dungeon crawler camera ships with and
//! back the `Default` implementation of
//! [`GridMovementSettings`](crate::config::GridMovementSettings).
use std::ops::RangeInclusive;

/// Distance covered by one discrete step, in world units.
pub const DEFAULT_GRID_SIZE: f32 = 3.0;
/// Rotation interpolation rate.
pub const DEFAULT_ROTATION_SPEED: f32 = 5.0;
/// Translation interpolation rate.
pub const DEFAULT_MOVEMENT_SPEED: f32 = 5.0;
/// Degrees of free-look rotation per unit of pointer axis movement.
pub const DEFAULT_FREELOOK_SENSITIVITY: f32 = 1.0;
/// Half-width of the free-look yaw and pitch windows, in degrees.
pub const DEFAULT_FREELOOK_ANGLE: f32 = 85.0;
/// Rate of the animated return to the committed facing after free-look.
pub const DEFAULT_FREELOOK_SNAPBACK_SPEED: f32 = 10.0;

/// Permitted values for the free-look half-width.
///
/// Pitch must stay below 90° or the Euler decomposition degenerates.
pub const FREELOOK_ANGLE_RANGE: RangeInclusive<f32> = 45.0..=89.0;

/// One discrete turn.
pub const QUARTER_TURN_DEGREES: f32 = 90.0;

/// Distance below which a continuous translation snaps onto its target.
pub const POSITION_SNAP_EPSILON: f32 = 1.0e-5;
/// Quaternion chord length below which a continuous rotation snaps onto its
/// target; roughly half the remaining angle in radians.
pub const ROTATION_SNAP_EPSILON: f32 = 1.0e-3;

/// Scale applied to raw pointer motion (pixels) before it reaches free-look.
pub const POINTER_DELTA_SCALE: f32 = 0.1;
