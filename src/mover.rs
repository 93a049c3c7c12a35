//! The grid mover: a per-actor state machine that animates discrete steps.
//!
//! A [`GridMover`] owns the *target pose*, the cell and facing the actor is
//! heading for, while the live pose stays with the host (see
//! [`ActorPose`]). Intents only edit the target pose and only while the
//! mover is [stationary](GridMover::is_stationary); [`GridMover::advance`]
//! then closes the gap a frame at a time and lands exactly on the target.
//!
//! ```text
//!            apply_intent                    advance (done)
//!   Idle ──────────────────▶ Translating ─────────────────▶ Idle
//!    │   └────────────────▶ Rotating    ─────────────────▶ Idle
//!    │ Pressed                    Released                advance (done)
//!    └──────────▶ FreeLooking ────────────▶ SnappingBack ─────────────▶ Idle
//! ```
//!
//! Exactly one of these states drives the pose at a time, so new input can
//! never corrupt a half-finished step.

use bevy::prelude::*;
use glam::{EulerRot, Quat, Vec2, Vec3};
use log::debug;

use crate::angle::clamp_angle;
use crate::config::{GridMovementSettings, Interpolation};
use crate::constants::{POSITION_SNAP_EPSILON, ROTATION_SNAP_EPSILON};
use crate::intent::{FreelookEdge, MoveIntent, MoveValidator, Step};
use crate::pose::ActorPose;

/// Publicly observable phase of a [`GridMover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    /// At rest on the target pose; the only state that accepts intents.
    Idle,
    /// Animating a one-cell step.
    Translating,
    /// Animating a 90° turn.
    Rotating,
    /// Look input drives the rotation directly.
    FreeLooking,
    /// Returning from free-look to the committed facing.
    SnappingBack,
}

/// Result of offering an intent to a [`GridMover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentOutcome {
    /// The target pose changed and an animation started.
    Accepted,
    /// The mover was busy; the intent was dropped, not queued.
    Ignored,
    /// The validator refused the destination; the target pose is unchanged.
    Blocked,
}

/// Per-frame input to [`GridMover::advance`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frame {
    /// Seconds elapsed since the previous frame.
    pub delta_seconds: f32,
    /// Look input this frame: `x` to the right, `y` upward.
    pub look_delta: Vec2,
}

impl Frame {
    /// A frame without look input.
    #[must_use]
    pub const fn new(delta_seconds: f32) -> Self {
        Self {
            delta_seconds,
            look_delta: Vec2::ZERO,
        }
    }

    /// Adds look input to the frame.
    #[must_use]
    pub const fn with_look(mut self, look_delta: Vec2) -> Self {
        self.look_delta = look_delta;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
enum Motion {
    Idle,
    Translating { from: Vec3, progress: f32 },
    Rotating { from: Quat, progress: f32 },
    FreeLooking { return_to: Quat },
    SnappingBack { from: Quat, to: Quat, progress: f32 },
}

/// Discrete grid movement state for one actor.
///
/// # Examples
///
/// ```
/// use gridstep::config::GridMovementSettings;
/// use gridstep::intent::{MoveIntent, OpenGrid};
/// use gridstep::mover::{Frame, GridMover, IntentOutcome, MotionState};
/// use gridstep::pose::Pose;
///
/// let settings = GridMovementSettings::default();
/// let mut pose = Pose::default();
/// let mut mover = GridMover::new(pose.position, pose.rotation);
///
/// assert_eq!(mover.apply_intent(MoveIntent::Forward, &settings, &OpenGrid), IntentOutcome::Accepted);
/// assert_eq!(mover.apply_intent(MoveIntent::Forward, &settings, &OpenGrid), IntentOutcome::Ignored);
///
/// while mover.advance(Frame::new(0.05), &settings, &mut pose) != MotionState::Idle {}
/// assert_eq!(pose.position, mover.target_position());
/// ```
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component, Default)]
pub struct GridMover {
    target_position: Vec3,
    target_rotation: Quat,
    motion: Motion,
    freelook_held: bool,
}

impl Default for GridMover {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

impl GridMover {
    /// Creates an idle mover whose target pose is the given pose.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            target_position: position,
            target_rotation: rotation,
            motion: Motion::Idle,
            freelook_held: false,
        }
    }

    /// Re-commits the target pose, cancelling any animation in flight.
    ///
    /// Call this after the host teleports the actor. A latched free-look
    /// press is dropped too; the button must be pressed again.
    pub fn reset(&mut self, position: Vec3, rotation: Quat) {
        self.target_position = position;
        self.target_rotation = rotation;
        self.motion = Motion::Idle;
        self.freelook_held = false;
    }

    /// Cell the actor is at or heading for.
    #[must_use]
    pub const fn target_position(&self) -> Vec3 {
        self.target_position
    }

    /// Facing the actor holds or is turning toward.
    #[must_use]
    pub const fn target_rotation(&self) -> Quat {
        self.target_rotation
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> MotionState {
        match self.motion {
            Motion::Idle => MotionState::Idle,
            Motion::Translating { .. } => MotionState::Translating,
            Motion::Rotating { .. } => MotionState::Rotating,
            Motion::FreeLooking { .. } => MotionState::FreeLooking,
            Motion::SnappingBack { .. } => MotionState::SnappingBack,
        }
    }

    /// True when nothing is animating and free-look is off.
    #[must_use]
    pub const fn is_stationary(&self) -> bool {
        matches!(self.motion, Motion::Idle)
    }

    /// True while the free-look button is held, even if free-look is still
    /// waiting for a step to land.
    #[must_use]
    pub const fn is_freelook_held(&self) -> bool {
        self.freelook_held
    }

    /// True while look input drives the rotation.
    #[must_use]
    pub const fn is_free_looking(&self) -> bool {
        matches!(self.motion, Motion::FreeLooking { .. })
    }

    /// Offers one discrete intent.
    ///
    /// Steps are measured from the target pose, never from the animated
    /// pose, so the grid cannot drift.
    pub fn apply_intent<V>(
        &mut self,
        intent: MoveIntent,
        settings: &GridMovementSettings,
        validator: &V,
    ) -> IntentOutcome
    where
        V: MoveValidator + ?Sized,
    {
        if !self.is_stationary() {
            debug!("ignoring {intent:?} while {:?}", self.state());
            return IntentOutcome::Ignored;
        }

        match intent.step(settings.handedness) {
            Step::Translate(axis) => {
                let from = self.target_position;
                let to = from + step_displacement(self.target_rotation, axis, settings.grid_size);
                if !validator.can_move(from, to) {
                    debug!("{intent:?} from {from} to {to} blocked");
                    return IntentOutcome::Blocked;
                }
                self.target_position = to;
                self.motion = Motion::Translating {
                    from,
                    progress: 0.0,
                };
                debug!("{intent:?}: stepping from {from} to {to}");
            }
            Step::Turn(degrees) => {
                let from = self.target_rotation;
                self.target_rotation = (from * settings.handedness.yaw(degrees)).normalize();
                self.motion = Motion::Rotating {
                    from,
                    progress: 0.0,
                };
                debug!("{intent:?}: turning {degrees}°");
            }
        }
        IntentOutcome::Accepted
    }

    /// Feeds a free-look button edge.
    ///
    /// A press is latched: when it arrives mid-step, free-look starts as soon
    /// as the step lands, unless the button is released first. A release
    /// while free-looking starts the snap-back from the live rotation.
    pub fn handle_freelook_edge<P>(&mut self, edge: FreelookEdge, pose: &P)
    where
        P: ActorPose + ?Sized,
    {
        match edge {
            FreelookEdge::Pressed => {
                self.freelook_held = true;
                self.try_enter_freelook();
            }
            FreelookEdge::Released => {
                self.freelook_held = false;
                if let Motion::FreeLooking { return_to } = self.motion {
                    self.motion = Motion::SnappingBack {
                        from: pose.rotation(),
                        to: return_to,
                        progress: 0.0,
                    };
                    debug!("free-look released, snapping back");
                }
            }
        }
    }

    /// Leaves free-look as if the button had been released.
    ///
    /// Hosts call this when the actor is disabled mid free-look.
    pub fn cancel_freelook<P>(&mut self, pose: &P)
    where
        P: ActorPose + ?Sized,
    {
        self.handle_freelook_edge(FreelookEdge::Released, pose);
    }

    /// Advances the animation by one frame and writes the live pose.
    ///
    /// Returns the state after the frame. Finishing animations land exactly
    /// on the target pose.
    pub fn advance<P>(
        &mut self,
        frame: Frame,
        settings: &GridMovementSettings,
        pose: &mut P,
    ) -> MotionState
    where
        P: ActorPose + ?Sized,
    {
        self.try_enter_freelook();
        let delta = frame.delta_seconds.max(0.0);
        let interpolation = settings.interpolation;

        self.motion = match self.motion {
            Motion::Idle => Motion::Idle,
            Motion::Translating { from, progress } => translate_towards(
                pose,
                Segment::new(from, self.target_position, progress),
                delta * settings.movement_speed,
                interpolation,
            )
            .map_or(Motion::Idle, |next| Motion::Translating {
                from,
                progress: next,
            }),
            Motion::Rotating { from, progress } => rotate_towards(
                pose,
                Segment::new(from, self.target_rotation, progress),
                delta * settings.rotation_speed,
                interpolation,
            )
            .map_or(Motion::Idle, |next| Motion::Rotating {
                from,
                progress: next,
            }),
            Motion::FreeLooking { return_to } => {
                self.free_look(frame.look_delta, settings, pose);
                Motion::FreeLooking { return_to }
            }
            Motion::SnappingBack { from, to, progress } => rotate_towards(
                pose,
                Segment::new(from, to, progress),
                delta * settings.freelook_snapback_speed,
                interpolation,
            )
            .map_or(Motion::Idle, |next| Motion::SnappingBack {
                from,
                to,
                progress: next,
            }),
        };

        self.state()
    }

    fn try_enter_freelook(&mut self) {
        if !self.freelook_held {
            return;
        }
        if matches!(self.motion, Motion::Idle | Motion::SnappingBack { .. }) {
            self.motion = Motion::FreeLooking {
                return_to: self.target_rotation,
            };
            debug!("free-look engaged");
        }
    }

    /// Maps look input onto yaw and pitch, bounded around the committed facing.
    fn free_look<P>(&self, look: Vec2, settings: &GridMovementSettings, pose: &mut P)
    where
        P: ActorPose + ?Sized,
    {
        let (yaw, pitch, _) = pose.rotation().to_euler(EulerRot::YXZ);
        let turn_sign = settings.handedness.right_turn_sign();
        let sensitivity = settings.freelook_sensitivity;

        let wanted_yaw = yaw.to_degrees() + turn_sign * look.x * sensitivity;
        let wanted_pitch = pitch.to_degrees() - turn_sign * look.y * sensitivity;

        let (view_yaw, _, _) = self.target_rotation.to_euler(EulerRot::YXZ);
        let view_yaw = view_yaw.to_degrees();
        let window = settings.freelook_angle;

        let clamped_pitch = clamp_angle(wanted_pitch, -window, window);
        let clamped_yaw = clamp_angle(wanted_yaw, view_yaw - window, view_yaw + window);

        pose.set_rotation(Quat::from_euler(
            EulerRot::YXZ,
            clamped_yaw.to_radians(),
            clamped_pitch.to_radians(),
            0.0,
        ));
    }
}

/// World-space offset of one step along `axis` of a frame rotated by `rotation`.
///
/// The rotated frame exists only for this computation.
#[must_use]
pub fn step_displacement(rotation: Quat, axis: Vec3, grid_size: f32) -> Vec3 {
    rotation * (axis * grid_size)
}

/// An interpolation from `from` to `to`, `progress` of the way along.
#[derive(Debug, Clone, Copy)]
struct Segment<T> {
    from: T,
    to: T,
    progress: f32,
}

impl<T> Segment<T> {
    const fn new(from: T, to: T, progress: f32) -> Self {
        Self { from, to, progress }
    }
}

/// Moves the live position one frame along `segment`.
///
/// Returns the new progress, or `None` once the target is reached.
fn translate_towards<P>(
    pose: &mut P,
    segment: Segment<Vec3>,
    rate: f32,
    interpolation: Interpolation,
) -> Option<f32>
where
    P: ActorPose + ?Sized,
{
    match interpolation {
        Interpolation::Timed => {
            let advanced = segment.progress + rate;
            if advanced >= 1.0 {
                pose.set_position(segment.to);
                None
            } else {
                pose.set_position(segment.from.lerp(segment.to, advanced));
                Some(advanced)
            }
        }
        Interpolation::Continuous => {
            let next = move_towards(pose.position(), segment.to, rate);
            pose.set_position(next);
            (next != segment.to).then_some(segment.progress)
        }
    }
}

/// Rotates the live orientation one frame along `segment`.
///
/// Returns the new progress, or `None` once the target is reached.
fn rotate_towards<P>(
    pose: &mut P,
    segment: Segment<Quat>,
    rate: f32,
    interpolation: Interpolation,
) -> Option<f32>
where
    P: ActorPose + ?Sized,
{
    match interpolation {
        Interpolation::Timed => {
            let advanced = segment.progress + rate;
            if advanced >= 1.0 {
                pose.set_rotation(segment.to);
                None
            } else {
                pose.set_rotation(segment.from.slerp(segment.to, advanced));
                Some(advanced)
            }
        }
        Interpolation::Continuous => {
            let next = pose.rotation().slerp(segment.to, rate.min(1.0));
            if rotation_gap(next, segment.to) <= ROTATION_SNAP_EPSILON {
                pose.set_rotation(segment.to);
                None
            } else {
                pose.set_rotation(next);
                Some(segment.progress)
            }
        }
    }
}

/// Chord length between two orientations, whichever sign `b` carries.
///
/// Unlike `Quat::angle_between` this stays monotonic near zero, where `acos`
/// loses precision in `f32`.
fn rotation_gap(a: Quat, b: Quat) -> f32 {
    let b = if a.dot(b) < 0.0 { -b } else { b };
    (a - b).length()
}

/// Constant-speed approach that lands exactly on `target`.
fn move_towards(current: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= max_step || distance <= POSITION_SNAP_EPSILON {
        target
    } else {
        current + offset / distance * max_step
    }
}
