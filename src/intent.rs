//! Discrete movement intents and the rules for picking one per tick.
//!
//! The dispatcher honours at most one intent per fixed tick. When several
//! bindings are held at once the first intent in [`MoveIntent::PRIORITY`]
//! wins, so there is no diagonal movement and turning never combines with
//! stepping.

use std::fmt;

use bevy::input::ButtonInput;
use bevy::prelude::*;
use glam::Vec3;

use crate::config::Handedness;
use crate::constants::QUARTER_TURN_DEGREES;

/// One discrete step or turn requested by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveIntent {
    /// Step one cell along the facing direction.
    Forward,
    /// Step one cell against the facing direction.
    Backward,
    /// Step one cell to the left without turning.
    StrafeLeft,
    /// Step one cell to the right without turning.
    StrafeRight,
    /// Turn 90° to the left in place.
    TurnLeft,
    /// Turn 90° to the right in place.
    TurnRight,
}

/// What an intent does to the target pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Translate by one cell along this unit axis of the actor's local frame.
    Translate(Vec3),
    /// Yaw by this many degrees; positive turns right.
    Turn(f32),
}

impl MoveIntent {
    /// Dispatch order used when several intents are held together.
    pub const PRIORITY: [Self; 6] = [
        Self::Forward,
        Self::Backward,
        Self::TurnLeft,
        Self::TurnRight,
        Self::StrafeLeft,
        Self::StrafeRight,
    ];

    /// Resolves the intent against the actor's local frame.
    #[must_use]
    pub fn step(self, handedness: Handedness) -> Step {
        match self {
            Self::Forward => Step::Translate(handedness.forward()),
            Self::Backward => Step::Translate(-handedness.forward()),
            Self::StrafeLeft => Step::Translate(-handedness.right()),
            Self::StrafeRight => Step::Translate(handedness.right()),
            Self::TurnLeft => Step::Turn(-QUARTER_TURN_DEGREES),
            Self::TurnRight => Step::Turn(QUARTER_TURN_DEGREES),
        }
    }
}

/// Which intents have their binding held this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "This struct represents the held state of exactly six bindings."
)]
pub struct HeldIntents {
    /// Forward binding held.
    pub forward: bool,
    /// Backward binding held.
    pub backward: bool,
    /// Strafe-left binding held.
    pub strafe_left: bool,
    /// Strafe-right binding held.
    pub strafe_right: bool,
    /// Turn-left binding held.
    pub turn_left: bool,
    /// Turn-right binding held.
    pub turn_right: bool,
}

impl HeldIntents {
    /// Reports whether `intent`'s binding is held.
    #[must_use]
    pub const fn contains(&self, intent: MoveIntent) -> bool {
        match intent {
            MoveIntent::Forward => self.forward,
            MoveIntent::Backward => self.backward,
            MoveIntent::StrafeLeft => self.strafe_left,
            MoveIntent::StrafeRight => self.strafe_right,
            MoveIntent::TurnLeft => self.turn_left,
            MoveIntent::TurnRight => self.turn_right,
        }
    }
}

/// Picks the single intent to honour this tick.
///
/// # Examples
///
/// ```
/// use gridstep::intent::{select_intent, HeldIntents, MoveIntent};
///
/// let held = HeldIntents { strafe_left: true, turn_right: true, ..Default::default() };
/// assert_eq!(select_intent(held), Some(MoveIntent::TurnRight));
/// assert_eq!(select_intent(HeldIntents::default()), None);
/// ```
#[must_use]
pub fn select_intent(held: HeldIntents) -> Option<MoveIntent> {
    MoveIntent::PRIORITY
        .into_iter()
        .find(|intent| held.contains(*intent))
}

/// Edge of the free-look button, delivered once per transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreelookEdge {
    /// The button went down this frame.
    Pressed,
    /// The button went up this frame.
    Released,
}

/// Keyboard and mouse bindings polled by the dispatcher.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    /// Step forward.
    pub forward: KeyCode,
    /// Step backward.
    pub backward: KeyCode,
    /// Strafe left.
    pub strafe_left: KeyCode,
    /// Strafe right.
    pub strafe_right: KeyCode,
    /// Turn left.
    pub turn_left: KeyCode,
    /// Turn right.
    pub turn_right: KeyCode,
    /// Hold to free-look.
    pub freelook: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            backward: KeyCode::KeyS,
            strafe_left: KeyCode::KeyA,
            strafe_right: KeyCode::KeyD,
            turn_left: KeyCode::KeyQ,
            turn_right: KeyCode::KeyE,
            freelook: MouseButton::Right,
        }
    }
}

impl KeyBindings {
    /// Samples which bindings are held.
    #[must_use]
    pub fn held_intents(&self, keyboard: &ButtonInput<KeyCode>) -> HeldIntents {
        HeldIntents {
            forward: keyboard.pressed(self.forward),
            backward: keyboard.pressed(self.backward),
            strafe_left: keyboard.pressed(self.strafe_left),
            strafe_right: keyboard.pressed(self.strafe_right),
            turn_left: keyboard.pressed(self.turn_left),
            turn_right: keyboard.pressed(self.turn_right),
        }
    }

    /// Converts this frame's free-look button transitions into edges.
    ///
    /// A press and release within the same frame yields both, press first.
    #[must_use]
    pub fn freelook_edges(&self, mouse: &ButtonInput<MouseButton>) -> Vec<FreelookEdge> {
        let mut edges = Vec::with_capacity(2);
        if mouse.just_pressed(self.freelook) {
            edges.push(FreelookEdge::Pressed);
        }
        if mouse.just_released(self.freelook) {
            edges.push(FreelookEdge::Released);
        }
        edges
    }
}

/// Decides whether a step from one cell to another is allowed.
///
/// This is the collision hook. Rejecting a step leaves the target pose
/// untouched; nothing else happens.
#[cfg_attr(test, mockall::automock)]
pub trait MoveValidator {
    /// Returns `true` when the actor may step from `from` to `to`.
    fn can_move(&self, from: Vec3, to: Vec3) -> bool;
}

/// Validator that never blocks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenGrid;

impl MoveValidator for OpenGrid {
    fn can_move(&self, _from: Vec3, _to: Vec3) -> bool {
        true
    }
}

/// Resource holding the validator consulted by the dispatcher.
#[derive(Resource)]
pub struct MovementValidator(Box<dyn MoveValidator + Send + Sync>);

impl MovementValidator {
    /// Wraps a host-supplied validator.
    pub fn new(validator: impl MoveValidator + Send + Sync + 'static) -> Self {
        Self(Box::new(validator))
    }
}

impl Default for MovementValidator {
    fn default() -> Self {
        Self::new(OpenGrid)
    }
}

impl fmt::Debug for MovementValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovementValidator").finish_non_exhaustive()
    }
}

impl MoveValidator for MovementValidator {
    fn can_move(&self, from: Vec3, to: Vec3) -> bool {
        self.0.can_move(from, to)
    }
}
