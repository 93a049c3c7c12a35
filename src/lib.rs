#![cfg_attr(docsrs, feature(doc_cfg))]
//! Discrete grid movement for first-person dungeon crawlers.
//!
//! Actors step one cell or turn 90° at a time, each step animated smoothly,
//! with an optional mouse free-look bounded around the committed facing.
//! The [`mover`] core is engine independent; [`GridMovementPlugin`] hosts it
//! in a Bevy app.
pub mod angle;
pub mod config;
pub mod constants;
pub mod intent;
pub mod layout;
pub mod logging;
pub mod mover;
pub mod plugin;
pub mod pose;
pub use constants::*;

// Re-export commonly used items
pub use config::{GridMovementSettings, Handedness, Interpolation, SettingsError};
pub use intent::{FreelookEdge, KeyBindings, MoveIntent, MoveValidator, MovementValidator, OpenGrid};
pub use layout::{GridLayout, LayoutError};
pub use logging::init as init_logging;
pub use mover::{Frame, GridMover, IntentOutcome, MotionState};
pub use plugin::{GridMovementPlugin, GridMovementSystems};
pub use pose::{ActorPose, Pose};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use gridstep::prelude::*;
    //! ```

    pub use crate::GridMover;
    pub use crate::GridMovementPlugin;
    pub use crate::GridMovementSettings;
    pub use crate::KeyBindings;
    pub use crate::MoveIntent;
    pub use crate::MoveValidator;
    pub use crate::MovementValidator;
}
