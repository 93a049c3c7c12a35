//! Shared fixtures for integration tests that drive a Bevy `App`.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use gridstep::{GridMovementPlugin, GridMovementSettings, GridMover, MovementValidator};

/// Simulated frame length; longer than one 64 Hz fixed step.
pub const FRAME: Duration = Duration::from_millis(20);

/// Upper bound on frames spent waiting for a mover to settle.
pub const MAX_SETTLE_FRAMES: usize = 1_000;

/// Builder for test `App` instances running [`GridMovementPlugin`].
pub struct GridTestAppBuilder {
    app: App,
}

impl GridTestAppBuilder {
    /// Create a new test app with `MinimalPlugins` and a fixed frame length.
    #[must_use]
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
        Self { app }
    }

    /// Override the movement settings.
    #[must_use]
    pub fn with_settings(mut self, settings: GridMovementSettings) -> Self {
        self.app.insert_resource(settings);
        self
    }

    /// Install a collision validator.
    #[must_use]
    pub fn with_validator(mut self, validator: MovementValidator) -> Self {
        self.app.insert_resource(validator);
        self
    }

    /// Spawn an actor with a `GridMover` committed to `transform`.
    #[must_use]
    pub fn spawn_mover(mut self, transform: Transform) -> (Self, Entity) {
        let entity = self
            .app
            .world_mut()
            .spawn((transform, GridMover::from(&transform)))
            .id();
        (self, entity)
    }

    /// Install the plugin and run one update so time starts advancing.
    #[must_use]
    pub fn build(mut self) -> App {
        self.app.add_plugins(GridMovementPlugin);
        self.app.update();
        self.app
    }
}

/// Hold a key down.
pub fn press(app: &mut App, key: KeyCode) {
    app.world_mut().resource_mut::<ButtonInput<KeyCode>>().press(key);
}

/// Let go of a key.
pub fn release(app: &mut App, key: KeyCode) {
    let mut keyboard = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
    keyboard.release(key);
    keyboard.clear();
}

/// Press a key for a single frame, which is enough to issue one intent.
pub fn tap(app: &mut App, key: KeyCode) {
    press(app, key);
    app.update();
    release(app, key);
}

/// The mover attached to `entity`.
///
/// # Panics
///
/// Panics when the entity has no `GridMover`.
pub fn mover(app: &App, entity: Entity) -> &GridMover {
    app.world()
        .get::<GridMover>(entity)
        .unwrap_or_else(|| panic!("entity {entity} has no GridMover"))
}

/// The live transform of `entity`.
///
/// # Panics
///
/// Panics when the entity has no `Transform`.
pub fn transform(app: &App, entity: Entity) -> Transform {
    *app.world()
        .get::<Transform>(entity)
        .unwrap_or_else(|| panic!("entity {entity} has no Transform"))
}

/// Update until the mover is stationary; returns the number of frames.
pub fn run_until_stationary(app: &mut App, entity: Entity) -> Result<usize> {
    for frame in 1..=MAX_SETTLE_FRAMES {
        app.update();
        let settled = app
            .world()
            .get::<GridMover>(entity)
            .context("mover despawned")?
            .is_stationary();
        if settled {
            return Ok(frame);
        }
    }
    bail!("mover still busy after {MAX_SETTLE_FRAMES} frames")
}
