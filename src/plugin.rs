//! Bevy plugin hosting grid movers.
//!
//! `GridMovementPlugin` is the host side of the mover: it polls Bevy's input
//! resources, hands the core [`GridMover`] one intent per fixed tick and one
//! animation frame per rendered frame, and lets the mover write straight into
//! the entity's [`Transform`].
//!
//! | Schedule      | System                     | Set                                |
//! |---------------|----------------------------|------------------------------------|
//! | `PreUpdate`   | [`sanitize_settings_system`] | [`GridMovementSystems::Validate`] |
//! | `FixedUpdate` | [`dispatch_intents_system`] | [`GridMovementSystems::Dispatch`] |
//! | `Update`      | [`freelook_edge_system`]    | [`GridMovementSystems::Freelook`] |
//! | `Update`      | [`animate_movers_system`]   | [`GridMovementSystems::Animate`]  |
//!
//! Disabling a mover's entity leaves free-look, like releasing the button.
//! With the `render` feature a cursor system hides and locks the pointer
//! while any mover is free-looking, and losing window focus leaves free-look.

use bevy::ecs::entity_disabling::Disabled;
use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::input::ButtonInput;
use bevy::prelude::*;
use bevy_ecs::system::SystemParam;
use log::{debug, error};

use crate::config::GridMovementSettings;
use crate::constants::POINTER_DELTA_SCALE;
use crate::intent::{select_intent, KeyBindings, MovementValidator};
use crate::mover::{Frame, GridMover};

/// System sets used by [`GridMovementPlugin`], for ordering host systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridMovementSystems {
    /// Settings validation in `PreUpdate`.
    Validate,
    /// Intent dispatch in `FixedUpdate`.
    Dispatch,
    /// Free-look button edges in `Update`.
    Freelook,
    /// Animation in `Update`, after [`Self::Freelook`].
    Animate,
}

impl From<&Transform> for GridMover {
    fn from(transform: &Transform) -> Self {
        Self::new(transform.translation, transform.rotation)
    }
}

/// Resources read by [`dispatch_intents_system`].
#[derive(SystemParam)]
pub struct DispatchContext<'w> {
    keyboard: Res<'w, ButtonInput<KeyCode>>,
    bindings: Res<'w, KeyBindings>,
    settings: Res<'w, GridMovementSettings>,
    validator: Res<'w, MovementValidator>,
}

/// Replaces invalid settings with the defaults.
///
/// A zero or non-finite speed would leave movers animating forever, so such
/// settings never reach the animator.
pub fn sanitize_settings_system(mut settings: ResMut<GridMovementSettings>) {
    if let Err(err) = settings.validate() {
        error!("grid movement settings rejected, using defaults: {err}");
        *settings = GridMovementSettings::default();
    }
}

/// Offers the highest-priority held intent to every stationary mover.
///
/// Busy movers are skipped without touching them, so change detection only
/// fires for movers that accepted or evaluated the intent.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn dispatch_intents_system(context: DispatchContext, mut movers: Query<&mut GridMover>) {
    let held = context.bindings.held_intents(&context.keyboard);
    let Some(intent) = select_intent(held) else {
        return;
    };

    for mut mover in &mut movers {
        if !mover.is_stationary() {
            continue;
        }
        mover.apply_intent(intent, &context.settings, &*context.validator);
    }
}

/// Delivers this frame's free-look button edges to every mover.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn freelook_edge_system(
    mouse: Res<ButtonInput<MouseButton>>,
    bindings: Res<KeyBindings>,
    mut movers: Query<(&mut GridMover, &Transform)>,
) {
    let edges = bindings.freelook_edges(&mouse);
    if edges.is_empty() {
        return;
    }

    for (mut mover, transform) in &mut movers {
        for edge in &edges {
            mover.handle_freelook_edge(*edge, transform);
        }
    }
}

/// Advances every busy mover by one frame.
///
/// Pointer motion arrives in pixels with `y` pointing down; it is flipped and
/// scaled by [`POINTER_DELTA_SCALE`] before reaching free-look.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy systems require parameters by value, not by reference."
)]
pub fn animate_movers_system(
    time: Res<Time>,
    pointer: Res<AccumulatedMouseMotion>,
    settings: Res<GridMovementSettings>,
    mut movers: Query<(&mut GridMover, &mut Transform)>,
) {
    let look = Vec2::new(pointer.delta.x, -pointer.delta.y) * POINTER_DELTA_SCALE;
    let frame = Frame::new(time.delta_secs()).with_look(look);

    for (mut mover, mut transform) in &mut movers {
        if mover.is_stationary() && !mover.is_freelook_held() {
            continue;
        }
        mover.advance(frame, &settings, &mut *transform);
    }
}

/// Leaves free-look when a mover's entity is disabled.
///
/// The snap-back plays once the entity is enabled again.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy observers receive their trigger by value."
)]
pub fn exit_freelook_on_disable(
    disabled: On<Add, Disabled>,
    mut movers: Query<(&mut GridMover, &Transform), With<Disabled>>,
) {
    if let Ok((mut mover, transform)) = movers.get_mut(disabled.entity) {
        if mover.is_free_looking() || mover.is_freelook_held() {
            debug!("mover {} disabled, leaving free-look", disabled.entity);
        }
        mover.cancel_freelook(transform);
    }
}

/// Leaves free-look on every mover when a window loses focus.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub fn exit_freelook_on_focus_loss(
    mut focus: MessageReader<bevy::window::WindowFocused>,
    mut movers: Query<(&mut GridMover, &Transform)>,
) {
    if !focus.read().any(|change| !change.focused) {
        return;
    }
    for (mut mover, transform) in &mut movers {
        mover.cancel_freelook(transform);
    }
}

/// Hides and locks the cursor while any mover is free-looking.
///
/// Only transitions touch the window, so hosts remain free to manage the
/// cursor otherwise.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub fn sync_cursor_system(
    movers: Query<&GridMover>,
    mut cursors: Query<&mut bevy::window::CursorOptions, With<bevy::window::PrimaryWindow>>,
    mut captured: Local<bool>,
) {
    use bevy::window::CursorGrabMode;

    let wants_capture = movers.iter().any(GridMover::is_free_looking);
    if wants_capture == *captured {
        return;
    }
    *captured = wants_capture;

    for mut cursor in &mut cursors {
        cursor.visible = !wants_capture;
        cursor.grab_mode = if wants_capture {
            CursorGrabMode::Locked
        } else {
            CursorGrabMode::None
        };
    }
}

/// Plugin wiring grid movement into a Bevy app.
///
/// Spawn entities with a [`Transform`] and a [`GridMover`] built from it;
/// insert [`GridMovementSettings`], [`KeyBindings`] or a
/// [`MovementValidator`] before adding the plugin to override the defaults.
///
/// # Examples
///
/// ```no_run
/// use bevy::prelude::*;
/// use gridstep::{GridMovementPlugin, GridMover};
///
/// fn spawn_player(mut commands: Commands) {
///     let transform = Transform::from_xyz(0.0, 1.7, 0.0);
///     commands.spawn((transform, GridMover::from(&transform)));
/// }
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(GridMovementPlugin)
///     .add_systems(Startup, spawn_player)
///     .run();
/// ```
#[derive(Debug, Default)]
pub struct GridMovementPlugin;

impl Plugin for GridMovementPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<GridMover>();
        app.register_type::<GridMovementSettings>();

        app.init_resource::<GridMovementSettings>();
        app.init_resource::<KeyBindings>();
        app.init_resource::<MovementValidator>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<AccumulatedMouseMotion>();

        app.add_systems(
            PreUpdate,
            sanitize_settings_system
                .run_if(resource_changed::<GridMovementSettings>)
                .in_set(GridMovementSystems::Validate),
        );
        app.add_observer(exit_freelook_on_disable);

        app.configure_sets(
            Update,
            (GridMovementSystems::Freelook, GridMovementSystems::Animate).chain(),
        );
        app.add_systems(
            FixedUpdate,
            dispatch_intents_system.in_set(GridMovementSystems::Dispatch),
        );
        app.add_systems(
            Update,
            (
                freelook_edge_system.in_set(GridMovementSystems::Freelook),
                animate_movers_system.in_set(GridMovementSystems::Animate),
            ),
        );

        #[cfg(feature = "render")]
        app.add_systems(
            Update,
            (
                exit_freelook_on_focus_loss.before(GridMovementSystems::Animate),
                sync_cursor_system.after(GridMovementSystems::Animate),
            ),
        );
    }
}
