//! Behavioural test: an actor walks a walled corridor.
//!
//! The corridor runs north from the start cell; forward is `-Z`, so every
//! forward step decreases the row.

#[path = "support/thread_safe_app.rs"]
mod thread_safe_app;

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

mod common;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::input::mouse::AccumulatedMouseMotion;
use bevy::input::ButtonInput;
use bevy::prelude::*;
use gridstep::{GridLayout, GridMovementSettings, GridMover, MovementValidator};
use rspec::block::Context as Scenario;
use rspec_runner::run_serial;
use thread_safe_app::{lock_app, share, SharedApp, ThreadSafeApp};

const CORRIDOR: &str = "
###
#.#
#.#
#S#
###
";

const GRID_SIZE: f32 = 2.0;

/// Fixture owning a fresh app per example.
#[derive(Debug, Clone)]
struct CorridorFixture {
    app: SharedApp,
    player: Arc<Mutex<Entity>>,
    layout: GridLayout,
}

impl CorridorFixture {
    fn bootstrap() -> Self {
        let layout = GridLayout::parse(CORRIDOR, GRID_SIZE)
            .unwrap_or_else(|e| panic!("corridor layout: {e}"));
        let (app, player) = Self::fresh_app(&layout);
        Self {
            app: share(app),
            player: Arc::new(Mutex::new(player)),
            layout,
        }
    }

    fn fresh_app(layout: &GridLayout) -> (App, Entity) {
        let settings = GridMovementSettings {
            grid_size: GRID_SIZE,
            ..GridMovementSettings::default()
        };
        let start = Transform::from_translation(layout.cell_centre(layout.start_cell()));
        let (builder, player) = common::GridTestAppBuilder::new()
            .with_settings(settings)
            .with_validator(MovementValidator::new(layout.clone()))
            .spawn_mover(start);
        (builder.build(), player)
    }

    /// Replaces the shared app so examples never see each other's state.
    fn reset(&self) {
        let (app, player) = Self::fresh_app(&self.layout);
        *lock_app(&self.app) = ThreadSafeApp(app);
        *self.player.lock().unwrap_or_else(PoisonError::into_inner) = player;
    }

    fn app_guard(&self) -> MutexGuard<'_, ThreadSafeApp> {
        lock_app(&self.app)
    }

    fn player(&self) -> Entity {
        *self.player.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn tap(&self, key: KeyCode) {
        common::tap(&mut self.app_guard(), key);
    }

    fn hold_for(&self, key: KeyCode, frames: usize) {
        let mut app = self.app_guard();
        common::press(&mut app, key);
        for _ in 0..frames {
            app.update();
        }
        common::release(&mut app, key);
    }

    fn settle(&self) {
        let player = self.player();
        common::run_until_stationary(&mut self.app_guard(), player)
            .unwrap_or_else(|e| panic!("{e}"));
    }

    fn look_around(&self, pointer: Vec2, frames: usize) {
        let mut app = self.app_guard();
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Right);
        app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = pointer;
        for _ in 0..frames {
            app.update();
        }
    }

    fn let_go_of_mouse(&self) {
        let mut app = self.app_guard();
        app.world_mut().resource_mut::<AccumulatedMouseMotion>().delta = Vec2::ZERO;
        let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
        mouse.clear();
        mouse.release(MouseButton::Right);
    }

    fn transform(&self) -> Transform {
        common::transform(&self.app_guard(), self.player())
    }

    fn mover(&self) -> GridMover {
        common::mover(&self.app_guard(), self.player()).clone()
    }

    fn cell(&self) -> IVec2 {
        self.layout.cell_at(self.transform().translation)
    }
}

fn single_step(scenario: &mut Scenario<CorridorFixture>) {
    scenario.when("forward is tapped once", |ctx| {
        ctx.before_each(|state| {
            state.reset();
            state.tap(KeyCode::KeyW);
            state.settle();
        });

        ctx.then("the actor lands exactly on the next cell", |state| {
            let transform = state.transform();
            let expected = state.layout.cell_centre(IVec2::new(1, 2));
            assert!((transform.translation - expected).length() < 1e-5);
            assert_eq!(transform.translation, state.mover().target_position());
        });
    });
}

fn walking_into_a_wall(scenario: &mut Scenario<CorridorFixture>) {
    scenario.when("forward is held far longer than the corridor", |ctx| {
        ctx.before_each(|state| {
            state.reset();
            state.hold_for(KeyCode::KeyW, 120);
            state.settle();
        });

        ctx.then("the actor stops at the last floor cell", |state| {
            assert_eq!(state.cell(), IVec2::new(1, 1));
            assert!(state.mover().is_stationary());
        });
    });
}

fn turning_to_face_a_wall(scenario: &mut Scenario<CorridorFixture>) {
    scenario.when("the actor turns left and tries to step", |ctx| {
        ctx.before_each(|state| {
            state.reset();
            state.tap(KeyCode::KeyQ);
            state.settle();
            state.tap(KeyCode::KeyW);
            state.settle();
        });

        ctx.then("the step is blocked and the actor faces west", |state| {
            let transform = state.transform();
            assert_eq!(state.cell(), IVec2::new(1, 3));
            assert!((transform.forward().as_vec3() - Vec3::NEG_X).length() < 1e-5);
        });
    });
}

fn freelook_snapback(scenario: &mut Scenario<CorridorFixture>) {
    scenario.when("the actor looks around and lets go", |ctx| {
        ctx.before_each(|state| {
            state.reset();
            state.look_around(Vec2::new(400.0, -300.0), 30);
        });

        ctx.then("the view turns while the button is held", |state| {
            assert!(state.mover().is_free_looking());
            let committed = state.mover().target_rotation();
            assert!(state.transform().rotation.angle_between(committed) > 0.1);
        });

        ctx.then("the view returns to the committed facing", |state| {
            state.let_go_of_mouse();
            state.settle();
            let mover = state.mover();
            assert_eq!(state.transform().rotation, mover.target_rotation());
            assert!(!mover.is_free_looking());
        });
    });
}

#[test]
fn actor_walks_the_corridor() {
    let fixture = CorridorFixture::bootstrap();

    run_serial(&rspec::given(
        "an actor at the south end of a corridor",
        fixture,
        |scenario: &mut Scenario<CorridorFixture>| {
            single_step(scenario);
            walking_into_a_wall(scenario);
            turning_to_face_a_wall(scenario);
            freelook_snapback(scenario);
        },
    ));
}
