//! Emoji fountain demo: pointer-driven bursts of emoji discs in a walled
//! rapier arena, drawn through pre-spawned per-kind slot batches.

mod emoji;
pub mod physics;
pub mod pool;
pub mod spawner;

use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::{PrimaryWindow, WindowResized};
use bevy_egui::EguiContexts;
use rand::rngs::SmallRng;
use rand::SeedableRng;

pub use emoji::EmojiKind;
pub use physics::{BodyPose, PhysicsWorld};
pub use pool::{Category, CategoryRegistry, EmojiInstance, EmojiPool, SpawnRequest};
pub use spawner::{plan_fountain, ContinuousSpawner, ScheduledSpawn, SpawnQueue};

use crate::lifecycle::{window_ready, ClearFountain, DemoLifecycle, ReinitializeDemo};
use crate::render::emoji_batches::{load_emoji_font, EmojiFont, EmojiSlot, SlotStyle};
use crate::render::{EmojiVisuals, SlotBatches};
use crate::ui::DemoTab;

/// Visible world height; the width follows the window aspect ratio.
pub const ARENA_HEIGHT: f32 = 20.0;

const BACKGROUND: Color = Color::srgb(0.05, 0.05, 0.08);

pub fn arena_for_window(width: f32, height: f32) -> Vec2 {
    Vec2::new(ARENA_HEIGHT * width / height, ARENA_HEIGHT)
}

#[derive(Component)]
pub struct FountainCamera;

/// Fountain controller: physics world, body pool and the kind cursor.
#[derive(Resource)]
pub struct Fountain {
    lifecycle: DemoLifecycle,
    physics: PhysicsWorld,
    pool: EmojiPool,
    rng: SmallRng,
    cursor: EmojiKind,
    arena: Vec2,
    pending_init: bool,
    interacted: bool,
}

impl Default for Fountain {
    fn default() -> Self {
        Self::new(pool::DEFAULT_CAPACITY, SmallRng::from_entropy())
    }
}

impl Fountain {
    pub fn new(capacity: usize, rng: SmallRng) -> Self {
        Self {
            lifecycle: DemoLifecycle::default(),
            physics: PhysicsWorld::new(),
            pool: EmojiPool::new(capacity),
            rng,
            cursor: EmojiKind::Grinning,
            arena: Vec2::ZERO,
            pending_init: false,
            interacted: false,
        }
    }

    pub fn lifecycle(&self) -> DemoLifecycle {
        self.lifecycle
    }

    pub fn pool(&self) -> &EmojiPool {
        &self.pool
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn arena(&self) -> Vec2 {
        self.arena
    }

    pub fn emoji_count(&self) -> usize {
        self.pool.len()
    }

    pub fn interacted(&self) -> bool {
        self.interacted
    }

    /// Schedule a reinit for the next frame with a usable window.
    pub fn request_init(&mut self) {
        self.pending_init = true;
    }

    pub fn init_pending(&self) -> bool {
        self.pending_init
    }

    /// Build walls and register every kind. No-op while running.
    pub fn init(&mut self, arena: Vec2, body_radius: f32) -> bool {
        self.pending_init = false;
        if !self.lifecycle.init() {
            return false;
        }
        self.arena = arena;
        self.physics.set_walls(arena.x, arena.y);
        self.pool.set_body_radius(body_radius);
        for kind in EmojiKind::ALL {
            self.pool.register(kind);
        }
        true
    }

    /// Drop every body, wall and category.
    pub fn dispose(&mut self) {
        if !self.lifecycle.dispose() {
            return;
        }
        self.pool.reset(&mut self.physics);
        self.physics.clear();
    }

    pub fn reinitialize(&mut self, arena: Vec2, body_radius: f32) {
        self.dispose();
        self.init(arena, body_radius);
    }

    pub fn resize(&mut self, arena: Vec2) {
        if !self.lifecycle.is_running() || arena == self.arena {
            return;
        }
        self.arena = arena;
        self.physics.set_walls(arena.x, arena.y);
    }

    pub fn clear(&mut self) {
        self.pool.clear_all(&mut self.physics);
    }

    pub fn plan(&mut self, origin: Vec2, continuous: bool) -> Vec<ScheduledSpawn> {
        self.interacted = true;
        plan_fountain(origin.into(), continuous, &mut self.rng)
    }

    /// Advance the kind cursor and spawn one emoji of the new kind.
    pub fn spawn_next(&mut self, spawn: ScheduledSpawn) -> Option<EmojiInstance> {
        if !self.lifecycle.is_running() {
            return None;
        }
        self.cursor = self.cursor.next();
        let request = spawn.into_request(self.cursor);
        Some(self.pool.spawn(&mut self.physics, request, &mut self.rng))
    }

    pub fn step(&mut self) {
        if self.lifecycle.is_running() {
            self.physics.step();
        }
    }
}

pub fn fountain_plugin(app: &mut App) {
    app.init_resource::<Fountain>()
        .init_resource::<SpawnQueue>()
        .init_resource::<ContinuousSpawner>()
        .init_resource::<SlotBatches>()
        .init_resource::<EmojiVisuals>()
        .add_systems(Startup, (setup_fountain_camera, load_emoji_font))
        .add_systems(OnEnter(DemoTab::Fountain), enter_fountain)
        .add_systems(OnExit(DemoTab::Fountain), exit_fountain)
        .add_systems(
            Update,
            (
                handle_fountain_events.run_if(in_state(DemoTab::Fountain)),
                init_fountain_when_ready.run_if(in_state(DemoTab::Fountain)),
                ensure_slot_batches,
                pointer_input.run_if(in_state(DemoTab::Fountain)),
                resize_arena,
                drain_spawn_queue,
                step_physics,
                sync_slots,
            )
                .chain(),
        );
}

fn setup_fountain_camera(mut commands: Commands, tab: Res<State<DemoTab>>) {
    commands.spawn((
        Camera2d,
        Camera {
            is_active: *tab.get() == DemoTab::Fountain,
            clear_color: ClearColorConfig::Custom(BACKGROUND),
            ..default()
        },
        OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: ARENA_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        },
        FountainCamera,
    ));
}

fn enter_fountain(
    mut fountain: ResMut<Fountain>,
    mut cameras: Query<&mut Camera, With<FountainCamera>>,
) {
    fountain.request_init();
    for mut camera in &mut cameras {
        camera.is_active = true;
    }
}

fn exit_fountain(
    mut cameras: Query<&mut Camera, With<FountainCamera>>,
    mut continuous: ResMut<ContinuousSpawner>,
) {
    continuous.release();
    for mut camera in &mut cameras {
        camera.is_active = false;
    }
}

fn handle_fountain_events(
    mut reinit: EventReader<ReinitializeDemo>,
    mut clear: EventReader<ClearFountain>,
    mut fountain: ResMut<Fountain>,
    mut queue: ResMut<SpawnQueue>,
) {
    if reinit.read().count() > 0 {
        fountain.request_init();
    }
    if clear.read().count() > 0 {
        queue.clear();
        fountain.clear();
        info!("cleared fountain");
    }
}

#[allow(clippy::too_many_arguments)]
fn init_fountain_when_ready(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut fountain: ResMut<Fountain>,
    mut batches: ResMut<SlotBatches>,
    mut visuals: ResMut<EmojiVisuals>,
    mut queue: ResMut<SpawnQueue>,
    mut continuous: ResMut<ContinuousSpawner>,
) {
    if !fountain.init_pending() {
        return;
    }
    // Retried every frame until the window has a size.
    let Ok(window) = windows.get_single() else {
        return;
    };
    if !window_ready(window) {
        return;
    }

    *visuals = EmojiVisuals::for_window_width(window.width());
    batches.despawn_all(&mut commands);
    queue.clear();
    continuous.release();

    let arena = arena_for_window(window.width(), window.height());
    fountain.reinitialize(arena, visuals.radius());
    info!(
        "fountain ready: arena {:.1}x{:.1}, capacity {}",
        arena.x,
        arena.y,
        fountain.pool().capacity()
    );
}

#[allow(clippy::too_many_arguments)]
fn ensure_slot_batches(
    mut commands: Commands,
    fountain: Res<Fountain>,
    mut batches: ResMut<SlotBatches>,
    visuals: Res<EmojiVisuals>,
    font: Option<Res<EmojiFont>>,
    asset_server: Option<Res<AssetServer>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if !fountain.lifecycle().is_running() {
        return;
    }
    let registry = fountain.pool().registry();
    if registry.kinds().all(|kind| batches.contains(kind)) {
        return;
    }
    // Wait for the font so a batch is never built twice.
    let Some(style) = SlotStyle::resolve(font.as_deref(), asset_server.as_deref()) else {
        return;
    };

    let capacity = fountain.pool().capacity();
    for kind in registry.kinds() {
        batches.ensure(
            kind,
            capacity,
            &visuals,
            &style,
            &mut commands,
            &mut meshes,
            &mut materials,
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn pointer_input(
    time: Res<Time>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<FountainCamera>>,
    mouse: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    mut contexts: EguiContexts,
    mut fountain: ResMut<Fountain>,
    mut queue: ResMut<SpawnQueue>,
    mut continuous: ResMut<ContinuousSpawner>,
) {
    let (Ok(window), Ok((camera, camera_transform))) = (windows.get_single(), cameras.get_single())
    else {
        return;
    };
    if !fountain.lifecycle().is_running() {
        return;
    }

    let now = time.elapsed();
    let first_touch = touches.iter().next();
    let screen = first_touch
        .map(|touch| touch.position())
        .or_else(|| window.cursor_position());
    let world = screen.and_then(|pos| camera.viewport_to_world_2d(camera_transform, pos).ok());

    // Pointer left the window.
    let Some(world) = world else {
        continuous.release();
        return;
    };

    let down = mouse.pressed(MouseButton::Left) || first_touch.is_some();
    let just_pressed = mouse.just_pressed(MouseButton::Left) || touches.any_just_pressed();
    let over_ui = contexts.ctx_mut().is_pointer_over_area();

    if just_pressed && !over_ui {
        let plan = fountain.plan(world, false);
        queue.schedule(now, plan);
        continuous.press(now, world.into());
    } else if down && continuous.held {
        continuous.position = world.into();
    }
    if !down {
        continuous.release();
    }

    if continuous.tick(now) {
        let origin = Vec2::from(continuous.position);
        let plan = fountain.plan(origin, true);
        queue.schedule(now, plan);
    }
}

fn resize_arena(mut resized: EventReader<WindowResized>, mut fountain: ResMut<Fountain>) {
    let Some(event) = resized.read().last() else {
        return;
    };
    if event.width > 0.0 && event.height > 0.0 {
        fountain.resize(arena_for_window(event.width, event.height));
    }
}

fn drain_spawn_queue(time: Res<Time>, mut queue: ResMut<SpawnQueue>, mut fountain: ResMut<Fountain>) {
    for spawn in queue.take_due(time.elapsed()) {
        fountain.spawn_next(spawn);
    }
}

fn step_physics(mut fountain: ResMut<Fountain>) {
    fountain.step();
}

/// Live slots follow their bodies. Every other slot collapses to zero scale.
fn sync_slots(
    fountain: Res<Fountain>,
    batches: Res<SlotBatches>,
    mut slots: Query<(&EmojiSlot, &mut Transform)>,
) {
    for kind in fountain.pool().registry().kinds() {
        let Some(entities) = batches.get(kind) else {
            continue;
        };
        let poses = fountain.pool().slot_poses(kind, fountain.physics());
        for (index, entity) in entities.iter().enumerate() {
            let Ok((slot, mut transform)) = slots.get_mut(*entity) else {
                continue;
            };
            match poses.get(index).copied().flatten() {
                Some(pose) => {
                    *transform = Transform::from_xyz(pose.position[0], pose.position[1], 0.0)
                        .with_rotation(Quat::from_rotation_z(pose.rotation_z))
                        .with_scale(Vec3::splat(slot.scale));
                }
                None => transform.scale = Vec3::ZERO,
            }
        }
    }
}
