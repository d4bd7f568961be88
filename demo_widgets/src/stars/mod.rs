//! Star field demo: a projected point cloud of catalog stars under an
//! orbit camera, upgraded from the coarse to the detailed catalog once.

pub mod camera;
pub mod projection;

use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;
use crossbeam_channel::Sender;

pub use camera::CameraController;
pub use projection::{project, star_color, ProjectedStar};

use crate::data::loader::Applied;
use crate::data::{
    filter_by_magnitude, CatalogChannel, CatalogEvent, CatalogFetcher, CatalogLoader,
    CatalogTier, HttpCatalogFetcher, IndexedStar, LoadTrigger,
};
use crate::lifecycle::{window_ready, DemoLifecycle, ReinitializeDemo};
use crate::render::{RendererResource, StarCloud};
use crate::ui::DemoTab;

/// Pixels per wheel notch when the platform reports scroll in lines.
const PIXELS_PER_LINE: f32 = 100.0;

#[derive(Resource)]
pub struct FetcherResource(pub Box<dyn CatalogFetcher>);

impl FetcherResource {
    pub fn new(fetcher: impl CatalogFetcher) -> Self {
        Self(Box::new(fetcher))
    }
}

impl Default for FetcherResource {
    fn default() -> Self {
        Self::new(HttpCatalogFetcher::default())
    }
}

#[derive(Component)]
pub struct StarCamera;

/// Star field controller: catalog loader, camera state and the cloud entity.
#[derive(Resource, Default)]
pub struct StarField {
    lifecycle: DemoLifecycle,
    loader: CatalogLoader,
    pub camera: CameraController,
    cloud: Option<Entity>,
    rendered_generation: Option<u64>,
    magnitude_range: Option<(f64, f64)>,
    pending_init: bool,
}

impl StarField {
    /// Only draw stars with `min <= magnitude <= max`.
    pub fn with_magnitude_range(mut self, min: f64, max: f64) -> Self {
        self.magnitude_range = Some((min, max));
        self
    }

    pub fn lifecycle(&self) -> DemoLifecycle {
        self.lifecycle
    }

    pub fn loader(&self) -> &CatalogLoader {
        &self.loader
    }

    pub fn cloud(&self) -> Option<Entity> {
        self.cloud
    }

    pub fn active_tier(&self) -> Option<CatalogTier> {
        self.loader.active_tier()
    }

    pub fn request_init(&mut self) {
        self.pending_init = true;
    }

    pub fn init_pending(&self) -> bool {
        self.pending_init
    }

    /// Start the session. The coarse catalog is requested only on the first
    /// init; later inits reuse whatever set the loader already holds.
    pub fn init(&mut self, fetcher: &dyn CatalogFetcher, tx: &Sender<CatalogEvent>) -> bool {
        self.pending_init = false;
        if !self.lifecycle.init() {
            return false;
        }
        self.camera = CameraController::default();
        self.rendered_generation = None;
        self.loader.load_initial(fetcher, tx);
        true
    }

    /// Stop rendering. Returns the cloud entity the caller must despawn.
    pub fn dispose(&mut self) -> Option<Entity> {
        self.lifecycle.dispose();
        self.rendered_generation = None;
        self.cloud.take()
    }

    pub fn reinitialize(
        &mut self,
        fetcher: &dyn CatalogFetcher,
        tx: &Sender<CatalogEvent>,
    ) -> Option<Entity> {
        let stale = self.dispose();
        self.init(fetcher, tx);
        stale
    }

    /// Feed one finished fetch into the loader.
    pub fn apply(
        &mut self,
        event: CatalogEvent,
        fetcher: &dyn CatalogFetcher,
        tx: &Sender<CatalogEvent>,
    ) -> Applied {
        self.loader.apply(event, fetcher, tx)
    }

    /// Apply a zoom input's result: crossing the threshold asks for detail.
    pub fn zoomed(
        &mut self,
        wants_detail: bool,
        fetcher: &dyn CatalogFetcher,
        tx: &Sender<CatalogEvent>,
    ) {
        if wants_detail {
            self.loader.load_detailed(LoadTrigger::Zoom, fetcher, tx);
        }
    }

    pub fn needs_rebuild(&self) -> bool {
        self.lifecycle.is_running()
            && self.loader.generation() > 0
            && self.rendered_generation != Some(self.loader.generation())
    }

    /// Records the cloud should show, after the optional magnitude filter,
    /// each with its index in the active set.
    pub fn visible_records(&self) -> Vec<IndexedStar<'_>> {
        let records = self.loader.records();
        match self.magnitude_range {
            Some((min, max)) => filter_by_magnitude(records, min, max),
            None => records.iter().enumerate().collect(),
        }
    }

    fn replace_cloud(&mut self, cloud: Option<Entity>) -> Option<Entity> {
        self.rendered_generation = Some(self.loader.generation());
        std::mem::replace(&mut self.cloud, cloud)
    }
}

pub fn star_field_plugin(app: &mut App) {
    app.init_resource::<StarField>()
        .init_resource::<CatalogChannel>()
        .init_resource::<FetcherResource>()
        .add_systems(Startup, setup_star_camera)
        .add_systems(OnEnter(DemoTab::StarField), enter_star_field)
        .add_systems(OnExit(DemoTab::StarField), exit_star_field)
        .add_systems(
            Update,
            (
                handle_star_events.run_if(in_state(DemoTab::StarField)),
                init_star_field_when_ready.run_if(in_state(DemoTab::StarField)),
                ingest_catalog,
                rebuild_cloud,
                star_input.run_if(in_state(DemoTab::StarField)),
                animate_star_field,
            )
                .chain(),
        );
}

// The initial OnEnter may run before Startup, so start in sync with the state.
fn setup_star_camera(mut commands: Commands, tab: Res<State<DemoTab>>) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            is_active: *tab.get() == DemoTab::StarField,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, camera::INITIAL_ZOOM).looking_at(Vec3::ZERO, Vec3::Y),
        StarCamera,
    ));
}

fn enter_star_field(
    mut field: ResMut<StarField>,
    mut cameras: Query<&mut Camera, With<StarCamera>>,
) {
    field.request_init();
    for mut camera in &mut cameras {
        camera.is_active = true;
    }
}

fn exit_star_field(mut cameras: Query<&mut Camera, With<StarCamera>>) {
    for mut camera in &mut cameras {
        camera.is_active = false;
    }
}

fn handle_star_events(mut reinit: EventReader<ReinitializeDemo>, mut field: ResMut<StarField>) {
    if reinit.read().count() > 0 {
        field.request_init();
    }
}

fn init_star_field_when_ready(
    mut commands: Commands,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut field: ResMut<StarField>,
    fetcher: Res<FetcherResource>,
    channel: Res<CatalogChannel>,
) {
    if !field.init_pending() {
        return;
    }
    let Ok(window) = windows.get_single() else {
        return;
    };
    if !window_ready(window) {
        return;
    }

    if let Some(stale) = field.reinitialize(fetcher.0.as_ref(), &channel.sender()) {
        commands.entity(stale).despawn_recursive();
    }
}

/// Drain finished fetches. All swaps of the active set happen here.
pub fn ingest_catalog(
    channel: Res<CatalogChannel>,
    fetcher: Res<FetcherResource>,
    mut field: ResMut<StarField>,
) {
    while let Some(event) = channel.try_next() {
        match field.apply(event, fetcher.0.as_ref(), &channel.sender()) {
            Applied::Swapped { tier, count } => info!("switched to {tier} catalog ({count} stars)"),
            Applied::Stale => info!("discarded coarse catalog, detailed set already active"),
            Applied::Failed | Applied::Ignored => {}
        }
    }
}

/// Tear down and rebuild the cloud whenever the active set changed.
pub fn rebuild_cloud(
    mut commands: Commands,
    renderer: Res<RendererResource>,
    mut field: ResMut<StarField>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !field.needs_rebuild() {
        return;
    }

    let cloud = {
        let records = field.visible_records();
        renderer
            .0
            .spawn_cloud(&mut commands, &mut meshes, &mut materials, &records)
    };
    if let Some(old) = field.replace_cloud(cloud) {
        commands.entity(old).despawn_recursive();
    }
}

#[allow(clippy::too_many_arguments)]
fn star_input(
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    touches: Res<Touches>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
    mut field: ResMut<StarField>,
    fetcher: Res<FetcherResource>,
    channel: Res<CatalogChannel>,
) {
    let over_ui = contexts.ctx_mut().is_pointer_over_area();
    let fetcher = fetcher.0.as_ref();
    let tx = channel.sender();

    let drag: Vec2 = motion.read().map(|m| m.delta).sum();
    if mouse.pressed(MouseButton::Left) && !over_ui && drag != Vec2::ZERO {
        field.camera.drag(drag.x, drag.y, camera::MOUSE_SENSITIVITY);
    }

    for event in wheel.read() {
        if over_ui {
            continue;
        }
        // Positive browser delta zooms out; Bevy reports scroll-up as positive.
        let pixels = match event.unit {
            MouseScrollUnit::Line => event.y * PIXELS_PER_LINE,
            MouseScrollUnit::Pixel => event.y,
        };
        let wants = field.camera.zoom_by(-pixels * camera::WHEEL_ZOOM_SCALE);
        field.zoomed(wants, fetcher, &tx);
    }

    if keys.just_pressed(KeyCode::ArrowDown) {
        field.camera.zoom_by(camera::KEY_ZOOM_STEP);
    }
    if keys.just_pressed(KeyCode::ArrowUp) {
        let wants = field.camera.zoom_by(-camera::KEY_ZOOM_STEP);
        field.zoomed(wants, fetcher, &tx);
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        field.camera.nudge_yaw(camera::KEY_YAW_STEP);
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        field.camera.nudge_yaw(-camera::KEY_YAW_STEP);
    }

    let active: Vec<_> = touches.iter().collect();
    match active.as_slice() {
        [touch] => {
            let delta = touch.delta();
            field
                .camera
                .drag(delta.x, delta.y, camera::TOUCH_SENSITIVITY);
        }
        [a, b] => {
            let before = a.previous_position().distance(b.previous_position());
            let now = a.position().distance(b.position());
            if before > 0.0 && now != before {
                let wants = field.camera.pinch(now / before);
                field.zoomed(wants, fetcher, &tx);
            }
        }
        _ => {}
    }
}

fn animate_star_field(
    mut field: ResMut<StarField>,
    mut clouds: Query<&mut Transform, With<StarCloud>>,
    mut cameras: Query<&mut Transform, (With<StarCamera>, Without<StarCloud>)>,
) {
    if !field.lifecycle().is_running() {
        return;
    }
    field.camera.advance();

    let (pitch, yaw) = field.camera.rotation;
    for mut transform in &mut clouds {
        transform.rotation = Quat::from_euler(EulerRot::XYZ, pitch, yaw, 0.0);
    }
    for mut transform in &mut cameras {
        transform.translation.z = field.camera.zoom;
    }
}
