use bevy::app::AppExit;
use bevy::log::{Level, LogPlugin};
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowResolution};

use crate::configuration::config::LabConfig;
use crate::simulation::frame::FrameSize;
use crate::simulation::lab::Lab;
use crate::simulation::params::SimulationKind;
use crate::simulation::states::NVec2;
use crate::visualization::surface::DrawSurface;

/// Pooled world-space text entity reused for scene labels
#[derive(Component)]
struct SceneLabel;

#[derive(Component)]
struct StatusText;

struct QueuedLabel {
    position: Vec2,
    text: String,
    size: f32,
    color: Color,
}

/// Labels drawn by the scene this frame
#[derive(Resource, Default)]
struct LabelQueue(Vec<QueuedLabel>);

#[derive(Resource, Default)]
struct LabelPool(Vec<Entity>);

/// Pooled mesh entity reused for filled shapes
#[derive(Component)]
struct SceneFill;

/// Filled shape in world coordinates
enum FillShape {
    Disc { center: Vec2, radius: f32 },
    Rect { center: Vec2, size: Vec2 },
    Triangle([Vec2; 3]),
}

struct QueuedFill {
    shape: FillShape,
    color: Color,
}

/// Fills drawn by the scene this frame, in paint order
#[derive(Resource, Default)]
struct FillQueue(Vec<QueuedFill>);

/// Unit meshes shared by every disc and rectangle fill
#[derive(Resource)]
struct FillMeshes {
    circle: Handle<Mesh>,
    square: Handle<Mesh>,
}

struct FillSlot {
    entity: Entity,
    material: Handle<ColorMaterial>,
    triangle: Handle<Mesh>, // rebuilt whenever the slot draws a triangle
}

#[derive(Resource, Default)]
struct FillPool(Vec<FillSlot>);

/// Depth of the first fill; later fills stack above it, labels above all
const FILL_BASE_Z: f32 = 1.0;
const FILL_Z_STEP: f32 = 0.001;
const LABEL_Z: f32 = 10.0;

const HELP: &str = "Tab switch | Space strike/pause | R reset | M diagram/explore | arrows, [ ] adjust | O path | A accel | H highlight | Esc quit";

pub fn run_2d(config: &LabConfig, log_level: Level) {
    let lab = Lab::from_config(config);

    App::new()
        .insert_resource(lab)
        .init_resource::<LabelQueue>()
        .init_resource::<LabelPool>()
        .init_resource::<FillQueue>()
        .init_resource::<FillPool>()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.window.title.clone(),
                        resolution: WindowResolution::new(config.window.width as f32, config.window.height as f32),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                .set(LogPlugin {
                    level: log_level,
                    ..Default::default()
                }),
        )
        .add_systems(Startup, setup_view_system)
        .add_systems(
            Update,
            (
                track_surface_size_system,
                controls_system,
                tick_active_simulation_system,
                sync_fills_system,
                sync_labels_system,
                status_text_system,
            )
                .chain(),
        )
        .add_systems(Last, teardown_on_exit_system)
        .run();
}

fn setup_view_system(mut commands: Commands, lab: Res<Lab>, mut meshes: ResMut<Assets<Mesh>>) {
    log::info!("starting 2D viewer on the {} simulation ({})", lab.active(), lab.frame_size());

    commands.insert_resource(FillMeshes {
        circle: meshes.add(Circle::new(1.0)),
        square: meshes.add(Rectangle::new(1.0, 1.0)),
    });
    commands.spawn(Camera2dBundle::default());
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 16.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_background_color(Color::srgba(0.0, 0.0, 0.0, 0.6))
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(10.0),
            ..Default::default()
        }),
        StatusText,
    ));
}

/// Size tracker input: the primary window's logical content box
fn track_surface_size_system(mut lab: ResMut<Lab>, windows: Query<&Window, With<PrimaryWindow>>) {
    let observed = windows.get_single().ok().map(|w| (w.width() as f64, w.height() as f64));
    lab.observe_surface(observed);
}

fn controls_system(keys: Res<ButtonInput<KeyCode>>, mut lab: ResMut<Lab>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.send(AppExit::Success);
        return;
    }
    if keys.just_pressed(KeyCode::Tab) {
        lab.toggle_simulation();
    }
    if keys.just_pressed(KeyCode::KeyM) {
        lab.toggle_view_mode();
    }
    if keys.just_pressed(KeyCode::KeyR) {
        lab.reset();
    }
    if keys.just_pressed(KeyCode::KeyO) {
        lab.display.show_orbit_path = !lab.display.show_orbit_path;
    }
    if keys.just_pressed(KeyCode::KeyA) {
        lab.display.show_acceleration = !lab.display.show_acceleration;
    }
    if keys.just_pressed(KeyCode::KeyH) {
        lab.display.highlight_pair = !lab.display.highlight_pair;
    }

    let step = |up: KeyCode, down: KeyCode| -> i64 {
        (keys.just_pressed(up) as i64) - (keys.just_pressed(down) as i64)
    };

    match lab.active() {
        SimulationKind::Contact => {
            if keys.just_pressed(KeyCode::Space) {
                lab.strike();
            }
            let p = lab.contact_params();
            let (dm, ds) = (step(KeyCode::ArrowUp, KeyCode::ArrowDown), step(KeyCode::ArrowRight, KeyCode::ArrowLeft));
            if dm != 0 {
                lab.set_mass(p.mass() as i64 + dm);
            }
            if ds != 0 {
                lab.set_speed(p.speed() as i64 + ds);
            }
        }
        SimulationKind::Orbit => {
            if keys.just_pressed(KeyCode::Space) || keys.just_pressed(KeyCode::KeyP) {
                lab.toggle_pause();
            }
            let p = lab.orbit_params();
            let dm1 = step(KeyCode::ArrowUp, KeyCode::ArrowDown);
            let dm2 = step(KeyCode::BracketRight, KeyCode::BracketLeft);
            let dr = step(KeyCode::ArrowRight, KeyCode::ArrowLeft);
            if dm1 != 0 {
                lab.set_primary_mass(p.primary_mass() as i64 + dm1);
            }
            if dm2 != 0 {
                lab.set_secondary_mass(p.secondary_mass() as i64 + dm2);
            }
            if dr != 0 {
                lab.set_separation(p.separation() as i64 + 10 * dr);
            }
        }
    }
}

/// The frame loop host: Bevy's `Update` runs once per display refresh
fn tick_active_simulation_system(
    mut lab: ResMut<Lab>,
    time: Res<Time>,
    mut gizmos: Gizmos,
    mut fills: ResMut<FillQueue>,
    mut labels: ResMut<LabelQueue>,
    mut clear: ResMut<ClearColor>,
) {
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    let size = lab.frame_size();

    let mut surface = SceneSurface {
        gizmos: &mut gizmos,
        fills: &mut fills.0,
        labels: &mut labels.0,
        clear: &mut clear.0,
        size,
    };
    lab.tick(now_ms, &mut surface);
}

/// Mirror the fill queue onto pooled mesh entities, growing the pool as needed
fn sync_fills_system(
    mut commands: Commands,
    queue: Res<FillQueue>,
    shared: Res<FillMeshes>,
    mut pool: ResMut<FillPool>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(&mut Mesh2dHandle, &mut Transform, &mut Visibility), With<SceneFill>>,
) {
    while pool.0.len() < queue.0.len() {
        let material = materials.add(ColorMaterial::from(Color::WHITE));
        let triangle = meshes.add(Triangle2d::new(Vec2::ZERO, Vec2::X, Vec2::Y));
        let entity = commands
            .spawn((
                MaterialMesh2dBundle {
                    mesh: Mesh2dHandle(shared.circle.clone()),
                    material: material.clone(),
                    visibility: Visibility::Hidden,
                    ..Default::default()
                },
                SceneFill,
            ))
            .id();
        pool.0.push(FillSlot { entity, material, triangle });
    }

    for (i, slot) in pool.0.iter().enumerate() {
        // freshly spawned entities show up next frame
        let Ok((mut mesh, mut transform, mut visibility)) = query.get_mut(slot.entity) else {
            continue;
        };
        let Some(fill) = queue.0.get(i) else {
            *visibility = Visibility::Hidden;
            continue;
        };

        if let Some(material) = materials.get_mut(&slot.material) {
            material.color = fill.color;
        }
        let z = FILL_BASE_Z + i as f32 * FILL_Z_STEP;
        match fill.shape {
            FillShape::Disc { center, radius } => {
                mesh.0 = shared.circle.clone();
                *transform = Transform::from_translation(center.extend(z)).with_scale(Vec3::new(radius, radius, 1.0));
            }
            FillShape::Rect { center, size } => {
                mesh.0 = shared.square.clone();
                *transform = Transform::from_translation(center.extend(z)).with_scale(size.extend(1.0));
            }
            FillShape::Triangle([a, b, c]) => {
                if let Some(triangle) = meshes.get_mut(&slot.triangle) {
                    *triangle = Mesh::from(Triangle2d::new(a, b, c));
                }
                mesh.0 = slot.triangle.clone();
                *transform = Transform::from_xyz(0.0, 0.0, z);
            }
        }
        *visibility = Visibility::Visible;
    }
}

fn sync_labels_system(
    mut commands: Commands,
    queue: Res<LabelQueue>,
    mut pool: ResMut<LabelPool>,
    mut query: Query<(&mut Text, &mut Transform, &mut Visibility), With<SceneLabel>>,
) {
    while pool.0.len() < queue.0.len() {
        let entity = commands.spawn((Text2dBundle::default(), SceneLabel)).id();
        pool.0.push(entity);
    }

    for (i, entity) in pool.0.iter().enumerate() {
        // freshly spawned entities show up next frame
        let Ok((mut text, mut transform, mut visibility)) = query.get_mut(*entity) else {
            continue;
        };
        match queue.0.get(i) {
            Some(label) => {
                *text = Text::from_section(
                    label.text.clone(),
                    TextStyle {
                        font_size: label.size,
                        color: label.color,
                        ..Default::default()
                    },
                );
                transform.translation = label.position.extend(LABEL_Z);
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}

fn status_text_system(lab: Res<Lab>, mut query: Query<&mut Text, With<StatusText>>) {
    for mut text in &mut query {
        if let Some(section) = text.sections.first_mut() {
            section.value = format!("{}\n{}", lab.status(), HELP);
        }
    }
}

/// Unmount: no loop may tick once the app is closing
fn teardown_on_exit_system(mut exits: EventReader<AppExit>, mut lab: ResMut<Lab>) {
    if exits.read().next().is_some() {
        lab.shutdown();
    }
}

/// `DrawSurface` for the Bevy viewer
///
/// Canvas coordinates (top-left origin, y down) are mapped onto the 2D
/// camera's centred, y-up world. Lines and outlines go to gizmos; fills
/// and text are queued for the pooled mesh and label entities.
struct SceneSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    fills: &'a mut Vec<QueuedFill>,
    labels: &'a mut Vec<QueuedLabel>,
    clear: &'a mut Color,
    size: FrameSize,
}

impl SceneSurface<'_, '_, '_> {
    fn to_world(&self, p: NVec2) -> Vec2 {
        Vec2::new(
            (p.x - 0.5 * self.size.width() as f64) as f32,
            (0.5 * self.size.height() as f64 - p.y) as f32,
        )
    }

    fn fill(&mut self, shape: FillShape, color: Color) {
        self.fills.push(QueuedFill { shape, color });
    }
}

impl DrawSurface for SceneSurface<'_, '_, '_> {
    fn begin_frame(&mut self, size: FrameSize) {
        self.size = size;
        self.fills.clear();
        self.labels.clear();
    }

    fn clear(&mut self, color: Color) {
        *self.clear = color;
    }

    fn line(&mut self, from: NVec2, to: NVec2, color: Color) {
        let (a, b) = (self.to_world(from), self.to_world(to));
        self.gizmos.line_2d(a, b, color);
    }

    fn circle(&mut self, center: NVec2, radius: f64, color: Color) {
        let c = self.to_world(center);
        self.gizmos.circle_2d(c, radius as f32, color);
    }

    fn disc(&mut self, center: NVec2, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let center = self.to_world(center);
        self.fill(FillShape::Disc { center, radius: radius as f32 }, color);
    }

    fn rect(&mut self, min: NVec2, max: NVec2, color: Color) {
        let (a, b) = (self.to_world(min), self.to_world(max));
        let size = (b - a).abs();
        if size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        self.fill(FillShape::Rect { center: 0.5 * (a + b), size }, color);
    }

    /// Convex outline, split into a fan of triangles
    fn polygon(&mut self, points: &[NVec2], color: Color) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };
        let origin = self.to_world(first);
        for pair in rest.windows(2) {
            let (b, c) = (self.to_world(pair[0]), self.to_world(pair[1]));
            // counter-clockwise in the y-up world
            let corners = if (b - origin).perp_dot(c - origin) >= 0.0 { [origin, b, c] } else { [origin, c, b] };
            self.fill(FillShape::Triangle(corners), color);
        }
    }

    fn text(&mut self, at: NVec2, text: &str, size: f32, color: Color) {
        let position = self.to_world(at);
        self.labels.push(QueuedLabel {
            position,
            text: text.to_string(),
            size,
            color,
        });
    }
}
