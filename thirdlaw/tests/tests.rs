use std::collections::VecDeque;
use std::path::PathBuf;

use approx::assert_relative_eq;

use thirdlaw::configuration::config::{load_config, LabConfig};
use thirdlaw::configuration::error::ConfigError;
use thirdlaw::simulation::contact::{ContactGeometry, ContactSim, CONTACT_TICKS};
use thirdlaw::simulation::forces::{acceleration, gravity, impact_force, round_for_display, GRAVITY_FLOOR};
use thirdlaw::simulation::frame::{FrameSize, SizeTracker};
use thirdlaw::simulation::instance::Instance;
use thirdlaw::simulation::lab::Lab;
use thirdlaw::simulation::orbit::{angular_step, OrbitForces, OrbitLayout, OrbitSim, MIN_BODY_GAP};
use thirdlaw::simulation::params::{ContactParams, DisplayOptions, OrbitParams, SimulationKind, ViewMode};
use thirdlaw::simulation::scheduler::{run_until_cancelled, CancelToken, FrameHost, FrameScheduler, LoopExit};
use thirdlaw::simulation::states::{ContactPhase, ContactState, OrbitState};
use thirdlaw::visualization::contact_scene::contact_pair;
use thirdlaw::visualization::headless::{run_headless, HeadlessOptions};
use thirdlaw::visualization::orbit_scene::gravity_pair;
use thirdlaw::simulation::starfield::Starfield;
use thirdlaw::visualization::surface::{DrawCommand, RecordingSurface};

/// Square frame at the reference size, scale 1.0
pub fn reference_frame() -> FrameSize {
    FrameSize::new(480, 480)
}

/// Contact sim laid out on the reference frame, idle at rest
pub fn contact_sim(mass: i64, speed: i64, hold_ms: f64) -> ContactSim {
    let mut sim = ContactSim::new(ContactParams::new(mass, speed), hold_ms);
    sim.reset(reference_frame());
    sim
}

/// Orbit sim laid out on the reference frame with the default parameters
pub fn orbit_sim() -> OrbitSim {
    let mut sim = OrbitSim::new(OrbitParams::default(), 7);
    sim.reset(reference_frame());
    sim
}

/// Lab built from defaults with the given start tab and mode
pub fn lab(simulation: SimulationKind, view_mode: ViewMode) -> Lab {
    let mut cfg = LabConfig::default();
    cfg.start.simulation = simulation;
    cfg.start.view_mode = view_mode;
    Lab::from_config(&cfg)
}

/// Host that replays a fixed list of frame timestamps
pub struct ScriptedHost {
    frames: VecDeque<f64>,
}

impl ScriptedHost {
    pub fn every_16ms(count: usize) -> Self {
        Self {
            frames: (1..=count).map(|i| i as f64 * 16.0).collect(),
        }
    }
}

impl FrameHost for ScriptedHost {
    fn next_frame(&mut self) -> Option<f64> {
        self.frames.pop_front()
    }
}

/// Tick a contact sim in explore mode until `done` holds; returns the
/// phases seen (collapsed) and the clock at the end
pub fn run_contact_until<F: Fn(&ContactState) -> bool>(sim: &mut ContactSim, start_ms: f64, done: F) -> (Vec<ContactPhase>, f64) {
    let mut phases = vec![sim.state().phase];
    let mut now = start_ms;
    for _ in 0..5000 {
        now += 16.0;
        sim.advance(ViewMode::Explore, now);
        let state = sim.state();
        assert_eq!(state.impact().active, state.phase == ContactPhase::Contact);
        if phases.last() != Some(&state.phase) {
            phases.push(state.phase);
        }
        if done(state) {
            break;
        }
    }
    (phases, now)
}

// ==================================================================================
// Force calculator tests
// ==================================================================================

#[test]
fn impact_force_is_rounded_product_over_full_grid() {
    for mass in 1..=10u32 {
        for speed in 1..=10u32 {
            assert_eq!(impact_force(mass, speed), (mass * speed * 22) as f64);
        }
    }
    assert_eq!(impact_force(5, 5), 550.0);
}

#[test]
fn contact_arrows_share_one_length() {
    for mass in 1..=10u32 {
        for speed in 1..=10u32 {
            let force = impact_force(mass, speed);
            let pair = contact_pair(force, 240.0, 304.0, 304.0, 1.0);

            assert_relative_eq!(pair.arrow_a().length(), pair.arrow_b().length(), epsilon = 1e-9);
            assert_relative_eq!(pair.arrow_a().length(), pair.length, epsilon = 1e-9);
            // A pushes the block down, B pushes the hammer up
            assert!(pair.end_a.y >= pair.origin_a.y);
            assert!(pair.end_b.y <= pair.origin_b.y);
        }
    }
}

#[test]
fn gravity_follows_inverse_square_with_floor() {
    for m1 in [1.0, 3.0, 6.0, 10.0] {
        for m2 in [1.0, 2.0, 9.0] {
            for r in [120.0, 220.0, 350.0] {
                let expected = (24_000.0_f64 * m1 * m2 / (r * r)).max(GRAVITY_FLOOR);
                assert_relative_eq!(gravity(m1, m2, r), expected, max_relative = 1e-12);
            }
        }
    }
    assert_eq!(gravity(1e-6, 1e-6, 350.0), GRAVITY_FLOOR);
}

#[test]
fn reference_orbit_force_and_accelerations() {
    let forces = OrbitForces::from_params(&OrbitParams::new(6, 3, 220));

    assert_relative_eq!(round_for_display(forces.force), 8.93);
    assert_relative_eq!(forces.accel_primary, forces.force / 6.0);
    assert_relative_eq!(forces.accel_secondary, forces.force / 3.0);
    assert_relative_eq!(round_for_display(forces.accel_primary), 1.49);
    assert_relative_eq!(round_for_display(forces.accel_secondary), 2.98);
}

#[test]
fn acceleration_of_massless_body_is_zero() {
    assert_eq!(acceleration(10.0, 0.0), 0.0);
    assert_relative_eq!(acceleration(10.0, 4.0), 2.5);
}

#[test]
fn gravity_arrows_equal_for_unequal_masses() {
    let params = OrbitParams::new(9, 2, 180);
    let forces = OrbitForces::from_params(&params);

    for angle in [0.0, 0.7, 2.5, 4.0] {
        let layout = OrbitLayout::new(reference_frame(), &params, Some(angle));
        let pair = gravity_pair(forces.force, &layout);

        assert_relative_eq!(pair.arrow_a().length(), pair.arrow_b().length(), epsilon = 1e-9);
        let net = (pair.end_a - pair.origin_a) + (pair.end_b - pair.origin_b);
        assert!(net.norm() < 1e-9, "Pair does not cancel: {:?}", net);

        // A on the secondary points towards the primary
        let to_primary = layout.primary - layout.secondary;
        assert!((pair.end_a - pair.origin_a).dot(&to_primary) > 0.0);
    }
}

#[test]
fn gravity_pair_visible_across_parameter_grid() {
    for frame in [FrameSize::new(320, 320), reference_frame(), FrameSize::new(960, 640)] {
        let s = frame.scale();
        for m1 in 1..=10 {
            for m2 in 1..=10 {
                for r in (120..=350).step_by(10) {
                    let params = OrbitParams::new(m1, m2, r);
                    let layout = OrbitLayout::new(frame, &params, Some(0.3));
                    let pair = gravity_pair(OrbitForces::from_params(&params).force, &layout);

                    assert!(layout.gap() >= MIN_BODY_GAP * s - 1e-9, "bodies crowd at {m1}/{m2}/{r} on {frame}");
                    assert!(pair.length >= 6.0, "arrow too short ({}) at {m1}/{m2}/{r} on {frame}", pair.length);
                    assert!(pair.length <= 0.45 * layout.gap() + 1e-9);
                }
            }
        }
    }
}

#[test]
fn weakest_impact_arrow_stays_visible() {
    let pair = contact_pair(impact_force(1, 1), 240.0, 300.0, 300.0, 1.0);
    assert_relative_eq!(pair.length, 10.0);
    assert_relative_eq!(pair.arrow_a().length(), pair.arrow_b().length());
}

// ==================================================================================
// Parameter and size tracker tests
// ==================================================================================

#[test]
fn params_clamp_on_every_write() {
    let mut contact = ContactParams::new(0, 99);
    assert_eq!((contact.mass(), contact.speed()), (1, 10));
    contact.set_mass(-4);
    contact.set_speed(7);
    assert_eq!((contact.mass(), contact.speed()), (1, 7));

    let mut orbit = OrbitParams::new(11, 0, 50);
    assert_eq!((orbit.primary_mass(), orbit.secondary_mass(), orbit.separation()), (10, 1, 120));
    orbit.set_separation(1000);
    assert_eq!(orbit.separation(), 350);
}

#[test]
fn size_tracker_clamps_and_reports_changes_only() {
    let mut tracker = SizeTracker::new();

    assert_eq!(tracker.observe(None), None);
    assert_eq!(tracker.current(), None);

    assert_eq!(tracker.observe(Some((100.7, 500.9))), Some(FrameSize::new(320, 500)));
    assert_eq!(tracker.observe(Some((100.7, 500.9))), None);
    // same clamped size, no reset signal
    assert_eq!(tracker.observe(Some((12.0, 500.2))), None);
    assert_eq!(tracker.observe(Some((f64::NAN, 600.0))), None);
    assert_eq!(tracker.observe(None), None);
    assert_eq!(tracker.current(), Some(FrameSize::new(320, 500)));

    assert_eq!(tracker.observe(Some((800.0, 600.0))), Some(FrameSize::new(800, 600)));
}

#[test]
fn frame_scale_follows_shorter_side() {
    assert_relative_eq!(reference_frame().scale(), 1.0);
    assert_relative_eq!(FrameSize::new(960, 640).scale(), 640.0 / 480.0);
    assert_eq!(FrameSize::new(0, 0), FrameSize::new(320, 320));
}

// ==================================================================================
// Contact state machine tests
// ==================================================================================

#[test]
fn reference_strike_runs_full_phase_cycle() {
    let mut sim = contact_sim(5, 5, 0.0);
    assert!(sim.strike());

    let mut forces = Vec::new();
    let mut phases = vec![ContactPhase::Idle, sim.state().phase];
    let mut now = 0.0;
    for _ in 0..1000 {
        now += 16.0;
        sim.advance(ViewMode::Explore, now);
        let impact = sim.impact();
        assert_eq!(impact.active, sim.state().phase == ContactPhase::Contact);
        if impact.active {
            forces.push(impact.force_magnitude);
        }
        if phases.last() != Some(&sim.state().phase) {
            phases.push(sim.state().phase);
        }
        if sim.state().phase == ContactPhase::Idle {
            break;
        }
    }

    assert_eq!(
        phases,
        vec![ContactPhase::Idle, ContactPhase::Descending, ContactPhase::Contact, ContactPhase::Rising, ContactPhase::Idle]
    );
    assert_eq!(forces.len() as u32, CONTACT_TICKS + 1);
    assert!(forces.iter().all(|&f| f == 550.0));
}

#[test]
fn strike_returns_block_to_rest() {
    let mut sim = contact_sim(10, 10, 0.0);
    let rest = ContactState::at_rest(sim.geometry());
    assert!(sim.strike());

    let (phases, _) = run_contact_until(&mut sim, 0.0, |s| s.phase == ContactPhase::Idle);

    assert_eq!(phases.last(), Some(&ContactPhase::Idle));
    assert_eq!(sim.state(), &rest);
}

#[test]
fn hold_freezes_contact_until_release() {
    let mut sim = contact_sim(5, 5, 3000.0);
    assert!(sim.strike());

    let (_, entered_at) = run_contact_until(&mut sim, 0.0, |s| s.phase == ContactPhase::Contact);
    let due = sim.state().hold.map(|h| h.due_ms);
    assert_eq!(due, Some(entered_at + 3000.0));
    let frozen_target = sim.state().target_y;

    sim.advance(ViewMode::Explore, entered_at + 1000.0);
    assert!(sim.state().is_holding());
    assert_eq!(sim.state().phase, ContactPhase::Contact);
    assert_eq!(sim.state().target_y, frozen_target);
    assert_eq!(sim.state().contact_frame_count, 0);

    sim.advance(ViewMode::Explore, entered_at + 3000.0);
    assert!(!sim.state().is_holding());
    assert!(sim.state().target_y > frozen_target);
    assert_eq!(sim.state().striker_y, sim.state().target_y);
}

#[test]
fn penetration_stops_at_force_depth() {
    let mut sim = contact_sim(10, 10, 0.0);
    let geometry = *sim.geometry();
    assert!(sim.strike());

    run_contact_until(&mut sim, 0.0, |s| s.phase == ContactPhase::Rising);

    // 2200 / 40 exceeds the cap of 28
    assert_relative_eq!(sim.state().hold_target_y, geometry.target_rest_y + 28.0, epsilon = 1e-9);
    assert_relative_eq!(sim.state().target_y, sim.state().hold_target_y, epsilon = 1e-9);
}

#[test]
fn strike_ignored_unless_idle() {
    let mut sim = contact_sim(5, 5, 3000.0);
    assert!(sim.strike());
    assert!(!sim.strike());
    assert_eq!(sim.state().phase, ContactPhase::Descending);

    run_contact_until(&mut sim, 0.0, |s| s.phase == ContactPhase::Contact);
    assert!(!sim.strike());
    assert_eq!(sim.state().phase, ContactPhase::Contact);

    let mut pinned = contact_sim(5, 5, 0.0);
    pinned.mode_changed(ViewMode::Diagram);
    assert!(!pinned.strike());
}

#[test]
fn contact_reset_restores_canonical_state() {
    let mut sim = contact_sim(5, 5, 3000.0);
    assert!(sim.strike());
    run_contact_until(&mut sim, 0.0, |s| s.phase == ContactPhase::Contact);
    assert!(sim.state().is_holding());

    sim.reset(reference_frame());

    assert_eq!(sim.state(), &ContactState::at_rest(sim.geometry()));
    assert!(!sim.state().is_holding());
    assert!(sim.strike());
}

#[test]
fn resize_during_contact_reinitializes_geometry() {
    let mut instance = Instance::mount(contact_sim(5, 5, 3000.0), reference_frame(), ViewMode::Explore);
    instance.start();
    assert!(instance.sim_mut().strike());

    let mut surface = RecordingSurface::new();
    let display = DisplayOptions::default();
    let mut now = 0.0;
    while instance.sim().state().phase != ContactPhase::Contact {
        now += 16.0;
        assert!(instance.tick(now, &mut surface, &display));
    }
    let generation = instance.scheduler().generation();

    let resized = FrameSize::new(800, 600);
    instance.resize(resized);

    assert!(instance.is_running());
    assert_eq!(instance.scheduler().generation(), generation + 1);
    assert_eq!(instance.frame(), resized);
    assert_eq!(instance.sim().geometry(), &ContactGeometry::for_frame(resized));

    assert!(instance.tick(now + 16.0, &mut surface, &display));
    let state = instance.sim().state();
    assert!(state.initialized);
    assert_eq!(state.phase, ContactPhase::Idle);
    assert!(!state.is_holding());
    assert_eq!(surface.size, Some(resized));
}

#[test]
fn diagram_pins_contact_pose_without_touching_params() {
    let params = ContactParams::new(7, 3);
    let mut instance = Instance::mount(ContactSim::new(params, 3000.0), reference_frame(), ViewMode::Diagram);
    instance.start();

    let mut surface = RecordingSurface::new();
    for i in 0..10 {
        instance.tick(i as f64 * 16.0, &mut surface, &DisplayOptions::default());
        let impact = instance.sim().impact();
        assert!(impact.active);
        assert_eq!(impact.force_magnitude, 462.0);
        assert_eq!(instance.sim().state().striker_y, instance.sim().geometry().target_rest_y);
    }

    instance.set_view_mode(ViewMode::Explore);
    assert_eq!(instance.sim().params, params);
    assert_eq!(instance.sim().state(), &ContactState::at_rest(instance.sim().geometry()));

    instance.set_view_mode(ViewMode::Diagram);
    assert_eq!(instance.sim().params, params);
    assert_eq!(instance.sim().state().phase, ContactPhase::Contact);
}

// ==================================================================================
// Orbit engine tests
// ==================================================================================

#[test]
fn orbit_angle_advances_in_explore() {
    let mut sim = orbit_sim();
    let mut previous = sim.state().angle_radians;

    for _ in 0..200 {
        sim.advance(ViewMode::Explore, 16.0);
        assert!(sim.state().angle_radians >= previous);
        previous = sim.state().angle_radians;
    }
    assert_relative_eq!(sim.state().elapsed_time, 200.0 * 0.016, epsilon = 1e-9);
    assert!(previous > 0.0);
}

#[test]
fn orbit_frozen_in_diagram_and_when_paused() {
    let mut sim = orbit_sim();
    for _ in 0..10 {
        sim.advance(ViewMode::Explore, 16.0);
    }
    let before = *sim.state();

    for _ in 0..50 {
        sim.advance(ViewMode::Diagram, 16.0);
    }
    assert_eq!(sim.state(), &before);

    sim.pause();
    for _ in 0..50 {
        sim.advance(ViewMode::Explore, 16.0);
    }
    assert_eq!(sim.state().angle_radians, before.angle_radians);
    assert_eq!(sim.state().elapsed_time, before.elapsed_time);

    sim.resume();
    sim.advance(ViewMode::Explore, 16.0);
    assert!(sim.state().angle_radians > before.angle_radians);
}

#[test]
fn closer_orbits_turn_faster() {
    assert_relative_eq!(angular_step(350.0), 0.01, epsilon = 1e-12);
    assert_relative_eq!(angular_step(120.0), 0.04, epsilon = 1e-12);
    assert!(angular_step(200.0) > angular_step(300.0));
}

#[test]
fn diagram_pins_secondary_right_of_primary() {
    let mut sim = orbit_sim();
    for _ in 0..37 {
        sim.advance(ViewMode::Explore, 16.0);
    }

    let layout = sim.layout(reference_frame(), ViewMode::Diagram);
    assert_relative_eq!(layout.secondary.y, layout.primary.y, epsilon = 1e-9);
    assert_relative_eq!(layout.secondary.x - layout.primary.x, layout.path_radius, epsilon = 1e-9);

    let moving = sim.layout(reference_frame(), ViewMode::Explore);
    assert!((moving.secondary.y - moving.primary.y).abs() > 1.0);
}

#[test]
fn orbit_reset_restores_canonical_state() {
    let mut sim = orbit_sim();
    for _ in 0..25 {
        sim.advance(ViewMode::Explore, 16.0);
    }
    sim.pause();

    sim.reset(reference_frame());

    assert_eq!(sim.state(), &OrbitState::default());
    assert!(!sim.state().paused);
}

#[test]
fn resize_keeps_orbit_pause() {
    let mut instance = Instance::mount(orbit_sim(), reference_frame(), ViewMode::Explore);
    instance.start();
    let mut surface = RecordingSurface::new();
    let display = DisplayOptions::default();
    for i in 1..=10 {
        instance.tick(i as f64 * 16.0, &mut surface, &display);
    }
    instance.sim_mut().pause();

    instance.resize(FrameSize::new(800, 600));

    assert!(instance.sim().state().paused);
    assert_eq!(instance.sim().state().angle_radians, 0.0);
    assert!(instance.is_running());

    // an explicit reset still clears the pause
    instance.reset();
    assert!(!instance.sim().state().paused);
}

#[test]
fn orbit_keeps_angle_through_diagram_trip() {
    let mut instance = Instance::mount(orbit_sim(), reference_frame(), ViewMode::Explore);
    instance.start();
    let mut surface = RecordingSurface::new();
    let display = DisplayOptions::default();

    for i in 1..=20 {
        instance.tick(i as f64 * 16.0, &mut surface, &display);
    }
    let angle = instance.sim().state().angle_radians;

    instance.set_view_mode(ViewMode::Diagram);
    for i in 21..=40 {
        instance.tick(i as f64 * 16.0, &mut surface, &display);
    }
    instance.set_view_mode(ViewMode::Explore);

    assert_eq!(instance.sim().state().angle_radians, angle);
    assert_eq!(instance.sim().params, OrbitParams::default());
}

// ==================================================================================
// Scheduler tests
// ==================================================================================

#[test]
fn starting_a_loop_cancels_the_previous_one() {
    let mut scheduler = FrameScheduler::new();
    assert!(!scheduler.is_running());

    let first = scheduler.start();
    let second = scheduler.start();

    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
    assert_eq!(scheduler.generation(), 2);
    assert!(scheduler.is_running());

    scheduler.cancel();
    assert!(second.is_cancelled());
    assert!(!scheduler.is_running());
    assert!(scheduler.token().is_none());
}

#[test]
fn loop_stops_on_cancel_inside_tick() {
    let token = CancelToken::new();
    let mut host = ScriptedHost::every_16ms(10);
    let mut ticks = Vec::new();

    let exit = run_until_cancelled(&mut host, &token, |now| {
        ticks.push(now);
        if ticks.len() == 3 {
            token.cancel();
        }
    });

    assert_eq!(exit, LoopExit::Cancelled);
    assert_eq!(ticks, vec![16.0, 32.0, 48.0]);
}

#[test]
fn loop_ends_when_host_closes() {
    let token = CancelToken::new();
    let mut host = ScriptedHost::every_16ms(4);
    let mut count = 0;

    let exit = run_until_cancelled(&mut host, &token, |_| count += 1);

    assert_eq!(exit, LoopExit::HostClosed);
    assert_eq!(count, 4);
}

#[test]
fn cancelled_token_never_ticks() {
    let token = CancelToken::new();
    token.cancel();
    let mut host = ScriptedHost::every_16ms(4);
    let mut count = 0;

    assert_eq!(run_until_cancelled(&mut host, &token, |_| count += 1), LoopExit::Cancelled);
    assert_eq!(count, 0);
}

// ==================================================================================
// Lab tests
// ==================================================================================

#[test]
fn only_active_simulation_loop_runs() {
    let mut lab = lab(SimulationKind::Contact, ViewMode::Explore);
    assert!(lab.contact().is_running());
    assert!(!lab.orbit().is_running());

    let contact_token = lab.active_token();
    lab.switch_to(SimulationKind::Orbit);
    assert!(contact_token.is_some_and(|t| t.is_cancelled()));
    assert!(!lab.contact().is_running());
    assert!(lab.orbit().is_running());

    let mut surface = RecordingSurface::new();
    assert!(lab.tick(16.0, &mut surface));
    assert_eq!(surface.frames, 1);

    lab.shutdown();
    assert!(lab.active_token().is_none());
    assert!(!lab.tick(32.0, &mut surface));
    assert_eq!(surface.frames, 1);
}

#[test]
fn tab_switch_drops_pending_hold() {
    let mut lab = lab(SimulationKind::Contact, ViewMode::Explore);
    let mut surface = RecordingSurface::new();
    assert!(lab.strike());

    let mut now = 0.0;
    while lab.status().phase != ContactPhase::Contact {
        now += 16.0;
        assert!(now < 60_000.0, "strike never reached contact");
        lab.tick(now, &mut surface);
    }
    assert!(lab.status().holding);

    lab.switch_to(SimulationKind::Orbit);
    lab.switch_to(SimulationKind::Contact);

    let status = lab.status();
    assert!(!status.holding);
    assert_eq!(status.phase, ContactPhase::Idle);
    let sim = lab.contact().sim();
    assert_eq!(sim.state(), &ContactState::at_rest(sim.geometry()));

    // the fresh loop starts idle and stays there
    lab.tick(now + 16.0, &mut surface);
    assert_eq!(lab.status().phase, ContactPhase::Idle);
}

#[test]
fn commands_route_to_active_instance() {
    let mut lab = lab(SimulationKind::Orbit, ViewMode::Explore);
    assert!(!lab.strike());
    assert_eq!(lab.status().phase, ContactPhase::Idle);

    lab.toggle_pause();
    assert!(lab.status().paused);

    lab.set_view_mode(ViewMode::Diagram);
    assert_eq!(lab.orbit().mode(), ViewMode::Diagram);
    assert_eq!(lab.contact().mode(), ViewMode::Explore);

    lab.toggle_simulation();
    assert_eq!(lab.view_mode(), ViewMode::Explore);
    assert!(lab.strike());
    assert_eq!(lab.status().phase, ContactPhase::Descending);
}

#[test]
fn surface_change_resets_both_instances() {
    let mut lab = lab(SimulationKind::Contact, ViewMode::Explore);
    assert_eq!(lab.observe_surface(Some((960.0, 640.0))), None);
    assert!(lab.strike());

    let resized = lab.observe_surface(Some((1200.4, 800.9)));

    assert_eq!(resized, Some(FrameSize::new(1200, 800)));
    assert_eq!(lab.contact().frame(), FrameSize::new(1200, 800));
    assert_eq!(lab.orbit().frame(), FrameSize::new(1200, 800));
    assert_eq!(lab.status().phase, ContactPhase::Idle);
    assert!(lab.contact().is_running());
    assert!(!lab.orbit().is_running());
}

#[test]
fn parameter_setters_clamp_through_lab() {
    let mut lab = lab(SimulationKind::Contact, ViewMode::Explore);
    lab.set_mass(42);
    lab.set_speed(0);
    lab.set_separation(5);

    assert_eq!(lab.contact_params(), ContactParams::new(10, 1));
    assert_eq!(lab.orbit_params().separation(), 120);
    assert_eq!(lab.status().expected_force, 220.0);
}

// ==================================================================================
// Rendering tests
// ==================================================================================

fn arrow_heads(surface: &RecordingSurface) -> usize {
    surface.count(|c| matches!(c, DrawCommand::Polygon { .. }))
}

#[test]
fn diagram_contact_draws_static_annotations() {
    let mut lab = lab(SimulationKind::Contact, ViewMode::Diagram);
    let mut surface = RecordingSurface::new();
    assert!(lab.tick(16.0, &mut surface));

    assert_eq!(arrow_heads(&surface), 2);
    assert!(surface.contains_text("Action: hammer on block, 550 N"));
    assert!(surface.contains_text("Reaction: block on hammer, 550 N"));
    assert!(!surface.contains_text("F on block"));
}

#[test]
fn explore_contact_draws_arrows_only_during_contact() {
    let mut lab = lab(SimulationKind::Contact, ViewMode::Explore);
    let mut surface = RecordingSurface::new();

    assert!(lab.tick(16.0, &mut surface));
    assert_eq!(arrow_heads(&surface), 0);
    assert!(surface.texts().is_empty());

    assert!(lab.strike());
    let mut now = 16.0;
    while lab.status().phase != ContactPhase::Contact {
        now += 16.0;
        assert!(lab.tick(now, &mut surface));
    }

    assert_eq!(arrow_heads(&surface), 2);
    assert!(surface.contains_text("F on block by hammer = 550 N"));
    assert!(surface.contains_text("F on hammer by block = 550 N"));
    assert!(!surface.contains_text("Action:"));
}

#[test]
fn explore_orbit_labels_both_forces_equally() {
    let mut lab = lab(SimulationKind::Orbit, ViewMode::Explore);
    let mut surface = RecordingSurface::new();
    assert!(lab.tick(16.0, &mut surface));

    assert_eq!(arrow_heads(&surface), 2);
    assert!(surface.contains_text("F on m2 by m1 = 8.93"));
    assert!(surface.contains_text("F on m1 by m2 = 8.93"));
    assert!(surface.count(|c| matches!(c, DrawCommand::Clear { .. })) == 1);
}

#[test]
fn acceleration_arrows_follow_toggle() {
    let mut lab = lab(SimulationKind::Orbit, ViewMode::Explore);
    lab.display.show_acceleration = true;
    let mut surface = RecordingSurface::new();
    assert!(lab.tick(16.0, &mut surface));

    assert_eq!(arrow_heads(&surface), 4);
    assert!(surface.contains_text("a1 = 1.49"));
    assert!(surface.contains_text("a2 = 2.98"));

    lab.display.show_acceleration = false;
    lab.display.show_orbit_path = false;
    assert!(lab.tick(32.0, &mut surface));
    assert_eq!(arrow_heads(&surface), 2);
    assert!(!surface.contains_text("a1"));
}

#[test]
fn starfield_is_deterministic_per_seed() {
    let frame = reference_frame();
    let a = Starfield::generate(frame, 7);

    assert_eq!(a, Starfield::generate(frame, 7));
    assert_ne!(a, Starfield::generate(frame, 8));
    assert!(!a.is_empty());
    for star in a.stars() {
        assert!((0.0..480.0).contains(&star.position.x));
        assert!((0.0..480.0).contains(&star.position.y));
    }
}

// ==================================================================================
// Configuration tests
// ==================================================================================

#[test]
fn partial_yaml_fills_defaults() {
    let cfg = LabConfig::from_yaml("contact:\n  mass: 7\nstart:\n  simulation: orbit\n  view_mode: diagram\n").unwrap();

    assert_eq!(cfg.contact.mass, 7);
    assert_eq!(cfg.contact.speed, 5);
    assert_eq!(cfg.contact.hold_ms, 3000.0);
    assert_eq!(cfg.orbit.separation, 220);
    assert_eq!(cfg.start.simulation, SimulationKind::Orbit);
    assert_eq!(cfg.start.view_mode, ViewMode::Diagram);
    assert!(cfg.display.show_orbit_path);
}

#[test]
fn out_of_range_yaml_is_rejected() {
    let err = LabConfig::from_yaml("orbit:\n  separation: 50\n").unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { field: "orbit.separation", .. }), "got {err}");

    let err = LabConfig::from_yaml("contact:\n  hold_ms: -1.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::OutOfRange { field: "contact.hold_ms", .. }), "got {err}");

    let err = LabConfig::from_yaml("start:\n  simulation: sideways\n").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)), "got {err}");
}

#[test]
fn bundled_scenarios_load() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");
    for name in ["default.yaml", "orbit_diagram.yaml", "quick_strike.yaml"] {
        let cfg = load_config(&dir.join(name));
        assert!(cfg.is_ok(), "{name}: {:?}", cfg.err());
    }

    let missing = load_config(&dir.join("no_such_file.yaml"));
    assert!(matches!(missing, Err(ConfigError::Io { .. })));
}

// ==================================================================================
// Headless host tests
// ==================================================================================

#[test]
fn headless_strike_reports_phase_sequence() {
    let mut cfg = LabConfig::default();
    cfg.contact.hold_ms = 0.0;
    let options = HeadlessOptions {
        frames: 400,
        strike: true,
        status_every: 0,
        ..Default::default()
    };

    let report = run_headless(&cfg, options);

    assert_eq!(report.ticks, 400);
    assert_eq!(
        report.phases,
        vec![ContactPhase::Idle, ContactPhase::Descending, ContactPhase::Contact, ContactPhase::Rising, ContactPhase::Idle]
    );
    assert_eq!(report.final_status.phase, ContactPhase::Idle);
    assert!(!report.final_status.impact.active);
    assert!(report.last_frame_commands > 0);
}

#[test]
fn headless_orbit_advances_angle() {
    let mut cfg = LabConfig::default();
    cfg.start.simulation = SimulationKind::Orbit;
    let options = HeadlessOptions {
        frames: 120,
        status_every: 0,
        ..Default::default()
    };

    let report = run_headless(&cfg, options);

    assert_eq!(report.ticks, 120);
    assert_eq!(report.phases, vec![ContactPhase::Idle]);
    assert!(report.final_status.angle_degrees > 0.0);
    assert_relative_eq!(report.final_status.gravity, 8.93);
}
