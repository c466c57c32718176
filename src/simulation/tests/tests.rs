use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use approx::assert_relative_eq;
use glam::Vec3;

use super::*;
use crate::core::error::SceneError;
use crate::domain::config::DegeneratePolicy;
use crate::domain::object::ObjectDescriptor;
use crate::domain::scene_graph::{NodeId, WallVisual};
use crate::gravity::GravityPhase;

#[derive(Default)]
struct GraphLog {
    attached: BTreeSet<NodeId>,
    disposed: BTreeSet<NodeId>,
}

#[derive(Clone, Default)]
struct SharedGraph(Rc<RefCell<GraphLog>>);

impl SceneGraph for SharedGraph {
    fn add(&mut self, visual: &WallVisual) {
        self.0.borrow_mut().attached.insert(visual.node);
    }

    fn remove(&mut self, node: NodeId) {
        self.0.borrow_mut().attached.remove(&node);
    }

    fn dispose(&mut self, node: NodeId) {
        let mut log = self.0.borrow_mut();
        assert!(!log.attached.contains(&node), "disposed while attached");
        log.disposed.insert(node);
    }
}

fn cube(name: &str, position: [f32; 3]) -> ObjectDescriptor {
    ObjectDescriptor {
        name: name.to_string(),
        position,
        rotation: [0.0, 0.0, 0.0, 1.0],
        size: [1.0, 1.0, 1.0],
    }
}

fn assets() -> LoadedScene {
    LoadedScene {
        objects: vec![
            cube("Cube", [0.0, 0.0, 0.0]),
            cube("Sphere", [3.0, 1.0, 0.0]),
            cube("Letter_A", [-3.0, -1.0, 2.0]),
        ],
        anchor: Some(cube("Logo", [0.0, 0.0, 0.0])),
    }
}

fn loaded_scene() -> SceneCore {
    let mut core = SceneCore::new(SceneConfig::default());
    core.resize(800.0, 600.0).unwrap();
    core.on_assets_loaded(assets()).unwrap();
    core
}

#[test]
fn frame_before_load_is_skipped() {
    let mut core = SceneCore::new(SceneConfig::default());
    assert_eq!(core.frame(0.0).unwrap(), FrameOutcome::Skipped);
    assert_eq!(core.frame_count(), 0);
}

#[test]
fn second_asset_load_is_rejected() {
    let mut core = loaded_scene();
    assert_eq!(core.on_assets_loaded(assets()), Err(SceneError::AlreadyLoaded));
    assert_eq!(core.registry().len(), 3);
}

#[test]
fn walls_built_before_load_get_bodies_at_load() {
    let mut core = SceneCore::new(SceneConfig::default());
    core.resize(800.0, 600.0).unwrap();
    assert!(core.walls().walls().iter().all(|w| w.body().is_none()));

    let report = core.on_assets_loaded(assets()).unwrap();
    assert_eq!(report.registered, 3);
    assert_eq!(report.walls, 6);
    assert!(report.anchored);

    let world = core.world().unwrap();
    assert_eq!(core.walls().wall_bodies().len(), 6);
    // three objects, six walls, one anchor
    assert_eq!(world.body_count(), 10);
}

#[test]
fn pointer_gravity_reaches_world_after_frame() {
    let mut core = loaded_scene();
    core.pointer_move(600.0, 450.0, 0.0).unwrap();
    assert_eq!(core.frame(16.0).unwrap(), FrameOutcome::Stepped);

    let g = core.world().unwrap().gravity();
    assert_relative_eq!(g.x, 50.0);
    assert_relative_eq!(g.y, -50.0);
    assert_eq!(g.z, 0.0);
}

#[test]
fn decay_resets_gravity_on_the_frame_after_deadline() {
    let mut core = loaded_scene();
    core.pointer_move(600.0, 450.0, 0.0).unwrap();
    core.frame(4999.0).unwrap();
    assert_eq!(core.gravity().phase(), GravityPhase::Tracking);

    core.frame(5000.0).unwrap();
    assert_eq!(core.gravity().phase(), GravityPhase::Idle);
    assert_eq!(core.world().unwrap().gravity(), Vec3::ZERO);
}

#[test]
fn superseded_host_timer_is_ignored() {
    let mut core = loaded_scene();
    let first = core.pointer_move(100.0, 100.0, 0.0).unwrap();
    let second = core.pointer_move(700.0, 500.0, 100.0).unwrap();
    assert_eq!(second.cancelled, Some(first.armed));

    assert!(!core.fire_decay(first.armed));
    assert_eq!(core.gravity().phase(), GravityPhase::Tracking);
    assert!(core.fire_decay(second.armed));
    assert_eq!(core.gravity().phase(), GravityPhase::Idle);
}

#[test]
fn registry_stays_paired_with_bodies_across_frames() {
    let mut core = loaded_scene();
    core.pointer_move(0.0, 600.0, 0.0).unwrap();
    for i in 0..30 {
        core.frame(i as f64 * 16.0).unwrap();
    }
    let world = core.world().unwrap();
    for pair in core.registry().pairs() {
        let body = world.body(pair.body()).unwrap();
        assert_eq!(pair.object().position, body.position);
        assert_eq!(pair.object().orientation, body.orientation);
    }
    assert_eq!(core.transforms().len(), 3 * crate::registry::TRANSFORM_STRIDE);
}

#[test]
fn click_impulse_reads_pointer_before_reset() {
    let mut core = loaded_scene();
    core.pointer_move(600.0, 450.0, 0.0).unwrap();
    assert_eq!(core.click(), 3);

    let world = core.world().unwrap();
    for handle in core.registry().body_handles() {
        let body = world.body(handle).unwrap();
        assert!(body.angular_velocity.length() > 0.0);
        assert!(body.velocity.x <= 0.0);
        assert!(body.velocity.y >= 0.0);
    }
    assert_eq!(core.gravity().gravity(100.0), Vec3::ZERO);
    // the armed timer survives a click
    assert!(core.gravity().armed().is_some());
}

#[test]
fn click_leaves_anchor_and_walls_static() {
    let mut core = loaded_scene();
    core.click();
    let world = core.world().unwrap();
    let anchor = world.body(core.anchor_body().unwrap()).unwrap();
    assert_eq!(anchor.velocity, Vec3::ZERO);
    for handle in core.walls().wall_bodies() {
        assert_eq!(world.body(handle).unwrap().angular_velocity, Vec3::ZERO);
    }
}

#[test]
fn resize_moves_camera_and_anchor() {
    let mut core = loaded_scene();
    let outcome = core.resize(1400.0, 700.0).unwrap();

    assert_eq!(outcome.walls, 6);
    assert_relative_eq!(outcome.camera.right, 20.0);
    assert_relative_eq!(outcome.camera.left, -20.0);
    assert_relative_eq!(outcome.camera.top, 10.0);
    assert_eq!(outcome.camera.near, -1000.0);
    assert_eq!(outcome.camera.far, 1000.0);

    let expected = Vec3::new(-20.0 + 1.5, 10.0 - 1.5, 0.0);
    assert_eq!(outcome.anchor_position, Some(expected));
    assert_eq!(core.anchor().unwrap().position, expected);
    let body = core.world().unwrap().body(core.anchor_body().unwrap()).unwrap();
    assert_eq!(body.position, expected);
}

#[test]
fn repeated_resize_keeps_wall_and_body_counts() {
    let mut core = loaded_scene();
    let before = core.world().unwrap().body_count();
    for _ in 0..5 {
        core.resize(800.0, 600.0).unwrap();
    }
    assert_eq!(core.walls().len(), 6);
    assert_eq!(core.world().unwrap().body_count(), before);
    for pair in core.registry().pairs() {
        assert!(core.world().unwrap().contains(pair.body()));
    }
}

#[test]
fn debug_toggle_shows_and_hides_walls() {
    let graph = SharedGraph::default();
    let mut core = loaded_scene();
    core.attach_scene_graph(Box::new(graph.clone()));
    assert!(graph.0.borrow().attached.is_empty());

    core.set_debug(true);
    assert_eq!(graph.0.borrow().attached.len(), 6);

    core.resize(640.0, 480.0).unwrap();
    assert_eq!(graph.0.borrow().attached.len(), 6);
    assert_eq!(graph.0.borrow().disposed.len(), 6);

    core.set_debug(false);
    assert!(graph.0.borrow().attached.is_empty());
}

#[test]
fn replacing_scene_graph_moves_wall_visuals() {
    let first = SharedGraph::default();
    let second = SharedGraph::default();
    let mut core = loaded_scene();
    core.set_debug(true);
    core.attach_scene_graph(Box::new(first.clone()));
    assert_eq!(first.0.borrow().attached.len(), 6);

    core.attach_scene_graph(Box::new(second.clone()));
    assert!(first.0.borrow().attached.is_empty());
    assert_eq!(first.0.borrow().disposed.len(), 6);
    assert_eq!(second.0.borrow().attached.len(), 6);

    // Later rebuilds only touch the current graph.
    core.resize(640.0, 480.0).unwrap();
    assert_eq!(first.0.borrow().disposed.len(), 6);
    assert_eq!(second.0.borrow().attached.len(), 6);
    assert_eq!(second.0.borrow().disposed.len(), 6);
}

#[test]
fn degenerate_objects_follow_policy() {
    let mut flat = assets();
    flat.objects.push(ObjectDescriptor {
        size: [2.0, 0.0, 2.0],
        ..cube("Plane", [0.0, -2.0, 0.0])
    });

    let mut core = SceneCore::new(SceneConfig::default());
    let report = core.on_assets_loaded(flat.clone()).unwrap();
    assert_eq!((report.registered, report.skipped), (3, 1));

    let config = SceneConfig {
        degenerate_policy: DegeneratePolicy::Substitute,
        ..SceneConfig::default()
    };
    let mut core = SceneCore::new(config);
    let report = core.on_assets_loaded(flat).unwrap();
    assert_eq!((report.registered, report.skipped), (4, 0));
}

#[test]
fn paused_physics_leaves_bodies_in_place() {
    let mut core = loaded_scene();
    core.pointer_move(0.0, 0.0, 0.0).unwrap();
    core.frame(16.0).unwrap();
    core.set_update_physics(false);

    let before: Vec<_> = core.registry().pairs().iter().map(|p| p.object().position).collect();
    assert_eq!(core.frame(32.0).unwrap(), FrameOutcome::Paused);
    let after: Vec<_> = core.registry().pairs().iter().map(|p| p.object().position).collect();
    assert_eq!(before, after);
}

#[test]
fn follow_mouse_off_ignores_pointer() {
    let mut core = loaded_scene();
    core.set_follow_mouse(false);
    assert!(core.pointer_move(10.0, 10.0, 0.0).is_none());
    assert_eq!(core.gravity().phase(), GravityPhase::Idle);
}

#[test]
fn perf_stats_report_counts() {
    let mut core = loaded_scene();
    core.enable_perf_metrics(true);
    core.frame(0.0).unwrap();
    let stats = core.get_perf_stats();
    assert!(stats.step_ms() >= 0.0);
    assert_eq!(stats.body_count(), 10);
    assert_eq!(stats.wall_count(), 6);
    assert_eq!(stats.frame(), 1);
}

#[test]
fn teardown_releases_everything_once() {
    let graph = SharedGraph::default();
    let mut core = loaded_scene();
    core.attach_scene_graph(Box::new(graph.clone()));
    core.set_debug(true);
    let arm = core.pointer_move(100.0, 100.0, 0.0).unwrap();

    assert_eq!(core.teardown(), Some(arm.armed));
    assert!(core.world().is_none());
    assert!(core.registry().is_empty());
    assert!(graph.0.borrow().attached.is_empty());
    assert_eq!(graph.0.borrow().disposed.len(), 6);

    assert_eq!(core.teardown(), None);
    assert_eq!(core.frame(0.0), Err(SceneError::TornDown));
    assert!(core.resize(800.0, 600.0).is_err());
    assert!(!core.fire_decay(arm.armed));
}
