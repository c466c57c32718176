use tracing::{info, warn};

use crate::core::error::{SceneError, SceneResult};
use crate::core::random::seed_state;
use crate::domain::config::SceneConfig;
use crate::domain::object::{LoadedScene, RenderableObject};
use crate::domain::scene_graph::SceneGraph;
use crate::gravity::PointerGravity;
use crate::registry::BodyMeshRegistry;
use crate::rigid_body::RigidBody;
use crate::rigid_body_system::RigidBodySystem;
use crate::walls::WallManager;

use super::perf_stats::StepStats;
use super::viewport;
use super::{Anchor, SceneCore};

/// What the asset barrier produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub registered: usize,
    pub skipped: usize,
    pub walls: usize,
    pub anchored: bool,
}

pub(super) fn create_scene_core(config: SceneConfig) -> SceneCore {
    SceneCore {
        registry: BodyMeshRegistry::new(config.restitution),
        walls: WallManager::new(config.debug),
        gravity: PointerGravity::new(config.decay_ms),
        rng_state: seed_state(config.rng_seed),
        world: None,
        anchor: None,
        scene: None,
        viewport: (0.0, 0.0),
        loaded: false,
        torn_down: false,
        frame: 0,
        perf_enabled: false,
        perf_stats: StepStats::default(),
        config,
    }
}

pub(super) fn attach_scene_graph(core: &mut SceneCore, scene: Box<dyn SceneGraph>) {
    if let Some(previous) = core.scene.as_deref_mut() {
        info!("replacing scene graph");
        core.walls.detach_visuals(previous);
    }
    let scene = core.scene.insert(scene);
    core.walls.attach_pending(scene.as_mut());
}

pub(super) fn on_assets_loaded(core: &mut SceneCore, assets: LoadedScene) -> SceneResult<LoadReport> {
    if core.torn_down {
        return Err(SceneError::TornDown);
    }
    if core.loaded {
        return Err(SceneError::AlreadyLoaded);
    }

    let config = &core.config;
    let mut world = RigidBodySystem::new(config.solver_iterations);
    let mut report = LoadReport::default();

    for desc in &assets.objects {
        let object = RenderableObject::from(desc);
        match core.registry.register_with_policy(
            &mut world,
            object,
            config.body_mass,
            config.degenerate_policy,
            config.min_extent,
        )? {
            Some(_) => report.registered += 1,
            None => report.skipped += 1,
        }
    }

    if let Some(desc) = &assets.anchor {
        let object = RenderableObject::from(desc);
        let body = if object.is_degenerate() {
            warn!("{}; anchor stays visual only", SceneError::degenerate_shape(object.name.clone(), object.size));
            None
        } else {
            let body = RigidBody::new_box(object.position, object.orientation, object.half_extents(), 0.0);
            Some(world.add_body(body))
        };
        core.anchor = Some(Anchor { object, body });
        report.anchored = true;
    }

    // Walls computed by an earlier resize get their bodies now.
    core.walls.attach_bodies(&mut world);
    report.walls = core.walls.len();

    core.world = Some(world);
    core.loaded = true;

    let (width, height) = core.viewport;
    if width > 0.0 && height > 0.0 {
        viewport::place_anchor(core, width, height);
    }

    info!(
        registered = report.registered,
        skipped = report.skipped,
        walls = report.walls,
        "scene assets loaded"
    );
    Ok(report)
}
