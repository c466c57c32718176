use tracing::trace;

use crate::core::error::{SceneError, SceneResult};

use super::{PerfTimer, SceneCore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No physics world yet; nothing to step.
    Skipped,
    /// Physics updates are switched off.
    Paused,
    Stepped,
}

/// Poll decay, step the world by one fixed increment, copy poses to the
/// renderables, then feed pointer gravity into the world for the next step.
pub(super) fn frame(core: &mut SceneCore, now_ms: f64) -> SceneResult<FrameOutcome> {
    if core.torn_down {
        return Err(SceneError::TornDown);
    }
    core.poll_decay(now_ms);

    let Some(world) = core.world.as_mut() else {
        trace!("{}; frame skipped", SceneError::UninitializedWorld);
        return Ok(FrameOutcome::Skipped);
    };
    if !core.config.update_physics {
        return Ok(FrameOutcome::Paused);
    }

    let timer = PerfTimer::start_if(core.perf_enabled);
    world.step(core.config.time_step);
    let step_ms = timer.elapsed_ms();

    let timer = PerfTimer::start_if(core.perf_enabled);
    core.registry.sync_all(world);
    let sync_ms = timer.elapsed_ms();

    world.set_gravity(core.gravity.gravity(core.config.gravity_coeff));
    core.frame += 1;

    let stats = &mut core.perf_stats;
    stats.step_ms = step_ms;
    stats.sync_ms = sync_ms;
    stats.body_count = world.body_count() as u32;
    stats.wall_count = core.walls.len() as u32;
    stats.frame = core.frame as u32;

    Ok(FrameOutcome::Stepped)
}
