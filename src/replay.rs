//! Scripted replays of tick profiles through a single simulator.
//!
//! Each profile segment expands into fixed-length ticks (the last one may be
//! shorter). When a [`ManualClock`] is supplied it is advanced by every tick
//! before the update, so elapsed-time reconciliation sees the same deltas the
//! caller passes in.

use std::io;

use ullage_config::{ConfigError, TickProfile, TickSegment};
use ullage_sim::{ManualClock, StabilityTier, TickInput, UllageSimulator};

/// Outcome of one profile segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub label: String,
    pub ticks: usize,
    pub duration_s: f64,
    pub min_stability: f64,
    pub final_stability: f64,
    pub final_tier: StabilityTier,
}

/// Top-level replay error.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("invalid profile: {0}")]
    Profile(#[from] ConfigError),
    #[error("tick sink failed: {0}")]
    Sink(#[from] io::Error),
}

/// Inputs for one tick of `segment`.
pub fn segment_input(segment: &TickSegment, delta_time: f64) -> TickInput {
    TickInput {
        local_acceleration: segment.acceleration_m_s2,
        rotation_rate: segment.rotation_rad_s,
        delta_time,
        venting_acceleration: segment.venting_acceleration_m_s2,
        fuel_ratio: segment.fuel_ratio,
    }
}

/// Run every segment of `profile` through `sim`, calling `on_tick` after each
/// update with the replay time, the active segment, and the simulator.
pub fn replay_profile<F>(
    sim: &mut UllageSimulator,
    profile: &TickProfile,
    clock: Option<&ManualClock>,
    start_time_s: f64,
    mut on_tick: F,
) -> Result<Vec<SegmentSummary>, ReplayError>
where
    F: FnMut(f64, &TickSegment, &UllageSimulator) -> io::Result<()>,
{
    profile.validate()?;

    let mut time = start_time_s;
    let mut summaries = Vec::with_capacity(profile.segments.len());
    for segment in &profile.segments {
        let ticks = segment.tick_count();
        let mut remaining = segment.duration_s;
        let mut min_stability = sim.stability();

        for _ in 0..ticks {
            let step = segment.step_s.min(remaining).max(0.0);
            remaining -= step;
            if let Some(clock) = clock {
                clock.advance(step);
            }
            sim.update(&segment_input(segment, step));
            time += step;
            min_stability = min_stability.min(sim.stability());
            on_tick(time, segment, sim)?;
        }

        let summary = SegmentSummary {
            label: segment.label.clone(),
            ticks,
            duration_s: segment.duration_s,
            min_stability,
            final_stability: sim.stability(),
            final_tier: sim.tier(),
        };
        tracing::info!(
            name = sim.name(),
            segment = %summary.label,
            ticks,
            min_stability,
            final_stability = summary.final_stability,
            "segment replayed"
        );
        summaries.push(summary);
    }
    Ok(summaries)
}
