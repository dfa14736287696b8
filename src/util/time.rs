//! Time utilities for the simulation

use std::time::Duration;

/// Default tick rate of the host loop
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Upper bound for a single integration step (seconds).
/// Slow or backgrounded frames are folded into one capped step.
pub const MAX_TICK_DT: f32 = 1.0 / 30.0;

/// Clamp a wall-clock delta into `[0, MAX_TICK_DT]`
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        return 0.0;
    }
    dt.clamp(0.0, MAX_TICK_DT)
}

/// Duration of one host tick at the given rate
pub fn tick_interval(tick_rate: u32) -> Duration {
    Duration::from_micros(1_000_000 / tick_rate.max(1) as u64)
}

/// Format a lap duration as `m:ss.mmm`
pub fn format_lap_time(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    let minutes = total_ms / 60_000;
    let seconds = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}

/// Placeholder shown when no lap time is available
pub const EMPTY_LAP_TIME: &str = "--:--.---";

/// Format an optional lap duration, falling back to the placeholder
pub fn format_optional_lap_time(duration: Option<Duration>) -> String {
    duration
        .map(format_lap_time)
        .unwrap_or_else(|| EMPTY_LAP_TIME.to_string())
}
