//! Simulation loop runner.
//!
//! [`run_simulation`] drives exactly `T` steps of an [`UpdateEngine`] and
//! `T + 1` measurements:
//!
//! - before step `t` runs, the snapshot G_t is recorded tagged `t`;
//! - after the last step, the final snapshot G_T is recorded tagged `T`.
//!
//! With `T = 0` the initial snapshot is the only sample.

use contagion_types::MeasurementTable;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::measure::Measurement;
use crate::snapshot::GraphSnapshot;
use crate::step::{StepSummary, UpdateEngine};

/// Result of a simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationResult {
    /// Every sample, concatenated in time order.
    pub table: MeasurementTable,
    /// Number of steps executed.
    pub total_steps: u64,
    /// Number of measurements recorded (`total_steps + 1`).
    pub samples: usize,
    /// The last step summary, if any step ran.
    pub final_summary: Option<StepSummary>,
}

/// Callback invoked after each step completes.
///
/// The callback receives the step summary and the snapshot the step
/// produced.
pub trait StepCallback {
    /// Called after a step completes successfully.
    fn on_step(&mut self, summary: &StepSummary, snapshot: &GraphSnapshot);
}

/// A no-op step callback.
pub struct NoOpCallback;

impl StepCallback for NoOpCallback {
    fn on_step(&mut self, _summary: &StepSummary, _snapshot: &GraphSnapshot) {}
}

/// Logs progress and per-rule firing counts at `debug` after every step.
pub struct LoggingCallback {
    time_steps: u64,
}

impl LoggingCallback {
    /// Create a callback for a run of `time_steps` steps.
    pub const fn new(time_steps: u64) -> Self {
        Self { time_steps }
    }
}

impl StepCallback for LoggingCallback {
    fn on_step(&mut self, summary: &StepSummary, _snapshot: &GraphSnapshot) {
        for firing in &summary.fired {
            debug!(
                step = summary.time.saturating_add(1),
                time_steps = self.time_steps,
                rule = %firing.rule,
                fired = firing.fired,
                "Rule fired"
            );
        }
    }
}

/// Run `time_steps` steps, sampling `attribute` before every step and once
/// at the end.
///
/// # Errors
///
/// Returns [`CoreError::Configuration`] if the attribute cannot be
/// measured, or [`CoreError::Engine`] if the step counter overflows.
pub fn run_simulation(
    engine: &mut UpdateEngine,
    mut measure: Measurement,
    attribute: &str,
    time_steps: u64,
    callback: &mut dyn StepCallback,
) -> Result<SimulationResult, CoreError> {
    info!(
        time_steps,
        attribute,
        mode = %measure.mode(),
        rules = engine.compartment().rules().len(),
        "Simulation starting"
    );

    let mut final_summary = None;
    for _ in 0..time_steps {
        measure.record(engine.snapshot(), attribute, engine.time())?;
        let summary = engine.step()?;
        callback.on_step(&summary, engine.snapshot());
        final_summary = Some(summary);
    }
    measure.record(engine.snapshot(), attribute, engine.time())?;

    let samples = measure.sample_count();
    let result = SimulationResult {
        table: measure.concatenate(),
        total_steps: time_steps,
        samples,
        final_summary,
    };
    log_simulation_end(&result);
    Ok(result)
}

/// Log the simulation end.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        total_steps = result.total_steps,
        samples = result.samples,
        rows = result.table.len(),
        "Simulation ended"
    );

    if result.final_summary.is_none() {
        warn!("Simulation ended with no steps executed");
    }
}
