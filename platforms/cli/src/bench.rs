//! Repeated, trace-free timing of a rule set over a grid of unary inputs.

use anyhow::{Context, Result};
use multitur::{MachineConfig, Outcome, Program, TapeInput, TuringMachine};
use std::sync::Arc;
use std::time::Instant;

/// Summary of the timed runs for one `(m, k)` input.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub m: usize,
    pub k: usize,
    pub median: f64,
    pub mean: f64,
    pub std: f64,
    pub runs: usize,
}

impl Measurement {
    pub const CSV_HEADER: &'static str = "m,k,time_sec_median,time_sec_mean,time_sec_std,runs";

    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.m, self.k, self.median, self.mean, self.std, self.runs
        )
    }
}

/// Tape 0 blank, tape 1 holds `m` ones, tape 2 holds `k` ones.
pub fn addition_inputs(m: usize, k: usize) -> Vec<TapeInput> {
    vec![
        TapeInput::default(),
        TapeInput::new("1".repeat(m)),
        TapeInput::new("1".repeat(k)),
    ]
}

/// Times one run on a fresh machine, in seconds.
pub fn time_one_run(program: &Arc<Program>, inputs: &[TapeInput], max_steps: usize) -> Result<f64> {
    let config = MachineConfig::for_program(program).without_trace();
    let mut machine = TuringMachine::new(Arc::clone(program), config)?;
    machine.load(inputs)?;

    let start = Instant::now();
    let result = machine.run(max_steps);
    let elapsed = start.elapsed().as_secs_f64();

    if result.outcome != Outcome::Accepted {
        tracing::warn!(
            outcome = %result.outcome,
            steps = result.steps_taken,
            "benchmark run did not accept"
        );
    }

    Ok(elapsed)
}

/// Measures every `m` in `1..=m_max` for every `k`, after `warmup` untimed runs per point.
pub fn measure(
    program: &Arc<Program>,
    m_max: usize,
    ks: &[usize],
    runs: usize,
    warmup: usize,
    max_steps: usize,
) -> Result<Vec<Measurement>> {
    let mut rows = Vec::new();

    for &k in ks {
        for m in 1..=m_max {
            let inputs = addition_inputs(m, k);
            for _ in 0..warmup {
                time_one_run(program, &inputs, max_steps)?;
            }

            let times = (0..runs)
                .map(|_| time_one_run(program, &inputs, max_steps))
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("benchmark failed at m={}, k={}", m, k))?;

            rows.push(Measurement {
                m,
                k,
                median: median(&times),
                mean: mean(&times),
                std: population_std(&times),
                runs,
            });
            tracing::debug!(m, k, "measured");
        }
    }

    Ok(rows)
}

pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0 for fewer than two values.
pub fn population_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mean = mean(values);
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
