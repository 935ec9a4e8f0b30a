// SPDX-License-Identifier: MPL-2.0
//! The measurement adaptor: a running-statistics sink plus a deadline check,
//! sampled once per emitted DAG. Wall-clock is measured with
//! [`std::time::Instant`] rather than `SystemTime` since the spec's "elapsed
//! since prior sample" contract needs a monotonic clock, not one subject to
//! wall-clock adjustments.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::error::EnumError;
use crate::graph::Graph;
use crate::io;

/// Configuration a collaborator hands the core when starting an
/// enumeration: how long to run before cancelling, and where (if anywhere)
/// to append a `n,elapsed_ms` row per emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementConfig {
    /// Deadline, in seconds of wall-clock elapsed since the first sample.
    pub timeout_seconds: f64,
    /// Optional path to append a CSV delay log to.
    pub delay_log_path: Option<PathBuf>,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        MeasurementConfig {
            timeout_seconds: f64::INFINITY,
            delay_log_path: None,
        }
    }
}

/// Final descriptive statistics over every sampled inter-emission delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementSummary {
    pub min_ns: u64,
    pub max_ns: u64,
    pub mean_ns: f64,
    pub std_ns: f64,
    pub n: u64,
}

/// A running Welford accumulator over inter-emission delays, with a
/// cooperative deadline check folded into each sample.
pub struct Measurement {
    start: Instant,
    last: Instant,
    min_ns: u64,
    max_ns: u64,
    mean: f64,
    m2: f64,
    n: u64,
    timeout: Duration,
    log_file: Option<File>,
}

impl Measurement {
    pub fn new(config: &MeasurementConfig) -> Result<Measurement, EnumError> {
        let log_file = match &config.delay_log_path {
            Some(path) => Some(OpenOptions::new().create(true).append(true).open(path)?),
            None => None,
        };
        let now = Instant::now();
        Ok(Measurement {
            start: now,
            last: now,
            min_ns: 0,
            max_ns: 0,
            mean: 0.0,
            m2: 0.0,
            n: 0,
            timeout: duration_from_seconds(config.timeout_seconds),
            log_file,
        })
    }

    /// Records one emitted DAG: samples elapsed time since the previous
    /// sample, folds it into the running min/max/mean/M2, optionally appends
    /// a CSV row, and raises `DeadlineExceeded` if the total elapsed time
    /// since construction has now reached the configured timeout.
    pub fn add_measurement(&mut self) -> Result<(), EnumError> {
        let now = Instant::now();
        let elapsed_ns = now.duration_since(self.last).as_nanos().min(u128::from(u64::MAX)) as u64;
        self.n += 1;
        if self.n == 1 {
            self.min_ns = elapsed_ns;
            self.max_ns = elapsed_ns;
        } else {
            self.min_ns = self.min_ns.min(elapsed_ns);
            self.max_ns = self.max_ns.max(elapsed_ns);
        }
        let elapsed = elapsed_ns as f64;
        let delta = elapsed - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = elapsed - self.mean;
        self.m2 += delta * delta2;

        if let Some(file) = &mut self.log_file {
            writeln!(file, "{},{}", self.n, elapsed / 1e6)?;
        }
        self.last = now;

        if now.duration_since(self.start) >= self.timeout {
            return Err(EnumError::DeadlineExceeded { emitted: self.n });
        }
        Ok(())
    }

    pub fn summary(&self) -> MeasurementSummary {
        let std_ns = if self.n > 1 {
            (self.m2 / (self.n - 1) as f64).sqrt()
        } else {
            0.0
        };
        MeasurementSummary {
            min_ns: self.min_ns,
            max_ns: self.max_ns,
            mean_ns: self.mean,
            std_ns,
            n: self.n,
        }
    }
}

/// Shared by every enumerator: hands the DAG to the sink callback, bumps the
/// arbitrary-precision count, optionally writes the DAG to `out_dir`, and
/// folds the emission into the measurement adaptor (which may raise
/// `DeadlineExceeded`).
pub fn emit(
    dag: &Graph,
    count: &mut BigUint,
    measurement: &mut Measurement,
    sink: &mut dyn FnMut(&Graph),
    out_dir: Option<&Path>,
) -> Result<(), EnumError> {
    sink(dag);
    *count += 1u32;
    if let Some(dir) = out_dir {
        let path = dir.join(format!("{count}.dag"));
        io::write_dag(dag, &path)?;
    }
    measurement.add_measurement()
}

fn duration_from_seconds(seconds: f64) -> Duration {
    if !seconds.is_finite() || seconds < 0.0 {
        Duration::MAX
    } else {
        Duration::from_secs_f64(seconds)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn welford_mean_matches_known_values() {
        let config = MeasurementConfig::default();
        let mut m = Measurement::new(&config).unwrap();
        for _ in 0..5 {
            m.add_measurement().unwrap();
        }
        let summary = m.summary();
        assert_eq!(summary.n, 5);
        assert!(summary.mean_ns >= 0.0);
    }

    #[test]
    fn zero_timeout_raises_deadline_immediately() {
        let config = MeasurementConfig {
            timeout_seconds: 0.0,
            delay_log_path: None,
        };
        let mut m = Measurement::new(&config).unwrap();
        std::thread::sleep(Duration::from_millis(1));
        let err = m.add_measurement().unwrap_err();
        match err {
            EnumError::DeadlineExceeded { emitted } => assert_eq!(emitted, 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn infinite_timeout_never_fires() {
        let config = MeasurementConfig::default();
        let mut m = Measurement::new(&config).unwrap();
        for _ in 0..100 {
            m.add_measurement().unwrap();
        }
    }
}
