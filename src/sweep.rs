//! Runs every strategy over a grid of workload shapes and tallies which strategy
//! wins each cell.

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{Error, Result};
use crate::harness::{ContentionHarness, ContentionResult, WorkloadParameters};
use crate::strategy::Strategy;

/// Grid and window for a sweep.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Values tried for each of the three workload durations, in order.
    pub durations: Vec<Duration>,
    /// Measurement window of each run.
    pub window: Duration,
    /// Strategies run in every cell, in order. Ties go to the earlier one.
    pub strategies: Vec<Strategy>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            durations: [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000]
                .into_iter()
                .map(Duration::from_micros)
                .collect(),
            window: Duration::from_secs(120),
            strategies: Strategy::ALL.to_vec(),
        }
    }
}

impl SweepConfig {
    /// A two-value grid with a short window.
    pub fn for_testing() -> Self {
        Self {
            durations: vec![Duration::from_micros(100), Duration::from_millis(1)],
            window: Duration::from_millis(40),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.durations.is_empty() {
            return Err(Error::InvalidConfig("no workload durations"));
        }
        if self.strategies.is_empty() {
            return Err(Error::InvalidConfig("no strategies"));
        }
        let mut seen = HashSet::new();
        if !self.strategies.iter().all(|strategy| seen.insert(*strategy)) {
            return Err(Error::InvalidConfig("strategy listed twice"));
        }
        if self.window.is_zero() {
            return Err(Error::InvalidConfig("zero measurement window"));
        }
        Ok(())
    }

    /// Every cell of the grid, varying `high_idle` fastest and `low_hold` slowest.
    pub fn cells(&self) -> impl Iterator<Item = WorkloadParameters> + '_ {
        self.durations.iter().flat_map(move |&low_hold| {
            self.durations.iter().flat_map(move |&high_hold| {
                self.durations.iter().map(move |&high_idle| WorkloadParameters {
                    low_hold,
                    high_hold,
                    high_idle,
                })
            })
        })
    }
}

/// Every strategy's result for one cell, plus the cell's winners.
#[derive(Debug, Clone, Serialize)]
pub struct CellResult {
    pub params: WorkloadParameters,
    pub results: Vec<(Strategy, ContentionResult)>,
    /// Strategy with the most low-priority work, `None` if nobody did any.
    pub best_low: Option<Strategy>,
    /// Strategy with the least high-priority waiting, `None` if nothing ran.
    pub best_high: Option<Strategy>,
}

impl CellResult {
    fn new(params: WorkloadParameters, results: Vec<(Strategy, ContentionResult)>) -> Self {
        let mut best_low: Option<(Strategy, Duration)> = None;
        let mut best_high: Option<(Strategy, Duration)> = None;
        for &(strategy, result) in &results {
            let current_low = best_low.map_or(Duration::ZERO, |(_, held)| held);
            if result.low_held > current_low {
                best_low = Some((strategy, result.low_held));
            }
            if best_high.map_or(true, |(_, wait)| result.high_wait < wait) {
                best_high = Some((strategy, result.high_wait));
            }
        }
        CellResult {
            params,
            best_low: best_low.map(|(strategy, _)| strategy),
            best_high: best_high.map(|(strategy, _)| strategy),
            results,
        }
    }
}

/// Outcome of a whole sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepSummary {
    pub cells: Vec<CellResult>,
    /// Cells won on low-priority throughput, per strategy.
    pub low_wins: BTreeMap<Strategy, usize>,
    /// Cells won on high-priority latency, per strategy.
    pub high_wins: BTreeMap<Strategy, usize>,
}

impl SweepSummary {
    fn record(&mut self, cell: CellResult) {
        if let Some(strategy) = cell.best_low {
            *self.low_wins.entry(strategy).or_default() += 1;
        }
        if let Some(strategy) = cell.best_high {
            *self.high_wins.entry(strategy).or_default() += 1;
        }
        self.cells.push(cell);
    }
}

pub struct Sweep {
    config: SweepConfig,
}

impl Sweep {
    pub fn new(config: SweepConfig) -> Result<Self> {
        config.validate()?;
        Ok(Sweep { config })
    }

    /// Runs the whole grid through [`ContentionHarness`], calling `on_cell` as each
    /// cell completes.
    pub fn run(&self, on_cell: impl FnMut(&CellResult)) -> Result<SweepSummary> {
        let harness = ContentionHarness::new(self.config.window);
        self.run_with(|strategy, params| harness.run_strategy(strategy, params), on_cell)
    }

    /// Like [`Sweep::run`], with `runner` standing in for the harness.
    ///
    /// Strategies run one after another within a cell. The first error aborts the
    /// sweep.
    #[instrument(skip_all, fields(cells = self.config.durations.len().pow(3)))]
    pub fn run_with<R, F>(&self, mut runner: R, mut on_cell: F) -> Result<SweepSummary>
    where
        R: FnMut(Strategy, WorkloadParameters) -> Result<ContentionResult>,
        F: FnMut(&CellResult),
    {
        let mut summary = SweepSummary::default();
        for params in self.config.cells() {
            let results = self
                .config
                .strategies
                .iter()
                .map(|&strategy| runner(strategy, params).map(|result| (strategy, result)))
                .collect::<Result<Vec<_>>>()?;
            let cell = CellResult::new(params, results);
            info!(
                ?params,
                best_low = ?cell.best_low,
                best_high = ?cell.best_high,
                "cell finished"
            );
            on_cell(&cell);
            summary.record(cell);
        }
        Ok(summary)
    }
}
