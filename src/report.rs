//! Text and JSON rendering of sweep results.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::strategy::Strategy;
use crate::sweep::{CellResult, SweepSummary};

pub fn write_header(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{:>10}, {:>10}, {:>10}", "Low Hold", "High Hold", "High Idle")
}

/// Writes the cell's parameters in microseconds, then one line per strategy.
pub fn write_cell(out: &mut impl Write, cell: &CellResult) -> io::Result<()> {
    let params = &cell.params;
    writeln!(
        out,
        "{:>10}, {:>10}, {:>10}",
        params.low_hold.as_micros(),
        params.high_hold.as_micros(),
        params.high_idle.as_micros()
    )?;
    for (strategy, result) in &cell.results {
        writeln!(
            out,
            "{:>22} Low Priority: {:>15}, High Priority: {:>15}",
            strategy.name(),
            result.low_held.as_nanos(),
            result.high_wait.as_nanos()
        )?;
    }
    Ok(())
}

pub fn write_summary(out: &mut impl Write, summary: &SweepSummary) -> io::Result<()> {
    writeln!(out, "Strategy win counts for low-priority work done:")?;
    write_tally(out, &summary.low_wins)?;
    writeln!(out, "Strategy win counts for lowest high-priority latency:")?;
    write_tally(out, &summary.high_wins)
}

fn write_tally(out: &mut impl Write, tally: &BTreeMap<Strategy, usize>) -> io::Result<()> {
    for (strategy, wins) in tally {
        writeln!(out, "  {strategy}: {wins}")?;
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, summary: &SweepSummary) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}
