//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `lifecycle_events.csv`
//! - `tick_summaries.csv`
//! - `agent_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{AgentSnapshotRow, EventRow, OutputResult, TickSummaryRow};

pub const EVENTS_FILE: &str = "lifecycle_events.csv";
pub const SUMMARIES_FILE: &str = "tick_summaries.csv";
pub const SNAPSHOTS_FILE: &str = "agent_snapshots.csv";

/// Writes a world trace to three CSV files.
pub struct CsvTraceWriter {
    events:    Writer<File>,
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvTraceWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut events = Writer::from_path(dir.join(EVENTS_FILE))?;
        events.write_record([
            "tick", "time_secs", "agent_id", "kind", "task", "slot", "cancelled", "phase",
            "severity", "detail",
        ])?;

        let mut summaries = Writer::from_path(dir.join(SUMMARIES_FILE))?;
        summaries.write_record(["tick", "time_secs", "agents", "running", "paused", "moving", "events"])?;

        let mut snapshots = Writer::from_path(dir.join(SNAPSHOTS_FILE))?;
        snapshots.write_record(["agent_id", "tick", "kind", "x", "y", "z", "severity", "running", "activity"])?;

        Ok(Self {
            events,
            summaries,
            snapshots,
            finished: false,
        })
    }
}

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

impl OutputWriter for CsvTraceWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()> {
        self.events.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.time_secs),
            row.agent_id.to_string(),
            row.kind.to_owned(),
            opt(&row.task),
            opt(&row.slot),
            opt(&row.cancelled.map(u8::from)),
            opt(&row.phase),
            opt(&row.severity),
            opt(&row.detail),
        ])?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.3}", row.time_secs),
            row.agents.to_string(),
            row.running.to_string(),
            row.paused.to_string(),
            row.moving.to_string(),
            row.events.to_string(),
        ])?;
        Ok(())
    }

    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.kind.clone(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.3}", row.z),
                row.severity.to_owned(),
                row.running.clone(),
                opt(&row.activity),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
