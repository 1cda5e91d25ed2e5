//! The `OutputWriter` trait implemented by trace backends.

use crate::{AgentSnapshotRow, EventRow, OutputResult, TickSummaryRow};

/// A sink for trace rows.
///
/// Errors surface through [`TraceObserver::take_error`][crate::TraceObserver::take_error]
/// when the writer is driven by a world run.
pub trait OutputWriter {
    fn write_event(&mut self, row: &EventRow) -> OutputResult<()>;

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Write a batch of agent snapshots.
    fn write_snapshots(&mut self, rows: &[AgentSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
