//! `TraceObserver<W>`: bridges `WorldObserver` to an `OutputWriter`.

use ai_core::{AgentId, GameTime, SimClock};
use ai_sched::LifecycleEvent;
use ai_sim::{AgentSnapshot, TickSummary, WorldObserver};
use ai_task::SoundRequest;

use crate::row::{AgentSnapshotRow, EventRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`WorldObserver`] that writes lifecycle events, sounds, tick summaries,
/// and snapshots to any [`OutputWriter`].
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `world.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct TraceObserver<W: OutputWriter> {
    writer:     W,
    tick:       u64,
    summaries:  bool,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            tick:       0,
            summaries:  true,
            last_error: None,
        }
    }

    /// Skip the per-tick summary rows; events and snapshots are still
    /// written.
    pub fn without_summaries(mut self) -> Self {
        self.summaries = false;
        self
    }

    /// Take the stored write error (if any) after `world.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  Needed after `run_ticks`, which does not call
    /// `on_end`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> WorldObserver for TraceObserver<W> {
    fn on_tick_start(&mut self, clock: &SimClock) {
        self.tick = clock.tick;
    }

    fn on_event(&mut self, agent: AgentId, event: &LifecycleEvent) {
        let result = self.writer.write_event(&EventRow::from_event(self.tick, agent, event));
        self.store_err(result);
    }

    fn on_sound(&mut self, agent: AgentId, at: GameTime, sound: &SoundRequest) {
        let row = EventRow::sound(self.tick, at, agent, &sound.location);
        let result = self.writer.write_event(&row);
        self.store_err(result);
    }

    fn on_tick_end(&mut self, _clock: &SimClock, summary: &TickSummary) {
        if self.summaries {
            let result = self.writer.write_tick_summary(&TickSummaryRow::from(summary));
            self.store_err(result);
        }
    }

    fn on_snapshot(&mut self, clock: &SimClock, agents: &[AgentSnapshot]) {
        let rows: Vec<AgentSnapshotRow> = agents
            .iter()
            .map(|a| AgentSnapshotRow::from_snapshot(clock.tick, a))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_end(&mut self, _clock: &SimClock) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
