//! `ai-output`: trace writers for world runs.
//!
//! | File                   | One row per                                     |
//! |------------------------|-------------------------------------------------|
//! | `lifecycle_events.csv` | task start/finish/fault, pause/resume, sound    |
//! | `tick_summaries.csv`   | world tick                                      |
//! | `agent_snapshots.csv`  | live entity, every `output_interval_ticks`      |
//!
//! The CSV backend implements [`OutputWriter`] and is driven by
//! [`TraceObserver`], which implements `ai_sim::WorldObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ai_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./trace"))?;
//! let mut obs = TraceObserver::new(writer);
//! world.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{AgentSnapshotRow, EventRow, TickSummaryRow};
pub use writer::OutputWriter;
