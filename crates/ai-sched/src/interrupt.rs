//! Pause severities and the interruption-predicate list.
//!
//! Any number of external authorities (a scripted sequence, an activity
//! driver, a host-level "exclusive control" hold) register an
//! [`InterruptSource`] with an agent's manager.  Before each tick the
//! manager polls every source and folds the answers with `max`, so the most
//! restrictive request wins.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// How strongly the scheduler is suspended.
///
/// `None < Soft < Hard`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// Running normally.
    #[default]
    None,
    /// Ticks are skipped; running tasks keep their running state and resume
    /// where they left off.
    Soft,
    /// Every running task is cancelled on entry and slots are cleared.
    Hard,
}

impl Severity {
    #[inline]
    pub fn is_paused(self) -> bool {
        self != Severity::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Soft => "soft",
            Severity::Hard => "hard",
        }
    }

    fn from_u8(v: u8) -> Self {
        match v {
            0 => Severity::None,
            1 => Severity::Soft,
            _ => Severity::Hard,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Soft => 1,
            Severity::Hard => 2,
        }
    }
}

// ── InterruptSource ───────────────────────────────────────────────────────────

/// A predicate polled once per tick, reporting how strongly it wants the
/// scheduler suspended.
///
/// Implemented for any `FnMut() -> Severity + Send` closure.
pub trait InterruptSource: Send {
    fn poll(&mut self) -> Severity;
}

impl<F> InterruptSource for F
where
    F: FnMut() -> Severity + Send,
{
    fn poll(&mut self) -> Severity {
        self()
    }
}

/// A shared, settable severity.
///
/// Clone one handle into the manager as an interrupt source and keep the
/// other with whatever drives the pause (see `ai-activity`).  Clones share
/// state.
#[derive(Clone, Debug, Default)]
pub struct SeverityFlag(Arc<AtomicU8>);

impl SeverityFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, severity: Severity) {
        self.0.store(severity.as_u8(), Ordering::Release);
    }

    pub fn clear(&self) {
        self.set(Severity::None);
    }

    pub fn get(&self) -> Severity {
        Severity::from_u8(self.0.load(Ordering::Acquire))
    }
}

impl InterruptSource for SeverityFlag {
    fn poll(&mut self) -> Severity {
        self.get()
    }
}

// ── InterruptionController ────────────────────────────────────────────────────

/// Ordered list of interruption predicates.
#[derive(Default)]
pub struct InterruptionController {
    sources: Vec<Box<dyn InterruptSource>>,
    last:    Severity,
}

impl InterruptionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: InterruptSource + 'static>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Poll every source and return the maximum severity.  Every source is
    /// polled even once `Hard` has been seen, so stateful predicates observe
    /// every tick.
    pub fn poll(&mut self) -> Severity {
        self.last = self
            .sources
            .iter_mut()
            .fold(Severity::None, |acc, s| acc.max(s.poll()));
        self.last
    }

    /// Result of the most recent [`poll`][Self::poll].
    pub fn last(&self) -> Severity {
        self.last
    }
}
