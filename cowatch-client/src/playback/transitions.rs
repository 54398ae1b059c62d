//! Settle phase transition table
//!
//! The pure core of echo classification: given the current phase and a
//! surface notification, decide the next phase and what the notification
//! means. No player, no transport, no clocks involved, so the whole
//! table is testable as data.

use crate::surface::SurfaceState;

/// Echo-guard phase of the reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePhase {
    /// Constructed; nothing commanded or observed yet
    Idle,

    /// A remotely-driven command was just issued; the next Playing or
    /// Paused notification belongs to it, not to the user
    AwaitingSettle,

    /// Normal operation; notifications are genuine local events
    Settled,
}

/// Classification of a report-worthy local event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Playing,
    Paused,
    Ended,
}

/// What to do with an observed notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Consumed by the guard; keep waiting for the command to land
    Suppress,

    /// Consumed by the guard, and the guard is now clear
    Settle,

    /// Genuine local event; report it to the authority
    Report(ReportKind),

    /// Genuine but not report-worthy; record the state and move on
    Observe,
}

/// Decide the next phase and outcome for one notification
///
/// A remote command settles only on Playing or Paused. Buffering and
/// Ended during `AwaitingSettle` are intermediate states of the command
/// being applied and stay suppressed.
pub fn settle_transition(phase: SettlePhase, observed: SurfaceState) -> (SettlePhase, Outcome) {
    use SettlePhase::*;
    use SurfaceState::*;

    match (phase, observed) {
        (AwaitingSettle, Playing | Paused) => (Settled, Outcome::Settle),
        (AwaitingSettle, Buffering | Ended) => (AwaitingSettle, Outcome::Suppress),
        (_, Playing) => (Settled, Outcome::Report(ReportKind::Playing)),
        (_, Paused) => (Settled, Outcome::Report(ReportKind::Paused)),
        (_, Ended) => (Settled, Outcome::Report(ReportKind::Ended)),
        (_, Buffering) => (Settled, Outcome::Observe),
    }
}
