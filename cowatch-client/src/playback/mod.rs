//! Playback reconciliation
//!
//! Two flows meet at the local player: commands the authority broadcasts
//! and gestures the user makes directly on the player surface. Both
//! produce the same player notifications, so the reconciler classifies
//! every notification as either the echo of a remote command or a
//! genuine local event, suppressing the former and reporting the latter.

pub mod reconciler;
pub mod transitions;

pub use reconciler::{PendingLoad, PlaybackIntent, PlaybackReconciler};
pub use transitions::{settle_transition, Outcome, ReportKind, SettlePhase};
