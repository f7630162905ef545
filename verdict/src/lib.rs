//! Test-run JSON verdict aggregation.
//!
//! Consumes the per-phase result events a test framework emits while
//! executing tests and produces a single JSON verdict document at the end
//! of the run:
//!
//! - [`tally`]: classifies each phase report into one of seven counters.
//! - [`extra`]: collects annotated per-test outcomes under user-chosen keys.
//! - [`session`]: the per-run context tying the two together.
//! - [`report`]: the verdict document and its emission.
//! - [`replay`]: a host adapter that replays recorded event logs (used by
//!   the `verdict` binary).

pub mod cli;
pub mod config;
pub mod events;
pub mod extra;
pub mod logging;
pub mod replay;
pub mod report;
pub mod session;
pub mod tally;
