//! Progress log for siteforge runs.
//!
//! A run reports progress as an ordered, append-only list of
//! [`GenerationLogStep`]s plus an `isComplete` flag. The [`wire`] module turns
//! that log into the `CHAIN:<json>` string consumers replay, including partial
//! and chunked decoding of a log that is still being written.

pub mod log;
pub mod step;
pub mod wire;

pub use log::GenerationLog;
pub use step::{GenerationLogStep, StepKind, StepPayload};
pub use wire::{LogStreamDecoder, PartialLog, WIRE_PREFIX, decode, decode_partial, encode};
