//! Signal model plus the classifier and sequence validator that decide
//! whether an event run is safe to fold.

pub mod classify;
pub mod sequence;
pub mod signal;

pub use classify::{classify_signals, last_headers, ClassifiedRun};
pub use sequence::{validate_run, RunRejection, SequenceVerdict};
pub use signal::{ChangeKind, Headers, Signal, ThingEvent, CORRELATION_ID_HEADER};
