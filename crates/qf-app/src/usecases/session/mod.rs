mod start;

pub use start::{SessionError, SessionSummary, StartSession};
