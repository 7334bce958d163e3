//! Exit code constants for the crewl CLI.
//!
//! - 0: Success
//! - 1: User error (bad arguments, bad environment, missing file)
//! - 2: Configuration validation failure
//! - 3: Pipeline runtime failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unparsable environment variable, or a missing
/// configuration file.
pub const USER_ERROR: i32 = 1;

/// Configuration validation failure: a config file parsed but its contents
/// are invalid, or the crew wiring does not hold together.
pub const CONFIG_FAILURE: i32 = 2;

/// Runtime failure: the task runtime failed and the pipeline aborted.
pub const RUNTIME_FAILURE: i32 = 3;
