//! Exit code constants for the op CLI.
//!
//! - 0: Success
//! - 1: User error (unknown service or stack, bad args)
//! - 2: Configuration failure (workspace create, config write/read/parse)
//! - 3: Container runtime failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: unknown names, empty stacks, invalid arguments.
pub const USER_ERROR: i32 = 1;

/// The workspace or its configuration file could not be prepared or read.
pub const CONFIG_FAILURE: i32 = 2;

/// The container runtime is missing or one of its commands failed.
pub const RUNTIME_FAILURE: i32 = 3;
