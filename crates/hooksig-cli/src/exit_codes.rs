//! Process exit codes. Part of the CLI contract for scripts.

pub const SUCCESS: i32 = 0;
pub const REJECTED: i32 = 1; // Signature check ran and rejected the request
pub const INTERNAL_ERROR: i32 = 2; // Bad arguments, unreadable input, client setup failure
