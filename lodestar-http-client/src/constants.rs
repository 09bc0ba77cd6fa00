//! Library-wide defaults.
//!
//! These are read-only process-wide constants; there is no mutable global
//! configuration.

use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT_MILLIS: u64 = 5_000;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MILLIS);

pub const DEFAULT_READ_TIMEOUT_MILLIS: u64 = 5_000;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(DEFAULT_READ_TIMEOUT_MILLIS);

pub const DEFAULT_CONNECTION_POOL_TIMEOUT_MILLIS: u64 = 5_000;
pub const DEFAULT_CONNECTION_POOL_TIMEOUT: Duration =
    Duration::from_millis(DEFAULT_CONNECTION_POOL_TIMEOUT_MILLIS);
