//! SQL Bridge - sliding-TTL eviction and optimistic value coercion
//!
//! The core a host needs to put a blocking SQL driver behind an async,
//! loosely-typed message interface: an eviction cache tracking idle shared
//! resources, and a coercion engine binding wire strings as precise types.

pub mod cache;
pub mod coerce;
pub mod config;
pub mod error;
pub mod scheduler;

pub use cache::{CacheStats, EvictionCache};
pub use coerce::{convert_sql_value, optimistic_cast, optimistic_cast_str, BoundValue, ValueKind};
pub use config::{CastConfig, Config};
pub use error::{BridgeError, Result};
pub use scheduler::{ManualScheduler, Scheduler, TokioScheduler};
