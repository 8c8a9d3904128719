//! Core type definitions using newtype patterns for type safety.
//!
//! These types keep invalid port numbers and unresolved hosts out of the
//! probing engine.

mod port;
mod target;

pub use port::{Port, PortError, PortRange};
pub use target::{ScanTarget, TargetError};
