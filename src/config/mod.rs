//! Configuration management for portcheck.
//!
//! Settings live in a JSON file under the XDG config directory, or at a
//! path given on the command line.

mod settings;

pub use settings::{AppSettings, Paths};
