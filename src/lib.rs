//! Fan control for ASUS notebooks through ACPI firmware methods.
//!
//! [`platform::AsusFanDriver`] is the entry point: it owns the mode state
//! machine in [`controller`] and exposes the [`platform::FanController`]
//! interface.

pub mod controller;
pub mod errors;
pub mod fan;
pub mod firmware;
pub mod platform;
pub mod quirks;
pub mod state;

pub use errors::{FanControlError, Result};
pub use fan::{Fan, FanIndex, FanMode, SetTarget};
pub use platform::{identify, AsusFanDriver, FanController, PlatformProfile};
