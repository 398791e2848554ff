//! ticalabash — builds a Titanium project and injects the Calabash framework.

pub mod args;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod project;
