// NOTE: Allow these for the whole crate.
#![allow(clippy::collapsible_if)]
#![allow(clippy::new_without_default)]

pub mod log;
pub mod app;
pub mod config;
pub mod minimap;
pub mod render;
pub mod utils;
