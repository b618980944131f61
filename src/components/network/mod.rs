mod browser;
mod component;
pub mod config;
pub mod error;
pub mod graph;
pub mod path;
mod point;
pub mod primitives;
pub mod queue;
mod render;
pub mod sequencer;
mod state;
mod tasks;
#[cfg(test)]
mod testing;
pub mod types;

pub use component::NetworkCanvas;
