mod component;
mod controls;
mod error;
mod legend;
mod loader;
mod render;
pub mod scale;
mod simulation;
mod state;
mod tooltip;
mod types;

pub use component::ForceGraphCanvas;
pub use error::LoadError;
pub use loader::load_graph;
pub use types::GraphData;
