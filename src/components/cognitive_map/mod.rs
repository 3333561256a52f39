mod component;
mod encoding;
mod error;
mod graph;
mod interaction;
mod layout;
mod render;
mod scene;
mod simulation;
mod state;
mod types;

pub use component::CognitiveMapCanvas;
pub use error::PayloadError;
pub use graph::Graph;
pub use types::LayoutVariant;
