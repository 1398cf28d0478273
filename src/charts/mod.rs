//! Charts module - Map rendering

mod plotter;
mod renderer;
mod viewport;

pub use plotter::{ClusterSeries, MapPlotter, PALETTE, UNCLUSTERED_COLOR};
pub use renderer::{RenderError, StaticMapRenderer};
pub use viewport::MapViewport;
