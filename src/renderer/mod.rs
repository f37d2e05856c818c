//! Canvas 2D rendering module
//!
//! `shapes` turns simulation state into a flat list of draw commands;
//! `canvas` (browser only) replays them onto a `CanvasRenderingContext2d`.

pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;
pub use shapes::{DrawCmd, TextStyle, scene};
