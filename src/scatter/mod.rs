//! CPU 3D scatter plotting
//!
//! Projects particles through an orthographic camera onto an RGBA canvas
//! with 3D axes, ticks and labels, and writes the result as PNG.

pub mod axes;
pub mod camera;
pub mod canvas;
pub mod figure;
pub mod font;
mod renderer;

pub use axes::{AxisLimits, Axes3D};
pub use camera::Camera;
pub use canvas::Canvas;
pub use figure::{Figure, Margins};
pub use renderer::{ScatterLayer, ScatterParticle, ScatterRenderer, ScatterStyle};
