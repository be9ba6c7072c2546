//! Particle scatter figure: styling, save, layout and display

use std::path::Path;

use tracing::info;

use crate::core::{format_thousands, ParticleData};
use crate::error::RenderError;
use crate::scatter::{Figure, ScatterLayer, ScatterStyle};
use crate::theme::colors;

/// Figure written to the working directory on every run
pub const OUTPUT_FILE: &str = "single_nebula_1.png";

pub const MARKER_ALPHA: f64 = 0.3;
pub const VIEW_ELEVATION: f64 = 30.0;
pub const VIEW_AZIMUTH: f64 = 45.0;

/// Whether the rendered figure is shown after saving
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Block in a window until the user closes it
    #[default]
    Window,
    /// Save only
    Headless,
}

/// Title line with the plotted particle count
pub fn figure_title(count: usize) -> String {
    format!("3D Particle Distribution (N={})", format_thousands(count))
}

/// Reject particle arrays whose columns (and masses, if any) differ in length
fn check_lengths(data: &ParticleData) -> Result<(), RenderError> {
    let (x, y, z) = (data.x.len(), data.y.len(), data.z.len());
    let masses = data.masses.as_ref().map(Vec::len);
    if y != x || z != x || masses.is_some_and(|m| m != x) {
        return Err(RenderError::LengthMismatch { x, y, z, masses });
    }
    Ok(())
}

/// Build the styled figure for `data`, thinned by `subsample`
pub fn build_figure(data: &ParticleData, subsample: usize) -> Result<Figure, RenderError> {
    check_lengths(data)?;
    let data = data.subsample(subsample);
    let sizes = data.point_sizes();

    let style = ScatterStyle {
        color: colors::ROYAL_BLUE,
        alpha: MARKER_ALPHA,
        edge_color: None,
        depth_shade: true,
    };

    let mut fig = Figure::default();
    let ax = fig.axes_mut();
    ax.scatter(ScatterLayer::new(data.positions().collect(), sizes).with_style(style));

    ax.set_labels("X [kpc]", "Y [kpc]", "Z [kpc]");
    ax.set_title(figure_title(data.len()));

    ax.grid = false;
    ax.pane_fill = None;
    ax.pane_edge = colors::PANE_EDGE;

    ax.set_box_aspect([1.0, 1.0, 1.0]);
    ax.view_init(VIEW_ELEVATION, VIEW_AZIMUTH);

    Ok(fig)
}

/// Render the particles, save to [`OUTPUT_FILE`], tighten layout, then show
///
/// The save happens before the layout pass, so the file keeps the default
/// margins while the window shows the tightened figure.
pub fn plot_3d_particles(
    data: &ParticleData,
    subsample: usize,
    display: DisplayMode,
) -> Result<(), RenderError> {
    render_to(data, subsample, Path::new(OUTPUT_FILE), display).map(|_| ())
}

/// [`plot_3d_particles`] with an explicit output path
pub(crate) fn render_to(
    data: &ParticleData,
    subsample: usize,
    output: &Path,
    display: DisplayMode,
) -> Result<Figure, RenderError> {
    let mut fig = build_figure(data, subsample)?;
    fig.savefig(output)?;
    fig.tight_layout();

    match display {
        DisplayMode::Window => show(&fig)?,
        DisplayMode::Headless => info!("Headless run, not showing figure"),
    }
    Ok(fig)
}

#[cfg(feature = "viewer")]
fn show(fig: &Figure) -> Result<(), RenderError> {
    crate::app::show_figure(&fig.render(), &fig.axes().title)
}

#[cfg(not(feature = "viewer"))]
fn show(_fig: &Figure) -> Result<(), RenderError> {
    tracing::warn!("Built without the viewer feature, not showing figure");
    Ok(())
}
