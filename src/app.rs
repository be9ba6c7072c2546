//! Native figure window
//!
//! Shows a rendered figure as a texture on a paper-colored panel and blocks
//! until the user closes the window.

use eframe::egui;
use tracing::{debug, info};

use crate::error::RenderError;
use crate::scatter::Canvas;
use crate::theme::{colors, paper_visuals};

/// Window app holding one static figure
pub struct FigureApp {
    image: egui::ColorImage,
    /// Uploaded lazily on the first frame
    texture: Option<egui::TextureHandle>,
}

impl FigureApp {
    pub fn new(cc: &eframe::CreationContext<'_>, image: egui::ColorImage) -> Self {
        cc.egui_ctx.set_visuals(paper_visuals());
        Self { image, texture: None }
    }
}

impl eframe::App for FigureApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let texture = self.texture.get_or_insert_with(|| {
            debug!(size = ?self.image.size, "Uploading figure texture");
            ctx.load_texture("figure", self.image.clone(), egui::TextureOptions::LINEAR)
        });

        let paper = egui::Color32::from_rgb(colors::PAPER[0], colors::PAPER[1], colors::PAPER[2]);
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(paper))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    let sized = egui::load::SizedTexture::from_handle(texture);
                    ui.add(egui::Image::from_texture(sized).shrink_to_fit());
                });
            });
    }
}

/// Open a window showing `canvas`; returns once it is closed
pub fn show_figure(canvas: &Canvas, title: &str) -> Result<(), RenderError> {
    let size = [canvas.width() as usize, canvas.height() as usize];
    let image = egui::ColorImage::from_rgba_unmultiplied(size, canvas.pixels());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size[0] as f32, size[1] as f32])
            .with_title(title),
        ..Default::default()
    };

    info!("Showing figure, close the window to exit");
    eframe::run_native(
        "nebula-plot",
        options,
        Box::new(move |cc| Ok(Box::new(FigureApp::new(cc, image)))),
    )
    .map_err(|e| RenderError::Viewer {
        message: e.to_string(),
    })
}
