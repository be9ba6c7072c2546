//! Light figure theme: white paper, dark ink, royal blue markers

/// Figure palette as RGB triples
pub mod colors {
    // === Backgrounds ===
    pub const PAPER: [u8; 3] = [255, 255, 255]; // #FFFFFF - figure background
    pub const PANE_EDGE: [u8; 3] = [255, 255, 255]; // #FFFFFF - 3D pane outlines

    // === Ink ===
    pub const TEXT: [u8; 3] = [0, 0, 0]; // #000000 - title, labels
    pub const AXIS_LINE: [u8; 3] = [0, 0, 0]; // #000000 - axis spines
    pub const TICK: [u8; 3] = [40, 40, 40]; // #282828 - tick marks

    // === Data ===
    pub const ROYAL_BLUE: [u8; 3] = [65, 105, 225]; // #4169E1 - particle markers
}

/// Light egui Visuals matching the figure paper
#[cfg(feature = "viewer")]
pub fn paper_visuals() -> egui::Visuals {
    use colors::*;

    let paper = egui::Color32::from_rgb(PAPER[0], PAPER[1], PAPER[2]);
    let text = egui::Color32::from_rgb(TEXT[0], TEXT[1], TEXT[2]);

    let mut visuals = egui::Visuals::light();

    visuals.panel_fill = paper;
    visuals.window_fill = paper;
    visuals.extreme_bg_color = paper;
    visuals.override_text_color = Some(text);

    // No shadows - flat design
    visuals.window_shadow = egui::Shadow::NONE;
    visuals.popup_shadow = egui::Shadow::NONE;

    visuals
}
