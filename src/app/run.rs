//! Top-level entry point for running the Manhattan plot as a native window.

use eframe::egui;

use crate::plot::ManhattanPlot;

use super::ManhattanApp;

const WINDOW_TITLE: &str = "Manhattan Plot";

/// Launch the viewer for an already loaded plot.
///
/// The call blocks until the window is closed.
pub fn run_manhattan(plot: ManhattanPlot) -> eframe::Result<()> {
    let title = plot
        .config()
        .title
        .clone()
        .unwrap_or_else(|| WINDOW_TITLE.to_string());
    let app = ManhattanApp::new(plot);

    let mut opts = eframe::NativeOptions::default();
    opts.viewport = egui::ViewportBuilder::default()
        .with_title(&title)
        .with_inner_size(egui::vec2(1400.0, 900.0));
    if let Some(icon) = app_icon() {
        opts.viewport = opts.viewport.with_icon(icon);
    }

    tracing::info!(title = %title, "starting viewer");
    eframe::run_native(
        &title,
        opts,
        Box::new(|cc| {
            // Install Phosphor icon font before creating the app.
            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(app))
        }),
    )
}

/// A small scatter glyph, rasterized with resvg.
const ICON_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="64" height="64" viewBox="0 0 64 64">
<rect width="64" height="64" rx="10" fill="white"/>
<line x1="8" y1="56" x2="58" y2="56" stroke="black" stroke-width="2"/>
<line x1="8" y1="56" x2="8" y2="6" stroke="black" stroke-width="2"/>
<circle cx="16" cy="48" r="4" fill="grey"/>
<circle cx="26" cy="40" r="4" fill="steelblue"/>
<circle cx="36" cy="16" r="4" fill="orangered"/>
<circle cx="46" cy="44" r="4" fill="grey"/>
<circle cx="54" cy="30" r="4" fill="steelblue"/>
</svg>"#;

fn app_icon() -> Option<egui::IconData> {
    let tree = usvg::Tree::from_str(ICON_SVG, &usvg::Options::default()).ok()?;
    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    Some(egui::IconData {
        rgba: pixmap.take(),
        width: size.width(),
        height: size.height(),
    })
}
