//! Native viewer for the Manhattan plot.
//!
//! | Sub-module  | Responsibility |
//! | ----------- | -------------- |
//! | [`painter`] | Painting the retained scene with egui, egui-backed text measurement |
//! | [`run`]     | Top-level [`run_manhattan()`] entry point and window setup |
//!
//! The viewer owns no plot state of its own beyond pointer bookkeeping: every
//! event is translated to plot-local coordinates and forwarded to
//! [`ManhattanPlot`], which keeps the scene in sync before painting.

mod painter;
mod run;

pub use painter::{paint_scene, to_color32, EguiTextMeasurer};
pub use run::run_manhattan;

use eframe::egui;

use crate::data::export::{default_file_name, save_positions};
use crate::data::geometry::{ScreenPos, Size};
use crate::plot::{Hit, ManhattanPlot};

/// Standalone viewer that implements [`eframe::App`].
pub struct ManhattanApp {
    plot: ManhattanPlot,
    /// Set once the egui text measurer has been installed.
    measurer_installed: bool,
    last_size: Option<egui::Vec2>,
    hovered_box: Option<String>,
    show_positions: bool,
    status: Option<String>,
}

impl ManhattanApp {
    pub fn new(plot: ManhattanPlot) -> Self {
        Self {
            plot,
            measurer_installed: false,
            last_size: None,
            hovered_box: None,
            show_positions: false,
            status: None,
        }
    }

    pub fn plot(&self) -> &ManhattanPlot {
        &self.plot
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pointer handling
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let origin = response.rect.min;
        let local = |p: egui::Pos2| ScreenPos::new((p.x - origin.x) as f64, (p.y - origin.y) as f64);

        if response.drag_started() {
            let press = ui.input(|i| i.pointer.press_origin());
            if let Some(p) = press.or_else(|| response.interact_pointer_pos()) {
                if let Hit::Box(id) = self.plot.hit_test(local(p)) {
                    self.plot.pointer_down_on_box(&id, local(p));
                }
            }
        }
        if response.dragged() {
            if let Some(p) = response.interact_pointer_pos() {
                self.plot.pointer_move(local(p));
            }
        }
        if response.drag_stopped() {
            if let Some(id) = self.plot.pointer_up() {
                tracing::debug!(id = %id, "annotation dropped");
            }
        }
        if response.clicked() {
            if let Some(p) = response.interact_pointer_pos() {
                match self.plot.hit_test(local(p)) {
                    Hit::DeleteButton(id) => {
                        self.plot.delete_annotation(&id);
                        self.hovered_box = None;
                    }
                    Hit::Marker(id) => {
                        self.plot.click_marker(&id, local(p));
                    }
                    Hit::Box(_) | Hit::None => {}
                }
            }
        }

        // Hover state, frozen while a box is being dragged.
        if self.plot.is_dragging() {
            return;
        }
        let hit = response
            .hover_pos()
            .map(|p| self.plot.hit_test(local(p)))
            .unwrap_or(Hit::None);
        match &hit {
            Hit::Marker(id) => {
                if self.plot.hovered_marker() != Some(id.as_str()) {
                    self.plot.hover_marker(id);
                }
            }
            _ => self.plot.hover_out(),
        }
        let box_id = match hit {
            Hit::Box(id) | Hit::DeleteButton(id) => Some(id),
            Hit::Marker(_) | Hit::None => None,
        };
        if box_id != self.hovered_box {
            if let Some(old) = self.hovered_box.take() {
                self.plot.set_box_hover(&old, false);
            }
            if let Some(new) = &box_id {
                self.plot.set_box_hover(new, true);
            }
            self.hovered_box = box_id;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export actions
    // ─────────────────────────────────────────────────────────────────────────

    fn prompt_and_save_plot(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("SVG", &["svg"])
            .add_filter("PNG", &["png"])
            .set_file_name(default_file_name("manhattan_plot", "svg"))
            .save_file()
        {
            self.status = Some(match self.plot.save_plot(&path) {
                Ok(()) => format!("Saved {}", path.display()),
                Err(e) => {
                    tracing::error!(error = %e, "failed to save plot");
                    format!("Failed to save plot: {e}")
                }
            });
        }
    }

    fn prompt_and_save_positions(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .set_file_name(default_file_name("annotation_positions", "csv"))
            .save_file()
        {
            self.status = Some(
                match save_positions(&path, &self.plot.annotation_positions()) {
                    Ok(()) => format!("Saved {}", path.display()),
                    Err(e) => {
                        tracing::error!(error = %e, "failed to export annotation positions");
                        format!("Failed to export positions: {e}")
                    }
                },
            );
        }
    }

    fn show_buttons(&mut self, ctx: &egui::Context) {
        let cfg = self.plot.config();
        let (download, export) = (cfg.show_download_button, cfg.show_export_annotations_button);
        if !download && !export {
            return;
        }
        egui::Area::new(egui::Id::new("manhattan_export_buttons"))
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(8.0, -8.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if download
                        && ui
                            .button(format!("{} Download Plot", egui_phosphor::regular::DOWNLOAD_SIMPLE))
                            .clicked()
                    {
                        self.prompt_and_save_plot();
                    }
                    if export
                        && ui
                            .button(format!(
                                "{} Export Annotation Positions",
                                egui_phosphor::regular::EXPORT
                            ))
                            .clicked()
                    {
                        self.show_positions = true;
                    }
                    if let Some(s) = &self.status {
                        ui.label(s);
                    }
                });
            });
    }

    fn show_positions_window(&mut self, ctx: &egui::Context) {
        if !self.show_positions {
            return;
        }
        let text = match self.plot.positions_json() {
            Ok(s) => s,
            Err(e) => format!("error: {e}"),
        };
        let mut open = true;
        let mut save = false;
        egui::Window::new("Annotation Positions")
            .open(&mut open)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .button(format!("{} Copy", egui_phosphor::regular::COPY))
                        .clicked()
                    {
                        ctx.copy_text(text.clone());
                    }
                    if ui
                        .button(format!("{} Save…", egui_phosphor::regular::FLOPPY_DISK))
                        .clicked()
                    {
                        save = true;
                    }
                });
                ui.separator();
                egui::ScrollArea::vertical().max_height(400.0).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut text.as_str())
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                });
            });
        self.show_positions = open;
        if save {
            self.prompt_and_save_positions();
        }
    }
}

impl eframe::App for ManhattanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let (response, painter) =
                    ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

                if !self.measurer_installed {
                    self.plot
                        .set_measurer(Box::new(EguiTextMeasurer::new(painter.clone())));
                    self.measurer_installed = true;
                }
                let size = response.rect.size();
                if self.last_size != Some(size) {
                    self.plot
                        .on_resize(Size::new(size.x as f64, size.y as f64));
                    self.last_size = Some(size);
                }

                self.handle_pointer(ui, &response);
                paint_scene(&painter, self.plot.scene(), response.rect.min);
            });

        self.show_buttons(ctx);
        self.show_positions_window(ctx);
    }
}
