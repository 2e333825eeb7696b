use eframe::egui;
use image::{Rgb, RgbImage};
use lossy_compressor::cli::DitherMethod;
use lossy_compressor::image_processing::{
    CanvasFill, ColorCount, PipelineError, Preview, PreviewParams, PreviewScheduler, Quality,
    Session, Ticket, DEFAULT_COLORS, DEFAULT_QUALITY, MAX_COLORS, MAX_QUALITY, MIN_COLORS,
    MIN_QUALITY, PREVIEW_SIZE,
};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

#[path = "app_processing.rs"]
mod app_processing;

pub struct CompressorApp {
    session: Session,

    // Live parameters, bound to the sliders
    colors: u16,
    quality: u8,
    dithering: DitherMethod,
    fill: CanvasFill,

    // Background preview computation
    scheduler: PreviewScheduler,
    preview_sender: Sender<PreviewMessage>,
    preview_receiver: Receiver<PreviewMessage>,

    original_texture: Option<egui::TextureHandle>,
    compressed_texture: Option<egui::TextureHandle>,

    last_directory: Option<PathBuf>,
    status_message: String,
    error_message: String,
}

/// Result of one background preview run, tagged with the run it belongs to
pub(crate) struct PreviewMessage {
    pub ticket: Ticket,
    /// The preview and its display thumbnail
    pub result: Result<(Preview, RgbImage), PipelineError>,
}

const FILL_WHITE: CanvasFill = CanvasFill::Solid(Rgb([255, 255, 255]));

impl CompressorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let (preview_sender, preview_receiver) = channel();

        Self {
            session: Session::default(),
            colors: DEFAULT_COLORS,
            quality: DEFAULT_QUALITY,
            dithering: DitherMethod::None,
            fill: CanvasFill::default(),
            scheduler: PreviewScheduler::new(),
            preview_sender,
            preview_receiver,
            original_texture: None,
            compressed_texture: None,
            last_directory: dirs::picture_dir(),
            status_message: String::new(),
            error_message: String::new(),
        }
    }

    pub(crate) fn current_params(&self) -> PreviewParams {
        PreviewParams {
            colors: ColorCount::new(self.colors as u32),
            quality: Quality::new(self.quality as u32),
            dithering: self.dithering.into(),
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        if ui
            .add(egui::Button::new("📂 Select Image").min_size(egui::vec2(160.0, 32.0)))
            .clicked()
        {
            self.select_file(ui.ctx());
        }

        ui.add_space(10.0);

        let mut changed = false;

        ui.horizontal(|ui| {
            ui.label("🎨 Colors:");
            changed |= ui
                .add(egui::Slider::new(&mut self.colors, MIN_COLORS..=MAX_COLORS))
                .changed();
        });

        ui.horizontal(|ui| {
            ui.label("🖼 Quality:");
            changed |= ui
                .add(egui::Slider::new(&mut self.quality, MIN_QUALITY..=MAX_QUALITY))
                .changed();
        });

        ui.horizontal(|ui| {
            ui.label("Dithering:");
            egui::ComboBox::from_id_salt("dithering")
                .selected_text(self.get_dithering_name())
                .show_ui(ui, |ui| {
                    changed |= ui
                        .selectable_value(&mut self.dithering, DitherMethod::None, "None")
                        .changed();
                    changed |= ui
                        .selectable_value(
                            &mut self.dithering,
                            DitherMethod::FloydSteinberg,
                            "Floyd-Steinberg",
                        )
                        .changed();
                });

            ui.add_space(20.0);
            ui.label("Icon background:");
            let before = self.fill;
            egui::ComboBox::from_id_salt("icon_fill")
                .selected_text(self.get_fill_name())
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut self.fill, CanvasFill::default(), "Black");
                    ui.selectable_value(&mut self.fill, FILL_WHITE, "White");
                    ui.selectable_value(&mut self.fill, CanvasFill::EdgeExtend, "Extend edges");
                });
            if self.fill != before {
                self.session.set_fill(self.fill);
            }
        });

        if changed {
            self.request_preview(ui.ctx());
        }

        ui.add_space(10.0);
    }

    fn render_previews(&mut self, ui: &mut egui::Ui) {
        let pane = egui::vec2(PREVIEW_SIZE.0 as f32, PREVIEW_SIZE.1 as f32);

        ui.horizontal(|ui| {
            for (title, texture) in [
                ("Original", &self.original_texture),
                ("Compressed", &self.compressed_texture),
            ] {
                ui.vertical(|ui| {
                    ui.label(title);
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_min_size(pane);
                        ui.set_max_size(pane);
                        ui.centered_and_justified(|ui| match texture {
                            Some(texture) => {
                                ui.add(egui::Image::from_texture(
                                    egui::load::SizedTexture::from_handle(texture),
                                ));
                            }
                            None => {
                                ui.weak("No image");
                            }
                        });
                    });
                });
            }
        });

        ui.add_space(10.0);
    }

    fn render_save_buttons(&mut self, ui: &mut egui::Ui) {
        let has_preview = self.session.preview().is_some();

        ui.horizontal(|ui| {
            if ui
                .add_enabled(has_preview, egui::Button::new("💾 Save JPEG"))
                .clicked()
            {
                self.save_jpeg();
            }
            ui.add_space(10.0);
            if ui
                .add_enabled(has_preview, egui::Button::new("🖼 Save ICO"))
                .clicked()
            {
                self.save_ico();
            }
        });

        ui.add_space(10.0);
    }

    fn render_status(&mut self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            ui.label(&self.status_message);
            if self.scheduler.is_busy() {
                ui.spinner();
            }
        });
        if !self.error_message.is_empty() {
            ui.colored_label(egui::Color32::RED, &self.error_message);
        }
    }

    fn get_dithering_name(&self) -> &str {
        match self.dithering {
            DitherMethod::None => "None",
            DitherMethod::FloydSteinberg => "Floyd-Steinberg",
        }
    }

    fn get_fill_name(&self) -> &str {
        match self.fill {
            CanvasFill::EdgeExtend => "Extend edges",
            fill if fill == FILL_WHITE => "White",
            _ => "Black",
        }
    }
}

impl eframe::App for CompressorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up finished previews from the worker thread
        self.check_preview_results(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_controls(ui);
                self.render_previews(ui);
                self.render_save_buttons(ui);
                self.render_status(ui);
            });
        });

        if self.scheduler.is_busy() {
            ctx.request_repaint();
        }
    }
}
