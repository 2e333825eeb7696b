// Processing implementation for the GUI
// Loads images on the UI thread and renders previews on a background thread

use super::{CompressorApp, PreviewMessage};
use eframe::egui;
use image::RgbImage;
use lossy_compressor::image_processing::loader::SUPPORTED_EXTENSIONS;
use lossy_compressor::image_processing::{render_preview, thumbnail, Ticket};
use lossy_compressor::utils::with_default_extension;
use std::path::PathBuf;

impl CompressorApp {
    pub fn select_file(&mut self, ctx: &egui::Context) {
        let mut dialog = rfd::FileDialog::new().add_filter("Images", SUPPORTED_EXTENSIONS);
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }

        if let Some(path) = dialog.pick_file() {
            self.load(path, ctx);
        }
    }

    fn load(&mut self, path: PathBuf, ctx: &egui::Context) {
        self.last_directory = path.parent().map(|p| p.to_path_buf());
        self.error_message.clear();

        if let Err(e) = self.session.load(&path) {
            self.error_message = e.to_string();
            return;
        }

        // Results still in flight belong to the previous image
        self.scheduler.invalidate();
        self.compressed_texture = None;

        if let Some(original) = self.session.original() {
            match thumbnail(&original) {
                Ok(thumb) => {
                    self.original_texture = Some(load_texture(ctx, "original", &thumb));
                }
                Err(e) => self.error_message = e.to_string(),
            }
        }

        self.status_message = format!(
            "Loaded {}",
            path.file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default()
        );
        self.request_preview(ctx);
    }

    /// Ask for a preview with the current slider values
    pub fn request_preview(&mut self, ctx: &egui::Context) {
        self.session.set_params(self.current_params());
        if !self.session.is_loaded() {
            return;
        }

        if let Some(ticket) = self.scheduler.request() {
            self.spawn_preview(ticket, ctx);
        }
    }

    fn spawn_preview(&self, ticket: Ticket, ctx: &egui::Context) {
        let (Some(original), Some(baseline)) =
            (self.session.original(), self.session.baseline_bytes())
        else {
            return;
        };
        let params = self.session.params();
        let sender = self.preview_sender.clone();
        let ctx = ctx.clone();

        std::thread::spawn(move || {
            let result = render_preview(&original, &params, baseline).and_then(|preview| {
                let thumb = thumbnail(&preview.image)?;
                Ok((preview, thumb))
            });

            // The receiver lives as long as the app; a send error means it is closing
            let _ = sender.send(PreviewMessage { ticket, result });
            ctx.request_repaint();
        });
    }

    /// Apply finished previews and start the queued one, if any
    pub fn check_preview_results(&mut self, ctx: &egui::Context) {
        let messages: Vec<PreviewMessage> = self.preview_receiver.try_iter().collect();

        for msg in messages {
            let completion = self.scheduler.complete(msg.ticket);

            if completion.apply {
                match msg.result {
                    Ok((preview, thumb)) => {
                        self.compressed_texture = Some(load_texture(ctx, "compressed", &thumb));
                        self.status_message = preview.status_line();
                        self.error_message.clear();
                        self.session.apply_preview(preview);
                    }
                    Err(e) => {
                        // Keep the last good preview on screen
                        self.error_message = format!("Preview failed: {}", e);
                    }
                }
            } else {
                log::debug!("Discarding superseded preview {}", msg.ticket.generation());
            }

            if let Some(next) = completion.next {
                self.spawn_preview(next, ctx);
            }
        }
    }

    pub fn save_jpeg(&mut self) {
        let Some(path) = self.pick_save_path("JPEG", &["jpg", "jpeg"], "compressed.jpg") else {
            return;
        };
        let path = with_default_extension(path, "jpg");

        match self.session.save_jpeg(&path) {
            Ok(Some(report)) => {
                self.status_message = format!("Saved: {}", report.file_name());
                self.error_message.clear();
            }
            Ok(None) => {}
            Err(e) => self.error_message = format!("Save failed: {}", e),
        }
    }

    pub fn save_ico(&mut self) {
        let Some(path) = self.pick_save_path("Icon", &["ico"], "icon.ico") else {
            return;
        };
        let path = with_default_extension(path, "ico");

        match self.session.save_ico(&path) {
            Ok(Some(report)) => {
                self.status_message = format!("Saved ICO: {}", report.file_name());
                self.error_message.clear();
            }
            Ok(None) => {}
            Err(e) => self.error_message = format!("Save failed: {}", e),
        }
    }

    fn pick_save_path(&mut self, name: &str, extensions: &[&str], file_name: &str) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new()
            .add_filter(name, extensions)
            .set_file_name(file_name);
        if let Some(dir) = &self.last_directory {
            dialog = dialog.set_directory(dir);
        }

        let path = dialog.save_file()?;
        self.last_directory = path.parent().map(|p| p.to_path_buf());
        Some(path)
    }
}

fn load_texture(ctx: &egui::Context, name: &str, image: &RgbImage) -> egui::TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    let color_image = egui::ColorImage::from_rgb(size, image.as_raw());
    ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR)
}
