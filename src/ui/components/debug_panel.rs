//! Debug panel component
//!
//! Displays internal state information for debugging.

use crate::ui::state::{AppState, RecordingState};
use crate::ui::theme::Theme;
use egui::{self, RichText, ScrollArea};

/// Debug panel component
pub struct DebugPanel<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> DebugPanel<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            RichText::new("Debug Panel")
                                .strong()
                                .color(self.theme.text_primary),
                        );

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                RichText::new(format!("{:.1} FPS", self.state.debug_info.fps))
                                    .size(12.0)
                                    .family(egui::FontFamily::Monospace)
                                    .color(self.fps_color()),
                            );
                        });
                    });

                    ui.separator();

                    egui::Grid::new("debug_stats")
                        .num_columns(2)
                        .spacing([20.0, 4.0])
                        .show(ui, |ui| {
                            self.stat_row(ui, "Recording", self.recording_status());
                            self.stat_row(
                                ui,
                                "Messages",
                                &self.state.messages.len().to_string(),
                            );
                            self.stat_row(
                                ui,
                                "Transcription",
                                &self.state.debug_info.transcription_status,
                            );
                            self.stat_row(
                                ui,
                                "Completion",
                                &self.state.debug_info.completion_stats,
                            );
                            self.stat_row(
                                ui,
                                "Waveform Samples",
                                &self.state.waveform_data.len().to_string(),
                            );
                        });

                    if let Some(error) = &self.state.last_error {
                        ui.add_space(self.theme.spacing_sm);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("⚠").color(self.theme.error));
                            ui.label(RichText::new(error).size(12.0).color(self.theme.error));
                        });
                    }

                    if self.state.streaming_response.is_generating {
                        ui.add_space(self.theme.spacing_sm);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new("Generating:").color(self.theme.text_muted));
                            ui.label(
                                RichText::new(format!(
                                    "{} chars",
                                    self.state.streaming_response.text.len()
                                ))
                                .family(egui::FontFamily::Monospace)
                                .color(self.theme.primary),
                            );
                        });
                    }

                    ui.add_space(self.theme.spacing_sm);
                    ui.separator();

                    ui.label(
                        RichText::new("Log")
                            .size(12.0)
                            .strong()
                            .color(self.theme.text_secondary),
                    );

                    ScrollArea::vertical()
                        .id_salt("debug_log")
                        .stick_to_bottom(true)
                        .max_height(200.0)
                        .show(ui, |ui| {
                            for line in &self.state.debug_info.log_messages {
                                ui.label(
                                    RichText::new(line)
                                        .size(11.0)
                                        .family(egui::FontFamily::Monospace)
                                        .color(self.theme.text_muted),
                                );
                            }
                        });
                });
            });
    }

    fn fps_color(&self) -> egui::Color32 {
        let fps = self.state.debug_info.fps;
        if fps >= 50.0 {
            self.theme.success
        } else if fps >= 25.0 {
            self.theme.warning
        } else {
            self.theme.error
        }
    }

    fn recording_status(&self) -> &'static str {
        match self.state.recording_state {
            RecordingState::Idle => "Idle",
            RecordingState::Recording => "Recording",
            RecordingState::Processing => "Processing",
        }
    }

    fn stat_row(&self, ui: &mut egui::Ui, label: &str, value: &str) {
        ui.label(
            RichText::new(label)
                .size(12.0)
                .color(self.theme.text_muted),
        );
        ui.label(
            RichText::new(if value.is_empty() { "-" } else { value })
                .size(12.0)
                .family(egui::FontFamily::Monospace)
                .color(self.theme.text_secondary),
        );
        ui.end_row();
    }
}
