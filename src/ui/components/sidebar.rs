//! Voice input sidebar
//!
//! Start/stop recording control with status feedback, plus the last
//! transcription result.

use crate::ui::state::{AppState, RecordingState};
use crate::ui::theme::Theme;
use egui::{self, Rect, RichText, Sense, Vec2};

/// Sidebar with the voice input controls
pub struct Sidebar<'a> {
    state: &'a mut AppState,
    theme: &'a Theme,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing);

            ui.label(
                RichText::new("Voice Input")
                    .size(16.0)
                    .strong()
                    .color(self.theme.text_primary),
            );

            ui.add_space(self.theme.spacing_sm);

            ui.label(
                RichText::new(self.hint_text())
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            ui.add_space(self.theme.spacing);

            self.show_record_button(ui);

            ui.add_space(self.theme.spacing);

            if !self.state.debug_info.transcription_status.is_empty() {
                egui::Frame::none()
                    .fill(self.theme.bg_secondary)
                    .rounding(self.theme.card_rounding)
                    .inner_margin(self.theme.spacing_sm)
                    .show(ui, |ui| {
                        ui.label(
                            RichText::new(&self.state.debug_info.transcription_status)
                                .size(11.0)
                                .color(self.theme.success),
                        );
                    });
            }
        });
    }

    fn hint_text(&self) -> &'static str {
        match self.state.recording_state {
            RecordingState::Idle => "Click to start recording",
            RecordingState::Recording => "Recording... click to stop",
            RecordingState::Processing => "Transcribing audio...",
        }
    }

    fn show_record_button(&mut self, ui: &mut egui::Ui) {
        let size = Vec2::new(60.0, 60.0);
        let (rect, response) = ui.allocate_exact_size(size, Sense::click());

        if ui.is_rect_visible(rect) {
            self.paint_button(ui, rect, &response);
        }

        let is_processing = self.state.recording_state == RecordingState::Processing;

        if response.clicked() && !is_processing {
            match self.state.recording_state {
                RecordingState::Idle => self.state.start_recording(),
                RecordingState::Recording => self.state.stop_recording(),
                RecordingState::Processing => {}
            }
        }

        // Right-click discards the recording
        if response.secondary_clicked()
            && self.state.recording_state == RecordingState::Recording
        {
            self.state.cancel_recording();
        }

        let tooltip = match self.state.recording_state {
            RecordingState::Idle => "Start recording",
            RecordingState::Recording => "Stop recording (right-click to cancel)",
            RecordingState::Processing => "Processing...",
        };
        response.on_hover_text(tooltip);
    }

    fn paint_button(&self, ui: &mut egui::Ui, rect: Rect, response: &egui::Response) {
        let painter = ui.painter();
        let is_recording = self.state.recording_state == RecordingState::Recording;
        let is_processing = self.state.recording_state == RecordingState::Processing;

        let bg_color = if is_recording {
            self.theme.recording
        } else if is_processing {
            self.theme.warning.gamma_multiply(0.8)
        } else if response.hovered() {
            self.theme.primary.gamma_multiply(1.2)
        } else {
            self.theme.primary
        };

        painter.circle_filled(rect.center(), 28.0, bg_color);

        if response.hovered() && !is_recording && !is_processing {
            painter.circle_stroke(
                rect.center(),
                29.0,
                egui::Stroke::new(2.0, self.theme.primary.gamma_multiply(0.6)),
            );
        }

        if is_recording {
            // Stop square
            painter.rect_filled(
                Rect::from_center_size(rect.center(), Vec2::splat(16.0)),
                2.0,
                egui::Color32::WHITE,
            );
            self.draw_pulsing_ring(ui, rect);
        } else {
            let icon = if is_processing { "⏳" } else { "🎤" };
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                icon,
                egui::FontId::proportional(22.0),
                egui::Color32::WHITE,
            );
        }
    }

    fn draw_pulsing_ring(&self, ui: &egui::Ui, rect: Rect) {
        let t = ui.ctx().input(|i| i.time);
        let pulse = ((t * 3.0).sin() * 0.5 + 0.5) as f32;

        ui.painter().circle_stroke(
            rect.center(),
            30.0 + pulse * 4.0,
            egui::Stroke::new(
                2.0 * pulse,
                self.theme.recording.gamma_multiply(1.0 - pulse * 0.5),
            ),
        );

        ui.ctx().request_repaint();
    }
}
