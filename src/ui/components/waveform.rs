//! Waveform visualization component
//!
//! Displays the live microphone signal while recording.

use crate::ui::state::{AppState, RecordingState};
use crate::ui::theme::Theme;
use egui::{self, Pos2, Stroke, Vec2};

/// Waveform visualization component
pub struct Waveform<'a> {
    state: &'a AppState,
    theme: &'a Theme,
    height: f32,
}

impl<'a> Waveform<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            height: 60.0,
        }
    }

    pub fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let desired_size = Vec2::new(ui.available_width(), self.height);
        let (rect, response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());

        let painter = ui.painter();

        painter.rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);

        let samples = &self.state.waveform_data;
        if samples.is_empty() {
            let center_y = rect.center().y;
            painter.line_segment(
                [
                    Pos2::new(rect.left() + 8.0, center_y),
                    Pos2::new(rect.right() - 8.0, center_y),
                ],
                Stroke::new(1.0, self.theme.waveform_inactive),
            );
            return response;
        }

        let color = if self.state.recording_state == RecordingState::Recording {
            self.theme.waveform_active
        } else {
            self.theme.waveform_inactive
        };

        let width = rect.width() - 16.0;
        let center_y = rect.center().y;
        let max_height = rect.height() * 0.8;
        let step = width / samples.len() as f32;

        for (i, &sample) in samples.iter().enumerate() {
            let x = rect.left() + 8.0 + i as f32 * step;
            let h = (sample.abs() * max_height).min(max_height).max(1.0);
            painter.line_segment(
                [
                    Pos2::new(x, center_y - h / 2.0),
                    Pos2::new(x, center_y + h / 2.0),
                ],
                Stroke::new(1.0, color),
            );
        }

        if self.state.recording_state == RecordingState::Recording {
            ui.ctx().request_repaint();
        }

        response
    }
}
