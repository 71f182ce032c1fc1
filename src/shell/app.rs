use eframe::egui::{self, Align, Align2, Color32, Layout, RichText, TextEdit};

use super::dispatch::Dispatcher;
use super::state::{CLEAR_LABEL, ShellState};

pub const WINDOW_TITLE: &str = "한영 번역 프로그램";
const INPUT_HEADING: &str = "한국어";
const OUTPUT_HEADING: &str = "영어";
const OUTPUT_BACKGROUND: Color32 = Color32::from_rgb(0xe6, 0xff, 0xe6);

/// The translator window.
pub struct TranslatorApp {
    state: ShellState,
    dispatcher: Dispatcher,
}

impl TranslatorApp {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let state = ShellState::new(dispatcher.translator().max_length());
        Self { state, dispatcher }
    }

    fn on_translate(&mut self, ctx: &egui::Context) {
        if let Some(request) = self.state.submit(self.dispatcher.translator()) {
            let ctx = ctx.clone();
            self.dispatcher.dispatch(request, move || ctx.request_repaint());
        }
    }

    fn header(ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading(RichText::new(WINDOW_TITLE).size(20.0).strong());
            ui.add_space(8.0);
        });
    }

    fn actions(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let enabled = self.state.buttons_enabled();
            let translate = egui::Button::new(self.state.translate_label()).min_size([96.0, 32.0].into());
            if ui.add_enabled(enabled, translate).clicked() {
                self.on_translate(ctx);
            }
            let clear = egui::Button::new(CLEAR_LABEL).min_size([96.0, 32.0].into());
            if ui.add_enabled(enabled, clear).clicked() {
                self.state.clear();
            }
        });
        ui.add_space(8.0);
    }

    fn panes(&mut self, ui: &mut egui::Ui) {
        let pane_height = (ui.available_height() - 40.0).max(120.0);

        ui.columns(2, |columns| {
            let input = &mut columns[0];
            input.label(INPUT_HEADING);
            let edited = egui::ScrollArea::vertical()
                .id_salt("input")
                .max_height(pane_height)
                .show(input, |ui| {
                    ui.add_sized(
                        [ui.available_width(), pane_height],
                        TextEdit::multiline(self.state.input_mut()),
                    )
                })
                .inner
                .changed();
            if edited {
                self.state.input_changed(self.dispatcher.translator());
            }
            let color = if self.state.is_over_limit() {
                Color32::RED
            } else {
                input.visuals().text_color()
            };
            input.with_layout(Layout::right_to_left(Align::TOP), |ui| {
                ui.colored_label(color, self.state.token_label());
            });

            let output = &mut columns[1];
            output.label(OUTPUT_HEADING);
            let mut text = self.state.output();
            egui::ScrollArea::vertical()
                .id_salt("output")
                .max_height(pane_height)
                .show(output, |ui| {
                    ui.add_sized(
                        [ui.available_width(), pane_height],
                        TextEdit::multiline(&mut text)
                            .background_color(OUTPUT_BACKGROUND)
                            .text_color(Color32::BLACK),
                    );
                });
        });
    }

    fn warning_dialog(&mut self, ctx: &egui::Context) {
        let Some(warning) = self.state.warning().cloned() else {
            return;
        };

        let mut dismissed = false;
        egui::Window::new(warning.title())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(warning.message());
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.state.dismiss_warning();
        }
    }
}

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for response in self.dispatcher.drain() {
            self.state.complete(response);
        }

        egui::TopBottomPanel::top("header").show(ctx, Self::header);
        let modal = self.state.is_modal();
        egui::TopBottomPanel::bottom("actions").show(ctx, |ui| {
            if modal {
                ui.disable();
            }
            self.actions(ctx, ui);
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            if modal {
                ui.disable();
            }
            self.panes(ui);
        });
        self.warning_dialog(ctx);
    }
}
