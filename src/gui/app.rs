//! Main txcast window

use crate::config::AppConfig;
use crate::form::Event;
use crate::gui::colors;
use crate::session::Session;
use eframe::egui;
use std::time::Duration;

/// Main application state
pub struct TxCastApp {
    /// Form and its broadcast worker
    session: Session,
    /// Focus the payload editor on the first frame
    first_frame: bool,
    /// Show about dialog
    show_about: bool,
    /// Status bar message
    status_message: String,
}

impl TxCastApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &AppConfig) -> crate::Result<Self> {
        Ok(Self::with_session(Session::from_config(config)?))
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            first_frame: true,
            show_about: false,
            status_message: "Ready".to_string(),
        }
    }

    /// Render header: title, menu button and search field
    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("\u{26D3} txcast");
                ui.separator();
                if ui.button("Broadcast").clicked() {
                    self.first_frame = true;
                }
                if ui.button("About").clicked() {
                    self.show_about = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let search_clicked = ui.button("Search").clicked();

                    let mut query = self.session.form.search_query.clone();
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut query)
                            .desired_width(ui.available_width().min(320.0))
                            .hint_text("Search"),
                    );
                    if response.changed() {
                        self.session.dispatch(Event::SearchEdited(query));
                    }

                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if search_clicked || enter {
                        self.session.dispatch(Event::SearchSubmitted);
                    }
                });
            });
        });
    }

    /// Render status bar
    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.session.form.is_broadcasting() {
                    ui.spinner();
                    ui.label(format!("{} in flight", self.session.form.in_flight()));
                    ui.separator();
                }
                ui.label(self.session.endpoint());
                ui.separator();
                ui.label(&self.status_message);
                if let Some(at) = self.session.label_updated_at {
                    ui.separator();
                    ui.label(format!("updated {}", at.format("%H:%M:%S")));
                }
            });
        });
    }

    /// Render payload editor, send button and result label
    fn render_form(&mut self, ui: &mut egui::Ui) {
        let mut payload = self.session.form.payload.clone();
        let editor_height = (ui.available_height() - 48.0).max(80.0);

        egui::ScrollArea::vertical()
            .max_height(editor_height)
            .show(ui, |ui| {
                let response = ui.add_sized(
                    [ui.available_width(), editor_height],
                    egui::TextEdit::multiline(&mut payload)
                        .code_editor()
                        .hint_text("Broadcast payload (raw transaction)"),
                );
                if self.first_frame {
                    response.request_focus();
                    self.first_frame = false;
                }
                if response.changed() {
                    self.session.dispatch(Event::PayloadEdited(payload));
                }
            });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let send = egui::Button::new(egui::RichText::new("Send").strong())
                .min_size(egui::vec2(80.0, 28.0));
            if ui.add(send).clicked() {
                self.session.dispatch(Event::BroadcastSubmitted);
            }

            if ui.button("Paste").clicked() {
                self.paste_clipboard();
            }

            ui.add_space(40.0);
            let tone = self.session.form.tone;
            let label = ui.add(
                egui::Label::new(
                    egui::RichText::new(&self.session.form.label).color(colors::tone_color(tone)),
                )
                .sense(egui::Sense::click()),
            );
            if label.on_hover_text("Click to copy").clicked() && !self.session.form.label.is_empty() {
                ui.ctx().copy_text(self.session.form.label.clone());
                self.status_message = "Label copied".to_string();
            }
        });
    }

    fn paste_clipboard(&mut self) {
        let pasted = arboard::Clipboard::new()
            .and_then(|mut clipboard| clipboard.get_text())
            .map_err(|e| crate::TxCastError::Clipboard(e.to_string()));

        match pasted {
            Ok(text) => {
                let mut payload = self.session.form.payload.clone();
                payload.push_str(&text);
                self.session.dispatch(Event::PayloadEdited(payload));
                self.status_message = format!("Pasted {} characters", text.chars().count());
            }
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard paste failed");
                self.status_message = e.to_string();
            }
        }
    }

    /// Render about dialog
    fn render_about_dialog(&mut self, ctx: &egui::Context) {
        if self.show_about {
            egui::Window::new("About txcast")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading("txcast");
                        ui.label(format!("Version {}", crate::VERSION));
                        ui.add_space(10.0);
                        ui.label("Broadcasts raw transactions through a local relay");
                        ui.label(format!("Relay: {}", self.session.endpoint()));
                        ui.add_space(10.0);
                        if ui.button("OK").clicked() {
                            self.show_about = false;
                        }
                    });
                });
        }
    }
}

impl eframe::App for TxCastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.process_completions();

        self.render_header(ctx);
        self.render_status_bar(ctx);
        self.render_about_dialog(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_form(ui);
        });

        // Keep polling the worker while requests are out
        if self.session.form.is_broadcasting() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{HttpReply, Transport};
    use crate::form::FormState;
    use crate::worker::BroadcastWorker;
    use std::sync::Arc;

    struct Unreachable;

    impl Transport for Unreachable {
        fn get_json(&self, _url: &str) -> crate::Result<HttpReply> {
            Err(crate::TxCastError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    fn app() -> TxCastApp {
        let worker = BroadcastWorker::new(Arc::new(Unreachable), "http://127.0.0.1:5000");
        TxCastApp::with_session(Session::new(worker, FormState::default()))
    }

    #[test]
    fn frame_renders_and_polls_worker() {
        let mut app = app();
        app.session.dispatch(Event::PayloadEdited("0200".to_string()));
        app.session.dispatch(Event::BroadcastSubmitted);

        let ctx = egui::Context::default();
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while app.session.form.is_broadcasting() && std::time::Instant::now() < deadline {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                app.render_header(ctx);
                app.render_status_bar(ctx);
                egui::CentralPanel::default().show(ctx, |ui| app.render_form(ui));
            });
            app.session.process_completions();
            std::thread::sleep(Duration::from_millis(5));
        }

        assert!(app.session.form.label.contains("connection refused"));
        assert!(!app.first_frame);
    }
}
