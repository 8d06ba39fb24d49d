pub mod app;
pub mod colors;

use crate::config::AppConfig;

/// Entry point: launch the native GUI window
pub fn run(config: AppConfig) -> crate::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("txcast - Transaction Broadcast")
            .with_inner_size([900.0, 560.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "txcast",
        native_options,
        Box::new(
            move |cc| -> Result<Box<dyn eframe::App>, Box<dyn std::error::Error + Send + Sync>> {
                let app = app::TxCastApp::new(cc, &config)?;
                Ok(Box::new(app))
            },
        ),
    )
    .map_err(|e| crate::TxCastError::Gui(e.to_string()))
}
