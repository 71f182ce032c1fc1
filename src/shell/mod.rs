//! Desktop window: input and output panes, token counter, translate and
//! clear buttons.
//!
//! The UI thread owns all display state ([`ShellState`]). Translations run on
//! a [`Dispatcher`] worker and come back through its queue.

mod app;
mod dispatch;
mod fonts;
mod state;

use std::sync::Arc;

use anyhow::Result;
use eframe::egui;

pub use app::{TranslatorApp, WINDOW_TITLE};
pub use dispatch::Dispatcher;
pub use state::{CLEAR_LABEL, ShellState, TRANSLATE_LABEL, TRANSLATING_LABEL, Warning};

use crate::translation::Translator;

/// Opens the translator window and blocks until it is closed.
pub fn run(translator: Arc<dyn Translator>) -> Result<()> {
    let dispatcher = Dispatcher::new(translator)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1000.0, 800.0])
            .with_resizable(true),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            fonts::install(&cc.egui_ctx);
            Ok(Box::new(TranslatorApp::new(dispatcher)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Window failed: {e}"))
}
