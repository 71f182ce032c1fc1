//! Hangul-capable font installation.
//!
//! egui's bundled fonts have no Hangul glyphs, so a system CJK font is added
//! as a fallback after the defaults.

use std::path::Path;

use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use tracing::{info, warn};

const FONT_NAME: &str = "hangul-fallback";

const CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/usr/share/fonts/nanum/NanumGothic.ttf",
    // macOS
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    // Windows
    "C:\\Windows\\Fonts\\malgun.ttf",
    "C:\\Windows\\Fonts\\gulim.ttc",
];

/// Returns the first candidate font file that exists.
pub fn find_font<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .find(|path| Path::new(path).is_file())
}

pub fn install(ctx: &egui::Context) {
    let Some(path) = find_font(CANDIDATES) else {
        warn!("no Hangul font found, Korean text may not render");
        return;
    };

    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path, error = %e, "failed to read Hangul font");
            return;
        }
    };

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(FONT_NAME.to_owned(), FontData::from_owned(bytes));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .push(FONT_NAME.to_owned());
    }
    ctx.set_fonts(fonts);
    info!(path, "installed Hangul font");
}
