//! Terminal colors for the startup banner.

use std::fmt::Display;

use owo_colors::OwoColorize;

const LABEL_WIDTH: usize = 10;

pub struct Style;

impl Style {
    pub fn title<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    pub fn version<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// One indented `label value` row with aligned values.
    pub fn field<L: Display, V: Display>(label: L, value: V) -> String {
        let label = format!("{label:<LABEL_WIDTH$}");
        format!("  {} {}", label.dimmed(), value.cyan())
    }

    pub fn arrow() -> String {
        format!("{}", "→".dimmed())
    }

    /// Line printed once the model is loaded.
    pub fn ready<D: Display>(device: D) -> String {
        format!("{} Model ready on {}", "✓".green(), device.cyan())
    }
}
