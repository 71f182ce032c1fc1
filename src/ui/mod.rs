//! Console output shown before the window opens (banner, load spinner).

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;

use crate::config::TranslatorConfig;
use crate::translation::language_name;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prints the startup banner with the resolved configuration to stderr.
pub fn print_banner(config: &TranslatorConfig) {
    eprintln!(
        "{} {} - Korean to English translator",
        Style::title("kotrans"),
        Style::version(format!("v{VERSION}"))
    );
    eprintln!("{}", Style::field("model", &config.model_id));
    eprintln!(
        "{} {} {}",
        Style::field("languages", describe_language(&config.source_lang)),
        Style::arrow(),
        describe_language(&config.target_lang)
    );
    eprintln!("{}", Style::field("max tokens", config.max_length));
    eprintln!();
}

fn describe_language(code: &str) -> String {
    language_name(code).map_or_else(|| code.to_string(), |name| format!("{name} ({code})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_language() {
        assert_eq!(describe_language("kor_Hang"), "Korean (kor_Hang)");
        assert_eq!(describe_language("xyz_Zzzz"), "xyz_Zzzz");
    }
}
