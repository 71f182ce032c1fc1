//! Display state of the translator window, independent of rendering.
//!
//! Every user action is a method here; the egui layer only draws what this
//! state says and forwards clicks and edits.

use tracing::{debug, info};

use crate::translation::{TranslationRequest, TranslationResponse, Translator};

pub const TRANSLATE_LABEL: &str = "번역";
pub const TRANSLATING_LABEL: &str = "번역중..";
pub const CLEAR_LABEL: &str = "지우기";

/// A modal warning waiting for the user to dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    InputRequired,
    InputTooLong { max_length: usize },
}

impl Warning {
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InputRequired => "Input Required",
            Self::InputTooLong { .. } => "Input Too Long",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::InputRequired => "Please enter some Korean text to translate.".to_string(),
            Self::InputTooLong { max_length } => format!(
                "입력 길이는 {max_length} 토큰을 넘어서는 안됩니다. \
                 Input beyond {max_length} tokens will be truncated."
            ),
        }
    }
}

#[derive(Debug)]
pub struct ShellState {
    input: String,
    output: String,
    token_count: usize,
    max_length: usize,
    in_flight: Option<u64>,
    next_request_id: u64,
    warning: Option<Warning>,
}

impl ShellState {
    pub const fn new(max_length: usize) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            token_count: 0,
            max_length,
            in_flight: None,
            next_request_id: 1,
            warning: None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Editable input buffer; call [`Self::input_changed`] after editing.
    pub const fn input_mut(&mut self) -> &mut String {
        &mut self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub const fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn token_label(&self) -> String {
        format!("Token Count: {}/{}", self.token_count, self.max_length)
    }

    /// Whether the token label should be drawn in the warning color.
    pub const fn is_over_limit(&self) -> bool {
        self.token_count > self.max_length
    }

    pub const fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub const fn buttons_enabled(&self) -> bool {
        !self.is_busy()
    }

    pub const fn translate_label(&self) -> &'static str {
        if self.is_busy() {
            TRANSLATING_LABEL
        } else {
            TRANSLATE_LABEL
        }
    }

    pub const fn warning(&self) -> Option<&Warning> {
        self.warning.as_ref()
    }

    /// Whether a warning is open; the rest of the window ignores input until
    /// it is dismissed.
    pub const fn is_modal(&self) -> bool {
        self.warning.is_some()
    }

    pub fn dismiss_warning(&mut self) {
        self.warning = None;
    }

    /// Recounts tokens for the current input.
    pub fn input_changed(&mut self, translator: &dyn Translator) {
        self.token_count = translator.token_count(self.input.trim());
    }

    /// Handles a click on the translate button.
    ///
    /// Returns the request to dispatch, or `None` when nothing may be sent:
    /// the input is blank, a warning is open, or a translation is already
    /// running.
    pub fn submit(&mut self, translator: &dyn Translator) -> Option<TranslationRequest> {
        if let Some(id) = self.in_flight {
            debug!(in_flight = id, "translate ignored, request already running");
            return None;
        }
        if self.is_modal() {
            debug!("translate ignored, warning still open");
            return None;
        }

        let text = self.input.trim();
        if text.is_empty() {
            self.warning = Some(Warning::InputRequired);
            return None;
        }

        self.token_count = translator.token_count(text);
        if self.is_over_limit() {
            self.warning = Some(Warning::InputTooLong {
                max_length: self.max_length,
            });
        }

        let id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight = Some(id);
        info!(
            request = id,
            tokens = self.token_count,
            "dispatching translation"
        );
        Some(TranslationRequest::new(id, text, self.max_length))
    }

    /// Applies a finished translation. Returns `false` for a stale response.
    pub fn complete(&mut self, response: TranslationResponse) -> bool {
        if self.in_flight != Some(response.request_id) {
            debug!(request = response.request_id, "dropping stale translation");
            return false;
        }
        self.in_flight = None;

        match response.outcome {
            Ok(translated) => {
                info!(request = response.request_id, "translation displayed");
                self.output = translated;
            }
            Err(e) => {
                info!(request = response.request_id, error = %e, "translation failed");
                self.output = format!("Translation failed: {e}");
            }
        }
        true
    }

    /// Empties both panes and resets the token count. Ignored while busy or
    /// while a warning is open.
    pub fn clear(&mut self) -> bool {
        if self.is_busy() || self.is_modal() {
            return false;
        }
        self.input.clear();
        self.output.clear();
        self.token_count = 0;
        true
    }
}
