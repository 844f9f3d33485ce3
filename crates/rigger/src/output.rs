//! Output mode control.
//!
//! [`OutputMode`] decides whether a command's result is rendered as styled
//! text, plain text or serialized data. [`Styles`] carries the `console`
//! styles the text renderers use.

use clap::ValueEnum;
use console::Style;
use serde::Serialize;
use thiserror::Error;

/// Controls how output is rendered.
///
/// This is the user-facing enum for the `--output` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputMode {
    /// Auto-detect: TTY gets Term, pipe gets Text
    #[default]
    Auto,
    /// Always use terminal styling
    Term,
    /// Never use styling (plain text)
    Text,
    /// Serialize data as JSON
    Json,
    /// Serialize data as YAML
    Yaml,
}

impl OutputMode {
    /// Returns true if this is a structured output mode (JSON, YAML).
    pub fn is_structured(&self) -> bool {
        matches!(self, OutputMode::Json | OutputMode::Yaml)
    }

    /// Resolves Auto mode to concrete Term or Text based on TTY detection.
    ///
    /// For non-Auto modes, returns self unchanged.
    pub fn resolve_auto(&self) -> OutputMode {
        match self {
            OutputMode::Auto => {
                if console::Term::stdout().is_term() {
                    OutputMode::Term
                } else {
                    OutputMode::Text
                }
            }
            other => *other,
        }
    }

    /// Returns None for structured modes.
    pub fn to_text_mode(&self) -> Option<TextMode> {
        match self.resolve_auto() {
            OutputMode::Term => Some(TextMode::Styled),
            OutputMode::Text => Some(TextMode::Plain),
            _ => None,
        }
    }
}

/// How text renderers apply styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// ANSI escape codes
    Styled,
    /// No escapes at all
    Plain,
}

/// Named styles for the text renderers.
#[derive(Debug, Clone)]
pub struct Styles {
    pub heading: Style,
    pub name: Style,
    pub value: Style,
    pub muted: Style,
    pub added: Style,
    pub removed: Style,
    pub hunk: Style,
}

impl Styles {
    pub fn new(mode: TextMode) -> Self {
        match mode {
            TextMode::Plain => Self::plain(),
            TextMode::Styled => Self {
                heading: Style::new().bold().force_styling(true),
                name: Style::new().cyan().force_styling(true),
                value: Style::new().yellow().force_styling(true),
                muted: Style::new().dim().force_styling(true),
                added: Style::new().green().force_styling(true),
                removed: Style::new().red().force_styling(true),
                hunk: Style::new().magenta().force_styling(true),
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            heading: Style::new(),
            name: Style::new(),
            value: Style::new(),
            muted: Style::new(),
            added: Style::new(),
            removed: Style::new(),
            hunk: Style::new(),
        }
    }
}

/// Errors that can occur during serialization.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Not a structured output mode")]
    NotStructured,
}

/// Serializes data to the specified structured format.
pub fn serialize_structured<T: Serialize>(
    data: &T,
    mode: OutputMode,
) -> Result<String, SerializeError> {
    match mode {
        OutputMode::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputMode::Yaml => Ok(serde_yaml::to_string(data)?),
        _ => Err(SerializeError::NotStructured),
    }
}

/// Serializes `data` in structured modes, otherwise renders it as text.
pub fn emit<T, F>(data: &T, mode: OutputMode, render: F) -> Result<String, SerializeError>
where
    T: Serialize,
    F: FnOnce(&T, &Styles) -> String,
{
    if mode.is_structured() {
        return serialize_structured(data, mode);
    }
    let text_mode = mode.to_text_mode().unwrap_or(TextMode::Plain);
    Ok(render(data, &Styles::new(text_mode)))
}
