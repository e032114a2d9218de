use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::messages::{error_box, render_message, MessageCatalog};
use crate::pipeline::CallResult;

/// How the host should treat the returned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapeMode {
    /// Show as plain escaped text, no further wikitext interpretation.
    Plain,
    /// Already-rendered markup (error boxes).
    Markup,
}

impl EscapeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            EscapeMode::Plain => "plain",
            EscapeMode::Markup => "markup",
        }
    }
}

/// Final render contract handed to the host templating layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderableOutput {
    pub text: String,
    pub escape: EscapeMode,
}

impl RenderableOutput {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), escape: EscapeMode::Plain }
    }

    pub fn as_tuple(&self) -> (&str, &'static str) {
        (&self.text, self.escape.as_str())
    }
}

/// Rendered output plus the diagnostic the host should be notified of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classified {
    pub output: RenderableOutput,
    pub diagnostic: Option<ErrorKind>,
}

/// Turn a call result into renderable output. Pure: same input, same output.
pub fn classify(result: &CallResult, messages: &dyn MessageCatalog) -> Classified {
    match result {
        CallResult::Success(text) => {
            Classified { output: RenderableOutput::plain(text.clone()), diagnostic: None }
        }
        CallResult::Failure(err) => {
            let kind = err.kind();
            let message = render_message(messages, kind.message_key(), &err.message_params());
            Classified {
                output: RenderableOutput { text: error_box(&message), escape: EscapeMode::Markup },
                diagnostic: Some(kind),
            }
        }
    }
}
