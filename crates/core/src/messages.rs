//! User-facing message templates and error box rendering.
//!
//! Templates use `$1`, `$2`, ... placeholders. Parameters are HTML-escaped
//! before interpolation; the template text itself is trusted markup.

use std::collections::HashMap;

/// Source of localized message templates.
pub trait MessageCatalog: Send + Sync {
    fn template(&self, key: &str) -> Option<String>;
}

/// Built-in English messages.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishCatalog;

impl MessageCatalog for EnglishCatalog {
    fn template(&self, key: &str) -> Option<String> {
        let text = match key {
            "wikifunctionsclient-functioncall-error-unknown" => {
                "The function \"$1\" does not exist."
            }
            "wikifunctionsclient-functioncall-error-invalid-zobject" => {
                "\"$1\" is not a valid object, and so cannot be used here."
            }
            "wikifunctionsclient-functioncall-error-nonfunction" => {
                "\"$1\" is not a function, and so cannot be used here."
            }
            "wikifunctionsclient-functioncall-error-nonstringoutput" => {
                "The function \"$1\" does not return a string, and so cannot be used here."
            }
            "wikifunctionsclient-functioncall-error-nonstringinput" => {
                "The function \"$1\" takes an input \"$2\" of type \"$3\", which is not a string, and so cannot be used here."
            }
            "wikifunctionsclient-functioncall-error" => {
                "There was an error when trying to run this function: $1"
            }
            _ => return None,
        };
        Some(text.to_string())
    }
}

/// Catalog backed by a map, e.g. loaded from a translation file.
#[derive(Debug, Default, Clone)]
pub struct MapCatalog {
    messages: HashMap<String, String>,
}

impl MapCatalog {
    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }
}

impl MessageCatalog for MapCatalog {
    fn template(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

/// Render a message with escaped parameters; unknown keys render as `⧼key⧽`.
pub fn render_message(catalog: &dyn MessageCatalog, key: &str, params: &[String]) -> String {
    match catalog.template(key) {
        Some(template) => interpolate(&template, params),
        None => format!("⧼{}⧽", escape_html(key)),
    }
}

/// Wrap rendered message text in a block error box.
pub fn error_box(message_html: &str) -> String {
    format!("<div class=\"errorbox\"><p>{}</p></div>", message_html)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Replace `$n` placeholders with escaped parameters. Placeholders without a
/// matching parameter are left as written.
fn interpolate(template: &str, params: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        let mut end = start + 1;
        while let Some(&(idx, d)) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            end = idx + d.len_utf8();
            chars.next();
        }
        let digits = &template[start + 1..end];
        let param =
            digits.parse::<usize>().ok().and_then(|n| n.checked_sub(1)).and_then(|i| params.get(i));
        match param {
            Some(param) => out.push_str(&escape_html(param)),
            None => out.push_str(&template[start..end]),
        }
    }
    out
}
