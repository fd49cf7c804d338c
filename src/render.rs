use indexmap::IndexMap;
use serde::Serialize;

/// Rendering collaborator: turns one form's error set into display output.
///
/// The engine only hands over field name → message-list pairs; what comes
/// back (plain text, HTML, JSON) is the renderer's business.
pub trait ErrorRenderer {
    fn render(&self, form_name: &str, errors: &IndexMap<String, Vec<String>>) -> String;
}

/// One line per message: `Form: field: message`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl ErrorRenderer for PlainRenderer {
    fn render(&self, form_name: &str, errors: &IndexMap<String, Vec<String>>) -> String {
        let mut out = String::new();
        for (field, messages) in errors {
            for message in messages {
                out.push_str(&format!("{form_name}: {field}: {message}\n"));
            }
        }
        out
    }
}

/// Definition-list markup with entity-escaped message text, matching what
/// a web frontend embeds directly into a settings page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl ErrorRenderer for HtmlRenderer {
    fn render(&self, form_name: &str, errors: &IndexMap<String, Vec<String>>) -> String {
        let mut out = format!("<dl class=\"errors\"><dt>{}</dt>\n", escape_html(form_name));
        for (field, messages) in errors {
            for message in messages {
                out.push_str(&format!(
                    "<dd><b>{}</b>: {}</dd>\n",
                    escape_html(field),
                    escape_html(message)
                ));
            }
        }
        out.push_str("</dl>\n");
        out
    }
}

/// One JSON object per form, for AJAX error responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    form: &'a str,
    errors: &'a IndexMap<String, Vec<String>>,
}

impl ErrorRenderer for JsonRenderer {
    fn render(&self, form_name: &str, errors: &IndexMap<String, Vec<String>>) -> String {
        let report = ErrorReport {
            form: form_name,
            errors,
        };
        serde_json::to_string(&report).unwrap_or_default()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
