//! Prompt templating for the reference backend.
//!
//! Templates use `{{name}}` placeholders:
//! - `{{region}}`: editable region with the cursor marker
//! - `{{document}}`: whole document with the cursor marker
//! - `{{cursor}}`: the cursor marker itself
//!
//! Unknown placeholders are left as-is. Substitution is single-pass, so
//! document text that happens to contain `{{region}}` is never expanded.

use super::response::{EDIT_END_MARKER, EDIT_START_MARKER};
use crate::text::CURSOR_MARKER;

/// Prompt used when no template is configured.
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You help a programmer by predicting their next edit.
The caret is marked with {{cursor}}.

Full document:
{{document}}

Rewrite the editable region below, applying the edit the programmer is most \
likely to make next. Keep the cursor marker where the caret should end up. \
Optionally start with <|INTENT|> and a one-line rationale.

<|EDIT_START|>
{{region}}
<|EDIT_END|>
";

/// Values substituted into a prompt template.
#[derive(Clone, Copy, Debug)]
pub struct PromptContext<'a> {
    pub region: &'a str,
    pub document: &'a str,
}

/// Render `template` with the given context.
pub fn render_prompt(template: &str, context: PromptContext<'_>) -> String {
    let mut rendered = String::with_capacity(template.len() + context.document.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        let name = &rest[open + 2..open + 2 + close];
        rendered.push_str(&rest[..open]);

        match name.trim() {
            "region" => rendered.push_str(context.region),
            "document" => rendered.push_str(context.document),
            "cursor" => rendered.push_str(CURSOR_MARKER),
            _ => rendered.push_str(&rest[open..open + 4 + close]),
        }
        rest = &rest[open + 4 + close..];
    }
    rendered.push_str(rest);
    rendered
}

/// Whether `template` asks the model to wrap its answer in edit markers.
pub fn expects_edit_markers(template: &str) -> bool {
    template.contains(EDIT_START_MARKER) && template.contains(EDIT_END_MARKER)
}
