//! HTML for the pages. Plain `format!` templates; everything the user typed goes through
//! [`escape`].
use super::HomeLayout;
use super::form::{FormState, Phase, Status};

pub const HOME_TITLE: &str = "Local RAG System";
pub const CHAT_TITLE: &str = "Chat with Knowledge Base";
pub const EMBED_TITLE: &str = "Add to Knowledge Base";

const STYLE: &str = r#"
body { font-family: sans-serif; }
.container { max-width: 800px; margin: 2rem auto; padding: 1rem; }
.title { text-align: center; }
.flex-center { display: flex; justify-content: center; gap: 1rem; }
.button { padding: 0.5rem 1rem; background: #0070f3; color: white; border: none; border-radius: 4px; text-decoration: none; cursor: pointer; }
.button:disabled { background: #ccc; cursor: not-allowed; }
.back { color: #0070f3; text-decoration: none; }
.status-success { color: green; margin-top: 1rem; }
.status-error { color: red; margin-top: 1rem; }
textarea { width: 100%; min-height: 200px; margin-bottom: 1rem; padding: 0.5rem; border: 1px solid #ccc; }
"#;

// Client-side busy flag: lock the form while its request is in flight, and keep the embed button
// disabled while the textarea is blank.
const SCRIPT: &str = r#"
document.querySelectorAll("form[data-busy-label]").forEach(function (form) {
  var button = form.querySelector("button[type=submit]");
  var field = form.querySelector("input[name], textarea[name]");
  var requireText = form.hasAttribute("data-require-text");
  function refresh() {
    if (requireText) { button.disabled = field.value.trim() === ""; }
  }
  if (requireText) { field.addEventListener("input", refresh); refresh(); }
  form.addEventListener("submit", function (event) {
    if (form.dataset.phase === "submitting" || (requireText && field.value.trim() === "")) {
      event.preventDefault();
      return;
    }
    if (requireText) { field.value = field.value.trim(); }
    form.dataset.phase = "submitting";
    button.textContent = form.dataset.busyLabel;
    setTimeout(function () { field.readOnly = true; button.disabled = true; }, 0);
  });
});
"#;

pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
{body}
<script>{SCRIPT}</script>
</body>
</html>"#,
        title = escape(title),
    )
}

fn disabled(flag: bool) -> &'static str {
    if flag { " disabled" } else { "" }
}

// Red for anything that reads as an error, whichever branch produced it.
fn status_class(status: &Status) -> &'static str {
    if status.text().contains("Error") {
        "status-error"
    } else {
        "status-success"
    }
}

fn back_link() -> &'static str {
    r#"<div style="margin-bottom: 2rem"><a href="/" class="back">&larr; Back to Home</a></div>"#
}

fn chat_form(form: &FormState) -> String {
    let phase = form.phase();
    let submitting = phase == Phase::Submitting;
    let label = if submitting { "Enviando..." } else { "Enviar" };
    format!(
        r#"<form method="post" action="/chat" data-phase="{phase}" data-busy-label="Enviando...">
<input type="text" name="question" value="{value}" placeholder="Digite sua pergunta" style="width: 80%; padding: 0.5rem"{disabled}>
<br>
<button type="submit" class="button" style="margin-top: 1rem"{disabled}>{label}</button>
</form>"#,
        phase = phase.as_str(),
        value = escape(&form.input),
        disabled = disabled(submitting),
    )
}

pub fn home(home_layout: HomeLayout) -> String {
    let inline_chat = match home_layout {
        HomeLayout::Hub => String::new(),
        HomeLayout::InlineChat => format!(
            "<h2>{CHAT_TITLE}</h2>\n{}",
            chat_form(&FormState::default())
        ),
    };
    let body = format!(
        r#"<div class="container">
<h1 class="title">{HOME_TITLE}</h1>
<div class="flex-center">
<a href="/chat" class="button">{CHAT_TITLE}</a>
<a href="/embed" class="button">{EMBED_TITLE}</a>
</div>
{inline_chat}
</div>"#
    );
    layout(HOME_TITLE, &body)
}

pub fn chat(form: &FormState) -> String {
    let message = form
        .status
        .as_ref()
        .filter(|status| !status.text().is_empty())
        .map(|status| format!("<p>{}</p>", escape(status.text())))
        .unwrap_or_default();
    let body = format!(
        r#"<div class="container">
{back}
<h1>{CHAT_TITLE}</h1>
{form}
{message}
</div>"#,
        back = back_link(),
        form = chat_form(form),
    );
    layout(CHAT_TITLE, &body)
}

pub fn embed(form: &FormState) -> String {
    let phase = form.phase();
    let submitting = phase == Phase::Submitting;
    let label = if submitting { "Processing..." } else { "Process Text" };
    let button_disabled = submitting || form.input.trim().is_empty();
    let status = form
        .status
        .as_ref()
        .filter(|status| !status.text().is_empty())
        .map(|status| {
            format!(
                r#"<p class="{class}">{text}</p>"#,
                class = status_class(status),
                text = escape(status.text())
            )
        })
        .unwrap_or_default();
    let body = format!(
        r#"<div class="container">
{back}
<h1>{EMBED_TITLE}</h1>
<form method="post" action="/embed" data-phase="{phase}" data-busy-label="Processing..." data-require-text>
<textarea name="text" placeholder="Enter your text here..."{textarea_disabled}>{text}</textarea>
<button type="submit" class="button"{button_disabled}>{label}</button>
</form>
{status}
</div>"#,
        back = back_link(),
        phase = phase.as_str(),
        textarea_disabled = disabled(submitting),
        text = escape(&form.input),
        button_disabled = disabled(button_disabled),
    );
    layout(EMBED_TITLE, &body)
}
