use pulldown_cmark::{html, Event, Options, Parser};

/// Renders model-written Markdown to HTML.
///
/// Raw HTML in the source is escaped rather than passed through, since the
/// text comes from the model and is shown inside our pages.
pub fn render_markdown(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let parser = Parser::new_ext(text, Options::ENABLE_TABLES).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
