//! Markdown rendering for summaries.
//!
//! Summaries come from a remote service, so the HTML produced from them is
//! untrusted. Rendering is two separate stages and callers must go through
//! both: [`render_markdown`] converts, [`sanitize_html`] strips anything that
//! could execute or load content. [`to_safe_html`] runs them in that order.

use pulldown_cmark::{html, Options, Parser};

/// Convert markdown into raw, unsanitised HTML.
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);

    let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut html_output, parser);
    html_output
}

/// Strip scripts, event handlers, `javascript:` links and other unsafe markup.
pub fn sanitize_html(html: &str) -> String {
    ammonia::clean(html)
}

/// Markdown to HTML that is safe to insert into a page.
pub fn to_safe_html(markdown: &str) -> String {
    let raw = render_markdown(markdown);
    sanitize_html(&raw)
}
