//! Markdown to HTML for item descriptions.
//!
//! Commit messages and issue bodies are written with plain newlines, so every
//! soft break is rendered as `<br />`.

use pulldown_cmark::{html, Event, Options, Parser};

pub fn markdown_to_html(source: &str) -> String {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(source.len() + source.len() / 2);
    html::push_html(&mut out, events);
    out
}
