//! Chat Markdown
//!
//! Renders assistant replies with pulldown-cmark. Replies are untrusted, so:
//! - raw HTML is shown as text, never injected
//! - images are dropped (their alt text stays)
//! - links keep only http(s) and mailto targets
//! - code blocks are emitted escaped, tagged with their language

use pulldown_cmark::{html::push_html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Render markdown to sanitized HTML
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_TASKLISTS);
    let events = transform_events(parser);
    let mut html = String::new();
    push_html(&mut html, events.into_iter());
    html
}

enum State {
    Normal,
    InCodeBlock { lang: Option<String>, content: String },
}

fn transform_events<'a>(parser: Parser<'a>) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut state = State::Normal;
    // Links whose target was rejected; their End must be dropped too
    let mut dropped_links = Vec::new();

    for event in parser {
        match state {
            State::Normal => match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(l) if !l.is_empty() => Some(l.to_string()),
                        _ => None,
                    };
                    state = State::InCodeBlock {
                        lang,
                        content: String::new(),
                    };
                }

                Event::Html(raw) | Event::InlineHtml(raw) => events.push(Event::Text(raw)),

                Event::Start(Tag::Image { .. }) | Event::End(TagEnd::Image) => {}

                Event::Start(Tag::Link { link_type, dest_url, title, id }) => {
                    let safe = is_safe_url(&dest_url);
                    dropped_links.push(!safe);
                    if safe {
                        events.push(Event::Start(Tag::Link { link_type, dest_url, title, id }));
                    }
                }
                Event::End(TagEnd::Link) => {
                    if !dropped_links.pop().unwrap_or(false) {
                        events.push(Event::End(TagEnd::Link));
                    }
                }

                other => events.push(other),
            },

            State::InCodeBlock { ref lang, ref mut content } => match event {
                Event::Text(t) => content.push_str(&t),
                Event::End(TagEnd::CodeBlock) => {
                    events.push(Event::Html(CowStr::from(code_block_html(content, lang.as_deref()))));
                    state = State::Normal;
                }
                _ => {}
            },
        }
    }

    events
}

fn is_safe_url(url: &str) -> bool {
    let lower = url.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
}

fn code_block_html(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            escape_html(lang),
            escape_html(code)
        ),
        None => format!("<pre><code>{}</code></pre>", escape_html(code)),
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
