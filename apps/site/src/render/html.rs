/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Only http(s), mailto and site-relative links are emitted as-is.
pub fn safe_href(url: &str) -> String {
    let lower = url.trim().to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || lower.starts_with("mailto:")
        || (lower.starts_with('/') && !lower.starts_with("//"));
    if allowed {
        escape(url.trim())
    } else {
        "#".to_string()
    }
}

pub fn link(label: &str, url: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
        safe_href(url),
        escape(label)
    )
}

/// `<ul>` of already-rendered items.
pub fn list<I>(items: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let items: String = items
        .into_iter()
        .map(|item| format!("<li>{item}</li>"))
        .collect();
    format!("<ul>{items}</ul>")
}

pub fn section(id: &str, title: &str, body: &str) -> String {
    format!(
        r#"<section id="{}"><h2>{}</h2><hr>{}</section>"#,
        escape(id),
        escape(title),
        body
    )
}
