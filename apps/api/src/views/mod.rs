//! Server-rendered HTML. Markup is assembled with `format!`; every interpolated
//! value that came from data or input goes through `escape`.

pub mod pages;


use crate::store::BackendStatus;

pub const APP_NAME: &str = "FDU Careers Exploration";
pub const APP_TAGLINE: &str = "Discover Your Perfect Career Path";

/// Escapes text for HTML element and attribute context.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Cuts at a character boundary and appends "..." when longer than `max_chars`.
/// Shared by the result tables of both shells.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

/// Wraps a page body in the shared layout.
pub fn layout(title: &str, status: BackendStatus, body: &str) -> String {
    let banner = match status {
        BackendStatus::Connected => String::new(),
        BackendStatus::Offline => r#"<div class="alert alert-warning">Running in demo mode: the career database is not connected, so searches cannot return results.</div>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {app}</title>
<link rel="stylesheet" href="/static/css/style.css">
</head>
<body>
<nav class="navbar">
<a class="brand" href="/">{app}</a>
<a href="/competencies">Competencies</a>
<a href="/majors">Majors</a>
<a href="/about">About</a>
<a href="/contact">Contact</a>
</nav>
<main>
{banner}
{body}
</main>
<footer><p>{app} &middot; {tagline} &middot; Powered by O*NET occupational data and NACE competencies</p></footer>
</body>
</html>
"#,
        title = escape(title),
        app = APP_NAME,
        tagline = APP_TAGLINE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
        assert_eq!(truncate("héllo wörld", 6), "héllo...");
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_layout_shows_demo_banner_only_offline() {
        let offline = layout("Home", BackendStatus::Offline, "<p>x</p>");
        assert!(offline.contains("demo mode"));
        let online = layout("Home", BackendStatus::Connected, "<p>x</p>");
        assert!(!online.contains("demo mode"));
        assert!(online.contains("<title>Home | FDU Careers Exploration</title>"));
    }
}
