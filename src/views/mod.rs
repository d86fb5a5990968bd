//! Server-rendered HTML pages
//!
//! Every dynamic value goes through [`escape`] before it reaches the markup.

pub mod pages;

use crate::models::BloodGroup;
use crate::routes::flash::Flash;

pub use pages::{dashboard_page, donor_register_page, error_page, find_donors_page, home_page, request_page};

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap a page body in the shared document shell
pub fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let messages: String = flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="flash flash-{}">{}</div>"#,
                flash.level.as_str(),
                escape(&flash.message)
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | RedConnect</title>
</head>
<body>
<nav>
<a href="/">RedConnect</a>
<a href="/donor/register">Become a donor</a>
<a href="/request">Request blood</a>
<a href="/donors">Find donors</a>
<a href="/dashboard">Dashboard</a>
</nav>
{messages}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        messages = messages,
        body = body,
    )
}

/// `<option>` list of blood groups with `selected` marking the current value
pub(crate) fn blood_group_options(selected: &str, include_any: bool) -> String {
    let mut options = String::new();
    if include_any {
        options.push_str(r#"<option value="">Any</option>"#);
    }
    for group in BloodGroup::ALL {
        let value = group.as_str();
        let marker = if value == selected { " selected" } else { "" };
        options.push_str(&format!(
            r#"<option value="{v}"{marker}>{v}</option>"#,
            v = escape(value),
            marker = marker
        ));
    }
    options
}
