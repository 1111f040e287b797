//! Plain-text rendering of rich card answers
//!
//! Answers may be HTML produced by a rich-text editor. The terminal shows
//! them as plain text: block-level closings become line breaks, table cells
//! are separated by ` | `, list items get a `- ` bullet and the common
//! entities are decoded.

/// Returns true if the answer embeds an HTML table
pub fn has_table(markup: &str) -> bool {
    markup.to_ascii_lowercase().contains("<table")
}

/// Converts markup to plain text
pub fn to_plain(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        out.push_str(&decode_entities(&rest[..start]));

        let Some(end) = rest[start..].find('>') else {
            // Unclosed '<' is literal text
            out.push_str(&decode_entities(&rest[start..]));
            rest = "";
            break;
        };

        let tag = &rest[start + 1..start + end];
        out.push_str(replacement(tag));
        rest = &rest[start + end + 1..];
    }
    out.push_str(&decode_entities(rest));

    tidy(&out)
}

/// Text that stands in for a tag
fn replacement(tag: &str) -> &'static str {
    let tag = tag.trim().trim_end_matches('/').trim();
    let (closing, name) = match tag.strip_prefix('/') {
        Some(name) => (true, name),
        None => (false, tag),
    };
    let name = name
        .split(|c: char| c.is_whitespace())
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match (closing, name.as_str()) {
        (_, "br") => "\n",
        (false, "li") => "- ",
        (true, "p" | "div" | "li" | "tr" | "table" | "ul" | "ol") => "\n",
        (true, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") => "\n",
        (true, "td" | "th") => " | ",
        _ => "",
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Trims trailing cell separators and whitespace per line and collapses
/// runs of blank lines
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines() {
        let line = line.trim_end().trim_end_matches(" |").trim_end();
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
