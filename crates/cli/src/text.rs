const BLOCK_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "tr", "table", "br", "section",
];

/// Drops tags, turns block-level tags into line breaks and decodes the entities `escape` emits.
pub fn plain(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find('>') else {
            rest = "";
            break;
        };
        let tag = &rest[start + 1..start + end];
        if is_block(tag) {
            out.push('\n');
        } else if tag.starts_with("td") || tag.starts_with("th") {
            out.push_str("  ");
        }
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);

    decode_entities(&out)
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_block(tag: &str) -> bool {
    let name = tag
        .trim_start_matches('/')
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default();
    BLOCK_TAGS.contains(&name)
}

fn decode_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_tags_become_lines() {
        let html = r#"<div class="card"><h5>BUY TCS</h5><p>Quantity: 10</p></div>"#;
        assert_eq!(plain(html), "BUY TCS\nQuantity: 10");
    }

    #[test]
    fn inline_tags_are_dropped_and_entities_decoded() {
        let html = "<p><strong>Reason:</strong> P&amp;L &lt; 0</p>";
        assert_eq!(plain(html), "Reason: P&L < 0");
    }

    #[test]
    fn table_cells_are_spaced() {
        let html = "<table><tr><td>INFY</td><td>5</td></tr></table>";
        assert_eq!(plain(html), "INFY 5");
    }
}
