// Tolerant HTML reader/writer for saved course pages.
// Deliberately naive: enough structure for tables, cards and attributes,
// not a conforming HTML5 parser.

use super::page::{NodeId, NodeKind, Page, DOCUMENT_TAG};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Build a [`Page`] from HTML source.
pub fn parse_html(src: &str) -> Page {
    let mut page = Page::new();
    let mut stack: Vec<NodeId> = vec![page.root()];
    let mut pos = 0;

    while pos < src.len() {
        let rest = &src[pos..];
        let parent = *stack.last().unwrap_or(&0);

        if rest.starts_with("<!--") {
            pos += rest.find("-->").map_or(rest.len(), |i| i + 3);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            pos += rest.find('>').map_or(rest.len(), |i| i + 1);
        } else if rest.starts_with("</") {
            let (inner, consumed) = match rest.find('>') {
                Some(i) => (&rest[2..i], i + 1),
                None => (&rest[2..], rest.len()),
            };
            close_element(&page, &mut stack, &inner.trim().to_ascii_lowercase());
            pos += consumed;
        } else if let Some(tag) = parse_start_tag(rest) {
            pos += tag.consumed;
            open_implied_closes(&page, &mut stack, &tag.name);
            let parent = *stack.last().unwrap_or(&0);
            let id = page.append_element(parent, &tag.name, tag.attrs);

            if RAW_TEXT_TAGS.contains(&tag.name.as_str()) && !tag.self_closing {
                let body = &src[pos..];
                let close = format!("</{}", tag.name);
                let end = body.to_ascii_lowercase().find(&close).unwrap_or(body.len());
                page.append_text(id, &body[..end]);
                pos += end;
                pos += src[pos..].find('>').map_or(src.len() - pos, |i| i + 1);
            } else if !tag.self_closing && !VOID_TAGS.contains(&tag.name.as_str()) {
                stack.push(id);
            }
        } else {
            // Text up to the next '<' (a stray '<' counts as text).
            let first = rest.chars().next().map_or(1, char::len_utf8);
            let end = rest[first..].find('<').map_or(rest.len(), |i| i + first);
            page.append_text(parent, &decode_entities(&rest[..end]));
            pos += end;
        }
    }

    page
}

struct StartTag {
    name: String,
    attrs: Vec<(String, String)>,
    self_closing: bool,
    consumed: usize,
}

/// Parse `<name attr=value ...>` at the start of `s`.
fn parse_start_tag(s: &str) -> Option<StartTag> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'<' || !bytes[1].is_ascii_alphabetic() {
        return None;
    }

    let is_name_end = |b: u8| b.is_ascii_whitespace() || b == b'>' || b == b'/';
    let mut i = 1;
    while i < bytes.len() && !is_name_end(bytes[i]) {
        i += 1;
    }
    let name = s[1..i].to_ascii_lowercase();
    let mut attrs = Vec::new();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return Some(StartTag { name, attrs, self_closing: false, consumed: bytes.len() });
        }
        match bytes[i] {
            b'>' => {
                return Some(StartTag { name, attrs, self_closing: false, consumed: i + 1 });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(StartTag { name, attrs, self_closing: true, consumed: i + 2 });
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        let start = i;
        while i < bytes.len() && !is_name_end(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        let key = s[start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let mut value = String::new();
        if bytes.get(i) == Some(&b'=') {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                Some(&q) if q == b'"' || q == b'\'' => {
                    let vstart = i + 1;
                    let vend = s[vstart..].find(q as char).map_or(bytes.len(), |j| vstart + j);
                    value = decode_entities(&s[vstart..vend]);
                    i = (vend + 1).min(bytes.len());
                }
                _ => {
                    let vstart = i;
                    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                        i += 1;
                    }
                    value = decode_entities(&s[vstart..i]);
                }
            }
        }
        if !key.is_empty() {
            attrs.push((key, value));
        }
    }
}

/// Pop the innermost open element named `name`; stray closers are ignored.
fn close_element(page: &Page, stack: &mut Vec<NodeId>, name: &str) {
    if let Some(idx) = stack.iter().rposition(|&n| n != page.root() && page.tag(n) == Some(name)) {
        stack.truncate(idx);
    }
}

/// Close elements that HTML lets authors leave open, e.g. `<td>` before the next `<td>`.
fn open_implied_closes(page: &Page, stack: &mut Vec<NodeId>, tag: &str) {
    let (targets, boundaries): (&[&str], &[&str]) = match tag {
        "td" | "th" => (&["td", "th"], &["tr", "table"]),
        "tr" => (&["tr"], &["table"]),
        "thead" | "tbody" | "tfoot" => (&["thead", "tbody", "tfoot"], &["table"]),
        "li" => (&["li"], &["ul", "ol"]),
        "option" => (&["option"], &["select", "datalist"]),
        "p" => (&["p"], &["div", "td", "th", "li", "body"]),
        _ => return,
    };
    for idx in (1..stack.len()).rev() {
        let Some(open) = page.tag(stack[idx]) else {
            continue;
        };
        if targets.contains(&open) {
            stack.truncate(idx);
            return;
        }
        if boundaries.contains(&open) {
            return;
        }
    }
}

/// Decode the common named entities plus numeric references.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some(' '),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

/// Render a page back to HTML, including any visibility/class changes.
pub fn to_html(page: &Page) -> String {
    let mut out = String::new();
    if page.find_first(page.root(), |p, n| p.is_element(n, "html")).is_some() {
        out.push_str("<!DOCTYPE html>\n");
    }
    for &child in &page.node(page.root()).children {
        write_node(page, child, &mut out);
    }
    out
}

fn write_node(page: &Page, id: NodeId, out: &mut String) {
    let node = page.node(id);
    match &node.kind {
        NodeKind::Text(text) => {
            let raw = node
                .parent
                .and_then(|p| page.tag(p))
                .is_some_and(|t| RAW_TEXT_TAGS.contains(&t));
            if raw {
                out.push_str(text);
            } else {
                out.push_str(&escape_text(text));
            }
        }
        NodeKind::Element { tag, attrs } => {
            if tag == DOCUMENT_TAG {
                return;
            }
            out.push('<');
            out.push_str(tag);
            for (key, value) in attrs {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&tag.as_str()) {
                return;
            }
            for &child in &node.children {
                write_node(page, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
<!-- course list -->
<TABLE class="course-list">
  <tr><th>Code<th>Name<th>Schedule</tr>
  <tr class=row-odd><td>GA101<td>Intro &amp; Overview<td>Spring AB Mon.2
  <tr><td>GA102</td><td>Physics</td><td title='full &quot;year&quot;'>Fall C <br>Wed. 3</td></tr>
</table>
<script>if (a < b) { x = "</td>"; }</script>
</body>
</html>"#;

    fn rows(page: &Page) -> Vec<NodeId> {
        page.descendants(page.root())
            .into_iter()
            .filter(|&n| page.is_element(n, "tr"))
            .collect()
    }

    #[test]
    fn unclosed_cells_and_rows_are_closed_implicitly() {
        let page = parse_html(TABLE);
        let rows = rows(&page);
        assert_eq!(rows.len(), 3);
        for &row in &rows {
            assert_eq!(page.element_children(row).count(), 3, "row {row}");
        }
        let cells: Vec<NodeId> = page.element_children(rows[1]).collect();
        assert_eq!(page.normalized_text(cells[1]), "Intro & Overview");
        assert_eq!(page.normalized_text(cells[2]), "Spring AB Mon.2");
    }

    #[test]
    fn attributes_quoted_and_unquoted() {
        let page = parse_html(TABLE);
        let rows = rows(&page);
        assert!(page.has_class(rows[1], "row-odd"));
        let cell = page.element_children(rows[2]).nth(2).unwrap();
        assert_eq!(page.attr(cell, "title"), Some("full \"year\""));
        assert_eq!(page.normalized_text(cell), "Fall C Wed. 3");
        assert_eq!(page.html_lang().as_deref(), Some("en"));
    }

    #[test]
    fn script_bodies_are_kept_verbatim() {
        let page = parse_html(TABLE);
        let script = page.find_first(page.root(), |p, n| p.is_element(n, "script")).unwrap();
        assert_eq!(page.text_content(script), r#"if (a < b) { x = "</td>"; }"#);
        assert_eq!(rows(&page).len(), 3);
    }

    #[test]
    fn serialization_reflects_mutations() {
        let mut page = parse_html(TABLE);
        let row = rows(&page)[2];
        page.set_hidden(row, true);
        let html = to_html(&page);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<tr style="display: none">"#));
        assert!(html.contains("Intro &amp; Overview"));
        assert!(html.contains("<br>Wed. 3"));

        let reparsed = parse_html(&html);
        assert_eq!(rows(&reparsed).len(), 3);
        assert!(reparsed.is_hidden(rows(&reparsed)[2]));
    }

    #[test]
    fn entities() {
        assert_eq!(decode_entities("a&nbsp;b &lt;c&gt; &#x41;&#66;"), "a b <c> AB");
        assert_eq!(decode_entities("AT&T &unknown; &"), "AT&T &unknown; &");
    }
}
