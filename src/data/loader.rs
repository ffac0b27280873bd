use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use super::html::{parse_html, to_html};
use super::page::{NodeId, Page};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a course page from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.html` / `.htm` – a saved course search page
/// * `.json`          – a page snapshot, see [`load_json`]
pub fn load_file(path: &Path) -> Result<Page> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "html" | "htm" => load_html(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Write the page, with its current visibility and row classes, as HTML.
pub fn save_html(page: &Page, path: &Path) -> Result<()> {
    std::fs::write(path, to_html(page))
        .with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// HTML loader
// ---------------------------------------------------------------------------

fn load_html(path: &Path) -> Result<Page> {
    let text = std::fs::read_to_string(path).context("reading HTML file")?;
    let page = parse_html(&text);
    if page.is_empty() {
        bail!("{} contains no markup", path.display());
    }
    Ok(page)
}

// ---------------------------------------------------------------------------
// JSON snapshot loader
// ---------------------------------------------------------------------------

/// One node of a JSON page snapshot.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotNode {
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<SnapshotNode>,
    },
    Text {
        text: String,
    },
}

/// Expected JSON schema: a single root node, or an array of top-level nodes.
///
/// ```json
/// {
///   "tag": "html", "attrs": { "lang": "ja" },
///   "children": [
///     { "tag": "table", "attrs": { "class": "course-list" }, "children": [
///       { "tag": "tr", "children": [ { "tag": "td", "children": [ { "text": "春A 月1" } ] } ] }
///     ] }
///   ]
/// }
/// ```
fn load_json(path: &Path) -> Result<Page> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    page_from_json(&text)
}

pub fn page_from_json(text: &str) -> Result<Page> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Root {
        Many(Vec<SnapshotNode>),
        One(SnapshotNode),
    }

    let root: Root = serde_json::from_str(text).context("parsing JSON page snapshot")?;
    let nodes = match root {
        Root::Many(nodes) => nodes,
        Root::One(node) => vec![node],
    };

    let mut page = Page::new();
    let parent = page.root();
    for node in &nodes {
        insert_snapshot(&mut page, parent, node);
    }
    Ok(page)
}

fn insert_snapshot(page: &mut Page, parent: NodeId, node: &SnapshotNode) {
    match node {
        SnapshotNode::Text { text } => page.append_text(parent, text),
        SnapshotNode::Element { tag, attrs, children } => {
            let attrs = attrs.iter().map(|(k, v)| (k.to_ascii_lowercase(), v.clone())).collect();
            let id = page.append_element(parent, tag, attrs);
            for child in children {
                insert_snapshot(page, id, child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutMarkers;
    use crate::data::layout::detect_layout;

    const SNAPSHOT: &str = r#"{
        "tag": "html", "attrs": { "lang": "ja" },
        "children": [
            { "tag": "div", "attrs": { "class": "course-thumbnails" }, "children": [
                { "tag": "div", "children": [
                    { "tag": "span", "attrs": { "class": "course-schedule", "title": "春B 火3" } }
                ] },
                { "tag": "div", "children": [ { "text": "footer" } ] }
            ] }
        ]
    }"#;

    #[test]
    fn json_snapshot_builds_thumbnail_page() {
        let page = page_from_json(SNAPSHOT).unwrap();
        assert_eq!(page.html_lang().as_deref(), Some("ja"));
        let source = detect_layout(&page, &LayoutMarkers::default()).unwrap();
        assert_eq!(source.entries().len(), 1);
        assert_eq!(source.label(&page, source.entries()[0]), "春B 火3");
    }

    #[test]
    fn html_file_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        std::fs::write(&path, "<table class=\"course-list\"><tr><th>h</th></tr></table>").unwrap();

        let mut page = load_file(&path).unwrap();
        let table = page.find_first(page.root(), |p, n| p.is_element(n, "table")).unwrap();
        page.set_hidden(table, true);

        let out = dir.path().join("filtered.html");
        save_html(&page, &out).unwrap();
        let reloaded = load_file(&out).unwrap();
        assert_eq!(reloaded, page);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("courses.xlsx")).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }

    #[test]
    fn malformed_snapshot_reports_context() {
        let err = page_from_json(r#"{ "attrs": {} }"#).unwrap_err();
        assert!(format!("{err:#}").contains("parsing JSON page snapshot"));
    }
}
