// ---------------------------------------------------------------------------
// Page – an arena of DOM-like nodes
// ---------------------------------------------------------------------------

/// Index of a node inside its [`Page`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Tag names are stored lowercase; attributes keep document order.
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// A loaded course page.
///
/// Node 0 is a synthetic document root (tag `#document`). Everything the
/// filter does to a page goes through the attribute helpers here: visibility
/// lives in the `style` attribute, striping in the `class` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    nodes: Vec<Node>,
}

pub const DOCUMENT_TAG: &str = "#document";

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        Page {
            nodes: vec![Node {
                kind: NodeKind::Element {
                    tag: DOCUMENT_TAG.to_string(),
                    attrs: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        0
    }

    /// Number of nodes including the document root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    // -- Building --

    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: Vec<(String, String)>,
    ) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
                attrs,
            },
        )
    }

    /// Append text, merging with a directly preceding text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(&last) = self.nodes[parent].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last].kind {
                existing.push_str(text);
                return;
            }
        }
        self.push_node(parent, NodeKind::Text(text.to_string()));
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    // -- Structure queries --

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn is_element(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Element children only, in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .filter(|&c| self.tag(c).is_some())
    }

    /// All descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next].children.iter().rev().copied());
        }
        out
    }

    /// First descendant element (pre-order) satisfying `pred`.
    pub fn find_first<F>(&self, id: NodeId, pred: F) -> Option<NodeId>
    where
        F: Fn(&Page, NodeId) -> bool,
    {
        self.descendants(id)
            .into_iter()
            .find(|&n| self.tag(n).is_some() && pred(self, n))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match &self.nodes[id].kind {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Element { .. } => self
                .descendants(id)
                .into_iter()
                .filter_map(|n| match &self.nodes[n].kind {
                    NodeKind::Text(t) => Some(t.as_str()),
                    NodeKind::Element { .. } => None,
                })
                .collect(),
        }
    }

    /// Text as it reads when rendered: line breaks and block or cell
    /// boundaries separate words, whitespace runs collapse, ends are trimmed.
    pub fn normalized_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.push_rendered_text(id, &mut out);
        normalize_ws(&out)
    }

    fn push_rendered_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { tag, .. } => {
                let breaks = WORD_BREAKING_TAGS.contains(&tag.as_str());
                if breaks {
                    out.push(' ');
                }
                for &child in &self.nodes[id].children {
                    self.push_rendered_text(child, out);
                }
                if breaks {
                    out.push(' ');
                }
            }
        }
    }

    /// Primary subtag of the `<html lang>` attribute, lowercased.
    pub fn html_lang(&self) -> Option<String> {
        let html = self.find_first(self.root(), |p, n| p.is_element(n, "html"))?;
        let lang = self.attr(html, "lang")?.trim();
        let primary = lang.split(['-', '_']).next().unwrap_or(lang);
        if primary.is_empty() {
            None
        } else {
            Some(primary.to_ascii_lowercase())
        }
    }

    // -- Attributes --

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match &self.nodes[id].kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            match attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        }
    }

    // -- Classes --

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if self.has_class(id, class) {
            return;
        }
        let value = match self.attr(id, "class").map(str::trim) {
            Some(existing) if !existing.is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attr(id, "class", &value);
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if !self.has_class(id, class) {
            return;
        }
        let kept: Vec<&str> = self
            .attr(id, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class)
            .collect();
        if kept.is_empty() {
            self.remove_attr(id, "class");
        } else {
            let value = kept.join(" ");
            self.set_attr(id, "class", &value);
        }
    }

    /// Replace `remove` with `add`; the two classes never coexist afterwards.
    pub fn swap_class(&mut self, id: NodeId, remove: &str, add: &str) {
        self.remove_class(id, remove);
        self.add_class(id, add);
    }

    // -- Visibility (inline `display: none`) --

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.attr(id, "style").is_some_and(|style| {
            style_decls(style).any(|(prop, value)| {
                prop.eq_ignore_ascii_case("display") && value.eq_ignore_ascii_case("none")
            })
        })
    }

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        let mut decls: Vec<String> = self
            .attr(id, "style")
            .map(|style| {
                style_decls(style)
                    .filter(|(prop, _)| !prop.eq_ignore_ascii_case("display"))
                    .map(|(prop, value)| format!("{prop}: {value}"))
                    .collect()
            })
            .unwrap_or_default();
        if hidden {
            decls.push("display: none".to_string());
        }
        if decls.is_empty() {
            self.remove_attr(id, "style");
        } else {
            let value = decls.join("; ");
            self.set_attr(id, "style", &value);
        }
    }
}

/// `prop: value` pairs of an inline style attribute.
fn style_decls(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        let prop = prop.trim();
        (!prop.is_empty()).then(|| (prop, value.trim()))
    })
}

/// Collapse sequences of whitespace into a single space and trim.
/// Elements that end a word in rendered text.
const WORD_BREAKING_TAGS: &[&str] = &[
    "br", "p", "div", "li", "ul", "ol", "dl", "dt", "dd", "td", "th", "tr", "table", "h1", "h2",
    "h3", "h4", "h5", "h6",
];

pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_page() -> (Page, NodeId) {
        let mut page = Page::new();
        let root = page.root();
        let tr = page.append_element(
            root,
            "TR",
            vec![("class".into(), "row-even".into()), ("style".into(), "color: red".into())],
        );
        page.append_text(tr, "  Spring ");
        page.append_text(tr, " AB  ");
        (page, tr)
    }

    #[test]
    fn tags_are_lowercased_and_text_merged() {
        let (page, tr) = row_page();
        assert_eq!(page.tag(tr), Some("tr"));
        assert_eq!(page.node(tr).children.len(), 1);
        assert_eq!(page.normalized_text(tr), "Spring AB");
    }

    #[test]
    fn line_breaks_and_cells_separate_words() {
        let (mut page, tr) = row_page();
        let td = page.append_element(tr, "td", Vec::new());
        page.append_text(td, "秋A");
        page.append_element(td, "br", Vec::new());
        page.append_text(td, "水5,6");
        let span = page.append_element(td, "span", Vec::new());
        page.append_text(span, "!");
        assert_eq!(page.normalized_text(td), "秋A 水5,6!");
        assert_eq!(page.normalized_text(tr), "Spring AB 秋A 水5,6!");
        assert_eq!(page.text_content(td), "秋A水5,6!");
    }

    #[test]
    fn swap_class_keeps_classes_exclusive() {
        let (mut page, tr) = row_page();
        page.swap_class(tr, "row-even", "row-odd");
        assert!(page.has_class(tr, "row-odd"));
        assert!(!page.has_class(tr, "row-even"));
        page.swap_class(tr, "row-even", "row-odd");
        assert_eq!(page.attr(tr, "class"), Some("row-odd"));
    }

    #[test]
    fn hiding_preserves_other_style_declarations() {
        let (mut page, tr) = row_page();
        page.set_hidden(tr, true);
        assert!(page.is_hidden(tr));
        assert_eq!(page.attr(tr, "style"), Some("color: red; display: none"));

        page.set_hidden(tr, true);
        assert_eq!(page.attr(tr, "style"), Some("color: red; display: none"));

        page.set_hidden(tr, false);
        assert!(!page.is_hidden(tr));
        assert_eq!(page.attr(tr, "style"), Some("color: red"));
    }

    #[test]
    fn showing_unstyled_node_leaves_no_style_attribute() {
        let mut page = Page::new();
        let root = page.root();
        let div = page.append_element(root, "div", Vec::new());
        page.set_hidden(div, true);
        page.set_hidden(div, false);
        assert_eq!(page.attr(div, "style"), None);
    }

    #[test]
    fn html_lang_uses_primary_subtag() {
        let mut page = Page::new();
        let root = page.root();
        page.append_element(root, "html", vec![("lang".into(), "ja-JP".into())]);
        assert_eq!(page.html_lang().as_deref(), Some("ja"));
    }
}
