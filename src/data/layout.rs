use super::model::{LayoutKind, Stripe};
use super::page::{NodeId, Page};
use crate::config::LayoutMarkers;
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// EntrySource – uniform access to the course entries of one layout
// ---------------------------------------------------------------------------

/// Ordered course entries of a page plus the per-layout ways to read their
/// schedule label and change their visibility.
pub trait EntrySource {
    fn kind(&self) -> LayoutKind;

    /// Entry handles in document order, without header/footer nodes.
    fn entries(&self) -> &[NodeId];

    /// Raw schedule label of one entry; empty when the layout has none.
    fn label(&self, page: &Page, entry: NodeId) -> String;

    /// Make `entry` visible, consuming one stripe where the layout stripes.
    fn show(&self, page: &mut Page, entry: NodeId, stripe: &mut Stripe);

    fn hide(&self, page: &mut Page, entry: NodeId) {
        page.set_hidden(entry, true);
    }
}

/// Inspect the page once and pick the layout. The list table wins when both
/// are present.
pub fn detect_layout(
    page: &Page,
    markers: &LayoutMarkers,
) -> Result<Box<dyn EntrySource>, FilterError> {
    if let Some(list) = ListLayout::detect(page, markers) {
        return Ok(Box::new(list));
    }
    if let Some(thumbs) = ThumbnailLayout::detect(page, markers) {
        return Ok(Box::new(thumbs));
    }
    Err(FilterError::UnrecognizedLayout)
}

// ---------------------------------------------------------------------------
// List layout: table rows
// ---------------------------------------------------------------------------

/// Schedule text lives in the third cell of each row.
const LIST_LABEL_CELL: usize = 2;

#[derive(Debug, Clone)]
pub struct ListLayout {
    rows: Vec<NodeId>,
    odd_class: String,
    even_class: String,
}

impl ListLayout {
    pub fn detect(page: &Page, markers: &LayoutMarkers) -> Option<Self> {
        let table = page.find_first(page.root(), |p, n| {
            p.is_element(n, "table") && p.has_class(n, &markers.list_table_class)
        })?;

        let mut rows = Vec::new();
        for child in page.element_children(table) {
            match page.tag(child) {
                Some("tr") => rows.push(child),
                Some("thead" | "tbody" | "tfoot") => {
                    rows.extend(page.element_children(child).filter(|&r| page.is_element(r, "tr")))
                }
                _ => {}
            }
        }
        // First row is the column header.
        if !rows.is_empty() {
            rows.remove(0);
        }

        Some(ListLayout {
            rows,
            odd_class: markers.row_odd_class.clone(),
            even_class: markers.row_even_class.clone(),
        })
    }
}

impl EntrySource for ListLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::List
    }

    fn entries(&self) -> &[NodeId] {
        &self.rows
    }

    fn label(&self, page: &Page, entry: NodeId) -> String {
        page.element_children(entry)
            .filter(|&c| page.is_element(c, "td") || page.is_element(c, "th"))
            .nth(LIST_LABEL_CELL)
            .map(|cell| page.normalized_text(cell))
            .unwrap_or_default()
    }

    fn show(&self, page: &mut Page, entry: NodeId, stripe: &mut Stripe) {
        page.set_hidden(entry, false);
        match stripe {
            Stripe::Odd => page.swap_class(entry, &self.even_class, &self.odd_class),
            Stripe::Even => page.swap_class(entry, &self.odd_class, &self.even_class),
        }
        *stripe = stripe.flip();
    }
}

// ---------------------------------------------------------------------------
// Thumbnail layout: cards in a container
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ThumbnailLayout {
    cards: Vec<NodeId>,
    detail_class: String,
}

impl ThumbnailLayout {
    pub fn detect(page: &Page, markers: &LayoutMarkers) -> Option<Self> {
        let container = page.find_first(page.root(), |p, n| {
            p.has_class(n, &markers.thumbnail_container_class)
        })?;

        let mut cards: Vec<NodeId> = page.element_children(container).collect();
        // Last child is the footer, not a course.
        cards.pop();

        Some(ThumbnailLayout {
            cards,
            detail_class: markers.thumbnail_detail_class.clone(),
        })
    }
}

impl EntrySource for ThumbnailLayout {
    fn kind(&self) -> LayoutKind {
        LayoutKind::Thumbnail
    }

    fn entries(&self) -> &[NodeId] {
        &self.cards
    }

    fn label(&self, page: &Page, entry: NodeId) -> String {
        page.find_first(entry, |p, n| p.has_class(n, &self.detail_class))
            .and_then(|detail| page.attr(detail, "title"))
            .map(str::to_string)
            .unwrap_or_default()
    }

    fn show(&self, page: &mut Page, entry: NodeId, _stripe: &mut Stripe) {
        page.set_hidden(entry, false);
    }
}
