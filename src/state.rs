use std::path::PathBuf;

use crate::config::Config;
use crate::data::course_info::{has_schedule_shape, parse_course_info};
use crate::data::filter::{run_pass, FilterSummary};
use crate::data::language::{self, detect_language, LanguageProfile};
use crate::data::layout::detect_layout;
use crate::data::model::{CourseInfo, LayoutKind, ModuleCode, Stripe};
use crate::data::page::{NodeId, Page};
use crate::prefs::{persist_selection, restore_selection, PreferenceStore};

// ---------------------------------------------------------------------------
// Render-ready view of the filtered page
// ---------------------------------------------------------------------------

/// One course entry as the UI draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub node: NodeId,
    /// Cell texts (list) or `[card text]` (thumbnail).
    pub cells: Vec<String>,
    pub label: String,
    /// Parsed schedule, `None` when the label is not recognized.
    pub info: Option<CourseInfo>,
    pub visible: bool,
    /// Row class currently applied, list layout only.
    pub stripe: Option<Stripe>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageView {
    pub layout: Option<LayoutKind>,
    pub header: Vec<String>,
    pub entries: Vec<EntryView>,
}

impl PageView {
    fn build(page: &Page, config: &Config, language: &str) -> Self {
        let Ok(source) = detect_layout(page, &config.markers) else {
            return PageView::default();
        };
        let markers = &config.markers;

        let header: Vec<String> = match source.kind() {
            LayoutKind::List => page
                .find_first(page.root(), |p, n| {
                    p.is_element(n, "table") && p.has_class(n, &markers.list_table_class)
                })
                .and_then(|table| page.find_first(table, |p, n| p.is_element(n, "tr")))
                .map(|row| page.element_children(row).map(|c| page.normalized_text(c)).collect())
                .unwrap_or_default(),
            LayoutKind::Thumbnail => Vec::new(),
        };

        let entries = source
            .entries()
            .iter()
            .map(|&node| {
                let cells: Vec<String> = match source.kind() {
                    LayoutKind::List => page
                        .element_children(node)
                        .map(|c| page.normalized_text(c))
                        .collect(),
                    LayoutKind::Thumbnail => vec![page.normalized_text(node)],
                };
                let stripe = if page.has_class(node, &markers.row_odd_class) {
                    Some(Stripe::Odd)
                } else if page.has_class(node, &markers.row_even_class) {
                    Some(Stripe::Even)
                } else {
                    None
                };
                let label = source.label(page, node);
                let info = if has_schedule_shape(&label) {
                    parse_course_info(&label, language).ok().flatten()
                } else {
                    None
                };
                EntryView {
                    node,
                    cells,
                    label,
                    info,
                    visible: !page.is_hidden(node),
                    stripe: stripe.filter(|_| source.kind() == LayoutKind::List),
                }
            })
            .collect();

        PageView {
            layout: Some(source.kind()),
            header,
            entries,
        }
    }

    pub fn visible_entries(&self) -> impl Iterator<Item = &EntryView> {
        self.entries.iter().filter(|e| e.visible)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded page (None until user opens a file).
    pub page: Option<Page>,
    pub page_path: Option<PathBuf>,

    /// Current module filter; restored from preferences at startup.
    pub selection: ModuleCode,

    /// Language chosen in the UI; `None` follows the page.
    pub language_override: Option<String>,

    /// Result of the latest pass.
    pub summary: Option<FilterSummary>,
    pub view: PageView,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    store: Box<dyn PreferenceStore>,
}

impl AppState {
    pub fn new(config: Config, store: Box<dyn PreferenceStore>) -> Self {
        let selection = restore_selection(store.as_ref());
        log::info!("restored module selection: {selection}");
        Self {
            config,
            page: None,
            page_path: None,
            selection,
            language_override: None,
            summary: None,
            view: PageView::default(),
            status_message: None,
            store,
        }
    }

    /// Display language for the next pass.
    pub fn language(&self) -> String {
        if let Some(lang) = &self.language_override {
            return lang.clone();
        }
        match &self.page {
            Some(page) => detect_language(page, &self.config.default_language),
            None => self.config.default_language.clone(),
        }
    }

    /// Profile for selector text; unknown languages fall back to English.
    pub fn profile(&self) -> &'static LanguageProfile {
        language::profile(&self.language())
            .or_else(|_| language::profile("en"))
            .unwrap_or(&language::LANGUAGES[0])
    }

    /// Ingest a newly loaded page and apply the current selection to it.
    pub fn set_page(&mut self, page: Page, path: Option<PathBuf>) {
        self.page = Some(page);
        self.page_path = path;
        self.refilter();
    }

    /// Recompute visibility for the current selection.
    pub fn refilter(&mut self) {
        let language = self.language();
        let Some(page) = self.page.as_mut() else {
            return;
        };
        match run_pass(page, &self.config.markers, self.selection, &language) {
            Ok(summary) => {
                self.summary = Some(summary);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("filter pass failed: {e}");
                self.summary = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
        self.view = PageView::build(page, &self.config, &language);
    }

    /// Handle a change of the module selector.
    pub fn select(&mut self, code: ModuleCode) {
        self.selection = code;
        self.refilter();
        persist_selection(self.store.as_ref(), code);
    }

    pub fn set_language_override(&mut self, language: Option<String>) {
        self.language_override = language;
        self.refilter();
    }
}
