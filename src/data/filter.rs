use super::course_info::{has_schedule_shape, parse_with_profile};
use super::language::{profile, LanguageProfile};
use super::layout::{detect_layout, EntrySource};
use super::model::{LayoutKind, ModuleCode, Stripe};
use super::page::Page;
use crate::config::LayoutMarkers;
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// Filter pass summary
// ---------------------------------------------------------------------------

/// Counts from one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSummary {
    pub layout: LayoutKind,
    pub total: usize,
    pub visible: usize,
    /// Entries shown only because their label could not be parsed.
    pub forced: usize,
}

impl FilterSummary {
    pub fn hidden(&self) -> usize {
        self.total - self.visible
    }
}

// ---------------------------------------------------------------------------
// Visibility engine
// ---------------------------------------------------------------------------

/// Detect the layout, resolve the language and apply `selection` to every
/// entry. Configuration errors are returned before any entry is touched.
pub fn run_pass(
    page: &mut Page,
    markers: &LayoutMarkers,
    selection: ModuleCode,
    language: &str,
) -> Result<FilterSummary, FilterError> {
    let profile = profile(language)?;
    let source = detect_layout(page, markers)?;
    Ok(apply_filter(page, source.as_ref(), selection, profile))
}

/// Show or hide each entry of `source` for `selection`.
///
/// Entries whose label is too short or does not parse stay visible. In list
/// layout the visible rows are re-striped in order, starting odd.
pub fn apply_filter(
    page: &mut Page,
    source: &dyn EntrySource,
    selection: ModuleCode,
    profile: &LanguageProfile,
) -> FilterSummary {
    let mut stripe = Stripe::Odd;
    let mut visible = 0;
    let mut forced = 0;

    for &entry in source.entries() {
        let show = match selection {
            ModuleCode::All => true,
            ModuleCode::Term(season, segment) => {
                let label = source.label(page, entry);
                let info = if has_schedule_shape(&label) {
                    parse_with_profile(&label, profile)
                } else {
                    None
                };
                match info {
                    Some(info) => {
                        let keep = info.matches(season, segment);
                        log::trace!("entry {entry} {label:?} -> {info:?} keep={keep}");
                        keep
                    }
                    None => {
                        log::trace!("entry {entry} {label:?} unparseable, kept visible");
                        forced += 1;
                        true
                    }
                }
            }
        };

        if show {
            source.show(page, entry, &mut stripe);
            visible += 1;
        } else {
            source.hide(page, entry);
        }
    }

    let summary = FilterSummary {
        layout: source.kind(),
        total: source.entries().len(),
        visible,
        forced,
    };
    log::info!(
        "filter {selection} on {} layout: {}/{} visible ({} unparseable)",
        summary.layout,
        summary.visible,
        summary.total,
        summary.forced
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::html::{parse_html, to_html};
    use crate::data::model::{ModuleSegment, SeasonCode};
    use crate::data::page::NodeId;

    fn list_page(schedules: &[&str]) -> String {
        let mut html = String::from(
            "<html lang=\"en\"><body><table class=\"course-list\">\
             <tr><th>Code</th><th>Name</th><th>Schedule</th></tr>",
        );
        for (i, s) in schedules.iter().enumerate() {
            html.push_str(&format!(
                "<tr class=\"row-even\"><td>C{i}</td><td>Course {i}</td><td>{s}</td></tr>"
            ));
        }
        html.push_str("</table></body></html>");
        html
    }

    fn thumbnail_page(schedules: &[&str]) -> String {
        let mut html = String::from("<div class=\"course-thumbnails\">");
        for s in schedules {
            html.push_str(&format!(
                "<div class=\"card\"><span class=\"course-schedule\" title=\"{s}\"></span></div>"
            ));
        }
        html.push_str("<div class=\"footer\">more</div></div>");
        html
    }

    fn entries(page: &Page) -> Vec<NodeId> {
        detect_layout(page, &LayoutMarkers::default()).unwrap().entries().to_vec()
    }

    fn visible(page: &Page) -> Vec<usize> {
        entries(page)
            .iter()
            .enumerate()
            .filter(|(_, e)| !page.is_hidden(**e))
            .map(|(i, _)| i)
            .collect()
    }

    fn stripes(page: &Page) -> Vec<&'static str> {
        entries(page)
            .iter()
            .filter(|&&e| !page.is_hidden(e))
            .map(|&e| {
                match (page.has_class(e, "row-odd"), page.has_class(e, "row-even")) {
                    (true, false) => "odd",
                    (false, true) => "even",
                    _ => "broken",
                }
            })
            .collect()
    }

    const SPRING_B: ModuleCode = ModuleCode::Term(SeasonCode::Spring, ModuleSegment::B);

    fn mixed_ten() -> Vec<&'static str> {
        vec![
            "Fall A Mon. 1",
            "Spring A Tue. 2",
            "Spring B Wed. 3",
            "Spring C Thu. 4",
            "Fall BC Fri. 5",
            "Spring AB Mon. 6",
            "Fall B Tue. 1",
            "Spring C Wed. 2",
            "Spring A Thu. 3",
            "Spring Fall BC Fri. 4",
        ]
    }

    #[test]
    fn spring_b_shows_matching_rows_with_relative_stripes() {
        let mut page = parse_html(&list_page(&mixed_ten()));
        let summary = run_pass(&mut page, &LayoutMarkers::default(), SPRING_B, "en").unwrap();

        assert_eq!(visible(&page), [2, 5, 9]);
        assert_eq!(stripes(&page), ["odd", "even", "odd"]);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.visible, 3);
        assert_eq!(summary.hidden(), 7);
        assert_eq!(summary.forced, 0);
    }

    #[test]
    fn all_after_concrete_selection_restores_every_row() {
        let mut page = parse_html(&list_page(&mixed_ten()));
        let markers = LayoutMarkers::default();
        run_pass(&mut page, &markers, SPRING_B, "en").unwrap();
        let summary = run_pass(&mut page, &markers, ModuleCode::All, "en").unwrap();

        assert_eq!(summary.visible, 10);
        assert_eq!(visible(&page).len(), 10);
        let expected: Vec<&str> = (0..10).map(|i| if i % 2 == 0 { "odd" } else { "even" }).collect();
        assert_eq!(stripes(&page), expected);
    }

    #[test]
    fn single_token_labels_are_always_shown() {
        let schedules = ["SpringA", "Fall A Mon. 1", "Fall-C", "Spring A Tue. 2"];
        for code in ModuleCode::ALL_CODES {
            let mut page = parse_html(&list_page(&schedules));
            run_pass(&mut page, &LayoutMarkers::default(), code, "en").unwrap();
            let shown = visible(&page);
            assert!(shown.contains(&0) && shown.contains(&2), "{code}: {shown:?}");
        }
    }

    #[test]
    fn unparseable_labels_are_forced_visible() {
        let schedules = ["Intensive course TBA", "Fall A Mon. 1", ""];
        let mut page = parse_html(&list_page(&schedules));
        let code = ModuleCode::Term(SeasonCode::Spring, ModuleSegment::A);
        let summary = run_pass(&mut page, &LayoutMarkers::default(), code, "en").unwrap();
        assert_eq!(visible(&page), [0, 2]);
        assert_eq!(summary.forced, 2);
        assert_eq!(stripes(&page), ["odd", "even"]);
    }

    #[test]
    fn schedule_split_by_line_break_is_filtered() {
        let mut page = parse_html(
            "<table class=\"course-list\"><tr><th>No</th><th>Name</th><th>Time</th></tr>\
             <tr><td>1</td><td>x</td><td>秋A<br>水5,6</td></tr>\
             <tr><td>2</td><td>y</td><td>春B<br>月1</td></tr></table>",
        );
        let summary = run_pass(&mut page, &LayoutMarkers::default(), SPRING_B, "ja").unwrap();

        assert_eq!(summary.forced, 0);
        assert_eq!(visible(&page), [1]);
        assert_eq!(stripes(&page), ["odd"]);
    }

    #[test]
    fn japanese_thumbnails_filter_without_stripes() {
        let schedules = ["秋A 水5,6", "春AB 月1", "春秋ABC 集中", "通年 応談"];
        let mut page = parse_html(&thumbnail_page(&schedules));
        let code = ModuleCode::Term(SeasonCode::Autumn, ModuleSegment::A);
        let summary = run_pass(&mut page, &LayoutMarkers::default(), code, "ja").unwrap();

        assert_eq!(summary.layout, LayoutKind::Thumbnail);
        assert_eq!(visible(&page), [0, 2, 3]);
        for e in entries(&page) {
            assert!(!page.has_class(e, "row-odd") && !page.has_class(e, "row-even"));
        }
        let footer = page
            .find_first(page.root(), |p, n| p.has_class(n, "footer"))
            .unwrap();
        assert!(!page.is_hidden(footer));
    }

    #[test]
    fn header_row_is_never_touched() {
        let mut page = parse_html(&list_page(&mixed_ten()));
        run_pass(&mut page, &LayoutMarkers::default(), SPRING_B, "en").unwrap();
        let header = page.find_first(page.root(), |p, n| p.is_element(n, "tr")).unwrap();
        assert!(!page.is_hidden(header));
        assert_eq!(page.attr(header, "class"), None);
    }

    #[test]
    fn reapplying_a_pass_is_idempotent() {
        let mut page = parse_html(&list_page(&mixed_ten()));
        let markers = LayoutMarkers::default();
        run_pass(&mut page, &markers, SPRING_B, "en").unwrap();
        let once = to_html(&page);
        run_pass(&mut page, &markers, SPRING_B, "en").unwrap();
        assert_eq!(to_html(&page), once);
    }

    #[test]
    fn configuration_errors_leave_page_untouched() {
        let original = parse_html(&list_page(&mixed_ten()));

        let mut page = original.clone();
        let err = run_pass(&mut page, &LayoutMarkers::default(), SPRING_B, "xx").unwrap_err();
        assert_eq!(err, FilterError::UnsupportedLanguage("xx".to_string()));
        assert_eq!(page, original);

        let markers = LayoutMarkers {
            list_table_class: "missing".to_string(),
            thumbnail_container_class: "missing-too".to_string(),
            ..LayoutMarkers::default()
        };
        let err = run_pass(&mut page, &markers, SPRING_B, "en").unwrap_err();
        assert_eq!(err, FilterError::UnrecognizedLayout);
        assert_eq!(page, original);
    }
}
