//! Server-side rendering of the dashboard page.
//!
//! The page is an `askama` template (`templates/dashboard.html`), checked
//! at compile time. Values are HTML-escaped by the template; chart SVGs
//! are inserted as-is since `plotters` escapes the text it draws.

use std::collections::BTreeSet;

use askama::Template;
use ipc_dashboard_analytics::filter;
use ipc_dashboard_analytics_models::{DashboardSummary, ProtectionLevel, SelectorOptions, Selection};
use ipc_dashboard_charts::{ChartSize, RenderedChart, render_dashboard, render_protection_map};
use ipc_dashboard_server_models::{DashboardQuery, EMERGENCY_CONTACTS, EmergencyContact};

use crate::DashboardData;

/// Browser tab title.
pub const PAGE_TITLE: &str = "Crime Visualisation";

/// One entry of a multi-select.
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    fn list(options: &[String], selected: &BTreeSet<String>) -> Vec<Self> {
        options
            .iter()
            .map(|value| Self {
                value: value.clone(),
                selected: selected.contains(value),
            })
            .collect()
    }
}

/// State of the filter form in the sidebar.
pub struct FilterForm {
    pub min_year: i32,
    pub max_year: i32,
    pub start_year: i32,
    pub end_year: i32,
    pub states: Vec<SelectOption>,
    pub districts: Vec<SelectOption>,
}

impl FilterForm {
    fn new(options: &SelectorOptions, selection: &Selection) -> Self {
        let years = selection.years;
        Self {
            min_year: options.years.first().copied().unwrap_or(years.start),
            max_year: options.years.last().copied().unwrap_or(years.end),
            start_year: years.start,
            end_year: years.end,
            states: SelectOption::list(&options.states, &selection.states),
            districts: SelectOption::list(&options.districts, &selection.districts),
        }
    }
}

/// Record counts shown above the charts.
pub struct Overview {
    pub years: String,
    pub year_range_records: usize,
    pub selected_records: usize,
    pub latest_year: String,
}

impl From<&DashboardSummary> for Overview {
    fn from(summary: &DashboardSummary) -> Self {
        Self {
            years: summary.selection.years.to_string(),
            year_range_records: summary.year_range_records,
            selected_records: summary.selected_records,
            latest_year: summary
                .latest_year
                .map_or_else(|| "-".to_string(), |y| y.to_string()),
        }
    }
}

/// A row of the protection-level table.
pub struct ProtectionRow {
    pub district: String,
    pub state: String,
    pub year: i32,
    pub total: u64,
    pub level: String,
}

impl From<&ProtectionLevel> for ProtectionRow {
    fn from(level: &ProtectionLevel) -> Self {
        Self {
            district: level.district.clone(),
            state: level.state.clone(),
            year: level.year,
            total: level.total,
            level: format!("{:.4}", level.level),
        }
    }
}

/// The dashboard page.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage<'a> {
    pub title: &'a str,
    pub contacts: &'a [EmergencyContact],
    pub form: Option<FilterForm>,
    pub warning: Option<String>,
    pub overview: Option<Overview>,
    pub protection_map: Option<RenderedChart>,
    pub protection_rows: Vec<ProtectionRow>,
    pub charts: Vec<RenderedChart>,
}

impl<'a> DashboardPage<'a> {
    fn empty() -> Self {
        Self {
            title: PAGE_TITLE,
            contacts: &EMERGENCY_CONTACTS,
            form: None,
            warning: None,
            overview: None,
            protection_map: None,
            protection_rows: Vec::new(),
            charts: Vec::new(),
        }
    }

    /// Builds the page for `query` against `data`.
    #[must_use]
    pub fn build(data: &DashboardData, query: &DashboardQuery, size: ChartSize) -> Self {
        let selection = query.selection(data.year_range());

        match data {
            DashboardData::Ready(records) => {
                let options = filter::selector_options(records, &selection.states);
                let summary = ipc_dashboard_analytics::summarize(records, &selection);
                let charts = render_dashboard(&summary, size);
                log::debug!(
                    "Rendered {} charts for {} selected records",
                    charts.len(),
                    summary.selected_records
                );

                Self {
                    form: Some(FilterForm::new(&options, &selection)),
                    overview: Some(Overview::from(&summary)),
                    protection_map: Some(render_protection_map(&summary, size)),
                    protection_rows: summary.protection_levels.iter().map(Into::into).collect(),
                    charts,
                    ..Self::empty()
                }
            }
            DashboardData::Unavailable { reason } => Self {
                warning: Some(reason.clone()),
                ..Self::empty()
            },
        }
    }
}

/// Renders the full dashboard page for `query`.
///
/// # Errors
///
/// Returns [`askama::Error`] if the template fails to render.
pub fn render_page(
    data: &DashboardData,
    query: &DashboardQuery,
    size: ChartSize,
) -> Result<String, askama::Error> {
    DashboardPage::build(data, query, size).render()
}

#[cfg(test)]
mod tests {
    use ipc_dashboard_crime_models::{Coordinates, CrimeRecord, OffenseCounts};

    use super::*;

    fn data() -> DashboardData {
        DashboardData::ready(vec![
            CrimeRecord::new(2011, "KERALA", "KOLLAM", 10, OffenseCounts::new([1; 6]))
                .with_coordinates(Coordinates::new(8.9, 76.6)),
            CrimeRecord::new(2012, "GOA", "NORTH GOA", 30, OffenseCounts::new([3; 6])),
        ])
    }

    fn render(data: &DashboardData, query: &DashboardQuery) -> String {
        render_page(data, query, ChartSize::default()).unwrap()
    }

    #[test]
    fn page_lists_contacts_and_every_chart() {
        let html = render(&data(), &DashboardQuery::default());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Ambulance: 108"));
        assert_eq!(html.matches("<section class=\"chart\"").count(), 11);
        assert!(html.contains("data-kind=\"sunburst\""));
    }

    #[test]
    fn form_keeps_current_selection() {
        let query = DashboardQuery::from_pairs([("state", "KERALA"), ("start_year", "2011")]);
        let html = render(&data(), &query);

        assert!(html.contains("<option value=\"KERALA\" selected>"));
        assert!(html.contains("<option value=\"GOA\">"));
        assert!(html.contains("<option value=\"KOLLAM\">"));
        assert!(!html.contains("<option value=\"NORTH GOA\">"));
        assert!(html.contains("name=\"start_year\" min=\"2011\" max=\"2012\" value=\"2011\""));
    }

    #[test]
    fn protection_map_precedes_table() {
        let query = DashboardQuery::from_pairs([("state", "KERALA"), ("district", "KOLLAM")]);
        let html = render(&data(), &query);

        let map = html
            .find("data-kind=\"protection_map\"")
            .expect("protection map section");
        let table = html.find("<h2>Protection Levels</h2>").expect("protection table");
        assert!(map < table);
        assert!(html.contains("KOLLAM (0.64)"));
        assert!(html.contains("<td>KOLLAM</td><td>KERALA</td><td>2011</td><td>10</td>"));
    }

    #[test]
    fn empty_selection_explains_protection_table() {
        let html = render(&data(), &DashboardQuery::default());
        assert!(html.contains("Select states and districts to see protection levels."));
    }

    #[test]
    fn names_are_escaped() {
        let data = DashboardData::ready(vec![CrimeRecord::new(
            2011,
            "A & <B>",
            "X",
            1,
            OffenseCounts::default(),
        )]);
        let html = render(&data, &DashboardQuery::default());

        assert!(html.contains("A &amp; &lt;B&gt;"));
        assert!(!html.contains("<B>"));
    }

    #[test]
    fn unavailable_data_shows_warning_without_charts() {
        let html = render(
            &DashboardData::unavailable("file <missing>"),
            &DashboardQuery::default(),
        );

        assert!(html.contains("No data available"));
        assert!(html.contains("file &lt;missing&gt;"));
        assert!(!html.contains("<svg"));
        assert!(html.contains("Police: 100"));
    }
}
