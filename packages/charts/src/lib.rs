#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! SVG chart rendering for the IPC crime dashboard.
//!
//! Every chart is drawn with the `plotters` SVG backend into an in-memory
//! string so it can be inlined into the dashboard page. Empty series
//! render a "No data" placeholder instead of failing, and a chart that
//! fails to draw is replaced by the same placeholder so one bad chart
//! never takes the page down.

pub mod cartesian;
pub mod palette;
pub mod polar;

use std::collections::BTreeSet;

use ipc_dashboard_analytics_models::{DashboardSummary, YearlyTotal};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

/// Font family used for every label.
pub(crate) const FONT: &str = "sans-serif";

/// Drawing area type every chart renders into.
pub(crate) type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Errors from chart rendering.
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// The plotting backend reported an error.
    #[error("Drawing error: {message}")]
    Draw {
        /// Backend error description.
        message: String,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw {
            message: e.to_string(),
        }
    }
}

/// Pixel dimensions of a rendered chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 900,
            height: 480,
        }
    }
}

/// The chart types in the dashboard battery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChartKind {
    /// Vertical bar chart.
    Bar,
    /// Geographic bubble map.
    Map,
    /// Multi-series line chart.
    Line,
    /// Pie chart.
    Pie,
    /// Filled area chart.
    Area,
    /// Radar (polar line) chart.
    Radar,
    /// Latitude/longitude scatter plot.
    Scatter,
    /// Pie chart with a hole.
    Donut,
    /// Two-level hierarchical ring chart.
    Sunburst,
    /// Geographic bubbles sized by protection level.
    ProtectionMap,
}

/// A chart rendered to SVG markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedChart {
    /// Chart type.
    pub kind: ChartKind,
    /// Heading shown above the chart on the page.
    pub heading: String,
    /// Chart title drawn inside the SVG.
    pub title: String,
    /// Standalone SVG document.
    pub svg: String,
}

/// Renders into a fresh SVG string of `size` with a white background.
pub(crate) fn render_svg<F>(size: ChartSize, draw: F) -> Result<String, ChartError>
where
    F: FnOnce(&Area<'_>) -> Result<(), ChartError>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Text style anchored at its centre.
pub(crate) fn centered(font_size: u32) -> TextStyle<'static> {
    TextStyle::from((FONT, font_size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

/// Renders the "No data" placeholder.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
pub fn placeholder(title: &str, size: ChartSize) -> Result<String, ChartError> {
    render_svg(size, |root| {
        let area = root.titled(title, (FONT, 20).into_font())?;
        let (w, h) = area.dim_in_pixel();
        let center = (i32::try_from(w / 2).unwrap_or(0), i32::try_from(h / 2).unwrap_or(0));
        area.draw(&Text::new("No data", center, centered(18).color(&palette::GUIDE)))?;
        Ok(())
    })
}

/// Joins selected names for chart titles.
fn join_names(names: &BTreeSet<String>) -> String {
    names.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

fn finish(
    kind: ChartKind,
    heading: &str,
    title: String,
    size: ChartSize,
    result: Result<String, ChartError>,
) -> RenderedChart {
    let svg = result.unwrap_or_else(|e| {
        log::error!("Failed to render {kind} chart '{title}': {e}");
        placeholder(&title, size).unwrap_or_else(|e| {
            log::error!("Failed to render placeholder for '{title}': {e}");
            String::new()
        })
    });

    RenderedChart {
        kind,
        heading: heading.to_string(),
        title,
        svg,
    }
}

/// Renders the protection-level map for the selection.
#[must_use]
pub fn render_protection_map(summary: &DashboardSummary, size: ChartSize) -> RenderedChart {
    let title = "Crime Distribution with Protection Level".to_string();
    let svg = cartesian::protection_bubbles(&title, &summary.protection_levels, size);
    finish(
        ChartKind::ProtectionMap,
        "Scatter Plot with Protection Level",
        title,
        size,
        svg,
    )
}

/// Renders the full chart battery for a dashboard summary, in page order.
#[must_use]
pub fn render_dashboard(summary: &DashboardSummary, size: ChartSize) -> Vec<RenderedChart> {
    let selection = &summary.selection;
    let states = join_names(&selection.states);
    let districts = join_names(&selection.districts);
    let years = selection.years;

    let mut charts = Vec::with_capacity(10);

    let title = format!("Total IPC Crimes in {states} - {districts} ({years})");
    let svg = cartesian::yearly_bar(&title, &summary.yearly_totals, size);
    charts.push(finish(
        ChartKind::Bar,
        "Bar Chart - Total IPC Crimes for Selection",
        title,
        size,
        svg,
    ));

    let title = format!("Crime Map - {states} ({years})");
    let svg = cartesian::geo_bubbles(&title, &summary.map_points, size);
    charts.push(finish(
        ChartKind::Map,
        "Map - Crime Locations for Selection",
        title,
        size,
        svg,
    ));

    let title = "Crime Trends Over the Years".to_string();
    let svg = cartesian::offense_lines(&title, &summary.offense_trends, size);
    charts.push(finish(
        ChartKind::Line,
        "Line Chart - Crime Trends Over the Years",
        title,
        size,
        svg,
    ));

    let totals_each_year: Vec<YearlyTotal> = summary
        .offense_trends
        .iter()
        .map(|p| YearlyTotal {
            year: p.year,
            total: p.total_ipc_crimes,
        })
        .collect();
    let title = "Total Crimes Each Year".to_string();
    let svg = cartesian::yearly_bar(&title, &totals_each_year, size);
    charts.push(finish(
        ChartKind::Bar,
        "Bar Chart - Total Crimes Each Year",
        title,
        size,
        svg,
    ));

    let title = "Distribution of Crimes (Latest Year)".to_string();
    let svg = polar::offense_pie(&title, &summary.latest_distribution, 0.0, size);
    charts.push(finish(
        ChartKind::Pie,
        "Pie Chart - Distribution of Crimes (Latest Year)",
        title,
        size,
        svg,
    ));

    let title = "Cumulative Total Crimes Over the Years".to_string();
    let svg = cartesian::cumulative_area(&title, &summary.cumulative_totals, size);
    charts.push(finish(
        ChartKind::Area,
        "Area Chart - Cumulative Total Crimes Over the Years",
        title,
        size,
        svg,
    ));

    let title = "Distribution of Crimes by Type".to_string();
    let svg = polar::offense_radar(&title, &summary.latest_distribution, size);
    charts.push(finish(
        ChartKind::Radar,
        "Radar Chart - Distribution of Crimes by Type",
        title,
        size,
        svg,
    ));

    let title = "Crime Distribution Based on Latitude and Longitude".to_string();
    let svg = cartesian::geo_bubbles(&title, &summary.scatter_points, size);
    charts.push(finish(
        ChartKind::Scatter,
        "Scatter Plot - Crime Distribution Based on Latitude and Longitude",
        title,
        size,
        svg,
    ));

    let title = "Percentage of Each Crime Type".to_string();
    let svg = polar::offense_pie(&title, &summary.latest_distribution, polar::DONUT_HOLE, size);
    charts.push(finish(
        ChartKind::Donut,
        "Donut Chart - Percentage of Each Crime Type",
        title,
        size,
        svg,
    ));

    let title = "Hierarchical Representation of Crime Data".to_string();
    let svg = polar::sunburst(&title, &summary.hierarchy, size);
    charts.push(finish(
        ChartKind::Sunburst,
        "Sunburst Chart - Hierarchical Representation of Crime Data",
        title,
        size,
        svg,
    ));

    charts
}

#[cfg(test)]
mod tests {
    use ipc_dashboard_analytics_models::{HierarchyNode, ProtectionLevel, Selection, YearRange};
    use ipc_dashboard_crime_models::Coordinates;

    use super::*;

    fn empty_summary() -> DashboardSummary {
        DashboardSummary {
            selection: Selection::new(YearRange::new(2010, 2015)),
            selected_records: 0,
            year_range_records: 0,
            yearly_totals: Vec::new(),
            map_points: Vec::new(),
            offense_trends: Vec::new(),
            cumulative_totals: Vec::new(),
            latest_year: None,
            latest_distribution: Vec::new(),
            hierarchy: HierarchyNode {
                name: "All".to_string(),
                value: 0,
                children: Vec::new(),
            },
            scatter_points: Vec::new(),
            protection_levels: Vec::new(),
        }
    }

    #[test]
    fn placeholder_says_no_data() {
        let svg = placeholder("Empty", ChartSize::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No data"));
        assert!(svg.contains("Empty"));
    }

    #[test]
    fn empty_summary_renders_full_battery_of_placeholders() {
        let charts = render_dashboard(&empty_summary(), ChartSize::default());

        let kinds: Vec<ChartKind> = charts.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChartKind::Bar,
                ChartKind::Map,
                ChartKind::Line,
                ChartKind::Bar,
                ChartKind::Pie,
                ChartKind::Area,
                ChartKind::Radar,
                ChartKind::Scatter,
                ChartKind::Donut,
                ChartKind::Sunburst,
            ]
        );
        assert!(charts.iter().all(|c| c.svg.contains("No data")));
    }

    #[test]
    fn titles_list_selected_names() {
        let mut summary = empty_summary();
        summary.selection = summary
            .selection
            .with_states(["KERALA", "GOA"])
            .with_districts(["KOLLAM"]);

        let charts = render_dashboard(&summary, ChartSize::default());
        assert_eq!(
            charts[0].title,
            "Total IPC Crimes in GOA, KERALA - KOLLAM (2010-2015)"
        );
        assert_eq!(charts[1].title, "Crime Map - GOA, KERALA (2010-2015)");
    }

    #[test]
    fn protection_map_uses_selection_levels() {
        let mut summary = empty_summary();
        assert!(render_protection_map(&summary, ChartSize::default())
            .svg
            .contains("No data"));

        summary.protection_levels.push(ProtectionLevel {
            district: "KOLLAM".to_string(),
            state: "KERALA".to_string(),
            year: 2012,
            total: 10,
            level: 0.64,
            coordinates: Some(Coordinates::new(10.0, 76.0)),
        });
        let chart = render_protection_map(&summary, ChartSize::default());
        assert_eq!(chart.kind, ChartKind::ProtectionMap);
        assert!(chart.svg.contains("KOLLAM (0.64)"));
    }

    #[test]
    fn chart_kind_names_are_snake_case() {
        assert_eq!(ChartKind::ProtectionMap.to_string(), "protection_map");
        assert_eq!(ChartKind::Sunburst.to_string(), "sunburst");
        assert_eq!(ChartKind::Bar.as_ref(), "bar");
    }
}
