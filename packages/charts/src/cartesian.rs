//! Charts drawn on cartesian axes: bars, lines, areas and geo bubbles.
//!
//! Year axes are continuous `f64` ranges padded by half a year on each
//! side; tick labels are printed only at whole years.

use ipc_dashboard_analytics_models::{
    CumulativeTotal, MapPoint, OffenseTrendPoint, ProtectionLevel, YearlyTotal,
};
use ipc_dashboard_crime_models::Offense;
use plotters::prelude::*;

use crate::{ChartError, ChartSize, FONT, palette, placeholder, render_svg};

/// Half the width of a bar, in years.
const BAR_HALF_WIDTH: f64 = 0.35;

/// Approximate bounding box of India used as the minimum map extent.
pub const INDIA_BOUNDS: GeoBounds = GeoBounds {
    min_lon: 68.0,
    max_lon: 98.0,
    min_lat: 6.0,
    max_lat: 37.5,
};

/// A longitude/latitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
}

impl GeoBounds {
    /// Bounds widened to contain `(latitude, longitude)` with one degree
    /// of padding.
    #[must_use]
    pub fn including(self, latitude: f64, longitude: f64) -> Self {
        Self {
            min_lon: self.min_lon.min(longitude - 1.0),
            max_lon: self.max_lon.max(longitude + 1.0),
            min_lat: self.min_lat.min(latitude - 1.0),
            max_lat: self.max_lat.max(latitude + 1.0),
        }
    }

    /// Smallest bounds containing `self` and every point, padded by one
    /// degree where a point extends them.
    #[must_use]
    pub fn covering(self, points: &[MapPoint]) -> Self {
        points
            .iter()
            .fold(self, |b, p| b.including(p.latitude, p.longitude))
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn year_label(v: &f64) -> String {
    if (v - v.round()).abs() < 1e-6 {
        format!("{v:.0}")
    } else {
        String::new()
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn count_label(v: &f64) -> String {
    format!("{v:.0}")
}

/// Padded x range covering every year.
fn year_axis(years: impl Iterator<Item = i32>) -> (f64, f64) {
    let (min, max) = years.fold((i32::MAX, i32::MIN), |(lo, hi), y| (lo.min(y), hi.max(y)));
    (f64::from(min) - 0.5, f64::from(max) + 0.5)
}

/// Upper bound of a count axis with headroom for labels.
fn count_axis(values: impl Iterator<Item = f64>) -> f64 {
    (values.fold(0.0_f64, f64::max) * 1.15).max(1.0)
}

/// Bar chart of totals per year with value labels above each bar.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn yearly_bar(
    title: &str,
    totals: &[YearlyTotal],
    size: ChartSize,
) -> Result<String, ChartError> {
    if totals.is_empty() {
        return placeholder(title, size);
    }

    let (x0, x1) = year_axis(totals.iter().map(|t| t.year));
    let y_max = count_axis(totals.iter().map(|t| t.total as f64));
    let color = palette::series(0);

    render_svg(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x0..x1, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Year")
            .y_desc("Total IPC crimes")
            .x_label_formatter(&year_label)
            .y_label_formatter(&count_label)
            .draw()?;

        chart.draw_series(totals.iter().map(|t| {
            let x = f64::from(t.year);
            Rectangle::new(
                [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, t.total as f64)],
                color.filled(),
            )
        }))?;

        chart.draw_series(totals.iter().map(|t| {
            Text::new(
                t.total.to_string(),
                (
                    f64::from(t.year) - BAR_HALF_WIDTH,
                    y_max.mul_add(0.02, t.total as f64),
                ),
                (FONT, 11).into_font(),
            )
        }))?;

        Ok(())
    })
}

/// One line per offense across the years.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn offense_lines(
    title: &str,
    trends: &[OffenseTrendPoint],
    size: ChartSize,
) -> Result<String, ChartError> {
    if trends.is_empty() {
        return placeholder(title, size);
    }

    let (x0, x1) = year_axis(trends.iter().map(|p| p.year));
    let y_max = count_axis(
        trends
            .iter()
            .flat_map(|p| p.offenses.iter().map(|(_, c)| c as f64)),
    );

    render_svg(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Cases")
            .x_label_formatter(&year_label)
            .y_label_formatter(&count_label)
            .draw()?;

        for (i, offense) in Offense::all().iter().copied().enumerate() {
            let color = palette::series(i);
            chart
                .draw_series(LineSeries::new(
                    trends
                        .iter()
                        .map(|p| (f64::from(p.year), p.offenses.get(offense) as f64)),
                    color.stroke_width(2),
                ))?
                .label(offense.to_string())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.85).filled())
            .border_style(BLACK.stroke_width(1))
            .draw()?;

        Ok(())
    })
}

/// Filled area of cumulative totals.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn cumulative_area(
    title: &str,
    cumulative: &[CumulativeTotal],
    size: ChartSize,
) -> Result<String, ChartError> {
    if cumulative.is_empty() {
        return placeholder(title, size);
    }

    let (x0, x1) = year_axis(cumulative.iter().map(|c| c.year));
    let y_max = count_axis(cumulative.iter().map(|c| c.cumulative as f64));
    let color = palette::series(0);

    render_svg(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x0..x1, 0f64..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Cumulative Total Crimes")
            .x_label_formatter(&year_label)
            .y_label_formatter(&count_label)
            .draw()?;

        chart.draw_series(
            AreaSeries::new(
                cumulative
                    .iter()
                    .map(|c| (f64::from(c.year), c.cumulative as f64)),
                0.0,
                color.mix(0.3).filled(),
            )
            .border_style(color.stroke_width(2)),
        )?;

        Ok(())
    })
}

/// A located bubble and the value that sizes and colours it.
struct Bubble<'a> {
    latitude: f64,
    longitude: f64,
    value: f64,
    label: Option<&'a str>,
}

/// Bubble radius in pixels for `value` relative to `max`.
#[allow(clippy::cast_possible_truncation, clippy::suboptimal_flops)]
fn bubble_radius(value: f64, max: f64) -> i32 {
    if max <= 0.0 || value <= 0.0 {
        return 3;
    }
    let ratio = (value / max).clamp(0.0, 1.0).sqrt();
    3 + (ratio * 17.0).round() as i32
}

fn draw_bubbles(title: &str, bubbles: &[Bubble<'_>], size: ChartSize) -> Result<String, ChartError> {
    if bubbles.is_empty() {
        return placeholder(title, size);
    }

    let bounds = bubbles
        .iter()
        .fold(INDIA_BOUNDS, |b, p| b.including(p.latitude, p.longitude));
    let max = bubbles.iter().map(|b| b.value).fold(0.0_f64, f64::max);

    render_svg(size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 20).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(bounds.min_lon..bounds.max_lon, bounds.min_lat..bounds.max_lat)?;

        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .light_line_style(palette::GUIDE.mix(0.4).stroke_width(1))
            .draw()?;

        // Largest bubbles first so smaller ones stay visible on top.
        let mut ordered: Vec<&Bubble<'_>> = bubbles.iter().collect();
        ordered.sort_by(|a, b| b.value.total_cmp(&a.value));

        chart.draw_series(ordered.iter().map(|b| {
            let t = if max > 0.0 { b.value / max } else { 0.0 };
            Circle::new(
                (b.longitude, b.latitude),
                bubble_radius(b.value, max),
                palette::reds(t).mix(0.8).filled(),
            )
        }))?;

        chart.draw_series(ordered.iter().map(|b| {
            Circle::new(
                (b.longitude, b.latitude),
                bubble_radius(b.value, max),
                palette::reds(1.0).stroke_width(1),
            )
        }))?;

        chart.draw_series(ordered.iter().filter_map(|b| {
            b.label.map(|label| {
                Text::new(
                    label.to_string(),
                    (b.longitude + 0.4, b.latitude),
                    (FONT, 11).into_font(),
                )
            })
        }))?;

        Ok(())
    })
}

/// Bubbles at each point's longitude/latitude, sized and coloured by total.
///
/// The extent is India's bounding box, widened to fit any point outside
/// it.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn geo_bubbles(title: &str, points: &[MapPoint], size: ChartSize) -> Result<String, ChartError> {
    let bubbles: Vec<Bubble<'_>> = points
        .iter()
        .map(|p| Bubble {
            latitude: p.latitude,
            longitude: p.longitude,
            value: p.total as f64,
            label: None,
        })
        .collect();
    draw_bubbles(title, &bubbles, size)
}

/// Bubbles for located protection rows, sized and coloured by level and
/// labelled with the district and its level.
///
/// Rows without coordinates are skipped.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
pub fn protection_bubbles(
    title: &str,
    levels: &[ProtectionLevel],
    size: ChartSize,
) -> Result<String, ChartError> {
    let labels: Vec<(String, &ProtectionLevel)> = levels
        .iter()
        .filter(|l| l.coordinates.is_some())
        .map(|l| (format!("{} ({:.2})", l.district, l.level), l))
        .collect();

    let bubbles: Vec<Bubble<'_>> = labels
        .iter()
        .filter_map(|(label, l)| {
            l.coordinates.map(|c| Bubble {
                latitude: c.latitude,
                longitude: c.longitude,
                value: l.level,
                label: Some(label.as_str()),
            })
        })
        .collect();
    draw_bubbles(title, &bubbles, size)
}

#[cfg(test)]
mod tests {
    use ipc_dashboard_crime_models::{Coordinates, OffenseCounts};

    use super::*;

    fn point(lat: f64, lon: f64, total: u64) -> MapPoint {
        MapPoint {
            state: "KERALA".to_string(),
            district: "KOLLAM".to_string(),
            year: 2012,
            latitude: lat,
            longitude: lon,
            total,
        }
    }

    #[test]
    fn year_labels_only_at_whole_years() {
        assert_eq!(year_label(&2012.0), "2012");
        assert_eq!(year_label(&2012.5), "");
    }

    #[test]
    fn year_axis_pads_half_a_year() {
        assert_eq!(year_axis([2010, 2015, 2012].into_iter()), (2009.5, 2015.5));
    }

    #[test]
    fn count_axis_has_minimum_height() {
        assert!((count_axis(std::iter::empty()) - 1.0).abs() < f64::EPSILON);
        assert!(count_axis([100.0].into_iter()) > 100.0);
    }

    #[test]
    fn bounds_expand_for_outlying_points() {
        let bounds = INDIA_BOUNDS.covering(&[point(51.5, -0.1, 10)]);
        assert!(bounds.max_lat > 51.5);
        assert!(bounds.min_lon < -0.1);
        assert!((bounds.max_lon - INDIA_BOUNDS.max_lon).abs() < f64::EPSILON);
    }

    #[test]
    fn bubble_radius_scales_with_total() {
        assert_eq!(bubble_radius(0.0, 0.0), 3);
        assert_eq!(bubble_radius(100.0, 100.0), 20);
        assert!(bubble_radius(25.0, 100.0) < bubble_radius(100.0, 100.0));
    }

    #[test]
    fn renders_bar_chart_svg() {
        let totals = [
            YearlyTotal {
                year: 2011,
                total: 10,
            },
            YearlyTotal {
                year: 2012,
                total: 60,
            },
        ];
        let svg = yearly_bar("Totals", &totals, ChartSize::default()).unwrap();
        assert!(svg.contains("<rect"));
        assert!(svg.contains("Totals"));
        assert!(!svg.contains("No data"));
    }

    #[test]
    fn renders_line_chart_with_legend() {
        let trends = [
            OffenseTrendPoint {
                year: 2011,
                total_ipc_crimes: 21,
                offenses: OffenseCounts::new([1, 2, 3, 4, 5, 6]),
            },
            OffenseTrendPoint {
                year: 2012,
                total_ipc_crimes: 42,
                offenses: OffenseCounts::new([2, 4, 6, 8, 10, 12]),
            },
        ];
        let svg = offense_lines("Trends", &trends, ChartSize::default()).unwrap();
        assert!(svg.contains("MURDER"));
        assert!(svg.contains("<polyline"));
    }

    #[test]
    fn renders_area_chart() {
        let cumulative = [
            CumulativeTotal {
                year: 2011,
                cumulative: 10,
            },
            CumulativeTotal {
                year: 2012,
                cumulative: 70,
            },
        ];
        let svg = cumulative_area("Cumulative", &cumulative, ChartSize::default()).unwrap();
        assert!(svg.contains("<polygon"));
    }

    #[test]
    fn renders_bubbles() {
        let svg = geo_bubbles(
            "Map",
            &[point(10.0, 76.0, 10), point(19.0, 73.0, 40)],
            ChartSize::default(),
        )
        .unwrap();
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn empty_inputs_render_placeholders() {
        let size = ChartSize::default();
        assert!(yearly_bar("t", &[], size).unwrap().contains("No data"));
        assert!(offense_lines("t", &[], size).unwrap().contains("No data"));
        assert!(cumulative_area("t", &[], size).unwrap().contains("No data"));
        assert!(geo_bubbles("t", &[], size).unwrap().contains("No data"));
        assert!(protection_bubbles("t", &[], size).unwrap().contains("No data"));
    }

    fn level(district: &str, level: f64, coordinates: Option<Coordinates>) -> ProtectionLevel {
        ProtectionLevel {
            district: district.to_string(),
            state: "KERALA".to_string(),
            year: 2012,
            total: 10,
            level,
            coordinates,
        }
    }

    #[test]
    fn protection_bubbles_label_located_districts() {
        let levels = [
            level("KOLLAM", 0.64, Some(Coordinates::new(10.0, 76.0))),
            level("IDUKKI", 0.30, None),
        ];
        let svg = protection_bubbles("Protection", &levels, ChartSize::default()).unwrap();

        assert!(svg.contains("<circle"));
        assert!(svg.contains("KOLLAM (0.64)"));
        assert!(!svg.contains("IDUKKI"));
    }

    #[test]
    fn unlocated_protection_rows_render_placeholder() {
        let svg = protection_bubbles("Protection", &[level("IDUKKI", 0.3, None)], ChartSize::default())
            .unwrap();
        assert!(svg.contains("No data"));
    }
}
