//! Charts laid out around a centre point: pie, donut, radar and sunburst.
//!
//! These are drawn directly in pixel space on the title-reduced drawing
//! area. Angles start at twelve o'clock and run clockwise.

use std::f64::consts::{FRAC_PI_2, TAU};

use ipc_dashboard_analytics_models::{HierarchyNode, OffenseShare};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::{Area, ChartError, ChartSize, FONT, centered, palette, placeholder, render_svg};

/// Hole radius of the donut chart as a fraction of the outer radius.
pub const DONUT_HOLE: f64 = 0.4;

/// Arc segments per full turn.
const ARC_STEPS: f64 = 180.0;

/// Slices below this percentage are left unlabelled.
const MIN_LABELLED_PERCENT: f64 = 3.0;

/// Concentric guide rings on the radar chart.
const RADAR_RINGS: u32 = 4;

/// Geometry shared by the polar charts.
#[derive(Debug, Clone, Copy)]
struct Dial {
    cx: f64,
    cy: f64,
    radius: f64,
}

impl Dial {
    /// Fits a dial into the left part of `area`, keeping `legend_width`
    /// pixels free on the right.
    #[allow(clippy::cast_precision_loss)]
    fn fit(area: &Area<'_>, legend_width: u32, margin: f64) -> Self {
        let (w, h) = area.dim_in_pixel();
        let usable_w = f64::from(w.saturating_sub(legend_width));
        let usable_h = f64::from(h);
        Self {
            cx: usable_w / 2.0,
            cy: usable_h / 2.0,
            radius: (usable_w.min(usable_h) / 2.0 - margin).max(1.0),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn at(&self, radius: f64, angle: f64) -> (i32, i32) {
        (
            radius.mul_add(angle.cos(), self.cx).round() as i32,
            radius.mul_add(angle.sin(), self.cy).round() as i32,
        )
    }
}

/// Screen angle of a fraction of a full turn, starting at twelve o'clock.
fn turn(fraction: f64) -> f64 {
    fraction.mul_add(TAU, -FRAC_PI_2)
}

/// Outline of a ring segment between `inner` and `outer` radii.
///
/// An `inner` radius of zero yields a pie wedge closed at the centre.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn annular_sector(dial: &Dial, inner: f64, outer: f64, start: f64, end: f64) -> Vec<(i32, i32)> {
    let steps = (((end - start).abs() / TAU) * ARC_STEPS).ceil().max(1.0) as usize;
    let angle = |i: usize| (end - start).mul_add(i as f64 / steps as f64, start);

    let mut points: Vec<(i32, i32)> = (0..=steps).map(|i| dial.at(outer, angle(i))).collect();
    if inner <= 0.0 {
        points.push(dial.at(0.0, 0.0));
    } else {
        points.extend((0..=steps).rev().map(|i| dial.at(inner, angle(i))));
    }
    points
}

fn left_aligned(font_size: u32) -> TextStyle<'static> {
    TextStyle::from((FONT, font_size).into_font()).pos(Pos::new(HPos::Left, VPos::Center))
}

/// Pie of offense shares with percentage labels and a legend.
///
/// `hole` is the inner radius as a fraction of the outer radius; `0.0`
/// draws a plain pie.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn offense_pie(
    title: &str,
    shares: &[OffenseShare],
    hole: f64,
    size: ChartSize,
) -> Result<String, ChartError> {
    let total: u64 = shares.iter().map(|s| s.count).sum();
    if total == 0 {
        return placeholder(title, size);
    }

    render_svg(size, |root| {
        let area = root.titled(title, (FONT, 20).into_font())?;
        let dial = Dial::fit(&area, 260, 20.0);
        let inner = dial.radius * hole.clamp(0.0, 0.95);

        let mut cursor = 0.0;
        for (i, share) in shares.iter().enumerate() {
            let fraction = share.count as f64 / total as f64;
            if fraction <= 0.0 {
                continue;
            }
            let (start, end) = (turn(cursor), turn(cursor + fraction));
            let color = palette::series(i);

            area.draw(&Polygon::new(
                annular_sector(&dial, inner, dial.radius, start, end),
                color.filled(),
            ))?;
            area.draw(&PathElement::new(
                annular_sector(&dial, inner, dial.radius, start, end),
                WHITE.stroke_width(1),
            ))?;

            if share.percentage >= MIN_LABELLED_PERCENT {
                let mid = f64::midpoint(start, end);
                let label_radius = f64::midpoint(inner, dial.radius);
                area.draw(&Text::new(
                    format!("{:.1}%", share.percentage),
                    dial.at(label_radius, mid),
                    centered(12).color(&WHITE),
                ))?;
            }

            cursor += fraction;
        }

        let (w, _) = area.dim_in_pixel();
        let legend_x = i32::try_from(w.saturating_sub(250)).unwrap_or(0);
        for (i, share) in shares.iter().enumerate() {
            let y = 30 + 24 * i32::try_from(i).unwrap_or(0);
            area.draw(&Rectangle::new(
                [(legend_x, y - 7), (legend_x + 14, y + 7)],
                palette::series(i).filled(),
            ))?;
            area.draw(&Text::new(
                share.offense.to_string(),
                (legend_x + 22, y),
                left_aligned(12),
            ))?;
        }

        Ok(())
    })
}

/// Radar of offense counts, scaled to the largest count.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn offense_radar(
    title: &str,
    shares: &[OffenseShare],
    size: ChartSize,
) -> Result<String, ChartError> {
    let max = shares.iter().map(|s| s.count).max().unwrap_or(0);
    if max == 0 {
        return placeholder(title, size);
    }

    render_svg(size, |root| {
        let area = root.titled(title, (FONT, 20).into_font())?;
        let dial = Dial::fit(&area, 0, 70.0);
        let axes = shares.len() as f64;
        let axis_angle = |i: usize| turn(i as f64 / axes);

        for ring in 1..=RADAR_RINGS {
            let r = dial.radius * f64::from(ring) / f64::from(RADAR_RINGS);
            let mut outline: Vec<(i32, i32)> =
                (0..shares.len()).map(|i| dial.at(r, axis_angle(i))).collect();
            outline.push(dial.at(r, axis_angle(0)));
            area.draw(&PathElement::new(outline, palette::GUIDE.stroke_width(1)))?;
        }

        for (i, share) in shares.iter().enumerate() {
            let angle = axis_angle(i);
            area.draw(&PathElement::new(
                vec![dial.at(0.0, angle), dial.at(dial.radius, angle)],
                palette::GUIDE.stroke_width(1),
            ))?;
            area.draw(&Text::new(
                share.offense.to_string(),
                dial.at(dial.radius + 30.0, angle),
                centered(11),
            ))?;
        }

        let color = palette::series(0);
        let mut values: Vec<(i32, i32)> = shares
            .iter()
            .enumerate()
            .map(|(i, s)| dial.at(dial.radius * s.count as f64 / max as f64, axis_angle(i)))
            .collect();
        area.draw(&Polygon::new(values.clone(), color.mix(0.25).filled()))?;
        if let Some(first) = values.first().copied() {
            values.push(first);
        }
        area.draw(&PathElement::new(values, color.stroke_width(2)))?;

        Ok(())
    })
}

/// Two rings: states on the inside, their districts outside.
///
/// # Errors
///
/// Returns [`ChartError`] if the backend fails.
#[allow(clippy::cast_precision_loss)]
pub fn sunburst(title: &str, root_node: &HierarchyNode, size: ChartSize) -> Result<String, ChartError> {
    if root_node.value == 0 || root_node.children.is_empty() {
        return placeholder(title, size);
    }

    let total = root_node.value as f64;

    render_svg(size, |root| {
        let area = root.titled(title, (FONT, 20).into_font())?;
        let dial = Dial::fit(&area, 0, 20.0);
        let hub = dial.radius * 0.2;
        let middle = dial.radius * 0.6;

        area.draw(&Polygon::new(
            annular_sector(&dial, 0.0, hub, turn(0.0), turn(1.0)),
            palette::GUIDE.filled(),
        ))?;
        area.draw(&Text::new(
            root_node.name.clone(),
            dial.at(0.0, 0.0),
            centered(12),
        ))?;

        let mut cursor = 0.0;
        for (i, state) in root_node.children.iter().enumerate() {
            let fraction = state.value as f64 / total;
            if fraction <= 0.0 {
                continue;
            }
            let color = palette::series(i);
            let (start, end) = (turn(cursor), turn(cursor + fraction));

            area.draw(&Polygon::new(
                annular_sector(&dial, hub, middle, start, end),
                color.filled(),
            ))?;
            area.draw(&PathElement::new(
                annular_sector(&dial, hub, middle, start, end),
                WHITE.stroke_width(1),
            ))?;
            if fraction * 100.0 >= MIN_LABELLED_PERCENT {
                area.draw(&Text::new(
                    state.name.clone(),
                    dial.at(f64::midpoint(hub, middle), f64::midpoint(start, end)),
                    centered(11),
                ))?;
            }

            let mut inner_cursor = cursor;
            for district in &state.children {
                let share = district.value as f64 / total;
                if share <= 0.0 {
                    continue;
                }
                let (d_start, d_end) = (turn(inner_cursor), turn(inner_cursor + share));
                area.draw(&Polygon::new(
                    annular_sector(&dial, middle, dial.radius, d_start, d_end),
                    color.mix(0.6).filled(),
                ))?;
                area.draw(&PathElement::new(
                    annular_sector(&dial, middle, dial.radius, d_start, d_end),
                    WHITE.stroke_width(1),
                ))?;
                if share * 100.0 >= MIN_LABELLED_PERCENT {
                    area.draw(&Text::new(
                        district.name.clone(),
                        dial.at(
                            f64::midpoint(middle, dial.radius),
                            f64::midpoint(d_start, d_end),
                        ),
                        centered(10),
                    ))?;
                }
                inner_cursor += share;
            }

            cursor += fraction;
        }

        Ok(())
    })
}
