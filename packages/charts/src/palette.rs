//! Colours used across the dashboard charts.

use plotters::style::RGBColor;

/// Categorical series colours.
pub const SERIES: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Light grey for grids and guides.
pub const GUIDE: RGBColor = RGBColor(210, 210, 210);

const REDS_LOW: (f64, f64, f64) = (254.0, 229.0, 217.0);
const REDS_HIGH: (f64, f64, f64) = (165.0, 15.0, 21.0);

/// Returns the `i`-th series colour, cycling.
#[must_use]
pub const fn series(i: usize) -> RGBColor {
    SERIES[i % SERIES.len()]
}

/// Sequential red scale; `t` is clamped to `0.0..=1.0`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn reds(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let lerp = |a: f64, b: f64| (b - a).mul_add(t, a).round() as u8;
    RGBColor(
        lerp(REDS_LOW.0, REDS_HIGH.0),
        lerp(REDS_LOW.1, REDS_HIGH.1),
        lerp(REDS_LOW.2, REDS_HIGH.2),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_cycles() {
        assert_eq!(series(0), series(SERIES.len()));
    }

    #[test]
    fn reds_endpoints_and_clamping() {
        assert_eq!(reds(0.0), RGBColor(254, 229, 217));
        assert_eq!(reds(1.0), RGBColor(165, 15, 21));
        assert_eq!(reds(-3.0), reds(0.0));
        assert_eq!(reds(7.0), reds(1.0));
        assert_eq!(reds(f64::NAN), reds(0.0));
    }
}
