//! # Tide Chart Rendering
//!
//! Draws one [`TideReport`] as a full-day raster chart and encodes it as PNG.
//!
//! ## Chart Space
//!
//! Layout math happens in chart space: origin at the bottom-left corner of the
//! canvas, y growing upward, units in pixels. Heights map upward from the
//! bottom margin and minutes-of-day map rightward from the left margin:
//! ```text
//! x = MARGIN_LEFT   + minutes / 1440            × plot_width
//! y = MARGIN_BOTTOM + (height − y_min) / range  × plot_height
//! ```
//! Only the final step flips to raster rows (`row = canvas_height − y`).
//!
//! ## Layers
//!
//! Drawn back to front: background, height grid with labels, 3-hour time grid
//! with labels, axes, translucent area under the curve, the curve, hi/lo
//! markers, title, rotated height caption and, when enabled, the live "now"
//! indicator.
//!
//! Margins are fixed. A canvas smaller than the margins yields an empty or
//! inverted plot area, which is drawn as-is.

use crate::canvas::{encode_png, Canvas, Rotated};
use crate::theme::{Rgba, Theme};
use crate::{ExtremumKind, ExtremumPoint, TideError, TideReport, TideSample};
use chrono::{Local, NaiveTime, Timelike};
use embedded_graphics::{
    mono_font::{
        ascii::{
            FONT_10X20, FONT_6X10, FONT_6X13_BOLD, FONT_6X9, FONT_7X13, FONT_7X13_BOLD,
            FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    prelude::*,
    primitives::{Circle, Line, Polyline, PrimitiveStyle, PrimitiveStyleBuilder, StrokeAlignment},
    text::{Alignment, Baseline, Text, TextStyleBuilder},
};
use image::RgbaImage;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 600;

pub const MARGIN_TOP: f64 = 55.0;
pub const MARGIN_BOTTOM: f64 = 60.0;
pub const MARGIN_LEFT: f64 = 65.0;
pub const MARGIN_RIGHT: f64 = 30.0;

const MINUTES_PER_DAY: f64 = 1440.0;
/// Fraction of the observed range added above and below the curve
const RANGE_PADDING: f64 = 0.15;

const HOUR_LABELS: [&str; 8] = ["12am", "3am", "6am", "9am", "12pm", "3pm", "6pm", "9pm"];
const Y_AXIS_CAPTION: &str = "Height (ft, MLLW)";
const CLOCK_FORMAT: &str = "%-I:%M %p";

const MARKER_RADIUS: u32 = 5;
const CURRENT_DOT_RADIUS: u32 = 8;
const CURRENT_GLOW_RADIUS: u32 = 16;

/// Where chart output failed.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} drawing surface")]
    Surface { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encode(#[source] image::ImageError),

    #[error("cannot create chart file {}: {source}", .path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write chart file {}: {source}", .path.display())]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Canvas size, palette and live-indicator switch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub theme: Theme,
    /// Overlay a marker at the sample nearest to the current time of day
    pub show_current_time: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme: Theme::LIGHT,
            show_current_time: false,
        }
    }
}

/// Compute the padded, whole-foot height axis range for a sample set.
///
/// Returns `None` for an empty slice. When every sample lands on the same
/// whole foot the range would be empty, so it is widened on each side and the
/// curve sits on the middle row of the plot. The widening is one foot, or a
/// few ulps for heights so large that one foot is below float resolution.
pub fn height_axis_range(samples: &[TideSample]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }

    let (min_height, max_height) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), sample| {
            (min.min(sample.height), max.max(sample.height))
        });
    let padding = (max_height - min_height) * RANGE_PADDING;
    let y_min = (min_height - padding).floor();
    let y_max = (max_height + padding).ceil();

    if y_max - y_min > 0.0 {
        return Some((y_min, y_max));
    }

    let widening = 1.0_f64.max(y_min.abs().max(y_max.abs()) * f64::EPSILON * 4.0);
    let (y_min, y_max) = (y_min - widening, y_max + widening);
    debug_assert!(y_max > y_min);
    Some((y_min, y_max))
}

/// Heights that get a horizontal grid line: every whole foot in range, thinned
/// to whole-foot multiples so there is at most one line per plot pixel row.
pub fn height_ticks(geometry: &ChartGeometry) -> impl Iterator<Item = f64> {
    let first = geometry.y_min.ceil();
    let last = geometry.y_max.floor();
    let whole_feet = last - first;

    let (stride, count) = if whole_feet >= 0.0 && whole_feet.is_finite() {
        let max_lines = geometry.plot_height.max(1.0).floor();
        let stride = (whole_feet / max_lines).ceil().max(1.0);
        (stride, (whole_feet / stride).floor() as u64 + 1)
    } else {
        (1.0, 0)
    };

    (0..count).map(move |index| first + index as f64 * stride)
}

/// Layout of one chart: canvas size, plot area and height axis range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub plot_width: f64,
    pub plot_height: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl ChartGeometry {
    /// # Errors
    /// [`TideError::NoData`] for an empty sample slice.
    pub fn new(width: u32, height: u32, samples: &[TideSample]) -> Result<Self, TideError> {
        let (y_min, y_max) = height_axis_range(samples).ok_or(TideError::NoData)?;
        let (width, height) = (width as f64, height as f64);

        Ok(Self {
            width,
            height,
            plot_width: width - MARGIN_LEFT - MARGIN_RIGHT,
            plot_height: height - MARGIN_TOP - MARGIN_BOTTOM,
            y_min,
            y_max,
        })
    }

    /// Chart-space x for a minute of the day (0 = midnight, 1440 = next midnight).
    pub fn map_x(&self, minutes: f64) -> f64 {
        MARGIN_LEFT + (minutes / MINUTES_PER_DAY) * self.plot_width
    }

    /// Chart-space y (upward) for a height in feet.
    pub fn map_y(&self, height: f64) -> f64 {
        MARGIN_BOTTOM + ((height - self.y_min) / (self.y_max - self.y_min)) * self.plot_height
    }

    /// Chart space to fractional raster coordinates.
    pub fn raster(&self, x: f64, y: f64) -> (f64, f64) {
        (x, self.height - y)
    }

    /// Chart space to the nearest raster pixel.
    pub fn to_point(&self, x: f64, y: f64) -> Point {
        let (x, y) = self.raster(x, y);
        Point::new(x.round() as i32, y.round() as i32)
    }

    fn sample_point(&self, sample: &TideSample) -> (f64, f64) {
        (self.map_x(sample.minutes_of_day()), self.map_y(sample.height))
    }
}

/// Font request for a label: nominal point size and weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelFont {
    pub size: u8,
    pub bold: bool,
}

impl LabelFont {
    pub const fn regular(size: u8) -> Self {
        Self { size, bold: false }
    }

    pub const fn bold(size: u8) -> Self {
        Self { size, bold: true }
    }

    /// Closest ASCII mono font for the requested size.
    fn mono_font(self) -> &'static MonoFont<'static> {
        match (self.size, self.bold) {
            (0..=9, false) => &FONT_6X9,
            (10, false) => &FONT_6X10,
            (11..=13, false) => &FONT_7X13,
            (_, false) => &FONT_10X20,
            (0..=10, true) => &FONT_6X13_BOLD,
            (11..=13, true) => &FONT_7X13_BOLD,
            (_, true) => &FONT_9X18_BOLD,
        }
    }
}

/// Draw a one-line label whose baseline is anchored at a chart-space point.
fn draw_label(
    canvas: &mut Canvas,
    geometry: &ChartGeometry,
    text: &str,
    anchor: (f64, f64),
    font: LabelFont,
    color: Rgba,
    alignment: Alignment,
) {
    let character_style = MonoTextStyle::new(font.mono_font(), color.to_pixel());
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(Baseline::Alphabetic)
        .build();

    Text::with_text_style(
        text,
        geometry.to_point(anchor.0, anchor.1),
        character_style,
        text_style,
    )
    .draw(canvas)
    .ok();
}

/// Draw a label rotated 90° counter-clockwise, centered on a chart-space point.
fn draw_rotated_label(
    canvas: &mut Canvas,
    geometry: &ChartGeometry,
    text: &str,
    center: (f64, f64),
    font: LabelFont,
    color: Rgba,
) {
    let character_style = MonoTextStyle::new(font.mono_font(), color.to_pixel());
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();

    let mut rotated = Rotated::new(canvas, geometry.to_point(center.0, center.1));
    Text::with_text_style(text, Point::zero(), character_style, text_style)
        .draw(&mut rotated)
        .ok();
}

/// Horizontal grid line and label at every whole foot.
fn draw_height_grid(canvas: &mut Canvas, geometry: &ChartGeometry, theme: &Theme) {
    let style = PrimitiveStyle::with_stroke(theme.grid.to_pixel(), 1);
    let right = MARGIN_LEFT + geometry.plot_width;

    for tick in height_ticks(geometry) {
        let y = geometry.map_y(tick);
        Line::new(geometry.to_point(MARGIN_LEFT, y), geometry.to_point(right, y))
            .into_styled(style)
            .draw(canvas)
            .ok();

        draw_label(
            canvas,
            geometry,
            &format!("{tick:.0} ft"),
            (MARGIN_LEFT - 8.0, y - 5.0),
            LabelFont::regular(11),
            theme.text,
            Alignment::Right,
        );
    }
}

/// Vertical grid line every 3 hours; the closing midnight line is unlabeled.
fn draw_time_grid(canvas: &mut Canvas, geometry: &ChartGeometry, theme: &Theme) {
    let style = PrimitiveStyle::with_stroke(theme.grid.to_pixel(), 1);
    let top = MARGIN_BOTTOM + geometry.plot_height;

    for index in 0..=HOUR_LABELS.len() {
        let x = geometry.map_x((index * 180) as f64);
        Line::new(geometry.to_point(x, MARGIN_BOTTOM), geometry.to_point(x, top))
            .into_styled(style)
            .draw(canvas)
            .ok();

        if let Some(label) = HOUR_LABELS.get(index) {
            draw_label(
                canvas,
                geometry,
                label,
                (x, MARGIN_BOTTOM - 20.0),
                LabelFont::regular(11),
                theme.text,
                Alignment::Center,
            );
        }
    }
}

fn draw_axes(canvas: &mut Canvas, geometry: &ChartGeometry, theme: &Theme) {
    let style = PrimitiveStyle::with_stroke(theme.axis.to_pixel(), 1);
    let baseline = geometry.map_y(geometry.y_min);
    let origin = geometry.to_point(MARGIN_LEFT, baseline);

    Line::new(
        origin,
        geometry.to_point(MARGIN_LEFT + geometry.plot_width, baseline),
    )
    .into_styled(style)
    .draw(canvas)
    .ok();
    Line::new(
        origin,
        geometry.to_point(MARGIN_LEFT, MARGIN_BOTTOM + geometry.plot_height),
    )
    .into_styled(style)
    .draw(canvas)
    .ok();
}

/// Translucent area between the curve and the `y_min` baseline.
fn draw_curve_fill(
    canvas: &mut Canvas,
    geometry: &ChartGeometry,
    theme: &Theme,
    samples: &[TideSample],
) {
    let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
        return;
    };
    let baseline = geometry.map_y(geometry.y_min);

    let mut vertices = Vec::with_capacity(samples.len() + 2);
    vertices.push(geometry.raster(geometry.map_x(first.minutes_of_day()), baseline));
    for sample in samples {
        let (x, y) = geometry.sample_point(sample);
        vertices.push(geometry.raster(x, y));
    }
    vertices.push(geometry.raster(geometry.map_x(last.minutes_of_day()), baseline));

    canvas.fill_polygon(&vertices, theme.curve_fill.to_pixel());
}

/// The tide curve itself, samples joined in order.
fn draw_curve(canvas: &mut Canvas, geometry: &ChartGeometry, theme: &Theme, samples: &[TideSample]) {
    let points: Vec<Point> = samples
        .iter()
        .map(|sample| {
            let (x, y) = geometry.sample_point(sample);
            geometry.to_point(x, y)
        })
        .collect();

    let color = theme.curve.to_pixel();
    if let [only] = points.as_slice() {
        Circle::with_center(*only, 3)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(canvas)
            .ok();
        return;
    }

    Polyline::new(&points)
        .into_styled(PrimitiveStyle::with_stroke(color, 3))
        .draw(canvas)
        .ok();
}

/// Filled dot with a border, plus a two-line label above highs / below lows.
fn draw_extrema(
    canvas: &mut Canvas,
    geometry: &ChartGeometry,
    theme: &Theme,
    extrema: &[ExtremumPoint],
) {
    for point in extrema {
        let x = geometry.map_x(point.minutes_of_day());
        let y = geometry.map_y(point.height);
        let color = match point.kind {
            ExtremumKind::High => theme.high,
            ExtremumKind::Low => theme.low,
        };

        let style = PrimitiveStyleBuilder::new()
            .fill_color(color.to_pixel())
            .stroke_color(theme.marker_border.to_pixel())
            .stroke_width(1)
            .stroke_alignment(StrokeAlignment::Inside)
            .build();
        Circle::with_center(geometry.to_point(x, y), 2 * MARKER_RADIUS + 1)
            .into_styled(style)
            .draw(canvas)
            .ok();

        let (first_line, second_line) = match point.kind {
            ExtremumKind::High => (12.0, 26.0),
            ExtremumKind::Low => (-22.0, -36.0),
        };
        draw_label(
            canvas,
            geometry,
            &format!("{}: {:.1} ft", point.kind.code(), point.height),
            (x, y + first_line),
            LabelFont::bold(11),
            color,
            Alignment::Center,
        );
        draw_label(
            canvas,
            geometry,
            &point.time.format(CLOCK_FORMAT).to_string(),
            (x, y + second_line),
            LabelFont::regular(9),
            theme.text,
            Alignment::Center,
        );
    }
}

fn draw_titles(canvas: &mut Canvas, geometry: &ChartGeometry, theme: &Theme, report: &TideReport) {
    draw_label(
        canvas,
        geometry,
        &format!("Tide Predictions: {} - {}", report.station_name, report.date),
        (geometry.width / 2.0, geometry.height - 30.0),
        LabelFont::bold(16),
        theme.title,
        Alignment::Center,
    );
    draw_rotated_label(
        canvas,
        geometry,
        Y_AXIS_CAPTION,
        (14.0, MARGIN_BOTTOM + geometry.plot_height / 2.0),
        LabelFont::regular(10),
        theme.text,
    );
}

/// The sample whose time of day is closest to `now`; earliest wins a tie.
pub fn current_time_sample(samples: &[TideSample], now: NaiveTime) -> Option<&TideSample> {
    let now_minutes = (now.hour() * 60 + now.minute()) as f64;
    samples.iter().min_by(|a, b| {
        let a = (a.minutes_of_day() - now_minutes).abs();
        let b = (b.minutes_of_day() - now_minutes).abs();
        a.total_cmp(&b)
    })
}

/// Glowing dot on the sample nearest to `now`, labeled with height and clock time.
fn draw_current_time(
    canvas: &mut Canvas,
    geometry: &ChartGeometry,
    theme: &Theme,
    samples: &[TideSample],
    now: NaiveTime,
) {
    let Some(sample) = current_time_sample(samples, now) else {
        return;
    };
    let (x, y) = geometry.sample_point(sample);
    let center = geometry.to_point(x, y);

    Circle::with_center(center, 2 * CURRENT_GLOW_RADIUS + 1)
        .into_styled(PrimitiveStyle::with_fill(theme.current_glow.to_pixel()))
        .draw(canvas)
        .ok();

    let dot = PrimitiveStyleBuilder::new()
        .fill_color(theme.current_dot.to_pixel())
        .stroke_color(theme.marker_border.to_pixel())
        .stroke_width(2)
        .stroke_alignment(StrokeAlignment::Inside)
        .build();
    Circle::with_center(center, 2 * CURRENT_DOT_RADIUS + 1)
        .into_styled(dot)
        .draw(canvas)
        .ok();

    draw_label(
        canvas,
        geometry,
        &format!("Now: {:.1} ft", sample.height),
        (x, y + 16.0),
        LabelFont::bold(11),
        theme.current_dot,
        Alignment::Center,
    );
    draw_label(
        canvas,
        geometry,
        &now.format(CLOCK_FORMAT).to_string(),
        (x, y + 30.0),
        LabelFont::regular(9),
        theme.text,
        Alignment::Center,
    );
}

/// Render a report into an RGBA image.
///
/// `now` is the wall-clock time used by the live indicator; `None` reads the
/// local clock. It is ignored unless `config.show_current_time` is set.
///
/// # Errors
/// - [`TideError::NoData`] when the report has no samples
/// - [`TideError::Render`] when the surface cannot be allocated
pub fn render_image(
    report: &TideReport,
    config: &RenderConfig,
    now: Option<NaiveTime>,
) -> Result<RgbaImage, TideError> {
    if report.samples.is_empty() {
        return Err(TideError::NoData);
    }

    let geometry = ChartGeometry::new(config.width, config.height, &report.samples)?;
    let mut canvas = Canvas::new(config.width, config.height)?;
    let theme = &config.theme;
    debug!(
        width = config.width,
        height = config.height,
        theme = theme.name,
        y_min = geometry.y_min,
        y_max = geometry.y_max,
        samples = report.samples.len(),
        extrema = report.extrema.len(),
        "rendering tide chart"
    );

    canvas.clear(theme.background.to_pixel());
    draw_height_grid(&mut canvas, &geometry, theme);
    draw_time_grid(&mut canvas, &geometry, theme);
    draw_axes(&mut canvas, &geometry, theme);
    draw_curve_fill(&mut canvas, &geometry, theme, &report.samples);
    draw_curve(&mut canvas, &geometry, theme, &report.samples);
    draw_extrema(&mut canvas, &geometry, theme, &report.extrema);
    draw_titles(&mut canvas, &geometry, theme, report);

    if config.show_current_time {
        let now = now.unwrap_or_else(|| Local::now().time());
        draw_current_time(&mut canvas, &geometry, theme, &report.samples, now);
    }

    Ok(canvas.into_image())
}

/// Render a report and encode it as PNG bytes.
pub fn render_png(
    report: &TideReport,
    config: &RenderConfig,
    now: Option<NaiveTime>,
) -> Result<Vec<u8>, TideError> {
    let image = render_image(report, config, now)?;
    Ok(encode_png(&image)?)
}

/// Render a report and write it to `path` as PNG.
///
/// The chart is fully rendered and encoded before the file is created, so a
/// failed render never creates or truncates `path`.
pub fn render_to_file(
    report: &TideReport,
    config: &RenderConfig,
    now: Option<NaiveTime>,
    path: impl AsRef<Path>,
) -> Result<(), TideError> {
    let path = path.as_ref();
    let png = render_png(report, config, now)?;

    let mut file = File::create(path).map_err(|source| RenderError::CreateFile {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(&png)
        .and_then(|()| file.sync_all())
        .map_err(|source| RenderError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), bytes = png.len(), "chart written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Rgba8;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 2, 24)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sample(hour: u32, minute: u32, height: f64) -> TideSample {
        TideSample {
            time: at(hour, minute),
            height,
        }
    }

    /// Full day of 6-minute samples from a height function of minutes
    fn day_of_samples(height: impl Fn(f64) -> f64) -> Vec<TideSample> {
        (0..240)
            .map(|step| {
                let minutes = step * 6;
                sample(minutes / 60, minutes % 60, height(minutes as f64))
            })
            .collect()
    }

    fn report(samples: Vec<TideSample>, extrema: Vec<ExtremumPoint>) -> TideReport {
        TideReport {
            station_id: "8418150".to_string(),
            station_name: "Portland".to_string(),
            date: "2026-02-24".to_string(),
            samples,
            extrema,
        }
    }

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> Rgba8 {
        let image::Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        Rgba8::new(r, g, b, a)
    }

    #[test]
    fn test_height_axis_range_pads_and_rounds() {
        let samples = vec![sample(0, 0, 1.0), sample(6, 0, 5.0)];
        // pad = 0.6 -> floor(0.4), ceil(5.6)
        assert_eq!(height_axis_range(&samples), Some((0.0, 6.0)));

        let negative = vec![sample(0, 0, -1.2), sample(6, 0, 2.3)];
        assert_eq!(height_axis_range(&negative), Some((-2.0, 3.0)));

        assert_eq!(height_axis_range(&[]), None);
    }

    #[test]
    fn test_flat_range_is_widened() {
        let samples = vec![sample(0, 0, 3.0), sample(12, 0, 3.0)];
        assert_eq!(height_axis_range(&samples), Some((2.0, 4.0)));

        let geometry = ChartGeometry::new(1200, 600, &samples).unwrap();
        let y = geometry.map_y(3.0);
        assert!(y.is_finite());
        assert_eq!(y, MARGIN_BOTTOM + geometry.plot_height / 2.0);
    }

    #[test]
    fn test_flat_range_beyond_float_resolution() {
        let samples = vec![sample(0, 0, 1e17), sample(6, 0, 1e17)];
        let (y_min, y_max) = height_axis_range(&samples).unwrap();
        assert!(y_max > y_min, "range {y_min}..{y_max} is empty");

        let geometry = ChartGeometry::new(1200, 600, &samples).unwrap();
        assert!(geometry.map_y(1e17).is_finite());
        assert!(height_ticks(&geometry).all(f64::is_finite));

        let image = render_image(&report(samples, vec![]), &RenderConfig::default(), None).unwrap();
        assert_eq!(image.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_huge_range_grid_is_bounded() {
        let samples = vec![sample(0, 0, 0.0), sample(12, 0, 1e15)];
        let geometry = ChartGeometry::new(1200, 600, &samples).unwrap();
        let ticks: Vec<f64> = height_ticks(&geometry).collect();
        assert!(!ticks.is_empty());
        assert!(ticks.len() as f64 <= geometry.plot_height + 1.0, "{} lines", ticks.len());
        assert!(ticks.iter().all(|&t| t >= geometry.y_min && t <= geometry.y_max));

        let image = render_image(&report(samples, vec![]), &RenderConfig::default(), None).unwrap();
        assert_eq!(image.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_height_ticks_every_whole_foot() {
        let samples = vec![sample(0, 0, 1.0), sample(6, 0, 5.0)];
        let geometry = ChartGeometry::new(1200, 600, &samples).unwrap();
        let ticks: Vec<f64> = height_ticks(&geometry).collect();
        assert_eq!(ticks, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_geometry_for_default_canvas() {
        let samples = vec![sample(0, 0, 1.0), sample(6, 0, 5.0)];
        let geometry = ChartGeometry::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, &samples).unwrap();
        assert_eq!(geometry.plot_width, 1105.0);
        assert_eq!(geometry.plot_height, 485.0);
        assert_eq!(geometry.map_x(0.0), MARGIN_LEFT);
        assert_eq!(geometry.map_x(1440.0), MARGIN_LEFT + 1105.0);
        assert_eq!(geometry.map_y(0.0), MARGIN_BOTTOM);
        assert_eq!(geometry.map_y(6.0), MARGIN_BOTTOM + 485.0);
        // Chart space is y-up, raster is y-down
        assert_eq!(geometry.to_point(MARGIN_LEFT, MARGIN_BOTTOM), Point::new(65, 540));
    }

    #[test]
    fn test_mapping_is_monotonic() {
        let samples = vec![sample(0, 0, -2.5), sample(6, 0, 9.75)];
        let geometry = ChartGeometry::new(800, 400, &samples).unwrap();

        let mut previous_x = f64::NEG_INFINITY;
        for minutes in (0..1440).step_by(6) {
            let x = geometry.map_x(minutes as f64);
            assert!(x >= previous_x);
            previous_x = x;
        }

        let mut previous_y = f64::NEG_INFINITY;
        for tenth in -25..=97 {
            let y = geometry.map_y(tenth as f64 / 10.0);
            assert!(y > previous_y);
            previous_y = y;
        }
    }

    #[test]
    fn test_empty_report_is_no_data() {
        let empty = report(vec![], vec![]);
        assert!(matches!(
            render_image(&empty, &RenderConfig::default(), None),
            Err(TideError::NoData)
        ));
    }

    #[test]
    fn test_zero_sized_canvas_is_surface_error() {
        let config = RenderConfig {
            width: 0,
            ..RenderConfig::default()
        };
        let report = report(vec![sample(0, 0, 1.0)], vec![]);
        assert!(matches!(
            render_image(&report, &config, None),
            Err(TideError::Render(RenderError::Surface { width: 0, .. }))
        ));
    }

    #[test]
    fn test_renders_requested_size_and_background() {
        let samples = day_of_samples(|m| 4.0 + 3.0 * (m / 1440.0 * std::f64::consts::TAU).sin());
        for theme in Theme::ALL {
            let config = RenderConfig {
                width: 640,
                height: 320,
                theme,
                show_current_time: false,
            };
            let image = render_image(&report(samples.clone(), vec![]), &config, None).unwrap();
            assert_eq!(image.dimensions(), (640, 320));
            assert_eq!(pixel(&image, 0, 0), theme.background.to_pixel());
        }
    }

    #[test]
    fn test_flat_curve_sits_on_middle_row() {
        let image = render_image(
            &report(day_of_samples(|_| 3.0), vec![]),
            &RenderConfig::default(),
            None,
        )
        .unwrap();

        // 06:00 -> x = 65 + 0.25 * 1105; 3.0 ft -> y = 60 + 242.5 -> row 297.5
        let curve = Theme::LIGHT.curve.to_pixel();
        assert_eq!(pixel(&image, 341, 298), curve);
        for row in 0..600 {
            if pixel(&image, 341, row) == curve {
                assert!((295..=301).contains(&row), "curve pixel at row {row}");
            }
        }
    }

    #[test]
    fn test_extremum_marker_uses_kind_color() {
        let samples = day_of_samples(|m| 3.0 + 2.0 * (m / 720.0 * std::f64::consts::PI).sin());
        let extrema = vec![
            ExtremumPoint {
                time: at(6, 0),
                height: 5.0,
                kind: ExtremumKind::High,
            },
            ExtremumPoint {
                time: at(18, 0),
                height: 1.0,
                kind: ExtremumKind::Low,
            },
        ];
        let report = report(samples.clone(), extrema);
        let image = render_image(&report, &RenderConfig::default(), None).unwrap();

        let geometry = ChartGeometry::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, &samples).unwrap();
        let high = geometry.to_point(geometry.map_x(360.0), geometry.map_y(5.0));
        let low = geometry.to_point(geometry.map_x(1080.0), geometry.map_y(1.0));
        assert_eq!(
            pixel(&image, high.x as u32, high.y as u32),
            Theme::LIGHT.high.to_pixel()
        );
        assert_eq!(
            pixel(&image, low.x as u32, low.y as u32),
            Theme::LIGHT.low.to_pixel()
        );
    }

    #[test]
    fn test_current_time_sample_prefers_earliest_tie() {
        let samples = vec![sample(6, 0, 1.0), sample(6, 12, 2.0), sample(6, 24, 3.0)];
        let now = NaiveTime::from_hms_opt(6, 6, 0).unwrap();
        assert_eq!(current_time_sample(&samples, now).unwrap().height, 1.0);

        let now = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        assert_eq!(current_time_sample(&samples, now).unwrap().height, 3.0);
        assert!(current_time_sample(&[], now).is_none());
    }

    #[test]
    fn test_live_indicator_drawn_when_enabled() {
        let samples = day_of_samples(|_| 3.0);
        let now = NaiveTime::from_hms_opt(6, 2, 0);
        let dot = Theme::LIGHT.current_dot.to_pixel();

        let config = RenderConfig {
            show_current_time: true,
            ..RenderConfig::default()
        };
        let image = render_image(&report(samples.clone(), vec![]), &config, now).unwrap();
        assert_eq!(pixel(&image, 341, 298), dot);
        // Inside the glow, outside the dot
        assert_ne!(pixel(&image, 353, 298), Theme::LIGHT.curve.to_pixel());

        let image = render_image(&report(samples, vec![]), &RenderConfig::default(), now).unwrap();
        assert_ne!(pixel(&image, 341, 298), dot);
    }

    #[test]
    fn test_tiny_canvas_does_not_panic() {
        let samples = day_of_samples(|m| m / 100.0);
        for (width, height) in [(1, 1), (40, 30), (95, 115)] {
            let config = RenderConfig {
                width,
                height,
                theme: Theme::DARK,
                show_current_time: true,
            };
            let image = render_image(&report(samples.clone(), vec![]), &config, None).unwrap();
            assert_eq!(image.dimensions(), (width, height));
        }
    }

    #[test]
    fn test_single_sample_renders() {
        let image = render_image(
            &report(vec![sample(12, 0, 2.0)], vec![]),
            &RenderConfig::default(),
            None,
        )
        .unwrap();
        assert_eq!(image.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_render_png_is_png() {
        let png = render_png(
            &report(day_of_samples(|_| 1.0), vec![]),
            &RenderConfig::default(),
            None,
        )
        .unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_render_to_file_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        render_to_file(
            &report(day_of_samples(|m| m / 200.0), vec![]),
            &RenderConfig::default(),
            None,
            &path,
        )
        .unwrap();

        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_render_to_file_no_data_leaves_path_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let result = render_to_file(&report(vec![], vec![]), &RenderConfig::default(), None, &path);
        assert!(matches!(result, Err(TideError::NoData)));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_to_missing_directory_is_create_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.png");
        let result = render_to_file(
            &report(vec![sample(0, 0, 1.0)], vec![]),
            &RenderConfig::default(),
            None,
            &path,
        );
        assert!(matches!(
            result,
            Err(TideError::Render(RenderError::CreateFile { .. }))
        ));
    }
}
