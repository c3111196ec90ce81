//! Chart color palettes.
//!
//! Four built-in themes are available as associated constants on [`Theme`]
//! and can be looked up by name with [`Theme::named`].

use crate::canvas::Rgba8;

/// An RGBA color with channels in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Quantize to 8 bits per channel for the raster.
    pub fn to_pixel(self) -> Rgba8 {
        fn channel(value: f32) -> u8 {
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Rgba8::new(
            channel(self.r),
            channel(self.g),
            channel(self.b),
            channel(self.a),
        )
    }
}

/// A named palette, one color per chart element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: Rgba,
    /// Tide curve stroke
    pub curve: Rgba,
    /// Translucent area under the curve
    pub curve_fill: Rgba,
    pub grid: Rgba,
    pub axis: Rgba,
    /// High water marker and label
    pub high: Rgba,
    /// Low water marker and label
    pub low: Rgba,
    /// Axis labels and secondary text
    pub text: Rgba,
    pub title: Rgba,
    pub marker_border: Rgba,
    /// Live "now" dot
    pub current_dot: Rgba,
    /// Halo drawn behind the live dot
    pub current_glow: Rgba,
}

impl Theme {
    /// White background, blue curve
    pub const LIGHT: Theme = Theme {
        name: "light",
        background: Rgba::opaque(0.98, 0.98, 1.0),
        curve: Rgba::opaque(0.10, 0.35, 0.70),
        curve_fill: Rgba::new(0.10, 0.35, 0.70, 0.12),
        grid: Rgba::opaque(0.82, 0.82, 0.85),
        axis: Rgba::opaque(0.30, 0.30, 0.30),
        high: Rgba::opaque(0.85, 0.15, 0.15),
        low: Rgba::opaque(0.10, 0.55, 0.20),
        text: Rgba::opaque(0.25, 0.25, 0.25),
        title: Rgba::opaque(0.30, 0.30, 0.30),
        marker_border: Rgba::opaque(1.00, 1.00, 1.00),
        current_dot: Rgba::opaque(0.90, 0.00, 0.00),
        current_glow: Rgba::new(0.90, 0.00, 0.00, 0.25),
    };

    /// Dark gray background, bright blue curve
    pub const DARK: Theme = Theme {
        name: "dark",
        background: Rgba::opaque(0.11, 0.11, 0.12),
        curve: Rgba::opaque(0.25, 0.55, 1.00),
        curve_fill: Rgba::new(0.25, 0.55, 1.00, 0.15),
        grid: Rgba::opaque(0.25, 0.25, 0.27),
        axis: Rgba::opaque(0.55, 0.55, 0.58),
        high: Rgba::opaque(1.00, 0.35, 0.35),
        low: Rgba::opaque(0.30, 0.85, 0.45),
        text: Rgba::opaque(0.72, 0.72, 0.75),
        title: Rgba::opaque(0.88, 0.88, 0.90),
        marker_border: Rgba::opaque(0.11, 0.11, 0.12),
        current_dot: Rgba::opaque(1.00, 0.28, 0.28),
        current_glow: Rgba::new(1.00, 0.28, 0.28, 0.30),
    };

    /// Sandy background, teal water, coral accents
    pub const COASTAL: Theme = Theme {
        name: "coastal",
        background: Rgba::opaque(0.98, 0.96, 0.92),
        curve: Rgba::opaque(0.00, 0.55, 0.55),
        curve_fill: Rgba::new(0.00, 0.55, 0.55, 0.12),
        grid: Rgba::opaque(0.87, 0.84, 0.78),
        axis: Rgba::opaque(0.40, 0.35, 0.30),
        high: Rgba::opaque(0.90, 0.35, 0.25),
        low: Rgba::opaque(0.20, 0.60, 0.50),
        text: Rgba::opaque(0.40, 0.37, 0.32),
        title: Rgba::opaque(0.30, 0.25, 0.20),
        marker_border: Rgba::opaque(0.98, 0.96, 0.92),
        current_dot: Rgba::opaque(0.90, 0.35, 0.25),
        current_glow: Rgba::new(0.90, 0.35, 0.25, 0.25),
    };

    /// Navy background, gold accents
    pub const NAUTICAL: Theme = Theme {
        name: "nautical",
        background: Rgba::opaque(0.08, 0.10, 0.18),
        curve: Rgba::opaque(0.40, 0.75, 0.90),
        curve_fill: Rgba::new(0.40, 0.75, 0.90, 0.12),
        grid: Rgba::opaque(0.18, 0.20, 0.28),
        axis: Rgba::opaque(0.45, 0.50, 0.58),
        high: Rgba::opaque(0.95, 0.75, 0.25),
        low: Rgba::opaque(0.40, 0.80, 0.70),
        text: Rgba::opaque(0.60, 0.65, 0.72),
        title: Rgba::opaque(0.90, 0.85, 0.70),
        marker_border: Rgba::opaque(0.08, 0.10, 0.18),
        current_dot: Rgba::opaque(0.95, 0.75, 0.25),
        current_glow: Rgba::new(0.95, 0.75, 0.25, 0.30),
    };

    /// Every built-in theme, in lookup order
    pub const ALL: [Theme; 4] = [Theme::LIGHT, Theme::DARK, Theme::COASTAL, Theme::NAUTICAL];

    /// Look a built-in theme up by its exact name.
    ///
    /// ```
    /// use tide_chart_lib::theme::Theme;
    ///
    /// assert_eq!(Theme::named("nautical"), Some(Theme::NAUTICAL));
    /// assert_eq!(Theme::named("sepia"), None);
    /// ```
    pub fn named(name: &str) -> Option<Theme> {
        Self::ALL.into_iter().find(|theme| theme.name == name)
    }

    /// Like [`Theme::named`] but falls back to [`Theme::LIGHT`].
    pub fn named_or_default(name: &str) -> Theme {
        Self::named(name).unwrap_or_default()
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().map(|theme| theme.name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::LIGHT
    }
}
