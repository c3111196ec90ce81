//! RGBA raster surface for chart drawing.
//!
//! [`Canvas`] owns an [`image::RgbaImage`] and implements the
//! `embedded-graphics` [`DrawTarget`] trait, so lines, circles, polylines and
//! mono-font text can be drawn onto it directly. Every pixel written through
//! the draw target is alpha-blended (source-over) so translucent theme colors
//! composite over earlier layers.
//!
//! Coordinates here are raster coordinates: origin top-left, y down.

use crate::renderer::RenderError;
use core::convert::Infallible;
use embedded_graphics::{
    geometry::{Dimensions, OriginDimensions},
    pixelcolor::PixelColor,
    prelude::*,
    primitives::Rectangle,
};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// 8-bit straight-alpha color, the pixel type of [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

// No packed raw representation; pixels only ever go through `Canvas`.
impl PixelColor for Rgba8 {
    type Raw = ();
}

impl From<Rgba8> for image::Rgba<u8> {
    fn from(color: Rgba8) -> Self {
        image::Rgba([color.r, color.g, color.b, color.a])
    }
}

/// Drawing surface backed by an RGBA image buffer.
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Allocate a transparent canvas.
    ///
    /// Zero-sized surfaces and buffers whose byte size overflows or cannot be
    /// reserved fail with [`RenderError::Surface`].
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let surface_error = || RenderError::Surface { width, height };
        if width == 0 || height == 0 {
            return Err(surface_error());
        }

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(surface_error)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| surface_error())?;
        data.resize(len, 0);

        let image = RgbaImage::from_raw(width, height, data).ok_or_else(surface_error)?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Overwrite every pixel, ignoring what was there.
    pub fn clear(&mut self, color: Rgba8) {
        let pixel: image::Rgba<u8> = color.into();
        for dst in self.image.pixels_mut() {
            *dst = pixel;
        }
    }

    /// Source-over blend one pixel. Out-of-bounds writes are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba8) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        if color.a == 0 {
            return;
        }

        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        if color.a == u8::MAX {
            *dst = color.into();
            return;
        }

        let image::Rgba([dr, dg, db, da]) = *dst;
        let src_alpha = color.a as f32 / 255.0;
        let dst_alpha = da as f32 / 255.0 * (1.0 - src_alpha);
        let out_alpha = src_alpha + dst_alpha;
        let mix = |s: u8, d: u8| {
            ((s as f32 * src_alpha + d as f32 * dst_alpha) / out_alpha)
                .round()
                .clamp(0.0, 255.0) as u8
        };

        *dst = image::Rgba([
            mix(color.r, dr),
            mix(color.g, dg),
            mix(color.b, db),
            (out_alpha * 255.0).round() as u8,
        ]);
    }

    /// Fill a closed polygon given in raster coordinates (even-odd rule).
    ///
    /// A pixel is covered when its center lies inside the polygon, and each
    /// covered pixel is blended exactly once, so translucent fills stay even.
    pub fn fill_polygon(&mut self, vertices: &[(f64, f64)], color: Rgba8) {
        if vertices.len() < 3 {
            return;
        }

        let (min_y, max_y) = vertices
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &(_, y)| {
                (min.min(y), max.max(y))
            });
        let top = min_y.floor().max(0.0) as i64;
        let bottom = max_y.ceil().min(self.height() as f64) as i64;
        let width = self.width() as i64;

        let mut crossings = Vec::with_capacity(vertices.len());
        for row in top..bottom {
            let scan_y = row as f64 + 0.5;
            crossings.clear();

            for (i, &(x0, y0)) in vertices.iter().enumerate() {
                let (x1, y1) = vertices[(i + 1) % vertices.len()];
                if (y0 <= scan_y) != (y1 <= scan_y) {
                    crossings.push(x0 + (scan_y - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            crossings.sort_by(f64::total_cmp);

            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i64).max(0);
                let end = ((span[1] - 0.5).ceil() as i64).min(width);
                for x in start..end {
                    self.blend_pixel(x as i32, row as i32, color);
                }
            }
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }
}

impl DrawTarget for Canvas {
    type Color = Rgba8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.blend_pixel(point.x, point.y, color);
        }
        Ok(())
    }
}

/// View of a [`Canvas`] rotated 90° counter-clockwise around `origin`.
///
/// Anything drawn along +x in local coordinates runs upward on the canvas,
/// which is how the vertical axis caption is laid out.
pub struct Rotated<'a> {
    canvas: &'a mut Canvas,
    origin: Point,
}

impl<'a> Rotated<'a> {
    pub fn new(canvas: &'a mut Canvas, origin: Point) -> Self {
        Self { canvas, origin }
    }
}

impl Dimensions for Rotated<'_> {
    fn bounding_box(&self) -> Rectangle {
        let size = self.canvas.size();
        Rectangle::new(
            Point::new(self.origin.y - size.height as i32 + 1, -self.origin.x),
            Size::new(size.height, size.width),
        )
    }
}

impl DrawTarget for Rotated<'_> {
    type Color = Rgba8;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.canvas
                .blend_pixel(self.origin.x + point.y, self.origin.y - point.x, color);
        }
        Ok(())
    }
}

/// Encode an image as PNG in memory.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(RenderError::Encode)?;
    Ok(bytes)
}
