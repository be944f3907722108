//! Display-only preview of the selected image, with zoom, brightness and contrast.
//!
//! The preview never feeds back into what gets submitted: [crate::PatientForm] keeps the
//! original file bytes.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use serde::Serialize;

use crate::error::DermaError;

/// An adjustable preview parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Channel {
    Zoom,
    Brightness,
    Contrast,
}

impl Channel {
    /// Inclusive range of allowed percentages.
    pub fn range(&self) -> (u16, u16) {
        match self {
            Channel::Zoom => (50, 200),
            Channel::Brightness | Channel::Contrast => (50, 150),
        }
    }
}

/// Preview parameters, as percentages where 100 is identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageAdjustments {
    pub zoom: u16,
    pub brightness: u16,
    pub contrast: u16,
}

impl Default for ImageAdjustments {
    fn default() -> Self {
        Self {
            zoom: 100,
            brightness: 100,
            contrast: 100,
        }
    }
}

impl ImageAdjustments {
    /// Set one channel, clamped to its range. Other channels are unchanged.
    pub fn set(&mut self, channel: Channel, value: u16) {
        let (min, max) = channel.range();
        let value = value.clamp(min, max);
        match channel {
            Channel::Zoom => self.zoom = value,
            Channel::Brightness => self.brightness = value,
            Channel::Contrast => self.contrast = value,
        }
    }

    pub fn get(&self, channel: Channel) -> u16 {
        match channel {
            Channel::Zoom => self.zoom,
            Channel::Brightness => self.brightness,
            Channel::Contrast => self.contrast,
        }
    }
}

/// What the latest render did to the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderParams {
    pub width: u32,
    pub height: u32,
    pub scale: f32,
    pub brightness: f32,
    pub contrast: f32,
}

/// Owns the single drawing surface of the preview.
#[derive(Default)]
pub struct ImagePreview {
    adjustments: ImageAdjustments,
    source: Option<DynamicImage>,
    surface: Option<RgbaImage>,
    last_render: Option<RenderParams>,
}

impl ImagePreview {
    /// A preview whose surface is not mounted yet. Renders do nothing until [ImagePreview::mount].
    pub fn unmounted() -> Self {
        Self::default()
    }

    /// A preview with a mounted surface.
    pub fn new() -> Self {
        let mut preview = Self::default();
        preview.mount();
        preview
    }

    /// Make the drawing surface available, rendering the current image if there is one.
    pub fn mount(&mut self) {
        if self.surface.is_none() {
            self.surface = Some(RgbaImage::new(0, 0));
            self.render();
        }
    }

    /// Decode `bytes` off the async executor, then render at the current adjustments.
    pub async fn set_image(&mut self, bytes: Bytes) -> Result<(), DermaError> {
        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(std::io::Error::other)??;
        self.set_decoded_image(decoded);
        Ok(())
    }

    /// Use an already-decoded image.
    pub fn set_decoded_image(&mut self, image: DynamicImage) {
        tracing::debug!(
            width = image.width(),
            height = image.height(),
            "preview image loaded"
        );
        self.source = Some(image);
        self.render();
    }

    /// Change one channel and re-render. Without a loaded image, only the value is stored.
    pub fn set_adjustment(&mut self, channel: Channel, value: u16) {
        self.adjustments.set(channel, value);
        self.render();
    }

    pub fn adjustments(&self) -> ImageAdjustments {
        self.adjustments
    }

    pub fn surface(&self) -> Option<&RgbaImage> {
        self.surface.as_ref()
    }

    pub fn last_render(&self) -> Option<RenderParams> {
        self.last_render
    }

    pub fn has_image(&self) -> bool {
        self.source.is_some()
    }

    /// Encode the current surface as PNG. `None` if nothing was rendered.
    pub fn encode_png(&self) -> Result<Option<Vec<u8>>, DermaError> {
        let Some(surface) = self.surface.as_ref().filter(|_| self.last_render.is_some()) else {
            return Ok(None);
        };
        let mut buf = Cursor::new(Vec::new());
        surface.write_to(&mut buf, ImageFormat::Png)?;
        Ok(Some(buf.into_inner()))
    }

    fn render(&mut self) {
        let (Some(source), Some(surface)) = (self.source.as_ref(), self.surface.as_mut()) else {
            return;
        };
        let params = RenderParams {
            width: source.width(),
            height: source.height(),
            scale: self.adjustments.zoom as f32 / 100.0,
            brightness: self.adjustments.brightness as f32 / 100.0,
            contrast: self.adjustments.contrast as f32 / 100.0,
        };
        *surface = draw(source, params);
        self.last_render = Some(params);
    }
}

/// Draw `source` on a fresh transparent surface of `params.width` by `params.height`,
/// scaled from the origin and clipped, then filtered.
fn draw(source: &DynamicImage, params: RenderParams) -> RgbaImage {
    let mut surface = RgbaImage::new(params.width, params.height);
    let (visible_w, visible_h) = visible_region(params);
    let scaled_w = ((visible_w as f32 * params.scale).round() as u32).max(1);
    let scaled_h = ((visible_h as f32 * params.scale).round() as u32).max(1);
    let rgba = source.crop_imm(0, 0, visible_w, visible_h).to_rgba8();
    let scaled = if (scaled_w, scaled_h) == rgba.dimensions() {
        rgba
    } else {
        image::imageops::resize(&rgba, scaled_w, scaled_h, FilterType::Triangle)
    };
    image::imageops::replace(&mut surface, &scaled, 0, 0);
    for pixel in surface.pixels_mut() {
        *pixel = filter_pixel(*pixel, params.brightness, params.contrast);
    }
    surface
}

/// The part of the source, from the origin, which still lands on the surface once scaled.
fn visible_region(params: RenderParams) -> (u32, u32) {
    let fit = |natural: u32| {
        ((natural as f32 / params.scale).ceil() as u32).clamp(1, natural.max(1))
    };
    (fit(params.width), fit(params.height))
}

/// CSS `brightness(b) contrast(c)`, applied in that order. Alpha is untouched.
fn filter_pixel(Rgba([r, g, b, a]): Rgba<u8>, brightness: f32, contrast: f32) -> Rgba<u8> {
    let f = |channel: u8| {
        let x = channel as f32 / 255.0 * brightness;
        let x = (x - 0.5) * contrast + 0.5;
        (x.clamp(0.0, 1.0) * 255.0).round() as u8
    };
    Rgba([f(r), f(g), f(b), a])
}
