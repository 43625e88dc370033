use crate::error::{BedrockError, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Cursor;

/// An uploaded image, kept in its original encoding.
#[derive(Debug, Clone)]
pub struct SourceImage {
    bytes: Vec<u8>,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl SourceImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        if bytes.is_empty() {
            return Err(BedrockError::ValidationError("image is empty".into()));
        }
        let format = image::guess_format(&bytes).map_err(|e| {
            BedrockError::ValidationError(format!("unrecognized image format: {}", e))
        })?;
        let decoded = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| BedrockError::ValidationError(format!("could not decode image: {}", e)))?;

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            bytes,
            format,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn size_kb(&self) -> f64 {
        (self.bytes.len() as f64 / 1024.0 * 100.0).round() / 100.0
    }

    /// Bytes in a format Titan accepts. PNG and JPEG pass through untouched,
    /// anything else is re-encoded as PNG.
    pub fn api_bytes(&self) -> Result<Cow<'_, [u8]>> {
        match self.format {
            ImageFormat::Png | ImageFormat::Jpeg => Ok(Cow::Borrowed(&self.bytes)),
            _ => {
                let decoded = image::load_from_memory_with_format(&self.bytes, self.format)
                    .map_err(|e| BedrockError::ValidationError(e.to_string()))?;
                encode_png(&decoded).map(Cow::Owned)
            }
        }
    }
}

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Per-pixel selection of what the model may regenerate.
///
/// `true` marks background to regenerate, `false` marks the subject to keep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    regenerate: Vec<bool>,
}

impl Mask {
    /// Builds a mask where `regions` mark background. With `invert` set the
    /// regions mark the subject instead and everything else is background.
    pub fn from_regions(width: u32, height: u32, regions: &[MaskRegion], invert: bool) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BedrockError::ValidationError(
                "mask dimensions must be non-zero".into(),
            ));
        }

        let mut regenerate = vec![invert; (width as usize) * (height as usize)];
        for region in regions {
            if region.width == 0 || region.height == 0 {
                return Err(BedrockError::ValidationError(format!(
                    "mask region at ({}, {}) has zero area",
                    region.x, region.y
                )));
            }
            if region.x >= width || region.y >= height {
                return Err(BedrockError::ValidationError(format!(
                    "mask region at ({}, {}) lies outside the {}x{} image",
                    region.x, region.y, width, height
                )));
            }

            let x_end = region.x.saturating_add(region.width).min(width);
            let y_end = region.y.saturating_add(region.height).min(height);
            for y in region.y..y_end {
                let row = (y as usize) * (width as usize);
                for x in region.x..x_end {
                    regenerate[row + x as usize] = !invert;
                }
            }
        }

        Self::checked(width, height, regenerate)
    }

    /// Reads a mask bitmap. Pixels with luma >= 128 are regenerated.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| BedrockError::ValidationError(format!("could not decode mask: {}", e)))?;
        let luma = decoded.to_luma8();
        let regenerate = luma.pixels().map(|Luma([value])| *value >= 128).collect();

        Self::checked(luma.width(), luma.height(), regenerate)
    }

    fn checked(width: u32, height: u32, regenerate: Vec<bool>) -> Result<Self> {
        if !regenerate.iter().any(|&pixel| pixel) {
            return Err(BedrockError::ValidationError(
                "mask does not mark any background pixels".into(),
            ));
        }
        Ok(Self {
            width,
            height,
            regenerate,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn regenerated_pixels(&self) -> usize {
        self.regenerate.iter().filter(|&&pixel| pixel).count()
    }

    pub fn is_regenerated(&self, x: u32, y: u32) -> bool {
        x < self.width
            && y < self.height
            && self.regenerate[(y as usize) * (self.width as usize) + x as usize]
    }

    pub fn ensure_matches(&self, image: &SourceImage) -> Result<()> {
        if self.dimensions() != image.dimensions() {
            return Err(BedrockError::ValidationError(format!(
                "mask is {}x{} but image is {}x{}",
                self.width,
                self.height,
                image.width(),
                image.height()
            )));
        }
        Ok(())
    }

    /// Renders the mask in Titan's outpainting convention: the kept subject
    /// is black, the regenerated background is white.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let bitmap = GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.is_regenerated(x, y) {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        encode_png(&DynamicImage::ImageLuma8(bitmap))
    }
}

/// How the region to keep is communicated to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSource {
    Bitmap(Mask),
    /// Text naming the subject to keep, segmented by the model.
    Prompt(String),
}

impl MaskSource {
    pub fn prompt(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BedrockError::ValidationError("mask prompt is empty".into()));
        }
        Ok(MaskSource::Prompt(text))
    }

    pub fn ensure_matches(&self, image: &SourceImage) -> Result<()> {
        match self {
            MaskSource::Bitmap(mask) => mask.ensure_matches(image),
            MaskSource::Prompt(_) => Ok(()),
        }
    }
}

/// One decoded output image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl GeneratedImage {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let format = image::guess_format(&bytes)
            .map_err(|e| BedrockError::DecodeError(format!("returned data is not an image: {}", e)))?;
        Ok(Self { bytes, format })
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extensions_str().first().copied().unwrap_or("img")
    }
}

fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| BedrockError::SerializationError(format!("PNG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}
