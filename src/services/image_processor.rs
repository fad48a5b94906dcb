// src/services/image_processor.rs
use crate::errors::BeforeAfterError;
use crate::models::Provider;
use image::{DynamicImage, GenericImageView, ImageFormat as ImgFormat};

/// Screenshots beyond this size on either side are rejected at upload.
pub const MAX_DIMENSION: u32 = 8192;

/// Anthropic caps base64 images at 5MB; base64 inflates by ~33%.
const ANTHROPIC_MAX_BYTES: usize = 3_750_000;

/// MIME type of an encoded image, falling back to JPEG when unknown.
pub fn detect_mime_type(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(ImgFormat::Png) => "image/png",
        Ok(ImgFormat::Gif) => "image/gif",
        Ok(ImgFormat::WebP) => "image/webp",
        _ => "image/jpeg",
    }
}

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_image(&self, data: &[u8]) -> Result<(u32, u32), BeforeAfterError> {
        let img = image::load_from_memory(data).map_err(|e| {
            BeforeAfterError::ImageProcessing(format!("Invalid image format: {}", e))
        })?;

        let (width, height) = img.dimensions();

        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(BeforeAfterError::ImageProcessing(format!(
                "Image dimensions exceed {}x{}",
                MAX_DIMENSION, MAX_DIMENSION
            )));
        }

        Ok((width, height))
    }

    /// Shrinks an image so it fits the provider's inline payload limit.
    pub fn prepare_for(&self, provider: Provider, data: &[u8]) -> Result<Vec<u8>, BeforeAfterError> {
        match provider {
            Provider::Anthropic => self.shrink_to(data, ANTHROPIC_MAX_BYTES),
            Provider::OpenAI | Provider::Google => Ok(data.to_vec()),
        }
    }

    fn shrink_to(&self, data: &[u8], max_bytes: usize) -> Result<Vec<u8>, BeforeAfterError> {
        if data.len() <= max_bytes {
            return Ok(data.to_vec());
        }

        let img = image::load_from_memory(data)
            .map_err(|e| BeforeAfterError::ImageProcessing(format!("Failed to load image: {}", e)))?;

        let (width, height) = img.dimensions();

        let scale_factor = ((max_bytes as f64 / data.len() as f64).sqrt() * 0.9) as f32;
        let new_width = ((width as f32 * scale_factor) as u32).max(256);
        let new_height = ((height as f32 * scale_factor) as u32).max(256);

        let resized = img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3);
        let resized = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut output = Vec::new();
        resized
            .write_to(&mut std::io::Cursor::new(&mut output), ImgFormat::Jpeg)
            .map_err(|e| {
                BeforeAfterError::ImageProcessing(format!("Failed to encode resized image: {}", e))
            })?;

        log::debug!(
            "Resized {}x{} image from {} to {} bytes",
            width,
            height,
            data.len(),
            output.len()
        );

        Ok(output)
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}
