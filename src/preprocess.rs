//! Image preprocessing for model input.
//!
//! Decodes an image, forces RGB, resizes with bicubic filtering, and lays
//! the pixels out as a unit-range NHWC tensor ready for inference.

use std::path::Path;

use image::{imageops, DynamicImage, ImageBuffer, Rgb};
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::tract_ndarray::Array4;

use crate::utils::error::{Error, Result};
use crate::{CHANNELS, IMAGE_SIZE};

type RgbImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// Configuration for image preprocessing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Target width after resizing
    pub target_width: u32,
    /// Target height after resizing
    pub target_height: u32,
    /// Whether to convert to RGB (from RGBA, grayscale, etc.)
    pub force_rgb: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            target_width: IMAGE_SIZE as u32,
            target_height: IMAGE_SIZE as u32,
            force_rgb: true,
        }
    }
}

/// Image preprocessor producing batch-of-one NHWC tensors
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    /// Creates a new preprocessor with the given configuration
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    /// Loads and preprocesses an image from a file path
    pub fn preprocess_from_path(&self, path: &Path) -> Result<Array4<f32>> {
        let image = image::open(path)
            .map_err(|e| Error::ImageLoad(path.to_path_buf(), e.to_string()))?;
        Ok(self.preprocess(&image))
    }

    /// Preprocesses a decoded image for model input
    pub fn preprocess(&self, image: &DynamicImage) -> Array4<f32> {
        let rgb = if self.config.force_rgb {
            image.to_rgb8()
        } else {
            match image {
                DynamicImage::ImageRgb8(img) => img.clone(),
                _ => image.to_rgb8(),
            }
        };

        let resized = self.resize(&rgb);
        self.to_tensor(&resized)
    }

    /// Resizes an image to the target dimensions with bicubic filtering
    fn resize(&self, image: &RgbImage) -> RgbImage {
        let (width, height) = image.dimensions();
        if width == self.config.target_width && height == self.config.target_height {
            return image.clone();
        }

        imageops::resize(
            image,
            self.config.target_width,
            self.config.target_height,
            imageops::FilterType::CatmullRom,
        )
    }

    /// Lays out an RGB image as a (1, H, W, 3) tensor with values in [0, 1]
    fn to_tensor(&self, image: &RgbImage) -> Array4<f32> {
        let height = self.config.target_height as usize;
        let width = self.config.target_width as usize;

        Array4::from_shape_fn((1, height, width, CHANNELS), |(_, y, x, c)| {
            image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        })
    }

    /// Gets the tensor shape produced by this preprocessor
    pub fn output_shape(&self) -> [usize; 4] {
        [
            1,
            self.config.target_height as usize,
            self.config.target_width as usize,
            CHANNELS,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_config_default() {
        let config = PreprocessConfig::default();
        assert_eq!(config.target_width, 224);
        assert_eq!(config.target_height, 224);
        assert!(config.force_rgb);
    }

    #[test]
    fn test_output_shape() {
        let preprocessor = ImagePreprocessor::default();
        assert_eq!(preprocessor.output_shape(), [1, 224, 224, 3]);
    }

    #[test]
    fn test_preprocess_small_image() {
        let preprocessor = ImagePreprocessor::default();

        let img = ImageBuffer::from_pixel(10, 10, Rgb([255u8, 0u8, 0u8]));
        let tensor = preprocessor.preprocess(&DynamicImage::ImageRgb8(img));

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_values_stay_in_unit_range() {
        let preprocessor = ImagePreprocessor::default();

        // Checkerboard of extreme values survives resizing within [0, 1]
        let img = ImageBuffer::from_fn(37, 53, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([255u8, 255u8, 255u8])
            } else {
                Rgb([0u8, 0u8, 0u8])
            }
        });
        let tensor = preprocessor.preprocess(&DynamicImage::ImageRgb8(img));

        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_channel_layout() {
        let preprocessor = ImagePreprocessor::default();

        // A pure red image maps to 1.0 in channel 0 and 0.0 elsewhere
        let img = ImageBuffer::from_pixel(224, 224, Rgb([255u8, 0u8, 0u8]));
        let tensor = preprocessor.preprocess(&DynamicImage::ImageRgb8(img));

        assert_eq!(tensor[[0, 112, 112, 0]], 1.0);
        assert_eq!(tensor[[0, 112, 112, 1]], 0.0);
        assert_eq!(tensor[[0, 112, 112, 2]], 0.0);
    }

    #[test]
    fn test_grayscale_converts_to_rgb() {
        let preprocessor = ImagePreprocessor::default();

        let gray = DynamicImage::new_luma8(64, 64);
        let tensor = preprocessor.preprocess(&gray);

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_resize_exact_match_passthrough() {
        let preprocessor = ImagePreprocessor::default();

        let img = ImageBuffer::from_pixel(224, 224, Rgb([128u8, 128u8, 128u8]));
        let tensor = preprocessor.preprocess(&DynamicImage::ImageRgb8(img.clone()));

        // No resampling happens for an exact-size input
        let expected = 128.0 / 255.0;
        assert!((tensor[[0, 0, 0, 0]] - expected).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let preprocessor = ImagePreprocessor::default();
        let result = preprocessor.preprocess_from_path(Path::new("does-not-exist.jpg"));
        assert!(matches!(result, Err(Error::ImageLoad(_, _))));
    }
}
