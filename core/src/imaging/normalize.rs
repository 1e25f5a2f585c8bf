use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use serde::{Deserialize, Serialize};

use super::pixels::array_to_image;
use crate::record::{FieldValue, PixelArray};

/// Target color mode of a normalized image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// 8-bit single channel.
    Luma,
    #[default]
    Rgb,
    Rgba,
}

impl ColorMode {
    /// Mode of an already-decoded image, if it is one of ours.
    pub fn of(img: &DynamicImage) -> Option<ColorMode> {
        match img {
            DynamicImage::ImageLuma8(_) => Some(ColorMode::Luma),
            DynamicImage::ImageRgb8(_) => Some(ColorMode::Rgb),
            DynamicImage::ImageRgba8(_) => Some(ColorMode::Rgba),
            _ => None,
        }
    }

    /// Convert into this mode; images already in it are returned untouched.
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        if ColorMode::of(&img) == Some(self) {
            return img;
        }
        match self {
            ColorMode::Luma => DynamicImage::ImageLuma8(img.to_luma8()),
            ColorMode::Rgb => DynamicImage::ImageRgb8(img.to_rgb8()),
            ColorMode::Rgba => DynamicImage::ImageRgba8(img.to_rgba8()),
        }
    }
}

/// The image representations a record can carry.
#[derive(Debug, Clone)]
pub enum ImageInput {
    Decoded(DynamicImage),
    Pixels(PixelArray),
    Path(PathBuf),
}

impl ImageInput {
    /// Text is read as a filesystem path. Other field kinds have no image form.
    pub fn from_field(value: FieldValue) -> Option<Self> {
        match value {
            FieldValue::Image(img) => Some(ImageInput::Decoded(img)),
            FieldValue::Pixels(arr) => Some(ImageInput::Pixels(arr)),
            FieldValue::Text(path) => Some(ImageInput::Path(PathBuf::from(path))),
            _ => None,
        }
    }
}

/// Normalize an image input into `mode`.
///
/// Returns `None` ("no image") for absent input, unsupported array shapes,
/// missing or undecodable files. Never panics.
pub fn normalize(input: Option<ImageInput>, mode: ColorMode) -> Option<DynamicImage> {
    match input? {
        ImageInput::Decoded(img) => Some(mode.apply(img)),
        ImageInput::Pixels(arr) => array_to_image(&arr).map(|img| mode.apply(img)),
        ImageInput::Path(path) => load_from_path(&path).map(|img| mode.apply(img)),
    }
}

/// [`normalize`] applied to a raw record field.
pub fn normalize_field(value: Option<FieldValue>, mode: ColorMode) -> Option<DynamicImage> {
    normalize(value.and_then(ImageInput::from_field), mode)
}

fn load_from_path(path: &Path) -> Option<DynamicImage> {
    if !path.exists() {
        return None;
    }
    let decoded = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(image::ImageError::IoError)
        .and_then(|r| r.decode());
    match decoded {
        Ok(img) => Some(img),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "image decode failed");
            None
        }
    }
}
