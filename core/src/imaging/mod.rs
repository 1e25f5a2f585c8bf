//! Image Normalizer: turns whatever an upstream record carries for an image
//! into a decoded image in a fixed color mode.

pub mod normalize;
pub mod pixels;

pub use normalize::{normalize, normalize_field, ColorMode, ImageInput};
pub use pixels::array_to_image;
