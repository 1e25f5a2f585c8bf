use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};

use crate::record::PixelArray;

/// Interpret a pixel array as an image in its natural mode.
///
/// `H x W` is grayscale, `H x W x 3` is RGB, `H x W x 4` is RGBA. Any other
/// shape, or a zero-sized dimension, has no image form.
pub fn array_to_image(arr: &PixelArray) -> Option<DynamicImage> {
    let shape = arr.shape().to_vec();
    if shape.iter().any(|&d| d == 0) {
        return None;
    }

    let (h, w, channels) = match shape.as_slice() {
        [h, w] => (*h, *w, 1),
        [h, w, c @ (3 | 4)] => (*h, *w, *c),
        _ => return None,
    };
    let width = u32::try_from(w).ok()?;
    let height = u32::try_from(h).ok()?;

    // Logical iteration order is row-major regardless of memory layout.
    let data: Vec<u8> = arr.to_u8().iter().copied().collect();

    match channels {
        1 => GrayImage::from_raw(width, height, data).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(width, height, data).map(DynamicImage::ImageRgb8),
        _ => RgbaImage::from_raw(width, height, data).map(DynamicImage::ImageRgba8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{ArrayD, IxDyn};

    fn u8_array(shape: &[usize]) -> PixelArray {
        let len: usize = shape.iter().product();
        let data = (0..len).map(|i| (i % 256) as u8).collect();
        PixelArray::U8(ArrayD::from_shape_vec(IxDyn(shape), data).unwrap())
    }

    #[test]
    fn two_dimensional_is_grayscale() {
        let img = array_to_image(&u8_array(&[3, 5])).unwrap();
        assert!(matches!(img, DynamicImage::ImageLuma8(_)));
        assert_eq!((img.width(), img.height()), (5, 3));
    }

    #[test]
    fn trailing_three_and_four_are_color() {
        assert!(matches!(
            array_to_image(&u8_array(&[2, 2, 3])),
            Some(DynamicImage::ImageRgb8(_))
        ));
        assert!(matches!(
            array_to_image(&u8_array(&[2, 2, 4])),
            Some(DynamicImage::ImageRgba8(_))
        ));
    }

    #[test]
    fn unsupported_shapes_have_no_image() {
        assert!(array_to_image(&u8_array(&[2, 2, 2])).is_none());
        assert!(array_to_image(&u8_array(&[2, 2, 1])).is_none());
        assert!(array_to_image(&u8_array(&[4])).is_none());
        assert!(array_to_image(&u8_array(&[1, 2, 2, 3])).is_none());
        assert!(array_to_image(&u8_array(&[0, 2])).is_none());
    }

    #[test]
    fn row_major_pixel_placement() {
        let img = array_to_image(&u8_array(&[2, 3])).unwrap().to_luma8();
        // value = row * 3 + col
        assert_eq!(img.get_pixel(2, 1).0, [5]);
        assert_eq!(img.get_pixel(0, 1).0, [3]);
    }
}
