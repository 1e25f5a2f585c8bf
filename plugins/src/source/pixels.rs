//! Nested numeric lists as pixel arrays.

use ndarray::{ArrayD, IxDyn};
use vistask_core::{FieldValue, PixelArray};

/// Interpret a rectangular nested list of numbers as a pixel array.
///
/// All-integer input becomes [`PixelArray::Int`], anything with a float
/// becomes [`PixelArray::F64`]. Ragged or non-numeric lists yield `None`.
pub fn pixels_from_nested(value: &FieldValue) -> Option<PixelArray> {
    let mut shape = Vec::new();
    let mut cursor = value;
    while let FieldValue::List(items) = cursor {
        shape.push(items.len());
        cursor = items.first()?;
    }
    if shape.is_empty() {
        return None;
    }

    let mut flat = Vec::with_capacity(shape.iter().product());
    let mut all_int = true;
    flatten(value, 0, &shape, &mut flat, &mut all_int)?;

    if all_int {
        let data = flat.into_iter().map(|v| v as i64).collect();
        ArrayD::from_shape_vec(IxDyn(&shape), data)
            .ok()
            .map(PixelArray::Int)
    } else {
        ArrayD::from_shape_vec(IxDyn(&shape), flat)
            .ok()
            .map(PixelArray::F64)
    }
}

fn flatten(
    value: &FieldValue,
    depth: usize,
    shape: &[usize],
    out: &mut Vec<f64>,
    all_int: &mut bool,
) -> Option<()> {
    match value {
        FieldValue::List(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return None;
            }
            for item in items {
                flatten(item, depth + 1, shape, out, all_int)?;
            }
            Some(())
        }
        FieldValue::Int(i) if depth == shape.len() => {
            out.push(*i as f64);
            Some(())
        }
        FieldValue::Float(f) if depth == shape.len() => {
            *all_int = false;
            out.push(*f);
            Some(())
        }
        _ => None,
    }
}
