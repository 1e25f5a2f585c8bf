use std::collections::BTreeMap;
use std::fmt;

use image::DynamicImage;
use ndarray::ArrayD;
use serde_json::Value;

/// A rectangular numeric array, tagged by element type.
///
/// Mirrors the shapes upstream datasets hand out for raw pixel data: `H x W`
/// for grayscale, `H x W x C` for color.
#[derive(Debug, Clone, PartialEq)]
pub enum PixelArray {
    U8(ArrayD<u8>),
    /// Any integer element type other than `u8`.
    Int(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl PixelArray {
    pub fn shape(&self) -> &[usize] {
        match self {
            PixelArray::U8(a) => a.shape(),
            PixelArray::Int(a) => a.shape(),
            PixelArray::F32(a) => a.shape(),
            PixelArray::F64(a) => a.shape(),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, PixelArray::F32(_) | PixelArray::F64(_))
    }

    /// Samples as 8-bit values.
    ///
    /// Float arrays whose maximum does not exceed 1.0 are unit-range and get
    /// scaled by 255; everything else is cast directly (integers wrap, floats
    /// truncate and saturate). A NaN anywhere makes the maximum NaN, so the
    /// array is not unit-range.
    pub fn to_u8(&self) -> ArrayD<u8> {
        match self {
            PixelArray::U8(a) => a.clone(),
            PixelArray::Int(a) => a.mapv(|v| v as u8),
            PixelArray::F32(a) => {
                let unit = a.iter().all(|v| *v <= 1.0);
                if unit {
                    a.mapv(|v| (v * 255.0) as u8)
                } else {
                    a.mapv(|v| v as u8)
                }
            }
            PixelArray::F64(a) => {
                let unit = a.iter().all(|v| *v <= 1.0);
                if unit {
                    a.mapv(|v| (v * 255.0) as u8)
                } else {
                    a.mapv(|v| v as u8)
                }
            }
        }
    }
}

/// One field of an upstream record.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Image(DynamicImage),
    Pixels(PixelArray),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Whether the value counts as present in a fallback chain.
    ///
    /// Null, `false`, numeric zero and empty text/bytes/list/map are absent.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Bool(b) => *b,
            FieldValue::Int(i) => *i != 0,
            FieldValue::Float(f) => *f != 0.0,
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Bytes(b) => !b.is_empty(),
            FieldValue::List(v) => !v.is_empty(),
            FieldValue::Map(m) => !m.is_empty(),
            FieldValue::Image(_) | FieldValue::Pixels(_) => true,
        }
    }

    /// Raw image or binary payload with no metadata representation.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            FieldValue::Bytes(_) | FieldValue::Image(_) | FieldValue::Pixels(_)
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON form for metadata passthrough. Binary payloads have none; nested
    /// inside a list or map they become `null`.
    pub fn to_json(&self) -> Option<Value> {
        if self.is_binary() {
            return None;
        }
        Some(self.to_json_nested())
    }

    fn to_json_nested(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().map(FieldValue::to_json_nested).collect())
            }
            FieldValue::Map(m) => Value::Object(
                m.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_nested()))
                    .collect(),
            ),
            FieldValue::Bytes(_) | FieldValue::Image(_) | FieldValue::Pixels(_) => Value::Null,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => f.write_str("null"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(i) => write!(f, "{i}"),
            FieldValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => {
                write!(f, "{v:.1}")
            }
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            FieldValue::Image(img) => write!(f, "<image {}x{}>", img.width(), img.height()),
            FieldValue::Pixels(p) => write!(f, "<array {:?}>", p.shape()),
            FieldValue::List(_) | FieldValue::Map(_) => write!(f, "{}", self.to_json_nested()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<DynamicImage> for FieldValue {
    fn from(img: DynamicImage) -> Self {
        FieldValue::Image(img)
    }
}

impl From<PixelArray> for FieldValue {
    fn from(p: PixelArray) -> Self {
        FieldValue::Pixels(p)
    }
}
