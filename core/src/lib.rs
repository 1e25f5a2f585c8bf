//! Core of vistask: turns heterogeneous visual-reasoning samples into
//! standardized task directories, validates them, and mirrors the resulting
//! corpus to a remote object store.
//!
//! The external collaborators (upstream record source, object store) are the
//! [`record::RecordSource`] and [`transfer::ObjectStore`] traits; concrete
//! implementations live in `vistask-plugins`.

pub mod config;
pub mod convert;
pub mod error;
pub mod imaging;
pub mod record;
pub mod task;
pub mod transfer;
pub mod validate;

pub use convert::{ConversionReport, ConvertOptions, Converter, DatasetProfile};
pub use record::{FieldValue, PixelArray, Record, RecordSource};
pub use validate::Schema;
