//! Upstream records: loosely typed field mappings and the sources that
//! produce them.

#[allow(clippy::module_inception)]
pub mod record;
pub mod source;
pub mod value;

pub use record::Record;
pub use source::{InMemorySource, RecordSource};
pub use value::{FieldValue, PixelArray};
