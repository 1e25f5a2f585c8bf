use crate::error::SourceError;

use super::record::Record;

/// An upstream iterable of records.
///
/// Sources are pulled strictly in order; a failed read affects only the
/// record it belongs to.
pub trait RecordSource {
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;

    /// Total number of records if known up front.
    fn len_hint(&self) -> Option<usize> {
        None
    }

    fn next_record(&mut self) -> Option<Result<Record, SourceError>>;
}

/// A fixed list of records held in memory.
pub struct InMemorySource {
    records: std::vec::IntoIter<Record>,
    total: usize,
}

impl InMemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        let total = records.len();
        Self {
            records: records.into_iter(),
            total,
        }
    }
}

impl From<Vec<Record>> for InMemorySource {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl RecordSource for InMemorySource {
    fn describe(&self) -> String {
        format!("in-memory ({} records)", self.total)
    }

    fn len_hint(&self) -> Option<usize> {
        Some(self.total)
    }

    fn next_record(&mut self) -> Option<Result<Record, SourceError>> {
        self.records.next().map(Ok)
    }
}
