//! Record source abstraction
//!
//! The ingestion layer hands the builder a finite, possibly lazy stream of
//! [`TagRecord`]s. Implementations exist for:
//!
//! - **Memory**: a vector of records (`MemorySource`)
//! - **Flat files**: catalogue exports (`tagfix-csv` crate)
//!
//! The builder consumes a source exactly once per build and does not assume
//! any ordering. Sources should still yield records in a deterministic order,
//! since alias collisions and popularity ties are resolved by stream position.

use crate::error::SourceResult;
use crate::record::TagRecord;

/// Boxed record stream handed to the builder.
pub type RecordStream<'a> = Box<dyn Iterator<Item = SourceResult<TagRecord>> + 'a>;

/// A producer of tag records.
pub trait RecordSource {
    /// Open the stream.
    ///
    /// Opening may fail (missing file, unreachable backend). Each yielded
    /// item may also fail; the builder aborts on the first error.
    fn records(&mut self) -> SourceResult<RecordStream<'_>>;
}

/// In-memory record source.
///
/// Yields its records in vector order. Useful for:
/// - Unit testing
/// - Embedding the engine with a catalogue already held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<TagRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<TagRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: TagRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<TagRecord>> for MemorySource {
    fn from(records: Vec<TagRecord>) -> Self {
        Self::new(records)
    }
}

impl RecordSource for MemorySource {
    fn records(&mut self) -> SourceResult<RecordStream<'_>> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;

    #[test]
    fn test_memory_source_order() {
        let mut source = MemorySource::new(vec![
            TagRecord::new("b", Category::General, 1),
            TagRecord::new("a", Category::General, 2),
        ]);

        let names: Vec<String> = source
            .records()
            .unwrap()
            .map(|r| r.unwrap().canonical_name)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_memory_source_reusable() {
        let mut source = MemorySource::default();
        source.push(TagRecord::new("x", Category::General, 0));

        assert_eq!(source.records().unwrap().count(), 1);
        assert_eq!(source.records().unwrap().count(), 1);
        assert_eq!(source.len(), 1);
    }
}
