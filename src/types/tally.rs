//! FileTally - Count and byte total of a set of files

use serde::{Deserialize, Serialize};

/// Aggregate count and size used by every report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTally {
    pub count: usize,
    pub bytes: u64,
}

impl FileTally {
    /// Count one more file of `size` bytes
    pub fn add(&mut self, size: u64) {
        self.count += 1;
        self.bytes = self.bytes.saturating_add(size);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl<'a> FromIterator<&'a super::FileRecord> for FileTally {
    fn from_iter<I: IntoIterator<Item = &'a super::FileRecord>>(iter: I) -> Self {
        let mut tally = FileTally::default();
        for record in iter {
            tally.add(record.size);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FileRecord;

    #[test]
    fn test_add_accumulates() {
        let mut tally = FileTally::default();
        assert!(tally.is_empty());

        tally.add(100);
        tally.add(50);

        assert_eq!(tally, FileTally { count: 2, bytes: 150 });
    }

    #[test]
    fn test_add_saturates() {
        let mut tally = FileTally {
            count: 1,
            bytes: u64::MAX,
        };
        tally.add(1);
        assert_eq!(tally.bytes, u64::MAX);
    }

    #[test]
    fn test_collect_from_records() {
        let records = [FileRecord::new("a.zip", 7), FileRecord::new("b.zip", 3)];
        let tally: FileTally = records.iter().collect();
        assert_eq!(tally, FileTally { count: 2, bytes: 10 });
    }
}
