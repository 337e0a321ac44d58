use crate::Message;

/// Collates runs of consecutive messages from the same sender into single
/// display units.
///
/// Each unit has the run's bodies joined by `\n`, and the timestamp,
/// `origin_order` and `source_kind` of the run's first message. Order is
/// preserved and sender boundaries are never crossed. The input is left
/// untouched; new records are returned.
///
/// # Example
/// Input:  [("Alice", "Hi"), ("Alice", "How are you?"), ("Bob", "Fine")]
/// Output: [("Alice", "Hi\nHow are you?"), ("Bob", "Fine")]
pub fn collate_consecutive(messages: &[Message]) -> Vec<Message> {
    messages
        .chunk_by(|a, b| a.sender == b.sender)
        .map(|run| {
            let first = &run[0];
            let body = run
                .iter()
                .map(|m| m.body.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            Message::new(first.sender.clone(), body, first.timestamp, first.source_kind)
                .with_origin_order(first.origin_order)
        })
        .collect()
}

/// Statistics about the collation result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub original_count: usize,
    pub collated_count: usize,
}

impl ProcessingStats {
    pub fn new(original_count: usize, collated_count: usize) -> Self {
        Self {
            original_count,
            collated_count,
        }
    }

    /// Percentage of records folded away by collation.
    pub fn compression_ratio(&self) -> f64 {
        if self.original_count == 0 {
            return 0.0;
        }
        (1.0 - (self.collated_count as f64 / self.original_count as f64)) * 100.0
    }
}
