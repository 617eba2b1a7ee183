// Record identifier generation

const FIRST: u64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceCursor {
    prefix: String,
    next: u64,
}

impl SequenceCursor {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: FIRST,
        }
    }

    /// Returns `PREFIX-00001`, `PREFIX-00002`, ... and advances the cursor.
    pub fn next_id(&mut self) -> String {
        let id = format!("{}-{:05}", self.prefix, self.next);
        self.next += 1;
        id
    }

    #[cfg(test)]
    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn reset(&mut self) {
        self.next = FIRST;
    }
}
