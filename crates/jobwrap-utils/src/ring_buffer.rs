//! Ring buffer implementation for bounded diagnostic capture
//!
//! Keeps the most recent lines written by a child process so that only a
//! fixed number of them is forwarded as job warnings.

/// Longest retained line in bytes. Longer lines are cut at this length.
pub const MAX_RETAINED_LINE_BYTES: usize = 64 * 1024;

/// A fixed-capacity buffer of the last `capacity` lines, oldest evicted first.
///
/// Slots are a fixed array addressed by a write cursor and a count, so memory
/// is bounded by `capacity * MAX_RETAINED_LINE_BYTES` no matter how much
/// output the child produces.
#[derive(Debug, Clone)]
pub struct LineRing {
    slots: Vec<Option<Vec<u8>>>,
    /// Index of the slot the next push writes to
    cursor: usize,
    /// Number of occupied slots
    len: usize,
    total_lines: usize,
}

impl LineRing {
    /// Create a ring that retains at most `capacity` lines.
    ///
    /// A capacity of zero is valid; such a ring never retains anything.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            cursor: 0,
            len: 0,
            total_lines: 0,
        }
    }

    /// Append a line, evicting the oldest one if the ring is full.
    ///
    /// A trailing `\n` (and a `\r` before it) is stripped.
    pub fn push(&mut self, line: impl Into<Vec<u8>>) {
        self.total_lines += 1;

        let capacity = self.slots.len();
        if capacity == 0 {
            return;
        }

        let mut line = line.into();
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        line.truncate(MAX_RETAINED_LINE_BYTES);

        self.slots[self.cursor] = Some(line);
        self.cursor = (self.cursor + 1) % capacity;
        if self.len < capacity {
            self.len += 1;
        }
    }

    /// Take every retained line, oldest first, leaving the ring empty.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        let capacity = self.slots.len();
        if self.len == 0 {
            return Vec::new();
        }

        let start = (self.cursor + capacity - self.len) % capacity;
        let lines = (0..self.len)
            .filter_map(|offset| self.slots[(start + offset) % capacity].take())
            .collect();

        self.cursor = 0;
        self.len = 0;
        lines
    }

    /// Number of lines currently retained
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if no lines are retained
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of retained lines
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Get the total number of lines pushed (including evicted lines)
    #[must_use]
    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Check if any line was evicted
    #[must_use]
    pub fn was_truncated(&self) -> bool {
        self.total_lines > self.slots.len()
    }
}
