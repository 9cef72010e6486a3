//! Line map for byte-offset to line/column conversion.

/// Helper to convert byte offsets in a source file to line/column pairs.
///
/// Line start offsets are computed once up front.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets where each line starts.
    /// `line_starts[0]` is always 0; `line_starts[n]` starts line n+1.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Create a line map from source text.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| u32::try_from(i + 1).unwrap_or(u32::MAX)),
            )
            .collect();
        Self { line_starts }
    }

    /// Convert a byte offset to (line, column), both 1-indexed.
    ///
    /// Offsets past the end of the source land on the last line.
    #[must_use]
    pub fn offset_to_line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let start = self.line_starts.get(line_idx).copied().unwrap_or(0);
        let line = u32::try_from(line_idx + 1).unwrap_or(u32::MAX);
        (line, offset.saturating_sub(start).saturating_add(1))
    }

    /// Get the number of lines in the source.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::LineMap;

    #[test]
    fn first_line_starts_at_one() {
        let map = LineMap::new("let x = 1\nlet y = 2\n");
        assert_eq!(map.offset_to_line_col(0), (1, 1));
        assert_eq!(map.offset_to_line_col(4), (1, 5));
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let map = LineMap::new("ab\ncd");
        assert_eq!(map.offset_to_line_col(2), (1, 3));
        assert_eq!(map.offset_to_line_col(3), (2, 1));
        assert_eq!(map.offset_to_line_col(4), (2, 2));
        assert_eq!(map.line_count(), 2);
    }

    #[test]
    fn empty_source_has_one_line() {
        let map = LineMap::new("");
        assert_eq!(map.line_count(), 1);
        assert_eq!(map.offset_to_line_col(0), (1, 1));
    }

    #[test]
    fn offsets_past_the_end_stay_on_the_last_line() {
        let map = LineMap::new("a\nbc");
        assert_eq!(map.offset_to_line_col(10), (2, 9));
        assert_eq!(map.offset_to_line_col(u32::MAX), (2, u32::MAX - 1));
        assert_eq!(LineMap::new("").offset_to_line_col(u32::MAX), (1, u32::MAX));
    }

    #[test]
    fn multibyte_columns_count_bytes() {
        let map = LineMap::new("é\nx");
        assert_eq!(map.offset_to_line_col(3), (2, 1));
    }
}
