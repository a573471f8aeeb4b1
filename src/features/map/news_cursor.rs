/// Position inside one province's news list.
///
/// Navigation is clamped to the list; stepping past either end is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsCursor {
    index: usize,
    total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prev,
    Next,
}

impl NewsCursor {
    /// Fresh cursor for a newly hovered region
    pub fn start(total: usize) -> Self {
        Self { index: 0, total }
    }

    /// Cursor at `index`, clamped to the last item
    pub fn at(index: usize, total: usize) -> Self {
        Self {
            index: index.min(total.saturating_sub(1)),
            total,
        }
    }

    pub fn step(self, step: Step) -> Self {
        match step {
            Step::Prev => self.prev(),
            Step::Next => self.next(),
        }
    }

    pub fn prev(self) -> Self {
        Self {
            index: self.index.saturating_sub(1),
            ..self
        }
    }

    pub fn next(self) -> Self {
        Self::at(self.index + 1, self.total)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// 1-based position for display, 0 when the list is empty
    pub fn position(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            self.index + 1
        }
    }

    pub fn has_prev(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_at_end_is_noop() {
        let cursor = NewsCursor::at(2, 3);
        assert_eq!(cursor.next(), cursor);
        assert!(!cursor.has_next());
        assert!(cursor.has_prev());
    }

    #[test]
    fn test_prev_at_start_is_noop() {
        let cursor = NewsCursor::start(3);
        assert_eq!(cursor.prev(), cursor);
        assert!(!cursor.has_prev());
    }

    #[test]
    fn test_stepping() {
        let cursor = NewsCursor::start(4).step(Step::Next).step(Step::Next);
        assert_eq!(cursor.index(), 2);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.step(Step::Prev).index(), 1);
    }

    #[test]
    fn test_out_of_range_index_clamps() {
        assert_eq!(NewsCursor::at(10, 3).index(), 2);
    }

    #[test]
    fn test_empty_list() {
        let cursor = NewsCursor::start(0).next();
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.has_next());
        assert!(!cursor.has_prev());
    }
}
