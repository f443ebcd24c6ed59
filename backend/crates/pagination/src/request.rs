//! Page request normalisation.

use crate::cursor::Cursor;

/// Normalised page request: an optional decoded cursor and a bounded limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<K> {
    cursor: Option<Cursor<K>>,
    limit: usize,
}

impl<K> PageRequest<K> {
    /// Build a request, clamping `limit` into `1..=max_limit`.
    ///
    /// A missing limit falls back to `default_limit`, itself clamped.
    #[must_use]
    pub fn new(
        cursor: Option<Cursor<K>>,
        limit: Option<usize>,
        default_limit: usize,
        max_limit: usize,
    ) -> Self {
        let ceiling = max_limit.max(1);
        let requested = limit.unwrap_or(default_limit);
        Self {
            cursor,
            limit: requested.clamp(1, ceiling),
        }
    }

    /// Decoded cursor, when the client supplied one.
    #[must_use]
    pub const fn cursor(&self) -> Option<&Cursor<K>> {
        self.cursor.as_ref()
    }

    /// Cursor key, when the client supplied one.
    #[must_use]
    pub fn after(&self) -> Option<&K> {
        self.cursor.as_ref().map(Cursor::key)
    }

    /// Number of items to display on the page.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Number of rows to fetch so a following page can be detected.
    #[must_use]
    pub const fn fetch_limit(&self) -> usize {
        self.limit.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for limit clamping.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, 10)]
    #[case(Some(0), 1)]
    #[case(Some(5), 5)]
    #[case(Some(500), 50)]
    fn clamps_limits(#[case] limit: Option<usize>, #[case] expected: usize) {
        let request: PageRequest<u32> = PageRequest::new(None, limit, 10, 50);
        assert_eq!(request.limit(), expected);
        assert_eq!(request.fetch_limit(), expected + 1);
    }

    #[rstest]
    fn exposes_cursor_key() {
        let request = PageRequest::new(Some(Cursor::new(7_u32)), None, 10, 50);
        assert_eq!(request.after(), Some(&7));
    }
}
