//! Page envelope built from over-fetched keyset queries.

use serde::Serialize;

use crate::cursor::{Cursor, CursorError};

/// One page of results with the cursor for the following page.
///
/// Serialises as `{ "data": [...], "nextCursor": "...", "hasNextPage": true }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    data: Vec<T>,
    next_cursor: Option<String>,
    has_next_page: bool,
}

impl<T> Page<T> {
    /// An empty final page.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            data: Vec::new(),
            next_cursor: None,
            has_next_page: false,
        }
    }

    /// Build a page from rows fetched with `limit + 1`.
    ///
    /// When more than `limit` rows are present the surplus is dropped and the
    /// key of the last displayed row becomes the next cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError::Serialize`] when the boundary key cannot be
    /// encoded.
    pub fn from_overfetched<K, F>(
        mut rows: Vec<T>,
        limit: usize,
        key_of: F,
    ) -> Result<Self, CursorError>
    where
        K: Serialize,
        F: Fn(&T) -> K,
    {
        let has_next_page = rows.len() > limit;
        rows.truncate(limit);
        let next_cursor = if has_next_page {
            rows.last()
                .map(|row| Cursor::new(key_of(row)).encode())
                .transpose()?
        } else {
            None
        };
        Ok(Self {
            data: rows,
            next_cursor,
            has_next_page,
        })
    }

    /// Assemble a page from parts already computed elsewhere.
    #[must_use]
    pub const fn from_parts(data: Vec<T>, next_cursor: Option<String>) -> Self {
        let has_next_page = next_cursor.is_some();
        Self {
            data,
            next_cursor,
            has_next_page,
        }
    }

    /// Items displayed on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.data
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.data
    }

    /// Opaque cursor for the following page, if one exists.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Whether another page exists after this one.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Transform each item while keeping the paging metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            data: self.data.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_next_page: self.has_next_page,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for page assembly.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn short_result_sets_are_final() {
        let page = Page::from_overfetched(vec![3_u32, 2, 1], 3, |row| *row).expect("page");
        assert!(!page.has_next_page());
        assert!(page.next_cursor().is_none());
        assert_eq!(page.items(), &[3, 2, 1]);
    }

    #[rstest]
    fn surplus_row_is_dropped_and_boundary_key_encoded() {
        let page = Page::from_overfetched(vec![5_u32, 4, 3], 2, |row| *row).expect("page");
        assert!(page.has_next_page());
        assert_eq!(page.items(), &[5, 4]);
        let token = page.next_cursor().expect("cursor");
        let cursor: Cursor<u32> = Cursor::decode(token).expect("decode");
        assert_eq!(cursor.into_key(), 4);
    }

    #[rstest]
    fn map_keeps_metadata() {
        let page = Page::from_overfetched(vec![2_u32, 1], 1, |row| *row).expect("page");
        let mapped = page.map(|row| row.to_string());
        assert!(mapped.has_next_page());
        assert_eq!(mapped.items(), &["2".to_owned()]);
    }

    #[rstest]
    fn serialises_camel_case_envelope() {
        let page = Page::from_parts(vec![1_u32], Some("abc".to_owned()));
        let json = serde_json::to_value(&page).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({"data": [1], "nextCursor": "abc", "hasNextPage": true})
        );
    }
}
