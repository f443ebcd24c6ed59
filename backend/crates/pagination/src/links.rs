//! Navigation link helpers.

use url::Url;

/// Query parameter carrying the opaque cursor.
pub const CURSOR_PARAM: &str = "cursor";
/// Query parameter carrying the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Build the link to the following page.
///
/// Existing `cursor` and `limit` parameters on `current` are replaced; other
/// query parameters are preserved in their original order.
#[must_use]
pub fn next_page_link(current: &Url, next_cursor: &str, limit: usize) -> Url {
    let retained: Vec<(String, String)> = current
        .query_pairs()
        .filter(|(name, _)| name != CURSOR_PARAM && name != LIMIT_PARAM)
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    let mut next = current.clone();
    {
        let mut pairs = next.query_pairs_mut();
        pairs.clear();
        for (name, value) in &retained {
            pairs.append_pair(name, value);
        }
        pairs.append_pair(CURSOR_PARAM, next_cursor);
        pairs.append_pair(LIMIT_PARAM, &limit.to_string());
    }
    next
}

#[cfg(test)]
mod tests {
    //! Unit coverage for link construction.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn replaces_cursor_and_keeps_filters() {
        let current =
            Url::parse("https://whoami.page/api/v1/posts?view=top&cursor=old&limit=3")
                .expect("url");
        let next = next_page_link(&current, "abc", 10);
        assert_eq!(
            next.as_str(),
            "https://whoami.page/api/v1/posts?view=top&cursor=abc&limit=10"
        );
    }
}
