//! Sitemap and robots.txt rendering for crawlers.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};

use super::PostId;

/// How often crawlers should revisit a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    /// Revisit daily.
    Daily,
    /// Revisit weekly.
    Weekly,
}

impl ChangeFrequency {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

/// Post listed in the sitemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapPost {
    /// Author handle.
    pub username: String,
    /// Post identifier.
    pub id: PostId,
    /// Last modification, reported as `lastmod`.
    pub updated_at: DateTime<Utc>,
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute location.
    pub loc: String,
    /// Last modification date.
    pub last_modified: Option<NaiveDate>,
    /// Revisit hint.
    pub change_frequency: ChangeFrequency,
    /// Relative priority between 0 and 1.
    pub priority: f32,
}

/// Build sitemap entries for the home page, every profile, and every post.
pub fn sitemap_entries(
    base_url: &str,
    usernames: &[String],
    posts: &[SitemapPost],
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let mut entries = Vec::with_capacity(1 + usernames.len() + posts.len());
    entries.push(home_entry(base));
    entries.extend(usernames.iter().map(|username| SitemapEntry {
        loc: format!("{base}/{username}"),
        last_modified: None,
        change_frequency: ChangeFrequency::Daily,
        priority: 0.8,
    }));
    entries.extend(posts.iter().map(|post| SitemapEntry {
        loc: format!("{base}/{}/posts/{}", post.username, post.id),
        last_modified: Some(post.updated_at.date_naive()),
        change_frequency: ChangeFrequency::Weekly,
        priority: 0.6,
    }));
    entries
}

/// Entry for the site root, emitted even when listings fail.
pub fn home_entry(base_url: &str) -> SitemapEntry {
    SitemapEntry {
        loc: base_url.trim_end_matches('/').to_owned(),
        last_modified: None,
        change_frequency: ChangeFrequency::Daily,
        priority: 1.0,
    }
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Render entries as a sitemap `urlset` document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for entry in entries {
        xml.push_str("  <url>\n");
        // Writing to a String cannot fail.
        let _ = writeln!(xml, "    <loc>{}</loc>", escape_xml(&entry.loc));
        if let Some(date) = entry.last_modified {
            let _ = writeln!(xml, "    <lastmod>{}</lastmod>", date.format("%Y-%m-%d"));
        }
        let _ = writeln!(
            xml,
            "    <changefreq>{}</changefreq>",
            entry.change_frequency.as_str()
        );
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", entry.priority);
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Render robots.txt allowing every crawler and advertising the sitemap.
pub fn render_robots(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}
