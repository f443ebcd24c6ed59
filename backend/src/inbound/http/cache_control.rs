//! Shared cache-control policies for HTTP handlers.

/// Private responses must always be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Health responses must never be cached.
pub const NO_STORE: &str = "no-store";

/// Crawler documents may be shared for an hour.
pub const PUBLIC_CRAWLER_MAX_AGE: &str = "public, max-age=3600";

/// Header for responses scoped to the signed-in user.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}

/// Header for health checks.
pub const fn no_store_header() -> (&'static str, &'static str) {
    ("Cache-Control", NO_STORE)
}

/// Header for the sitemap and robots documents.
pub const fn crawler_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PUBLIC_CRAWLER_MAX_AGE)
}
