use std::{env, fmt, str::FromStr, time::Duration};

use eventdesk_core::cache::QueryOptions;
use eventdesk_core::provider::ContentTypes;

/// What a service does when a read fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadFallback {
    /// Return the error to the caller.
    #[default]
    Surface,
    /// Log the error and serve the demo data instead.
    Demo,
}

impl FromStr for ReadFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "surface" => Ok(ReadFallback::Surface),
            "demo" => Ok(ReadFallback::Demo),
            other => Err(format!("unknown read fallback: {other}")),
        }
    }
}

impl fmt::Display for ReadFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadFallback::Surface => write!(f, "surface"),
            ReadFallback::Demo => write!(f, "demo"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// CMS space id (default: empty)
    pub space_id: String,
    /// CMS environment (default: "master")
    pub environment: String,
    pub delivery_token: String,
    pub preview_token: String,
    pub management_token: String,
    /// Locale used to wrap management fields (default: "en-US")
    pub locale: String,
    /// Delivery API base URL override
    pub delivery_url: Option<String>,
    /// Preview API base URL override
    pub preview_url: Option<String>,
    /// Management API base URL override
    pub management_url: Option<String>,
    /// Upload API base URL override
    pub upload_url: Option<String>,
    /// Content type ids per resource kind
    pub content_types: ContentTypes,
    /// Page size for listings (default: 50)
    pub page_size: u32,
    /// Seconds a cached value stays fresh (default: 30)
    pub query_stale_seconds: u64,
    /// Seconds an unobserved cache entry survives (default: 300)
    pub query_gc_seconds: u64,
    /// Maximum number of cache entries (default: 1,000)
    pub cache_max_entries: usize,
    /// Per-fetch timeout in milliseconds (default: 10,000)
    pub fetch_timeout_ms: u64,
    /// Retries after a transport error or timeout (default: 1)
    pub fetch_retries: u32,
    /// Read failure policy (default: surface)
    pub read_fallback: ReadFallback,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CONTENTFUL_SPACE_ID`, `CONTENTFUL_ENVIRONMENT` (default: "master")
    /// - `CONTENTFUL_DELIVERY_TOKEN`, `CONTENTFUL_PREVIEW_TOKEN`,
    ///   `CONTENTFUL_MANAGEMENT_TOKEN`
    /// - `CONTENTFUL_LOCALE` (default: "en-US")
    /// - `CONTENTFUL_DELIVERY_URL`, `CONTENTFUL_PREVIEW_URL`,
    ///   `CONTENTFUL_MANAGEMENT_URL`, `CONTENTFUL_UPLOAD_URL` (optional)
    /// - `CONTENT_TYPE_EVENT` (default: "event"), `CONTENT_TYPE_CATEGORY`
    ///   (default: "category"), `CONTENT_TYPE_SPEAKER` (default: "speaker"),
    ///   `CONTENT_TYPE_ORGANIZER` (default: "author")
    /// - `PAGE_SIZE` (default: 50)
    /// - `QUERY_STALE_SECONDS` (default: 30), `QUERY_GC_SECONDS` (default: 300)
    /// - `CACHE_MAX_ENTRIES` (default: 1,000)
    /// - `FETCH_TIMEOUT_MS` (default: 10,000), `FETCH_RETRIES` (default: 1)
    /// - `READ_FALLBACK` - "surface" or "demo" (default: "surface")
    pub fn from_env() -> Self {
        let defaults = ContentTypes::default();

        Self {
            space_id: env::var("CONTENTFUL_SPACE_ID").unwrap_or_default(),
            environment: env::var("CONTENTFUL_ENVIRONMENT")
                .unwrap_or_else(|_| "master".to_string()),
            delivery_token: env::var("CONTENTFUL_DELIVERY_TOKEN").unwrap_or_default(),
            preview_token: env::var("CONTENTFUL_PREVIEW_TOKEN").unwrap_or_default(),
            management_token: env::var("CONTENTFUL_MANAGEMENT_TOKEN").unwrap_or_default(),
            locale: env::var("CONTENTFUL_LOCALE").unwrap_or_else(|_| "en-US".to_string()),
            delivery_url: env::var("CONTENTFUL_DELIVERY_URL").ok(),
            preview_url: env::var("CONTENTFUL_PREVIEW_URL").ok(),
            management_url: env::var("CONTENTFUL_MANAGEMENT_URL").ok(),
            upload_url: env::var("CONTENTFUL_UPLOAD_URL").ok(),
            content_types: ContentTypes {
                event: env::var("CONTENT_TYPE_EVENT").unwrap_or(defaults.event),
                category: env::var("CONTENT_TYPE_CATEGORY").unwrap_or(defaults.category),
                speaker: env::var("CONTENT_TYPE_SPEAKER").unwrap_or(defaults.speaker),
                organizer: env::var("CONTENT_TYPE_ORGANIZER").unwrap_or(defaults.organizer),
            },
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
            query_stale_seconds: env::var("QUERY_STALE_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            query_gc_seconds: env::var("QUERY_GC_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            fetch_retries: env::var("FETCH_RETRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
            read_fallback: env::var("READ_FALLBACK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Cache tuning derived from this configuration.
    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            stale_time: Duration::from_secs(self.query_stale_seconds),
            gc_time: Duration::from_secs(self.query_gc_seconds),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            retry: self.fetch_retries,
            max_entries: self.cache_max_entries,
            ..QueryOptions::default()
        }
    }

    /// Get the GC sweep interval: a fifth of the GC time, at least a second.
    pub fn gc_interval(&self) -> Duration {
        Duration::from_secs((self.query_gc_seconds / 5).max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
