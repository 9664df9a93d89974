mod patterns;

pub use patterns::PATTERNS;

use url::Url;

/// Known host sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SiteVariant {
    Imdb,
    JustWatch,
    Trakt,
    Google,
    Bing,
    #[default]
    Unknown,
}

impl SiteVariant {
    /// Sites that swap content without a full page load
    pub fn is_spa(&self) -> bool {
        matches!(self, Self::JustWatch | Self::Trakt)
    }
}

impl std::fmt::Display for SiteVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Imdb => write!(f, "imdb"),
            Self::JustWatch => write!(f, "justwatch"),
            Self::Trakt => write!(f, "trakt"),
            Self::Google => write!(f, "google"),
            Self::Bing => write!(f, "bing"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// JustWatch page type discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JustWatchPage {
    Detail,
    Search,
    Other,
}

/// Classify a page URL. Unparseable URLs are `Unknown`.
pub fn classify(url: &str) -> SiteVariant {
    Url::parse(url)
        .map(|u| classify_url(&u))
        .unwrap_or(SiteVariant::Unknown)
}

pub fn classify_url(url: &Url) -> SiteVariant {
    let Some(host) = url.host_str() else {
        return SiteVariant::Unknown;
    };
    let host = host.to_ascii_lowercase();
    let path = url.path();

    if host_matches(&host, "imdb.com") {
        SiteVariant::Imdb
    } else if host_matches(&host, "justwatch.com") {
        SiteVariant::JustWatch
    } else if host_matches(&host, "trakt.tv") {
        SiteVariant::Trakt
    } else if is_google_host(&host) && path.starts_with("/search") {
        SiteVariant::Google
    } else if host_matches(&host, "bing.com") && path.starts_with("/search") {
        SiteVariant::Bing
    } else {
        SiteVariant::Unknown
    }
}

/// Determine the JustWatch page type from a URL.
///
/// Detail paths are checked first so that slugs like `search-party`
/// are never mistaken for the search listing.
pub fn justwatch_page_kind(url: &str) -> JustWatchPage {
    let Ok(parsed) = Url::parse(url) else {
        return JustWatchPage::Other;
    };
    let path = parsed.path();

    if path.contains("/movie/") || path.contains("/tv-show/") {
        JustWatchPage::Detail
    } else if PATTERNS.justwatch_search.is_match(path) {
        JustWatchPage::Search
    } else {
        JustWatchPage::Other
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{domain}"))
}

fn is_google_host(host: &str) -> bool {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.strip_prefix("google.")
        .is_some_and(|tld| !tld.is_empty() && tld.split('.').all(|p| p.len() <= 3))
}
