//! Result normalization
//!
//! The single place where provider-specific payload shapes are erased.
//! Every raw payload becomes a [`NormalizedResult`]; missing optionals
//! resolve to absent values, and malformed required fields (unparsable
//! URL, empty title) mark the result invalid instead of dropping it
//! here. The relevance gate excludes invalid results before scoring.

use crate::providers::{DirectoryBusiness, PlaceHit, RawResult, WebHit};
use crate::results::{NormalizedResult, ProviderKind};
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

// Query parameters that identify trackers rather than content.
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "ref", "source"];

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(20\d{2})\b").unwrap());

/// Map one raw provider payload into the uniform schema.
pub fn normalize(raw: RawResult) -> NormalizedResult {
    match raw {
        RawResult::Directory(business) => normalize_directory(business),
        RawResult::Places(place) => normalize_place(place),
        RawResult::Web(hit) => normalize_web(hit),
    }
}

fn normalize_directory(business: DirectoryBusiness) -> NormalizedResult {
    let title = business.name.unwrap_or_default().trim().to_string();
    let url = clean_url(business.url.as_deref().unwrap_or_default());

    let category = business
        .categories
        .first()
        .and_then(|c| c.title.clone())
        .unwrap_or_else(|| "Business".to_string());
    let city = business
        .location
        .as_ref()
        .and_then(|l| l.city.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let snippet = format!("{} in {}", category, city);

    let address = business.location.and_then(|l| l.address1).filter(|a| !a.is_empty());

    build(
        title,
        url,
        snippet,
        business.rating,
        business.review_count,
        business.price.filter(|p| !p.is_empty()),
        address,
        None,
        ProviderKind::Directory,
    )
}

fn normalize_place(place: PlaceHit) -> NormalizedResult {
    let title = place.name.unwrap_or_default().trim().to_string();

    // Many places have no website; fall back to a maps lookup so the
    // result stays linkable and keeps a deterministic domain.
    let url = match place.website.as_deref().filter(|w| !w.is_empty()) {
        Some(website) => clean_url(website),
        None => format!("https://maps.google.com/?q={}", urlencoding::encode(&title)),
    };

    let address = place.formatted_address.clone().filter(|a| !a.is_empty());
    let snippet = match &address {
        Some(addr) => format!("Place in {}", addr),
        None => "Place".to_string(),
    };

    let price = place
        .price_level
        .filter(|&level| level > 0)
        .map(|level| "$".repeat(level as usize));

    build(
        title,
        url,
        snippet,
        place.rating,
        place.user_ratings_total,
        price,
        address,
        None,
        ProviderKind::Places,
    )
}

fn normalize_web(hit: WebHit) -> NormalizedResult {
    let title = hit.title.clone().unwrap_or_default().trim().to_string();
    let url = clean_url(hit.link.as_deref().unwrap_or_default());

    let snippet = hit
        .snippet
        .clone()
        .filter(|s| !s.is_empty())
        .or_else(|| hit.metatag("og:description").map(str::to_string))
        .unwrap_or_default();

    let published_at = hit
        .metatag("article:published_time")
        .or_else(|| hit.metatag("og:updated_time"))
        .and_then(parse_published);

    build(
        title,
        url,
        snippet,
        None,
        None,
        None,
        None,
        published_at,
        ProviderKind::Web,
    )
}

#[allow(clippy::too_many_arguments)]
fn build(
    title: String,
    url: String,
    snippet: String,
    rating: Option<f64>,
    review_count: Option<u64>,
    price: Option<String>,
    address: Option<String>,
    published_at: Option<DateTime<Utc>>,
    provider: ProviderKind,
) -> NormalizedResult {
    let domain = domain_of(&url);
    let is_valid = !title.is_empty() && domain.is_some();

    NormalizedResult {
        title,
        url,
        domain: domain.unwrap_or_default(),
        snippet,
        rating,
        review_count,
        price,
        address,
        published_at,
        provider,
        is_valid,
    }
}

/// Host of `url`, lowercased with a leading `www.` removed. `None` when
/// the URL does not parse or has no host.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Strip tracking query parameters and the fragment. Unparsable URLs
/// pass through untouched so validity is judged once, in `build`.
fn clean_url(url: &str) -> String {
    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| {
            let key = key.to_lowercase();
            !key.starts_with("utm_") && !TRACKING_PARAMS.contains(&key.as_str())
        })
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    parsed.set_fragment(None);
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    parsed.to_string()
}

/// Parse a published timestamp: RFC 3339 first, then a bare date, then
/// a loose year (mapped to Jan 1 of that year).
fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    let year: i32 = YEAR.captures(value)?.get(1)?.as_str().parse().ok()?;
    Some(NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{DirectoryBusiness, PlaceHit, WebHit};

    fn web_hit(title: &str, link: &str) -> WebHit {
        WebHit {
            title: Some(title.to_string()),
            snippet: Some("some snippet".to_string()),
            link: Some(link.to_string()),
            display_link: None,
            pagemap: None,
        }
    }

    #[test]
    fn test_domain_derivation() {
        assert_eq!(
            domain_of("https://www.Example.com/path?q=1"),
            Some("example.com".to_string())
        );
        assert_eq!(domain_of("not a url"), None);
    }

    #[test]
    fn test_tracking_params_stripped() {
        let cleaned = clean_url("https://example.com/a?utm_source=x&id=7&gclid=abc#frag");
        assert_eq!(cleaned, "https://example.com/a?id=7");
    }

    #[test]
    fn test_unparsable_url_marks_invalid() {
        let result = normalize(RawResult::Web(web_hit("A title", "nonsense")));
        assert!(!result.is_valid);
        assert!(result.domain.is_empty());
    }

    #[test]
    fn test_empty_title_marks_invalid() {
        let result = normalize(RawResult::Web(web_hit("  ", "https://example.com")));
        assert!(!result.is_valid);
    }

    #[test]
    fn test_directory_snippet_synthesized() {
        let business = DirectoryBusiness {
            name: Some("Blue Bottle".to_string()),
            url: Some("https://www.yelp.com/biz/blue-bottle".to_string()),
            rating: Some(4.5),
            review_count: Some(812),
            price: Some("$$".to_string()),
            categories: vec![crate::providers::DirectoryCategory {
                title: Some("Coffee & Tea".to_string()),
            }],
            location: Some(crate::providers::DirectoryLocation {
                address1: Some("66 Mint St".to_string()),
                city: Some("San Francisco".to_string()),
            }),
        };

        let result = normalize(RawResult::Directory(business));
        assert!(result.is_valid);
        assert_eq!(result.snippet, "Coffee & Tea in San Francisco");
        assert_eq!(result.address.as_deref(), Some("66 Mint St"));
        assert_eq!(result.domain, "yelp.com");
    }

    #[test]
    fn test_place_without_website_gets_maps_url() {
        let place = PlaceHit {
            name: Some("Corner Cafe".to_string()),
            website: None,
            rating: Some(4.0),
            user_ratings_total: Some(120),
            price_level: Some(2),
            formatted_address: Some("1 Main St".to_string()),
            types: vec![],
        };

        let result = normalize(RawResult::Places(place));
        assert!(result.is_valid);
        assert_eq!(result.domain, "maps.google.com");
        assert_eq!(result.price.as_deref(), Some("$$"));
    }

    #[test]
    fn test_parse_published_forms() {
        assert!(parse_published("2025-06-01T12:00:00Z").is_some());
        assert!(parse_published("2025-06-01").is_some());
        let loose = parse_published("posted in 2023").unwrap();
        assert_eq!(loose.format("%Y-%m-%d").to_string(), "2023-01-01");
        assert!(parse_published("no date here").is_none());
    }
}
