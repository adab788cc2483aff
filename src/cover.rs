//! Cover image resolution.
//!
//! Given an item's landing-page URL, fetch the page and try an ordered list
//! of strategies against it, taking the first hit:
//!
//! 1. Social-preview meta tags (`og:image` / `twitter:image`), with relative
//!    URLs resolved against the final post-redirect URL.
//! 2. A favicon-service URL keyed by the final page's domain.
//!
//! PubMed entries get one extra hop up front: the entry page links out to
//! the publisher's site, which carries far richer preview images than PubMed
//! itself, so the first "Full text links" anchor is followed and the same
//! strategy list runs against the publisher page.
//!
//! Feed-embedded media never reaches this module: the normalizer pre-seeds
//! the cover field and the assembler skips resolution for non-empty covers.
//! A failed page fetch yields an empty string; this module never errors.

use scraper::{Html, Selector};
use url::Url;

use crate::http;
use crate::utils::host_of;

const PUBMED_HOST: &str = "pubmed.ncbi.nlm.nih.gov";

const PREVIEW_META_SELECTORS: [&str; 4] = [
    "meta[property='og:image']",
    "meta[name='og:image']",
    "meta[name='twitter:image']",
    "meta[property='twitter:image']",
];

/// Resolve a representative image URL for a landing page, or an empty string
/// when the page cannot be fetched or yields nothing.
pub async fn resolve_cover(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    if host_of(url).as_deref() == Some(PUBMED_HOST) {
        if let Some(cover) = full_text_cover(url).await {
            return cover;
        }
    }
    page_cover(url).await.unwrap_or_default()
}

/// Fetch a page and run the cover strategies against it in order.
/// `None` when the fetch fails or no strategy produces a URL.
async fn page_cover(url: &str) -> Option<String> {
    let (body, final_url) = http::get_text(url).await.ok()?;

    let strategies: [fn(&str, &Url) -> Option<String>; 2] =
        [extract_preview_image, favicon_for_page];
    strategies
        .iter()
        .find_map(|strategy| strategy(&body, &final_url))
}

/// For PubMed entries: follow the first "Full text links" anchor and derive
/// a cover from the publisher page it points to.
async fn full_text_cover(url: &str) -> Option<String> {
    let (body, final_url) = http::get_text(url).await.ok()?;
    let full_text_url = {
        let document = Html::parse_document(&body);
        let selector = Selector::parse("section.full-text-links a[href]").unwrap();
        document
            .select(&selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| final_url.join(href).ok())
            .map(|u| u.to_string())
    }?;
    page_cover(&full_text_url).await
}

fn extract_preview_image(body: &str, final_url: &Url) -> Option<String> {
    let document = Html::parse_document(body);
    for selector in PREVIEW_META_SELECTORS {
        let sel = Selector::parse(selector).unwrap();
        let content = document
            .select(&sel)
            .next()
            .and_then(|m| m.value().attr("content"))
            .map(str::trim)
            .filter(|c| !c.is_empty());
        if let Some(content) = content {
            if let Ok(resolved) = final_url.join(content) {
                return Some(resolved.to_string());
            }
        }
    }
    None
}

/// Favicon-service fallback keyed by the final page's domain.
fn favicon_for_page(_body: &str, final_url: &Url) -> Option<String> {
    let host = final_url.host_str()?;
    Some(format!(
        "https://www.google.com/s2/favicons?sz=256&domain={host}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://journal.example.com/articles/123").unwrap()
    }

    #[test]
    fn test_extract_preview_image_og() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://cdn.example.com/img.png"/>
        </head><body></body></html>"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://cdn.example.com/img.png".to_string())
        );
    }

    #[test]
    fn test_extract_preview_image_resolves_relative() {
        let html = r#"<html><head>
            <meta name="twitter:image" content="/static/preview.jpg"/>
        </head></html>"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://journal.example.com/static/preview.jpg".to_string())
        );
    }

    #[test]
    fn test_extract_preview_image_prefers_og_over_twitter() {
        let html = r#"<html><head>
            <meta name="twitter:image" content="https://cdn.example.com/tw.png"/>
            <meta property="og:image" content="https://cdn.example.com/og.png"/>
        </head></html>"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://cdn.example.com/og.png".to_string())
        );
    }

    #[test]
    fn test_extract_preview_image_ignores_empty_content() {
        let html = r#"<html><head>
            <meta property="og:image" content="  "/>
            <meta name="twitter:image" content="https://cdn.example.com/tw.png"/>
        </head></html>"#;
        assert_eq!(
            extract_preview_image(html, &base()),
            Some("https://cdn.example.com/tw.png".to_string())
        );
    }

    #[test]
    fn test_extract_preview_image_none() {
        assert_eq!(extract_preview_image("<html></html>", &base()), None);
    }

    #[test]
    fn test_favicon_keyed_by_final_host() {
        let page = Url::parse("https://www.nature.com/articles/x?y=1").unwrap();
        assert_eq!(
            favicon_for_page("", &page),
            Some("https://www.google.com/s2/favicons?sz=256&domain=www.nature.com".to_string())
        );
    }

    #[test]
    fn test_strategies_fall_through_to_favicon() {
        let page = Url::parse("https://journal.example.com/a").unwrap();
        let strategies: [fn(&str, &Url) -> Option<String>; 2] =
            [extract_preview_image, favicon_for_page];
        let cover = strategies
            .iter()
            .find_map(|s| s("<html><head></head></html>", &page));
        assert_eq!(
            cover,
            Some("https://www.google.com/s2/favicons?sz=256&domain=journal.example.com".to_string())
        );
    }

    #[tokio::test]
    async fn test_resolve_cover_empty_url() {
        assert_eq!(resolve_cover("").await, "");
    }
}
