// src/services/giveaways.rs

//! Giveaway listing scraper.
//!
//! Fetches the subscriber giveaways page and extracts one [`Posting`] per
//! list item. Parsing is all-or-nothing: a single malformed item fails the
//! whole fetch.

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Posting, SourceConfig};
use crate::services::PostingSource;
use crate::utils::{http, resolve_url};

const ITEM_SELECTOR: &str = ".list-view__item";
const TITLE_SELECTOR: &str = ".list-view__title span";
const SUMMARY_SELECTOR: &str = ".list-view__summary p";
const ANCHOR_SELECTOR: &str = ".list-view__anchor";
const IMAGE_SELECTOR: &str = ".list-view__image";

const LINK_ATTR: &str = "href";
const IMAGE_ATTR: &str = "data-src";

/// Compiled selectors for the listing layout.
struct ListingSelectors {
    item: Selector,
    title: Selector,
    summary: Selector,
    anchor: Selector,
    image: Selector,
}

impl ListingSelectors {
    fn new() -> Result<Self> {
        Ok(Self {
            item: parse_selector(ITEM_SELECTOR)?,
            title: parse_selector(TITLE_SELECTOR)?,
            summary: parse_selector(SUMMARY_SELECTOR)?,
            anchor: parse_selector(ANCHOR_SELECTOR)?,
            image: parse_selector(IMAGE_SELECTOR)?,
        })
    }
}

/// Scraper for the giveaways listing page.
pub struct GiveawayScraper {
    client: Client,
    listing_url: Url,
}

impl GiveawayScraper {
    /// Create a scraper for the configured listing page.
    pub fn new(source: &SourceConfig, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            listing_url: Url::parse(&source.listing_url)?,
        })
    }
}

#[async_trait]
impl PostingSource for GiveawayScraper {
    async fn fetch_postings(&self) -> Result<Vec<Posting>> {
        log::debug!("Fetching giveaways from {}", self.listing_url);
        let body = http::fetch_text(&self.client, self.listing_url.as_str()).await?;
        let postings = parse_listing(&body, &self.listing_url)?;
        log::info!("Fetched {} giveaways", postings.len());
        Ok(postings)
    }
}

/// Parse the listing HTML into postings, in document order.
///
/// Links are resolved against `base_url`. Image sources are resolved when
/// they can be and otherwise kept as written (see [`image_url`]).
pub fn parse_listing(html: &str, base_url: &Url) -> Result<Vec<Posting>> {
    let selectors = ListingSelectors::new()?;
    let document = Html::parse_document(html);

    document
        .select(&selectors.item)
        .enumerate()
        .map(|(index, item)| parse_item(item, index, &selectors, base_url))
        .collect()
}

fn parse_item(
    item: ElementRef<'_>,
    index: usize,
    selectors: &ListingSelectors,
    base_url: &Url,
) -> Result<Posting> {
    let title = element_text(first_match(item, &selectors.title, TITLE_SELECTOR, index)?);
    let description =
        element_text(first_match(item, &selectors.summary, SUMMARY_SELECTOR, index)?);

    let anchor = first_match(item, &selectors.anchor, ANCHOR_SELECTOR, index)?;
    let href = required_attr(anchor, LINK_ATTR, ANCHOR_SELECTOR, index)?;

    let image = first_match(item, &selectors.image, IMAGE_SELECTOR, index)?;
    let image_src = required_attr(image, IMAGE_ATTR, IMAGE_SELECTOR, index)?;

    Ok(Posting {
        title,
        description,
        link: resolve_url(base_url, href)?,
        image: image_url(base_url, image_src),
    })
}

/// Resolve a lazy-load image source against the listing URL.
///
/// An empty source stays empty and a source that cannot be resolved is kept
/// verbatim. Either way the posting still parses and its image download
/// fails later, which skips only that posting.
fn image_url(base_url: &Url, src: &str) -> String {
    let src = src.trim();
    if src.is_empty() {
        return String::new();
    }
    base_url
        .join(src)
        .map(String::from)
        .unwrap_or_else(|_| src.to_string())
}

fn first_match<'a>(
    item: ElementRef<'a>,
    selector: &Selector,
    selector_str: &str,
    index: usize,
) -> Result<ElementRef<'a>> {
    item.select(selector).next().ok_or_else(|| {
        AppError::parse(format!(
            "giveaway #{} has no element matching '{}'",
            index + 1,
            selector_str
        ))
    })
}

fn required_attr<'a>(
    element: ElementRef<'a>,
    attr: &str,
    selector_str: &str,
    index: usize,
) -> Result<&'a str> {
    element.value().attr(attr).ok_or_else(|| {
        AppError::parse(format!(
            "giveaway #{}: '{}' has no '{}' attribute",
            index + 1,
            selector_str,
            attr
        ))
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{StubServer, client};

    const LISTING: &str = r#"
<html><body>
  <ul class="list-view">
    <li class="list-view__item">
      <a class="list-view__anchor" href="/subscriber-giveaways/the-drones">
        <img class="list-view__image" data-src="https://cdn.rrr.org.au/drones.jpg" src="placeholder.gif">
        <h3 class="list-view__title"><span>
          Double Pass to The Drones
        </span></h3>
      </a>
      <div class="list-view__summary"><p>  Win a double pass to see <b>The Drones</b> live.  </p></div>
    </li>
    <li class="list-view__item">
      <a class="list-view__anchor" href="/subscriber-giveaways/film-festival">
        <img class="list-view__image" data-src="/media/festival.png">
        <h3 class="list-view__title"><span>Film Festival Tickets</span></h3>
      </a>
      <div class="list-view__summary"><p>Two tickets to opening night.</p></div>
    </li>
  </ul>
</body></html>
"#;

    fn base() -> Url {
        Url::parse("https://www.rrr.org.au/subscriber-giveaways").unwrap()
    }

    #[test]
    fn test_parse_listing_extracts_all_items() {
        let postings = parse_listing(LISTING, &base()).unwrap();
        assert_eq!(postings.len(), 2);

        assert_eq!(postings[0].title, "Double Pass to The Drones");
        assert_eq!(
            postings[0].description,
            "Win a double pass to see The Drones live."
        );
        assert_eq!(
            postings[0].link,
            "https://www.rrr.org.au/subscriber-giveaways/the-drones"
        );
        assert_eq!(postings[0].image, "https://cdn.rrr.org.au/drones.jpg");

        assert_eq!(postings[1].title, "Film Festival Tickets");
        assert_eq!(postings[1].image, "https://www.rrr.org.au/media/festival.png");
    }

    #[test]
    fn test_parse_listing_fields_are_trimmed_and_absolute() {
        for posting in parse_listing(LISTING, &base()).unwrap() {
            assert!(!posting.title.is_empty());
            assert_eq!(posting.title, posting.title.trim());
            assert!(!posting.description.is_empty());
            assert_eq!(posting.description, posting.description.trim());
            assert!(Url::parse(&posting.link).is_ok());
        }
    }

    #[test]
    fn test_parse_listing_without_items_is_empty() {
        let postings = parse_listing("<html><body><p>Nothing here</p></body></html>", &base())
            .unwrap();
        assert!(postings.is_empty());
    }

    #[test]
    fn test_missing_summary_fails_whole_listing() {
        let html = LISTING.replace(
            r#"<div class="list-view__summary"><p>Two tickets to opening night.</p></div>"#,
            "",
        );
        let err = parse_listing(&html, &base()).unwrap_err();
        match err {
            AppError::Parse(message) => {
                assert!(message.contains("#2"));
                assert!(message.contains(SUMMARY_SELECTOR));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_lazy_src_fails() {
        let html = LISTING.replace(r#"data-src="/media/festival.png""#, r#"src="/media/festival.png""#);
        let err = parse_listing(&html, &base()).unwrap_err();
        assert!(matches!(err, AppError::Parse(ref m) if m.contains("data-src")));
    }

    #[test]
    fn test_empty_lazy_src_stays_empty() {
        let html = LISTING.replace(r#"data-src="/media/festival.png""#, r#"data-src="  ""#);
        let postings = parse_listing(&html, &base()).unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[1].image, "");
        assert_ne!(postings[1].image, base().to_string());
    }

    #[test]
    fn test_unresolvable_lazy_src_is_kept_verbatim() {
        let html = LISTING.replace(
            r#"data-src="/media/festival.png""#,
            r#"data-src="http://[broken/festival.png""#,
        );
        let postings = parse_listing(&html, &base()).unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[1].image, "http://[broken/festival.png");
        assert_eq!(postings[0].image, "https://cdn.rrr.org.au/drones.jpg");
    }

    #[tokio::test]
    async fn test_fetch_postings_from_listing_page() {
        let server = StubServer::start(vec![(200, LISTING.as_bytes().to_vec())]).await;
        let source = SourceConfig {
            listing_url: server.url("/subscriber-giveaways"),
        };
        let scraper = GiveawayScraper::new(&source, client()).unwrap();

        let postings = scraper.fetch_postings().await.unwrap();
        assert_eq!(postings.len(), 2);
        assert_eq!(
            postings[0].link,
            server.url("/subscriber-giveaways/the-drones")
        );
    }

    #[tokio::test]
    async fn test_fetch_postings_non_success_is_retrieval_error() {
        let server = StubServer::start(vec![(503, Vec::new())]).await;
        let source = SourceConfig {
            listing_url: server.url("/subscriber-giveaways"),
        };
        let scraper = GiveawayScraper::new(&source, client()).unwrap();

        let err = scraper.fetch_postings().await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Retrieval {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                ..
            }
        ));
    }

    #[test]
    fn test_selectors_compile() {
        assert!(ListingSelectors::new().is_ok());
        assert!(parse_selector("[[invalid").is_err());
    }
}
