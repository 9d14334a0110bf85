use super::http::{ApiClient, HttpResponse};
use crate::core::error::{KeySyncError, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Items requested per page
pub const PER_PAGE: u32 = 100;

lazy_static! {
    static ref LINK_NEXT: Regex = Regex::new(r#"<([^>]*)>\s*;\s*rel="next""#).unwrap();
    static ref PAGE_PARAM: Regex = Regex::new(r"[?&]page=(\d+)").unwrap();
}

/// One page of a listing plus the server's cursor for the next one
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page: Option<u32>,
}

/// Everything accumulated before pagination stopped
#[derive(Debug)]
pub struct Paged<T> {
    pub items: Vec<T>,
    /// Set when a request failed; `items` then holds the pages fetched before it
    pub error: Option<KeySyncError>,
}

/// Next page number announced by the server, `None` at the end.
///
/// GitLab sends `X-Next-Page` (empty on the last page); GitHub sends a
/// `Link` header with a `rel="next"` entry.
pub fn next_page(response: &HttpResponse) -> Option<u32> {
    if let Some(value) = response.header("X-Next-Page") {
        return value.trim().parse().ok().filter(|page| *page > 0);
    }

    let link = response.header("Link")?;
    let next = LINK_NEXT.captures(link)?.get(1)?.as_str();
    PAGE_PARAM
        .captures(next)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
        .filter(|page| *page > 0)
}

fn page_path(path: &str, page: u32) -> String {
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}per_page={}&page={}", path, separator, PER_PAGE, page)
}

impl ApiClient {
    /// Fetch a single page of a listing
    pub async fn get_page<T: DeserializeOwned>(&self, path: &str, page: u32) -> Result<Page<T>> {
        let response = self.get(&page_path(path, page)).await?;
        Ok(Page {
            next_page: next_page(&response),
            items: response.json()?,
        })
    }

    /// Follow the page cursor until the server reports no next page or a
    /// request fails. A failure stops pagination without discarding what
    /// was already collected.
    pub async fn get_all<T: DeserializeOwned>(&self, path: &str) -> Paged<T> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            match self.get_page::<T>(path, page).await {
                Ok(result) => {
                    debug!("{} page {}: +{} items", path, page, result.items.len());
                    items.extend(result.items);

                    match result.next_page {
                        Some(next) if next > page => page = next,
                        _ => break,
                    }
                }
                Err(e) => {
                    return Paged {
                        items,
                        error: Some(e),
                    }
                }
            }
        }

        Paged { items, error: None }
    }
}
