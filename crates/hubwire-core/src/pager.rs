//! Lazy pagination over a GET query.

use reqwest::Method;
use tracing::debug;

use crate::connection::Connection;
use crate::element::Element;
use crate::error::Result;
use crate::link::Params;

/// Single-use pager over successive pages of one paginated GET query.
///
/// Each page's request depends on the previous page's `next` link, so
/// iteration is strictly sequential. `&mut self` on [`Pager::next_page`]
/// makes the single-owner rule a compile-time guarantee.
///
/// ```ignore
/// let mut pager = Pager::new(&conn, "/user/issues", Params::new(), 0);
/// while let Some(page) = pager.next_page().await? {
///     for issue in page.as_array().unwrap_or(&[]) {
///         println!("{}", issue["title"]);
///     }
/// }
/// ```
pub struct Pager<'a> {
    conn: &'a Connection,
    uri: String,
    params: Params,
    max_pages: usize,
    count: usize,
    done: bool,
}

impl<'a> Pager<'a> {
    /// Create a pager. `max_pages == 0` means fetch until the API stops
    /// advertising a `next` relation.
    pub fn new(
        conn: &'a Connection,
        uri: impl Into<String>,
        params: Params,
        max_pages: usize,
    ) -> Self {
        Self {
            conn,
            uri: uri.into(),
            params,
            max_pages,
            count: 0,
            done: false,
        }
    }

    /// Fetch the next page, or `None` once pages are exhausted.
    ///
    /// Stops after `max_pages` pages (when nonzero) or when a response
    /// carries no `next` relation; no request is issued past either bound.
    pub async fn next_page(&mut self) -> Result<Option<Element>> {
        if self.done {
            return Ok(None);
        }

        self.count += 1;
        debug!(uri = %self.uri, page = self.count, "fetching page");

        let response = self
            .conn
            .send(Method::GET, &self.uri, Some(&self.params), None)
            .await?;

        if self.max_pages != 0 && self.count >= self.max_pages {
            self.done = true;
        } else if let Some(next) = response.parsed_link.get("next") {
            self.uri = next.uri.clone();
            self.params = next.params.clone();
        } else {
            self.done = true;
        }

        Ok(Some(response.parsed))
    }

    /// Drain the pager, collecting every remaining page.
    pub async fn collect_pages(mut self) -> Result<Vec<Element>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await? {
            pages.push(page);
        }
        Ok(pages)
    }
}

// =============================================================================
// Tests
// =============================================================================
