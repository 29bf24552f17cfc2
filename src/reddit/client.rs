// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading data from the Reddit API.

use crate::http;
use crate::reddit::service::{MAX_PAGE_SIZE, Service, SortMode, UnsupportedSortMode};
use crate::reddit::thing::{Listing, Post};
use futures::stream::{self, Stream, StreamExt};
use futures::future;
use log::{info, warn};
use thiserror::Error;

/// Splits a comma-separated list of subreddit names.
///
/// Surrounding whitespace is trimmed from each name, and names that are
/// empty after trimming are skipped.
///
/// # Examples
///
/// ```
/// use subreport::reddit::client::parse_subreddits;
/// assert_eq!(parse_subreddits(" rust, programming "), vec!["rust", "programming"]);
/// assert_eq!(parse_subreddits("rust,,golang"), vec!["rust", "golang"]);
/// ```
pub fn parse_subreddits(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| {
            if name.is_empty() {
                warn!("skipping empty subreddit name in {list:?}");
            }
            !name.is_empty()
        })
        .map(String::from)
        .collect()
}

/// Retrieves posts from one or more subreddits.
#[derive(Debug)]
pub struct PostFetcher<'a, S: Service> {
    service: &'a S,
    subreddits: Vec<String>,
    sort_by: String,
    limit: u32,
}

impl<'a, S: Service> PostFetcher<'a, S> {
    /// Creates a new fetcher that pulls up to `limit` posts from each of
    /// the `subreddits`, ranked by `sort_by`.
    ///
    /// `sort_by` is parsed when each subreddit is fetched; if it is not a
    /// valid [`SortMode`], every subreddit yields an
    /// [`Error::UnsupportedSortMode`] instead of posts.
    pub fn new(
        service: &'a S,
        subreddits: Vec<String>,
        sort_by: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            service,
            subreddits,
            sort_by: sort_by.into(),
            limit,
        }
    }

    /// The subreddits posts are retrieved from, in order.
    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    /// Streams posts from each subreddit in turn.
    ///
    /// A subreddit's listing is only requested once the stream has been
    /// drained of the previous subreddit's posts. Posts appear in the order
    /// Reddit ranks them, subreddit by subreddit. A subreddit that cannot
    /// be fetched yields a single error in place of its posts.
    pub fn posts(&self) -> impl Stream<Item = Result<Post, Error>> + '_ {
        stream::iter(&self.subreddits)
            .then(move |name| self.fetch_subreddit(name))
            .flat_map(|batch| match batch {
                Ok(posts) => stream::iter(posts.into_iter().map(Ok)).left_stream(),
                Err(err) => stream::once(future::ready(Err(err))).right_stream(),
            })
    }

    async fn fetch_subreddit(&self, name: &str) -> Result<Vec<Post>, Error> {
        let sort = self.sort_by.parse::<SortMode>()?;
        let limit = self.limit as usize;
        let mut posts = Vec::with_capacity(limit.min(MAX_PAGE_SIZE as usize));
        let mut after: Option<String> = None;

        while posts.len() < limit {
            let page_size = (limit - posts.len()).min(MAX_PAGE_SIZE as usize);
            let body = self
                .service
                .get_listing(name, sort, page_size as u32, after.as_deref())
                .await?;
            let listing = Listing::parse(&body)?;
            if listing.children() == 0 {
                break;
            }

            after = listing.after().map(String::from);
            posts.extend(listing.into_posts().take(page_size));
            if after.is_none() {
                break;
            }
        }

        info!("retrieved {} posts from r/{name} ({sort})", posts.len());
        Ok(posts)
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested ranking is not one Reddit offers.
    #[error(transparent)]
    UnsupportedSortMode(#[from] UnsupportedSortMode),

    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] http::HTTPError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl Error {
    /// True if the error should abort the whole run rather than just
    /// the subreddit it occurred for.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::UnsupportedSortMode(_))
    }
}
