// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit.

use crate::conf::Credentials;
use crate::http::{self, HTTPError, HTTPResult};
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tokio::sync::OnceCell;

const TOKEN_URI: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// The most posts Reddit will return in a single listing page.
pub const MAX_PAGE_SIZE: u32 = 100;

/// The ranking Reddit applies to a subreddit listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Currently popular posts.
    #[default]
    Hot,

    /// Newest posts first.
    New,

    /// Posts with the most even split of up- and downvotes.
    Controversial,

    /// Highest-scoring posts.
    Top,

    /// Posts that have received awards.
    Gilded,
}

impl SortMode {
    /// Every supported sort mode, in the order they are shown to users.
    pub const ALL: [SortMode; 5] = [
        SortMode::Hot,
        SortMode::New,
        SortMode::Controversial,
        SortMode::Top,
        SortMode::Gilded,
    ];

    /// The sort mode's name as it appears in listing URIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Hot => "hot",
            SortMode::New => "new",
            SortMode::Controversial => "controversial",
            SortMode::Top => "top",
            SortMode::Gilded => "gilded",
        }
    }

    // Without `t`, Reddit only ranks the past day.
    fn time_filter(&self) -> Option<&'static str> {
        match self {
            SortMode::Controversial | SortMode::Top => Some("all"),
            _ => None,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = UnsupportedSortMode;

    /// Parses a sort mode.
    ///
    /// # Examples
    ///
    /// ```
    /// use subreport::reddit::service::SortMode;
    /// assert_eq!("top".parse::<SortMode>().unwrap(), SortMode::Top);
    /// assert!("best".parse::<SortMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnsupportedSortMode(s.to_string()))
    }
}

/// A sort mode that Reddit does not offer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Unsupported sort mode: {0} (expected one of hot, new, controversial, top, gilded)")]
pub struct UnsupportedSortMode(pub String);

/// A service for retrieving subreddit listings.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Retrieves one page of at most `limit` posts from `subreddit`,
    /// ranked by `sort`, starting after the `after` cursor if given.
    ///
    /// Returns the raw JSON body of the listing.
    fn get_listing(
        &self,
        subreddit: &str,
        sort: SortMode,
        limit: u32,
        after: Option<&str>,
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Reddit API directly to retrieve information.
///
/// Requests are authenticated with an application-only OAuth token, which
/// is requested the first time a listing is retrieved and reused after
/// that.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
    credentials: Credentials,
    token: OnceCell<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

impl RedditService {
    /// Creates a new Reddit service that authenticates with `credentials`.
    ///
    /// No network requests are made until a listing is requested.
    pub fn new(credentials: Credentials) -> HTTPResult<Self> {
        let client = http::client(credentials.user_agent())?;
        Ok(Self {
            client,
            credentials,
            token: OnceCell::new(),
        })
    }

    fn uri(
        &self,
        subreddit: &str,
        sort: SortMode,
        limit: u32,
        after: Option<&str>,
    ) -> HTTPResult<Url> {
        let mut params = vec![
            ("limit", limit.to_string()),
            ("raw_json", String::from("1")),
        ];
        if let Some(t) = sort.time_filter() {
            params.push(("t", String::from(t)));
        }
        if let Some(after) = after {
            params.push(("after", String::from(after)));
        }

        let mut uri = Url::parse(API_BASE)?;
        uri.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["r", subreddit, sort.as_str()]);
        uri.query_pairs_mut().extend_pairs(&params);
        Ok(uri)
    }

    async fn access_token(&self) -> HTTPResult<&str> {
        let token = self
            .token
            .get_or_try_init(|| self.request_token())
            .await?;
        Ok(token.as_str())
    }

    async fn request_token(&self) -> HTTPResult<String> {
        debug!("requesting access token from {TOKEN_URI}");
        let resp = self
            .client
            .post(TOKEN_URI)
            .basic_auth(
                self.credentials.client_id(),
                Some(self.credentials.client_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;
        let body = http::json_body(resp).await?;
        let token = serde_json::from_str::<TokenResponse>(&body)
            .map_err(|err| HTTPError::Auth(err.to_string()))?;

        match token {
            TokenResponse {
                access_token: Some(access_token),
                ..
            } => Ok(access_token),
            TokenResponse { error, .. } => Err(HTTPError::Auth(
                error.unwrap_or_else(|| String::from("no access token in response")),
            )),
        }
    }
}

impl Service for RedditService {
    async fn get_listing(
        &self,
        subreddit: &str,
        sort: SortMode,
        limit: u32,
        after: Option<&str>,
    ) -> HTTPResult<String> {
        let uri = self.uri(subreddit, sort, limit, after)?;
        let token = self.access_token().await?;
        debug!("GET {uri}");
        let resp = self.client.get(uri).bearer_auth(token).send().await?;
        http::json_body(resp).await
    }
}

#[cfg(test)]
mod tests {
    mod sort_mode {
        use super::super::*;

        #[test]
        fn it_parses_every_sort_mode() {
            for mode in SortMode::ALL {
                assert_eq!(mode.as_str().parse::<SortMode>(), Ok(mode));
            }
        }

        #[test]
        fn it_rejects_unknown_sort_modes() {
            let err = "rising".parse::<SortMode>().unwrap_err();
            assert_eq!(err, UnsupportedSortMode(String::from("rising")));
        }

        #[test]
        fn it_is_case_sensitive() {
            assert!("Top".parse::<SortMode>().is_err());
        }

        #[test]
        fn it_defaults_to_hot() {
            assert_eq!(SortMode::default(), SortMode::Hot);
        }
    }

    mod reddit_service {
        use super::super::*;

        fn service() -> RedditService {
            let creds = Credentials::new("id", "secret", "subreport-test/0.1");
            RedditService::new(creds).unwrap()
        }

        #[test]
        fn it_returns_a_uri_for_hot_posts() {
            let actual_uri = service().uri("rust", SortMode::Hot, 5, None).unwrap();
            let expected_uri = "https://oauth.reddit.com/r/rust/hot?limit=5&raw_json=1";
            assert_eq!(actual_uri.as_str(), expected_uri);
        }

        #[test]
        fn it_returns_a_uri_for_top_posts_of_all_time() {
            let actual_uri = service().uri("rust", SortMode::Top, 2, None).unwrap();
            let expected_uri = "https://oauth.reddit.com/r/rust/top?limit=2&raw_json=1&t=all";
            assert_eq!(actual_uri.as_str(), expected_uri);
        }

        #[test]
        fn it_returns_a_uri_for_controversial_posts_of_all_time() {
            let actual_uri = service()
                .uri("rust", SortMode::Controversial, 10, None)
                .unwrap();
            let expected_uri =
                "https://oauth.reddit.com/r/rust/controversial?limit=10&raw_json=1&t=all";
            assert_eq!(actual_uri.as_str(), expected_uri);
        }

        #[test]
        fn it_returns_a_uri_for_gilded_posts() {
            let actual_uri = service().uri("all", SortMode::Gilded, 5, None).unwrap();
            let expected_uri = "https://oauth.reddit.com/r/all/gilded?limit=5&raw_json=1";
            assert_eq!(actual_uri.as_str(), expected_uri);
        }

        #[test]
        fn it_returns_a_uri_for_the_next_page() {
            let actual_uri = service()
                .uri("rust", SortMode::New, 100, Some("t3_1c0ffee"))
                .unwrap();
            let expected_uri =
                "https://oauth.reddit.com/r/rust/new?limit=100&raw_json=1&after=t3_1c0ffee";
            assert_eq!(actual_uri.as_str(), expected_uri);
        }

        #[test]
        fn it_escapes_subreddit_names() {
            let actual_uri = service()
                .uri("rust?limit=100&x=", SortMode::Hot, 5, None)
                .unwrap();
            let expected_uri =
                "https://oauth.reddit.com/r/rust%3Flimit=100&x=/hot?limit=5&raw_json=1";
            assert_eq!(actual_uri.as_str(), expected_uri);
            assert_eq!(actual_uri.query(), Some("limit=5&raw_json=1"));
        }

        #[test]
        fn it_keeps_slashes_out_of_the_path() {
            let actual_uri = service().uri("rust/new", SortMode::Top, 1, None).unwrap();
            let segments = actual_uri.path_segments().unwrap().collect::<Vec<_>>();
            assert_eq!(segments, vec!["r", "rust%2Fnew", "top"]);
        }

        #[test]
        fn it_does_not_request_a_token_until_needed() {
            assert!(service().token.get().is_none());
        }
    }
}
