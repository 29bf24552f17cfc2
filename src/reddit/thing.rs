// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! A "thing" in the Reddit sense.
//!
//! Historically in the Reddit API and its old source code, a "Thing" was
//! any element of the Reddit system: users, posts, comments, etc. This
//! module parses the pieces of listing responses we care about and turns
//! them into [`Post`] records.

use log::debug;
use serde::Deserialize;

/// The title, URL, and score of a single Reddit post.
///
/// This is everything the reports need; the rest of the post's data is
/// discarded as soon as a listing is parsed.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Post {
    title: String,
    url: String,
    score: i64,
}

impl Post {
    /// Creates a new post record.
    pub fn new(title: impl Into<String>, url: impl Into<String>, score: i64) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            score,
        }
    }

    /// The post's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The post's URL.
    ///
    /// For link posts this is the linked article; for self posts it is
    /// the post's permalink.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The post's score (upvotes minus downvotes, as fuzzed by Reddit).
    pub fn score(&self) -> i64 {
        self.score
    }
}

/// The kind Reddit gives to posts ("links") in a listing.
pub const POST_KIND: &str = "t3";

/// One page of posts from a subreddit listing.
///
/// Some listings (gilded ones in particular) mix comments in with posts.
/// Anything that is not a post is dropped when the page is parsed.
#[derive(Debug)]
pub struct Listing {
    posts: Vec<Post>,
    children: usize,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawListing {
    data: RawListingData,
}

#[derive(Debug, Deserialize)]
struct RawListingData {
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: serde_json::Value,
}

impl Listing {
    /// Parses a listing from the raw body of a listing response.
    pub fn parse(listing_data: &str) -> Result<Self, serde_json::Error> {
        let RawListing { data } = serde_json::from_str(listing_data)?;
        let children = data.children.len();
        let posts = data
            .children
            .into_iter()
            .filter(|thing| thing.kind == POST_KIND)
            .map(|thing| serde_json::from_value::<Post>(thing.data))
            .collect::<Result<Vec<_>, _>>()?;
        if posts.len() < children {
            debug!("skipped {} things that are not posts", children - posts.len());
        }

        Ok(Self {
            posts,
            children,
            after: data.after,
        })
    }

    /// The pagination cursor for the next page, if there is one.
    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    /// Number of posts on this page.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// True if the page contains no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Number of things on the page, counting the ones that are not posts.
    ///
    /// Zero means the listing has nothing left to give.
    pub fn children(&self) -> usize {
        self.children
    }

    /// Consumes the page, returning its posts in listing order.
    pub fn into_posts(self) -> impl Iterator<Item = Post> {
        self.posts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn load_data(file: &str) -> String {
        fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
    }

    #[test]
    fn it_parses_a_listing() {
        let listing = Listing::parse(&load_data("listing_rust_hot")).unwrap();
        assert_eq!(listing.len(), 3);
        assert_eq!(listing.after(), Some("t3_1c0ffee"));
    }

    #[test]
    fn it_returns_posts_in_listing_order() {
        let listing = Listing::parse(&load_data("listing_rust_hot")).unwrap();
        let posts = listing.into_posts().collect::<Vec<_>>();
        let titles = posts.iter().map(Post::title).collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec![
                "What's everyone working on this week (15/2025)?",
                "Announcing Rust 1.86.0 & friends",
                "Why does the borrow checker hate me?",
            ]
        );
        assert_eq!(posts[1].url(), "https://blog.rust-lang.org/2025/04/03/Rust-1.86.0.html");
        assert_eq!(posts[1].score(), 912);
        assert_eq!(posts[2].score(), -4);
    }

    #[test]
    fn it_parses_the_last_page() {
        let data = r#"{"kind": "Listing", "data": {"after": null, "children": []}}"#;
        let listing = Listing::parse(data).unwrap();
        assert!(listing.is_empty());
        assert!(listing.after().is_none());
    }

    #[test]
    fn it_skips_comments_in_gilded_listings() {
        let listing = Listing::parse(&load_data("listing_rust_gilded")).unwrap();
        assert_eq!(listing.children(), 3);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.after(), Some("t3_1b0a7ed"));
        let titles = listing
            .into_posts()
            .map(|post| post.title().to_string())
            .collect::<Vec<_>>();
        assert_eq!(
            titles,
            vec!["Rust 2024 is stable!", "I rewrote our build tool in Rust"]
        );
    }

    #[test]
    fn it_counts_children_on_a_page_of_only_comments() {
        let data = r#"{"kind": "Listing", "data": {"after": "t1_abc", "children": [
            {"kind": "t1", "data": {"body": "nice", "link_title": "Hello", "score": 4}}
        ]}}"#;
        let listing = Listing::parse(data).unwrap();
        assert!(listing.is_empty());
        assert_eq!(listing.children(), 1);
    }

    #[test]
    fn it_rejects_posts_without_a_title() {
        let data = r#"{"kind": "Listing", "data": {"after": null, "children": [
            {"kind": "t3", "data": {"url": "https://example.com", "score": 4}}
        ]}}"#;
        assert!(Listing::parse(data).is_err());
    }

    #[test]
    fn it_rejects_garbage() {
        assert!(Listing::parse("<html>nope</html>").is_err());
    }
}
