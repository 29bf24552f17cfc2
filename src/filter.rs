//! Filters posts by score.

use crate::reddit::client::Error;
use crate::reddit::thing::Post;
use crate::view::Viewable;
use futures::{Stream, StreamExt};
use log::warn;
use std::io::{self, Write};
use std::pin::pin;

/// Keeps posts whose score meets a minimum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreFilter {
    min_score: i64,
}

impl ScoreFilter {
    /// Creates a filter that keeps posts scoring at least `min_score`.
    pub fn new(min_score: i64) -> Self {
        Self { min_score }
    }

    /// The lowest score a post may have and still be kept.
    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    /// True if `post` scores high enough to be kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use subreport::filter::ScoreFilter;
    /// use subreport::reddit::Post;
    /// let filter = ScoreFilter::new(10);
    /// assert!(filter.accepts(&Post::new("A", "http://x", 10)));
    /// assert!(!filter.accepts(&Post::new("B", "http://y", 9)));
    /// ```
    pub fn accepts(&self, post: &Post) -> bool {
        post.score() >= self.min_score
    }

    /// Drains `posts`, keeping those that score high enough, in order.
    ///
    /// Every kept post is also written to `out` as it arrives. Unsupported
    /// sort modes are reported on stderr and skipped; any other error stops
    /// the stream and is returned.
    pub async fn collect<S, W>(&self, posts: S, out: &mut W) -> Result<Vec<Post>, FilterError>
    where
        S: Stream<Item = Result<Post, Error>>,
        W: Write,
    {
        let mut posts = pin!(posts);
        let mut kept = Vec::new();

        while let Some(post) = posts.next().await {
            match post {
                Ok(post) if self.accepts(&post) => {
                    writeln!(out, "{}", post.view())?;
                    kept.push(post);
                }
                Ok(_) => {}
                Err(err) if !err.is_fatal() => {
                    warn!("{err}");
                    eprintln!("{err}");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(kept)
    }
}

/// An error that interrupted filtering.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// Posts could not be retrieved.
    #[error(transparent)]
    Fetch(#[from] Error),

    /// A kept post could not be written to the console.
    #[error("Could not write to console: {0}")]
    Console(#[from] io::Error),
}
