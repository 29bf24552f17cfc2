use crate::http::{HTTPError, HTTPResult};
use crate::reddit::service::{Service, SortMode};
use crate::reddit::thing::Post;
use serde_json::json;
use std::collections::HashMap;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::{env, fs};

pub fn do_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A fresh, empty directory under the system temp dir that is removed,
/// along with everything in it, when dropped.
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl Deref for TempDir {
    type Target = Path;

    fn deref(&self) -> &Path {
        &self.path
    }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Creates a [`TempDir`]. Keep it bound for as long as the test needs it.
pub fn temp_dir() -> TempDir {
    let path = env::temp_dir().join(format!("subreport-test-{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&path).expect("could not create temp dir");
    TempDir { path }
}

/// A listing request received by a [`TestService`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestRequest {
    subreddit: String,
    sort: SortMode,
    limit: u32,
    after: Option<String>,
}

impl TestRequest {
    pub fn new(subreddit: &str, sort: SortMode, limit: u32, after: Option<&str>) -> Self {
        Self {
            subreddit: subreddit.to_string(),
            sort,
            limit,
            after: after.map(String::from),
        }
    }
}

#[derive(Clone, Debug)]
enum Entry {
    Post(Post),
    Comment { body: String, score: i64 },
}

/// Serves canned listings instead of talking to Reddit.
///
/// Subreddits without a listing respond with HTTP 404. Pagination cursors
/// are `t3_<index>`, where `<index>` is the position of the last entry
/// on the previous page.
#[derive(Debug, Default)]
pub struct TestService {
    listings: HashMap<String, Vec<Entry>>,
    requests: Mutex<Vec<TestRequest>>,
}

impl TestService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, subreddit: &str, posts: &[(&str, i64)]) -> Self {
        let posts = posts
            .iter()
            .map(|(title, score)| {
                let url = format!("https://example.com/r/{subreddit}/{title}");
                Entry::Post(Post::new(*title, url, *score))
            })
            .collect::<Vec<_>>();
        self.listings
            .entry(subreddit.to_string())
            .or_default()
            .extend(posts);
        self
    }

    /// Appends comments to `subreddit`'s listing, the way gilded listings
    /// mix them in with posts.
    pub fn with_comments(mut self, subreddit: &str, comments: &[(&str, i64)]) -> Self {
        let comments = comments.iter().map(|(body, score)| Entry::Comment {
            body: body.to_string(),
            score: *score,
        });
        self.listings
            .entry(subreddit.to_string())
            .or_default()
            .extend(comments);
        self
    }

    pub fn requests(&self) -> Vec<TestRequest> {
        self.requests.lock().expect("poisoned").clone()
    }
}

impl Service for TestService {
    async fn get_listing(
        &self,
        subreddit: &str,
        sort: SortMode,
        limit: u32,
        after: Option<&str>,
    ) -> HTTPResult<String> {
        self.requests
            .lock()
            .expect("poisoned")
            .push(TestRequest::new(subreddit, sort, limit, after));

        let entries = self
            .listings
            .get(subreddit)
            .ok_or(HTTPError::Http(reqwest::StatusCode::NOT_FOUND))?;

        let start = after
            .and_then(|cursor| cursor.strip_prefix("t3_"))
            .and_then(|index| index.parse::<usize>().ok())
            .map_or(0, |index| index + 1);
        let end = (start + limit as usize).min(entries.len());
        let page = entries.get(start..end).unwrap_or_default();
        let next = (end < entries.len() && !page.is_empty()).then(|| format!("t3_{}", end - 1));

        let children = page
            .iter()
            .map(|entry| match entry {
                Entry::Post(post) => json!({
                    "kind": "t3",
                    "data": {
                        "subreddit": subreddit,
                        "title": post.title(),
                        "url": post.url(),
                        "score": post.score(),
                    }
                }),
                Entry::Comment { body, score } => json!({
                    "kind": "t1",
                    "data": {
                        "subreddit": subreddit,
                        "body": body,
                        "score": score,
                    }
                }),
            })
            .collect::<Vec<_>>();
        let listing = json!({
            "kind": "Listing",
            "data": { "after": next, "before": null, "children": children }
        });

        Ok(listing.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_removes_the_temp_dir_when_dropped() {
        let dir = temp_dir();
        fs::write(dir.join("reddit_posts.csv"), "Title,URL,Score\n").unwrap();
        let path = dir.to_path_buf();
        assert!(path.is_dir());

        drop(dir);

        assert!(!path.exists());
    }
}
