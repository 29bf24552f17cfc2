// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! subreport is a command-line tool that gathers the best posts from a
//! handful of subreddits. It reads the newest, hottest, or top posts from
//! each subreddit in turn, keeps those that score high enough, prints them,
//! and saves them to `reddit_posts.csv` and `reddit_posts.pdf`.
//!
//! # Examples
//!
//! Save the five hottest posts from r/all that scored at least 10 points:
//!
//! ```bash
//! subreport
//! ```
//!
//! Save the top 20 posts of all time from r/rust and r/programming that
//! scored at least 500 points:
//!
//! ```bash
//! subreport --subreddits rust,programming --sort_by top --limit 20 --min_score 500
//! ```
//!
//! Write the reports somewhere other than the current directory:
//!
//! ```bash
//! subreport --subreddits rust --output_dir ~/reports
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! subreport --help
//! ```
//!
//! # Reddit API Setup
//!
//! subreport reads Reddit through its OAuth API, which requires an
//! application's credentials. To create them:
//!
//! 1. Sign in to Reddit and visit the [apps page].
//! 2. Create a new "script" application.
//! 3. Copy the application's client ID (shown under its name) and secret.
//! 4. Store them in the `$REDDIT_CLIENT_ID` and `$REDDIT_CLIENT_SECRET`
//!    environment variables, along with a descriptive user agent in
//!    `$REDDIT_USER_AGENT`, either by exporting them in your shell:
//!
//!    ```bash
//!    $ export REDDIT_CLIENT_ID='client id'
//!    $ export REDDIT_CLIENT_SECRET='client secret'
//!    $ export REDDIT_USER_AGENT='subreport/0.1 by your_username'
//!    ```
//!
//!    or by putting the same assignments (without `export`) in a `.env`
//!    file in the directory you run subreport from.
//!
//! subreport refuses to start if any of the three is unset.
//!
//! # License
//!
//! subreport is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [apps page]: https://www.reddit.com/prefs/apps

pub mod cli;
pub mod conf;
pub mod filter;
pub mod http;
pub mod reddit;
pub mod sink;
pub mod text;
pub mod view;

#[cfg(test)]
mod test_utils;
