// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::conf::{self, Credentials, CredentialsError};
use crate::filter::{FilterError, ScoreFilter};
use crate::http::HTTPError;
use crate::reddit::client::{PostFetcher, parse_subreddits};
use crate::reddit::service::{RedditService, Service};
use crate::reddit::thing::Post;
use crate::sink::{CsvSink, PdfSink, Sink, WriteError};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colored::Colorize;
use itertools::Itertools;
use log::{LevelFilter, debug, error};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use thiserror::Error;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{} {message}", "error:".red().bold());
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Collects the best posts from a handful of subreddits into CSV and PDF reports", long_about = None)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Comma-separated subreddit names
    #[arg(long, default_value = "all")]
    subreddits: String,

    /// Sort by: hot, new, controversial, top, or gilded
    #[arg(long = "sort_by", value_name = "SORT", default_value = "hot")]
    sort_by: String,

    /// Maximum number of posts to fetch from each subreddit
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    limit: i64,

    /// Minimum score for a post to be included
    #[arg(long = "min_score", default_value_t = 10, allow_negative_numbers = true)]
    min_score: i64,

    /// Directory to write reddit_posts.csv and reddit_posts.pdf into
    #[arg(long = "output_dir", value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,
}

impl Config {
    /// The log level selected with `-v` and `-q`.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.verbosity.log_level_filter()
    }

    /// Checks the configuration and returns an immutable copy of the
    /// settings a run needs.
    pub fn validate(&self) -> Result<RunConfig, ConfigError> {
        validate(self.min_score, self.limit)?;
        let limit = u32::try_from(self.limit).map_err(|_| ConfigError::LimitTooLarge(self.limit))?;
        Ok(RunConfig {
            subreddits: parse_subreddits(&self.subreddits),
            sort_by: self.sort_by.clone(),
            limit,
            min_score: self.min_score,
            output_dir: self.output_dir.clone(),
        })
    }
}

/// Fails if either `min_score` or `limit` is negative.
///
/// The minimum score is checked first.
///
/// # Examples
///
/// ```
/// use subreport::cli::{ConfigError, validate};
/// assert!(validate(10, 5).is_ok());
/// assert_eq!(validate(-1, -1), Err(ConfigError::NegativeMinScore(-1)));
/// assert_eq!(validate(0, -1), Err(ConfigError::NegativeLimit(-1)));
/// ```
pub fn validate(min_score: i64, limit: i64) -> Result<(), ConfigError> {
    if min_score < 0 {
        Err(ConfigError::NegativeMinScore(min_score))
    } else if limit < 0 {
        Err(ConfigError::NegativeLimit(limit))
    } else {
        Ok(())
    }
}

/// Validated settings for a single run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    subreddits: Vec<String>,
    sort_by: String,
    limit: u32,
    min_score: i64,
    output_dir: PathBuf,
}

impl RunConfig {
    /// Subreddits to read, in order.
    pub fn subreddits(&self) -> &[String] {
        &self.subreddits
    }

    /// The requested sort mode, as given on the command line.
    pub fn sort_by(&self) -> &str {
        &self.sort_by
    }

    /// Maximum number of posts per subreddit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Minimum score a post needs to be reported.
    pub fn min_score(&self) -> i64 {
        self.min_score
    }

    /// Directory the report files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Indicates the command-line options are unusable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `--min_score` was negative.
    #[error("Invalid minimum score: {0}. Please enter a non-negative integer.")]
    NegativeMinScore(i64),

    /// `--limit` was negative.
    #[error("Invalid limit: {0}. Please enter a non-negative integer.")]
    NegativeLimit(i64),

    /// `--limit` was larger than Reddit could ever satisfy.
    #[error("Invalid limit: {0}. Please enter an integer no greater than {max}.", max = u32::MAX)]
    LimitTooLarge(i64),
}

/// How a successful run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No post met the criteria, so nothing was written.
    NoPosts,

    /// The posts were written to both report files.
    Saved(Vec<Post>),
}

/// A reason the program could not complete.
#[derive(Debug, Error)]
pub enum Error {
    /// Reddit credentials are missing from the environment.
    #[error(transparent)]
    Credentials(#[from] CredentialsError),

    /// The command-line options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The Reddit service could not be set up.
    #[error("Service error: {0}")]
    Service(#[from] HTTPError),

    /// Posts could not be fetched or printed.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// A status message could not be printed.
    #[error("Could not write to console: {0}")]
    Console(#[from] io::Error),

    /// One or more report files could not be written.
    #[error("{}", .0.iter().join("\n"))]
    Write(Vec<WriteError>),
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner<S: Service> {
    config: Config,
    service: S,
}

impl<S: Service> Runner<S> {
    /// Create a new program runner using the given `config` that reads
    /// posts from `service`.
    pub fn new(config: Config, service: S) -> Self {
        Self { config, service }
    }

    /// Run the command-line program using its stored configuration options.
    ///
    /// Kept posts and status messages are written to `out`.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<Outcome, Error> {
        debug!("validating {:?}", self.config);
        let config = self.config.validate()?;

        debug!("fetching from {:?}", config.subreddits());
        let fetcher = PostFetcher::new(
            &self.service,
            config.subreddits().to_vec(),
            config.sort_by(),
            config.limit(),
        );
        let filter = ScoreFilter::new(config.min_score());
        let posts = filter.collect(fetcher.posts(), out).await?;
        debug!("kept {} posts scoring at least {}", posts.len(), filter.min_score());

        if posts.is_empty() {
            writeln!(out, "\nNo posts found with the given criteria.")?;
            return Ok(Outcome::NoPosts);
        }

        let csv = CsvSink::in_dir(config.output_dir());
        let pdf = PdfSink::in_dir(config.output_dir());
        self.write_all(&[&csv, &pdf], &posts, out)?;

        writeln!(
            out,
            "\nPosts saved to '{}' and '{}'.",
            csv.path().display(),
            pdf.path().display()
        )?;
        Ok(Outcome::Saved(posts))
    }

    // Every sink gets a chance to write, even if an earlier one failed.
    fn write_all<W: Write>(
        &self,
        sinks: &[&dyn Sink],
        posts: &[Post],
        out: &mut W,
    ) -> Result<(), Error> {
        let mut failures = Vec::new();

        for sink in sinks {
            debug!("writing {}", sink.path().display());
            match sink.write(posts) {
                Ok(()) => writeln!(out, "\nSaved {}.", sink.path().display())?,
                Err(err) => {
                    error!("{err}");
                    failures.push(err);
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Write(failures))
        }
    }
}

/// Runs the program against the live Reddit API, printing to stdout.
///
/// Credentials are read from the environment (and a `.env` file, if
/// present) before anything else happens.
pub async fn run(config: Config) -> Result<Outcome, Error> {
    conf::load_dotenv();
    let credentials = Credentials::from_env()?;
    let service = RedditService::new(credentials)?;
    Runner::new(config, service).run(&mut io::stdout()).await
}
