// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, Response, header};
use thiserror::Error;

/// Builds an HTTP client that identifies itself with `user_agent`.
pub fn client(user_agent: &str) -> HTTPResult<Client> {
    let client = ClientBuilder::new().user_agent(user_agent).build()?;
    Ok(client)
}

/// Checks that `resp` was successful and carries a JSON body, then
/// returns the raw body.
pub async fn json_body(resp: Response) -> HTTPResult<String> {
    if !resp.status().is_success() {
        return Err(HTTPError::Http(resp.status()));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .ok_or(HTTPError::MissingContentType)?
        .to_str()?;
    if !content_type.starts_with("application/json") {
        return Err(HTTPError::UnexpectedContentType(content_type.to_string()));
    }

    Ok(resp.text().await?)
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// An error that occurred while making an HTTP request or reading
    /// its body.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// A request URI could not be built.
    #[error("Invalid request URI: {0}")]
    Uri(#[from] url::ParseError),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(reqwest::StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),

    /// The API refused to hand out an access token.
    #[error("Authentication failed: {0}")]
    Auth(String),
}
