//! Artifact download.
//!
//! The whole artifact is buffered in memory: installable binaries are a few
//! megabytes and nothing may touch the bin directory before the digest check.

use futures::StreamExt;
use reqwest::Client;
use tracing::debug;

use crate::Reporter;
use crate::error::InstallError;

/// Download `url` and return its body.
///
/// Fails with [`InstallError::Fetch`] on transport errors, non-success status
/// codes, and empty bodies. There is no retry.
pub async fn fetch<R: Reporter + ?Sized>(
    client: &Client,
    url: &str,
    reporter: &R,
) -> Result<Vec<u8>, InstallError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await
        .map_err(|e| InstallError::fetch(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::fetch(url, format!("HTTP {status}")));
    }

    let total_size = response.content_length();
    reporter.downloading(0, total_size);

    // Content-Length is only a progress hint; never size the buffer from it.
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| InstallError::fetch(url, e))?;
        body.extend_from_slice(&chunk);
        reporter.downloading(body.len() as u64, total_size);
    }

    if body.is_empty() {
        return Err(InstallError::fetch(url, "empty response body"));
    }

    debug!(url, bytes = body.len(), "downloaded artifact");
    Ok(body)
}
