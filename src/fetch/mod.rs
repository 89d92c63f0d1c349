mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::listing::{Listing, ListingKind};
use crate::parser::parse_listings;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let status = resp.status();
    if !status.is_success() {
        bail!("GET {url} returned status {status}");
    }
    Ok(resp.bytes().await?.to_vec())
}

/// Loads raw listing bytes from a local file path or an `http(s)` URL.
#[tracing::instrument]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new()?;
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to fetch listings from {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read listings from {source}"))?
    };
    debug!(bytes = bytes.len(), "Listing source loaded");
    Ok(bytes)
}

/// Loads and decodes listings of `kind` from a file path or URL.
pub async fn load_listings(source: &str, kind: ListingKind) -> Result<Vec<Listing>> {
    let bytes = load_source(source).await?;
    parse_listings(&bytes, kind).with_context(|| format!("failed to parse listings from {source}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_listings_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"name": "A", "address": "1012 AB"}}]"#).unwrap();

        let path = file.path().to_str().unwrap();
        let listings = load_listings(path, ListingKind::Restaurants).await.unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "A");
    }

    #[tokio::test]
    async fn test_load_listings_missing_file() {
        let result = load_listings("/definitely/not/here.json", ListingKind::Farms).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_listings_over_http() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/restaurants");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(serde_json::json!({
                        "total": 2,
                        "restaurants": [
                            {"name": "A", "address": "1012 AB", "rating": 4.0},
                            {"name": "B", "address": "1013 CD", "rating": null}
                        ]
                    }));
            })
            .await;

        let listings = load_listings(&server.url("/api/restaurants"), ListingKind::Restaurants)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1].rating, None);
    }

    #[tokio::test]
    async fn test_fetch_bytes_rejects_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/farms");
                then.status(500);
            })
            .await;

        let client = BasicClient::new().unwrap();
        let result = fetch_bytes(&client, &server.url("/api/farms")).await;
        assert!(result.is_err());
    }
}
