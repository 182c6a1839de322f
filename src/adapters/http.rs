use crate::utils::error::{KantineError, Result};
use reqwest::{Client, Response};
use std::time::Duration;

pub fn build_client(timeout_seconds: u64) -> Result<Client> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("kantine/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

async fn get(client: &Client, url: &str) -> Result<Response> {
    tracing::debug!("GET {}", url);
    let response = client.get(url).send().await?;

    let status = response.status();
    tracing::debug!("Response status: {}", status);
    if !status.is_success() {
        return Err(KantineError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response)
}

pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    Ok(get(client, url).await?.text().await?)
}

pub async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    Ok(get(client, url).await?.bytes().await?.to_vec())
}
