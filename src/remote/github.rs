use super::RemoteSource;
use crate::config::{Credentials, SyncConfig};
use crate::fetch::FetchError;
use crate::manifest::{contents_url, parse_listing, Manifest, ManifestError, RemoteEntry};
use crate::utils::{RAW_MEDIA_TYPE, USER_AGENT};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// GitHub contents API client for one directory at a pinned commit
pub struct GithubSource {
    client: Client,
    contents_url: String,
    credentials: Option<Credentials>,
}

impl GithubSource {
    pub fn new(config: &SyncConfig, credentials: Option<Credentials>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            contents_url: contents_url(config),
            credentials,
        })
    }

    pub fn contents_url(&self) -> &str {
        &self.contents_url
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.credentials {
            Some(creds) => request.basic_auth(&creds.user, Some(&creds.password)),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteSource for GithubSource {
    async fn fetch_manifest(&self) -> Result<Manifest, ManifestError> {
        debug!(url = %self.contents_url, "Fetching listing");
        let response = self.get(&self.contents_url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ManifestError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes().await?;
        parse_listing(&body)
    }

    async fn download(
        &self,
        entry: &RemoteEntry,
        sink: &mut (dyn AsyncWrite + Send + Unpin),
    ) -> Result<u64, FetchError> {
        let url = entry
            .download_url
            .as_deref()
            .ok_or_else(|| FetchError::NotDownloadable(entry.name.clone()))?;

        let mut response = self.get(url).header(ACCEPT, RAW_MEDIA_TYPE).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            sink.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        Ok(written)
    }
}
