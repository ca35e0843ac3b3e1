//! Handler that contributes the contents of a remote file.

use async_trait::async_trait;
use reqwest::{redirect, Client};

use crate::domain::foundation::DispatchContext;
use crate::domain::merge_request::MergeRequestEvent;
use crate::ports::{HandlerError, MergeRequestHandler};

/// Fetches a URL on every event and contributes the response body.
///
/// Redirects are not followed; any non-2xx response is a failure.
#[derive(Debug, Clone)]
pub struct UrlFileHandler {
    http: Client,
    url: String,
}

impl UrlFileHandler {
    pub fn new(url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MergeRequestHandler for UrlFileHandler {
    async fn handle(
        &self,
        ctx: &DispatchContext,
        _event: &MergeRequestEvent,
    ) -> Result<String, HandlerError> {
        let response = ctx
            .run(self.http.get(&self.url).send())
            .await?
            .map_err(|e| HandlerError::with_source(format!("could not fetch {}", self.url), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HandlerError::failed(format!(
                "unexpected status {status} fetching {}",
                self.url
            )));
        }

        ctx.run(response.text())
            .await?
            .map_err(|e| HandlerError::with_source(format!("could not read {}", self.url), e))
    }

    fn name(&self) -> &'static str {
        "UrlFileHandler"
    }
}
