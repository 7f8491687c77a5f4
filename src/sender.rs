use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, HOST, TRANSFER_ENCODING};
use reqwest::{Method, StatusCode};

use crate::error::SendError;
use crate::template::Template;

pub type Client = reqwest::Client;

/// Status and full body of a completed exchange.
#[derive(Debug)]
pub struct Outcome {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Outcome {
    /// Trimmed body text, cut to at most `limit` characters.
    pub fn preview(&self, limit: usize) -> String {
        let text = String::from_utf8_lossy(&self.body);
        let text = text.trim();

        match text.char_indices().nth(limit) {
            Some((end, _)) => format!("{}...", &text[..end]),
            None => text.to_string(),
        }
    }
}

/// Performs one HTTP exchange per template. Cheap to clone; clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct Sender {
    client: Client,
    preview_len: usize,
}

impl Sender {
    pub fn new(client: Client, preview_len: usize) -> Self {
        Self {
            client,
            preview_len,
        }
    }

    /// Send `template` once and read the whole response body. No retries.
    pub async fn send(&self, template: &Template) -> Result<Outcome, SendError> {
        let method = Method::from_bytes(template.method().as_bytes())
            .map_err(|e| SendError::BuildFailed(e.to_string()))?;

        let req = self
            .client
            .request(method, template.url())
            .headers(transform_headers(template)?)
            .body(template.body().to_vec())
            .build()?;

        tracing::trace!("{} {}", req.method(), req.url());

        let response = self
            .client
            .execute(req)
            .await
            .map_err(SendError::TransportFailed)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(SendError::ResponseReadFailed)?;

        Ok(Outcome {
            status,
            body: body.to_vec(),
        })
    }

    /// Send `template` and log the result. Failures end here.
    pub async fn dispatch(&self, template: &Template) {
        match self.send(template).await {
            Ok(outcome) => tracing::info!(
                "[{}] status: {} | response: {}",
                template.name(),
                outcome.status.as_u16(),
                outcome.preview(self.preview_len)
            ),
            Err(err) => tracing::error!("[{}] {}", template.name(), err),
        }
    }
}

// The transport frames the request itself, so Host and the body length
// headers come from the URL and body rather than the template.
fn transform_headers(template: &Template) -> Result<HeaderMap, SendError> {
    let mut headers = HeaderMap::with_capacity(template.headers().len());
    for (key, value) in template.headers() {
        let name = HeaderName::from_bytes(key.as_bytes())?;
        if name == HOST || name == CONTENT_LENGTH || name == TRANSFER_ENCODING {
            continue;
        }
        headers.insert(name, HeaderValue::from_str(value)?);
    }
    Ok(headers)
}
