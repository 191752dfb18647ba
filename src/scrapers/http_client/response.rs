//! Response returned by [`HttpClient::get`](super::HttpClient::get).

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode};

/// A response whose body has not been read yet.
pub struct HttpResponse {
    pub status: StatusCode,
    content_type: Option<String>,
    response: Response,
}

impl HttpResponse {
    pub(super) fn new(response: Response) -> Self {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());
        Self {
            status: response.status(),
            content_type,
            response,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Declared media type, lowercased, if the server sent one.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Read the body as text, decoding per the declared charset.
    pub async fn text(self) -> Result<String, reqwest::Error> {
        self.response.text().await
    }
}
