//! HTTP layer: status mapping, timeout classification and the retrieve
//! attempt policy.
//!
//! This is the ONLY place for status code handling. client/mod.rs never
//! interprets status codes.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::types::{ClientConfig, RetrieveRequest};

use super::helpers::backend_message;

/// Which call shape a retrieve attempt uses.
///
/// The primary shape is `POST /retrieve {wallet}`. Some deployments only
/// answer `GET /retrieve`; the fallback is tried once, and only when the
/// primary answer says the shape is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetrieveAttempt {
    Primary,
    Fallback,
}

impl RetrieveAttempt {
    /// Next attempt after `err`, if any.
    pub(crate) fn next(self, err: &ClientError) -> Option<Self> {
        match self {
            Self::Primary if is_unsupported_shape(err) => Some(Self::Fallback),
            _ => None,
        }
    }
}

/// 404 or 405 from the primary retrieve call.
fn is_unsupported_shape(err: &ClientError) -> bool {
    match err {
        ClientError::NotFound { .. } => true,
        ClientError::Backend { status, .. } => *status == StatusCode::METHOD_NOT_ALLOWED.as_u16(),
        _ => false,
    }
}

/// HTTP backend for making requests (holds reqwest client and config).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    pub(crate) client: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) config: ClientConfig,
}

impl HttpBackend {
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and decode the JSON answer.
    pub(crate) async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        resource: &str,
    ) -> ClientResult<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self.execute(self.client.post(&url).json(body), resource).await?;
        self.read_json(response).await
    }

    /// GET with query parameters and decode the JSON answer.
    pub(crate) async fn get_json<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        resource: &str,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self.execute(self.client.get(&url).query(query), resource).await?;
        self.read_json(response).await
    }

    /// POST a multipart form and decode the JSON answer.
    pub(crate) async fn post_multipart<T>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        resource: &str,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let url = self.url(path);
        debug!(url = %url, "POST multipart");
        let response = self.execute(self.client.post(&url).multipart(form), resource).await?;
        self.read_json(response).await
    }

    /// Fetch the raw retrieve payload using the two-step attempt policy.
    ///
    /// Payload bodies that are not JSON come back as `Value::Null`, which
    /// normalizes to an empty list.
    pub(crate) async fn retrieve(&self, wallet: &str) -> ClientResult<Value> {
        let mut attempt = RetrieveAttempt::Primary;
        loop {
            match self.retrieve_once(attempt, wallet).await {
                Ok(payload) => return Ok(payload),
                Err(e) => match attempt.next(&e) {
                    Some(next) => {
                        warn!(error = %e, "POST /retrieve unsupported, falling back to GET");
                        attempt = next;
                    }
                    None => return Err(e),
                },
            }
        }
    }

    async fn retrieve_once(&self, attempt: RetrieveAttempt, wallet: &str) -> ClientResult<Value> {
        let url = self.url("retrieve");
        let request = match attempt {
            RetrieveAttempt::Primary => self.client.post(&url).json(&RetrieveRequest {
                wallet: wallet.to_string(),
            }),
            RetrieveAttempt::Fallback => self.client.get(&url).query(&[("wallet", wallet)]),
        };
        debug!(url = %url, attempt = ?attempt, "retrieving documents");

        let response = self.execute(request, "retrieve").await?;
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        Ok(serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!(error = %e, "retrieve body is not JSON");
            Value::Null
        }))
    }

    /// Send a request and map non-2xx statuses onto the error taxonomy.
    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> ClientResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        match status.as_u16() {
            200..=299 => Ok(response),

            400 => {
                let body = self.error_body(response).await?;
                Err(ClientError::Validation {
                    message: backend_message(&body, "request rejected by backend"),
                })
            }

            404 => Err(ClientError::NotFound {
                resource: resource.to_string(),
            }),

            _ => {
                let fallback = status.canonical_reason().unwrap_or("unexpected status");
                let body = self.error_body(response).await?;
                Err(ClientError::Backend {
                    status: status.as_u16(),
                    message: backend_message(&body, fallback),
                })
            }
        }
    }

    /// Body of a non-2xx answer, used only to extract a message.
    ///
    /// A timeout while reading is reported as such; any other read failure
    /// leaves the status-derived fallback message.
    async fn error_body(&self, response: reqwest::Response) -> ClientResult<String> {
        match response.text().await {
            Ok(body) => Ok(body),
            Err(e) if e.is_timeout() => Err(self.transport_error(e)),
            Err(e) => {
                debug!(error = %e, "failed to read error body");
                Ok(String::new())
            }
        }
    }

    async fn read_json<T>(&self, response: reqwest::Response) -> ClientResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;
        if text.trim().is_empty() {
            return Ok(T::default());
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Backend {
            status,
            message: format!("unparseable response body: {e}"),
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout {
                after_secs: self.config.timeout_secs,
            }
        } else {
            ClientError::from(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_only_after_primary() {
        let not_found = ClientError::NotFound {
            resource: "retrieve".to_string(),
        };
        assert_eq!(
            RetrieveAttempt::Primary.next(&not_found),
            Some(RetrieveAttempt::Fallback)
        );
        assert_eq!(RetrieveAttempt::Fallback.next(&not_found), None);
    }

    #[test]
    fn test_fallback_on_method_not_allowed() {
        let err = ClientError::Backend {
            status: 405,
            message: "Method Not Allowed".to_string(),
        };
        assert_eq!(
            RetrieveAttempt::Primary.next(&err),
            Some(RetrieveAttempt::Fallback)
        );
    }

    #[test]
    fn test_no_fallback_on_other_failures() {
        let errors = [
            ClientError::Backend {
                status: 500,
                message: "boom".to_string(),
            },
            ClientError::Timeout { after_secs: 10 },
            ClientError::Validation {
                message: "wallet required".to_string(),
            },
        ];
        for err in &errors {
            assert_eq!(RetrieveAttempt::Primary.next(err), None, "{err}");
        }
    }
}
