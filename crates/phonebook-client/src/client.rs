//! Phonebook HTTP client implementation

use phonebook_core::{Contact, ContactId};
use reqwest::{Response, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default server address used by the CLI.
pub const DEFAULT_URL: &str = "http://localhost:3001";

#[derive(Serialize)]
struct ContactBody<'a> {
    name: &'a str,
    number: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Phonebook API client
#[derive(Debug, Clone)]
pub struct PhonebookClient {
    http: reqwest::Client,
    base: String,
}

impl PhonebookClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http(base_url, reqwest::Client::new())
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let url = Url::parse(base_url).map_err(|e| Error::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl {
                url: base_url.to_string(),
                message: "not a base URL".to_string(),
            });
        }

        Ok(Self {
            http,
            base: url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn persons_url(&self) -> String {
        format!("{}/api/persons", self.base)
    }

    fn person_url(&self, id: &ContactId) -> String {
        format!("{}/api/persons/{}", self.base, id)
    }

    /// `GET /api/persons`
    pub async fn get_all(&self) -> Result<Vec<Contact>> {
        let resp = self.http.get(self.persons_url()).send().await?;
        Ok(check(resp).await?.json().await?)
    }

    /// `GET /api/persons/{id}`; `None` on 404.
    pub async fn get(&self, id: &ContactId) -> Result<Option<Contact>> {
        let resp = self.http.get(self.person_url(id)).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(check(resp).await?.json().await?))
    }

    /// `POST /api/persons`
    pub async fn create(&self, name: &str, number: &str) -> Result<Contact> {
        let resp = self
            .http
            .post(self.persons_url())
            .json(&ContactBody { name, number })
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// `PUT /api/persons/{id}`
    pub async fn update(&self, id: &ContactId, name: &str, number: &str) -> Result<Contact> {
        let resp = self
            .http
            .put(self.person_url(id))
            .json(&ContactBody { name, number })
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    /// `DELETE /api/persons/{id}`
    pub async fn delete(&self, id: &ContactId) -> Result<()> {
        let resp = self.http.delete(self.person_url(id)).send().await?;
        check(resp).await?;
        Ok(())
    }

    /// `GET /api/info` as raw HTML.
    pub async fn info(&self) -> Result<String> {
        let resp = self
            .http
            .get(format!("{}/api/info", self.base))
            .send()
            .await?;
        Ok(check(resp).await?.text().await?)
    }
}

/// Turns a non-success response into [`Error::Api`].
async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let message = match resp.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => String::new(),
    };
    log::debug!("Request failed with {}: {}", status, message);
    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = PhonebookClient::new("http://localhost:3001/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3001");
        assert_eq!(
            client.person_url(&ContactId::new("4")),
            "http://localhost:3001/api/persons/4"
        );
    }

    #[test]
    fn test_base_url_keeps_prefix() {
        let client = PhonebookClient::new("https://example.com/phonebook").unwrap();
        assert_eq!(
            client.persons_url(),
            "https://example.com/phonebook/api/persons"
        );
    }

    #[test]
    fn test_invalid_url() {
        let err = PhonebookClient::new("not a url").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));

        let err = PhonebookClient::new("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }
}
