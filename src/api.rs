//! Typed client for the users REST API.
//!
//! | op        | method | path            |
//! |-----------|--------|-----------------|
//! | list all  | GET    | `/all`          |
//! | get one   | GET    | `/users/{id}`   |
//! | create    | POST   | `/add`          |
//! | update    | PUT    | `/update/{id}`  |
//! | delete    | DELETE | `/remove/{id}`  |
//!
//! Paging and search are done client-side; no query parameters are sent.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::model::{NewUser, User, UserId};

/// The five operations the console consumes. Implemented over HTTP by
/// [`HttpUserApi`]; tests drive the store and task runner with in-memory fakes.
pub trait UserApi: Send + Sync {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    fn fetch_one(&self, id: &UserId) -> impl Future<Output = Result<User, ApiError>> + Send;

    /// The server assigns the id of the returned record.
    fn create(&self, user: &NewUser) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn update(
        &self,
        id: &UserId,
        user: &User,
    ) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn delete(&self, id: &UserId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// `reqwest`-backed [`UserApi`].
#[derive(Clone, Debug)]
pub struct HttpUserApi {
    client: Client,
    base_url: Url,
}

impl HttpUserApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        let base_url = Url::parse(trimmed)
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| ApiError::BaseUrl(trimmed.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Base URL plus `segments`, each percent-encoded as a single path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(%method, %url, "api request");
        self.client.request(method, url)
    }

    async fn send(
        &self,
        method: &'static str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<String, ApiError> {
        let resp = req.send().await.map_err(|source| ApiError::Transport {
            method,
            path: path.to_string(),
            source,
        })?;
        let status = resp.status();
        let body = resp.text().await.map_err(|source| ApiError::Transport {
            method,
            path: path.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(ApiError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: &'static str,
        path: &str,
        req: RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(method, path, req).await?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            method,
            path: path.to_string(),
            source,
        })
    }
}

impl UserApi for HttpUserApi {
    async fn fetch_all(&self) -> Result<Vec<User>, ApiError> {
        self.send_json("GET", "/all", self.request(Method::GET, &["all"]))
            .await
    }

    async fn fetch_one(&self, id: &UserId) -> Result<User, ApiError> {
        let id = id.to_string();
        let req = self.request(Method::GET, &["users", &id]);
        self.send_json("GET", &format!("/users/{id}"), req).await
    }

    async fn create(&self, user: &NewUser) -> Result<User, ApiError> {
        let req = self.request(Method::POST, &["add"]).json(user);
        self.send_json("POST", "/add", req).await
    }

    async fn update(&self, id: &UserId, user: &User) -> Result<User, ApiError> {
        let id = id.to_string();
        let req = self.request(Method::PUT, &["update", &id]).json(user);
        self.send_json("PUT", &format!("/update/{id}"), req).await
    }

    async fn delete(&self, id: &UserId) -> Result<(), ApiError> {
        let id = id.to_string();
        let req = self.request(Method::DELETE, &["remove", &id]);
        self.send("DELETE", &format!("/remove/{id}"), req)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = HttpUserApi::new("http://localhost:8080/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn text_ids_are_encoded_as_one_segment() {
        let api = HttpUserApi::new("http://localhost:8080/api", Duration::from_secs(1)).unwrap();
        assert_eq!(api.url(&["all"]).as_str(), "http://localhost:8080/api/all");
        assert_eq!(
            api.url(&["users", "a/b?c#d e"]).as_str(),
            "http://localhost:8080/api/users/a%2Fb%3Fc%23d%20e"
        );

        let root = HttpUserApi::new("http://localhost:8080", Duration::from_secs(1)).unwrap();
        assert_eq!(root.url(&["remove", "7"]).as_str(), "http://localhost:8080/remove/7");
    }

    #[test]
    fn base_url_must_be_hierarchical() {
        let err = HttpUserApi::new("mailto:someone", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ApiError::BaseUrl(_)));
        assert!(HttpUserApi::new("not a url", Duration::from_secs(1)).is_err());
    }
}
