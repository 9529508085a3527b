use super::{CatalogApi, ClimbQuery};
use crate::collections::CollectionKind;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::model::{
    Area, Climb, ClimbRef, Log, NewClimb, NewLog, TokenResponse, UploadReceipt, User,
};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

const KML_MIME: &str = "application/vnd.google-earth.kml+xml";

/// HTTP implementation of [`CatalogApi`]
///
/// Every request carries the configured timeouts. GETs are retried on
/// transport failures and 5xx responses with exponential backoff; writes are
/// sent exactly once.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!("crag/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config: config.clone() })
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// GET with retries, decoding a JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        token: Option<&str>,
    ) -> Result<T> {
        let mut attempt = 0;
        loop {
            let request = self.request(Method::GET, path, token).query(query);
            let outcome = match self.execute(request).await {
                Ok(body) => decode(path, &body),
                Err(e) => Err(e),
            };

            match outcome {
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.retry_delay(attempt);
                    log::warn!(
                        "GET {} failed ({}), retry {}/{} in {:?}",
                        path,
                        e,
                        attempt,
                        self.config.max_retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                other => return other,
            }
        }
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> Result<String> {
        self.execute(self.request(Method::POST, path, Some(token)).json(body)).await
    }

    async fn post_form(&self, path: &str, fields: &[(&str, &str)]) -> Result<String> {
        self.execute(self.request(Method::POST, path, None).form(fields)).await
    }

    /// Send a request and return the body of a successful response
    async fn execute(&self, request: RequestBuilder) -> Result<String> {
        let response = request.send().await?;
        read_body(response).await
    }
}

async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let url = response.url().path().to_string();
    let body = response.text().await?;

    log::debug!("{} -> {}", url, status);

    if status.is_success() {
        Ok(body)
    } else {
        Err(Error::from_status(status, &body))
    }
}

fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::Decode(format!("{}: {}", path, e)))
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_climbs(&self, query: &ClimbQuery) -> Result<Vec<Climb>> {
        self.get_json("/climbs/", &query.to_pairs(), None).await
    }

    async fn get_climb(&self, id: u64) -> Result<Climb> {
        self.get_json(&format!("/climbs/{}", id), &[], None).await
    }

    async fn climb_logs(&self, id: u64) -> Result<Vec<Log>> {
        self.get_json(&format!("/climbs/{}/logs", id), &[], None).await
    }

    async fn recent_first_ascents(&self, limit: usize) -> Result<Vec<Climb>> {
        self.get_json("/climbs/recent/first-ascents", &[("limit", limit.to_string())], None)
            .await
    }

    async fn create_climb(&self, session: &Session, climb: &NewClimb) -> Result<Climb> {
        let body = self.post_json("/climbs/", session.bearer(), climb).await?;
        decode("/climbs/", &body)
    }

    async fn list_areas(&self) -> Result<Vec<Area>> {
        self.get_json("/areas/", &[], None).await
    }

    async fn upload_kml(
        &self,
        session: &Session,
        filename: &str,
        content: Vec<u8>,
    ) -> Result<UploadReceipt> {
        let part = reqwest::multipart::Part::bytes(content)
            .file_name(filename.to_string())
            .mime_str(KML_MIME)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request =
            self.request(Method::POST, "/upload_kml", Some(session.bearer())).multipart(form);
        let body = self.execute(request).await?;
        decode("/upload_kml", &body)
    }

    async fn list_users(&self, search: Option<&str>) -> Result<Vec<User>> {
        match search {
            Some(term) => self.get_json("/users", &[("search", term.to_string())], None).await,
            None => self.get_json("/users/", &[], None).await,
        }
    }

    async fn get_user(&self, id: u64) -> Result<User> {
        self.get_json(&format!("/users/{}", id), &[], None).await
    }

    async fn user_ticks(&self, id: u64) -> Result<Vec<Climb>> {
        self.get_json(&format!("/users/{}/ticks", id), &[], None).await
    }

    async fn current_user(&self, token: &str) -> Result<User> {
        self.get_json("/users/me", &[], Some(token)).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let body =
            self.post_form("/token", &[("username", username), ("password", password)]).await?;
        decode("/token", &body)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        self.post_form(
            "/register",
            &[("username", username), ("email", email), ("password", password)],
        )
        .await?;
        Ok(())
    }

    async fn collection(&self, session: &Session, kind: CollectionKind) -> Result<Vec<Climb>> {
        self.get_json(&format!("/{}/", kind.path()), &[], Some(session.bearer())).await
    }

    async fn collection_add(
        &self,
        session: &Session,
        kind: CollectionKind,
        climb_id: u64,
    ) -> Result<()> {
        let path = format!("/{}/add", kind.path());
        self.post_json(&path, session.bearer(), &ClimbRef { climb_id }).await?;
        Ok(())
    }

    async fn collection_remove(
        &self,
        session: &Session,
        kind: CollectionKind,
        climb_id: u64,
    ) -> Result<()> {
        let path = format!("/{}/remove", kind.path());
        self.post_json(&path, session.bearer(), &ClimbRef { climb_id }).await?;
        Ok(())
    }

    async fn recent_logs(&self) -> Result<Vec<Log>> {
        self.get_json("/logs/recent", &[], None).await
    }

    async fn recent_big_ticks(&self) -> Result<Vec<Log>> {
        self.get_json("/logs/recent_big_ticks", &[], None).await
    }

    async fn add_log(&self, session: &Session, log: &NewLog) -> Result<()> {
        self.post_json("/logs/add", session.bearer(), log).await?;
        Ok(())
    }

    async fn remove_log(&self, session: &Session, climb_id: u64) -> Result<()> {
        self.post_json("/logs/remove", session.bearer(), &ClimbRef { climb_id }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_ignored() {
        let config = ApiConfig { base_url: "http://api.example:8000/".into(), ..Default::default() };
        let client = ApiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://api.example:8000");
        assert_eq!(client.url("/climbs/7"), "http://api.example:8000/climbs/7");
    }

    #[test]
    fn test_decode_error_names_path() {
        let err = decode::<Vec<Climb>>("/climbs/", "{not json").unwrap_err();
        assert!(matches!(err, Error::Decode(ref msg) if msg.starts_with("/climbs/")));
    }
}
