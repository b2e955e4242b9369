//! Yandex Practicum adapter (homework review statuses).
//!
//! Implements the `hwb-core` StatusSource port with one `reqwest` GET per call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;

use hwb_core::{
    config::Config,
    domain::{Cursor, StatusPage},
    errors::Error,
    ports::StatusSource,
    Result,
};

#[derive(Clone)]
pub struct PraktikumClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
}

impl PraktikumClient {
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(
            cfg.api_url.clone(),
            cfg.praktikum_token.clone(),
            cfg.request_timeout,
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl StatusSource for PraktikumClient {
    async fn fetch(&self, cursor: Cursor) -> Result<StatusPage> {
        let resp = self
            .http
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor.0)])
            .send()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Connection(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(Error::Connection(format!(
                "{status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let page: StatusPage = serde_json::from_str(&body)?;
        tracing::debug!(
            %cursor,
            homeworks = page.homeworks.len(),
            current_date = ?page.current_date,
            "fetched homework statuses"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hwb_core::domain::HomeworkRecord;
    use wiremock::{
        matchers::{header, method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    const PATH: &str = "/api/user_api/homework_statuses/";

    fn client(server: &MockServer, timeout: Duration) -> PraktikumClient {
        PraktikumClient::new(format!("{}{PATH}", server.uri()), "secret", timeout).unwrap()
    }

    #[tokio::test]
    async fn sends_token_and_cursor_and_parses_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .and(header("Authorization", "OAuth secret"))
            .and(query_param("from_date", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "homeworks": [
                    {"id": 7, "homework_name": "proj1", "status": "approved", "lesson_name": "API"}
                ],
                "current_date": 1500
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = client(&server, Duration::from_secs(5))
            .fetch(Cursor(1000))
            .await
            .unwrap();

        assert_eq!(page.current_date, Some(1500));
        assert_eq!(
            page.homeworks,
            vec![HomeworkRecord {
                name: Some("proj1".to_string()),
                status: Some("approved".to_string()),
            }]
        );
    }

    #[tokio::test]
    async fn non_success_status_is_a_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": "not_authenticated",
                "message": "Учетные данные не были предоставлены."
            })))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .fetch(Cursor(0))
            .await
            .unwrap_err();

        match err {
            Error::Connection(msg) => {
                assert!(msg.starts_with("401"), "{msg}");
                assert!(msg.contains("not_authenticated"), "{msg}");
            }
            other => panic!("expected connection error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .fetch(Cursor(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn wrong_shape_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"homeworks": "none", "current_date": 1})),
            )
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .fetch(Cursor(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)), "{err:?}");
    }

    #[tokio::test]
    async fn slow_server_times_out_as_connection_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"homeworks": []}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_millis(100))
            .fetch(Cursor(0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "{err:?}");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connection_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let endpoint = format!("http://127.0.0.1:{port}{PATH}");

        let client = PraktikumClient::new(endpoint, "secret", Duration::from_secs(2)).unwrap();
        let err = client.fetch(Cursor(0)).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)), "{err:?}");
    }
}
