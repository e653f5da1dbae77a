/// Client for the internal recommender service
///
/// Endpoints:
/// - `GET  /recommend?title=<t>`               → similarity-ranked neighbours
/// - `POST /recommend_by_genres`                → genre matches, optionally year-bounded
/// - `GET  /recommend_by_cluster?cluster_id=<n>` → a cluster's representative movies
///
/// All three answer `{"results": [{"title", "score", ...}]}` in ranked order.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{ClusterId, GenreQuery, RecommendationEntry, RecommenderResponse},
};
use reqwest::{Client as HttpClient, RequestBuilder};
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Recommender: Send + Sync {
    /// Movies similar to a free-text title
    async fn by_title(&self, title: &str) -> AppResult<Vec<RecommendationEntry>>;

    /// Movies matching a genre set
    async fn by_genres(&self, query: &GenreQuery) -> AppResult<Vec<RecommendationEntry>>;

    /// Representative movies of one cluster, each carrying a cluster label
    async fn by_cluster(&self, cluster: ClusterId) -> AppResult<Vec<RecommendationEntry>>;
}

#[derive(Clone)]
pub struct HttpRecommender {
    http_client: HttpClient,
    base_url: String,
}

impl HttpRecommender {
    pub fn new(http_client: HttpClient, base_url: String) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;
        Ok(Self::new(http_client, config.recommender_url.clone()))
    }

    /// Sends a prepared request and decodes the shared result envelope
    async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> AppResult<Vec<RecommendationEntry>> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(endpoint, error = %e, "Recommender request failed");
            AppError::ExternalApi(format!("Recommender unreachable: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                endpoint,
                status = %status,
                body = %body,
                "Recommender returned an error status"
            );
            return Err(AppError::ExternalApi(format!(
                "Recommender returned status {}: {}",
                status, body
            )));
        }

        let decoded: RecommenderResponse = response.json().await.map_err(|e| {
            AppError::ExternalApi(format!("Failed to parse recommender response: {}", e))
        })?;

        tracing::debug!(
            endpoint,
            input = ?decoded.input,
            results = decoded.results.len(),
            "Recommender responded"
        );

        Ok(decoded.results)
    }
}

#[async_trait::async_trait]
impl Recommender for HttpRecommender {
    async fn by_title(&self, title: &str) -> AppResult<Vec<RecommendationEntry>> {
        let url = format!("{}/recommend", self.base_url);
        let request = self.http_client.get(&url).query(&[("title", title)]);
        self.send("recommend", request).await
    }

    async fn by_genres(&self, query: &GenreQuery) -> AppResult<Vec<RecommendationEntry>> {
        let url = format!("{}/recommend_by_genres", self.base_url);
        let request = self.http_client.post(&url).json(query);
        self.send("recommend_by_genres", request).await
    }

    async fn by_cluster(&self, cluster: ClusterId) -> AppResult<Vec<RecommendationEntry>> {
        let url = format!("{}/recommend_by_cluster", self.base_url);
        let request = self
            .http_client
            .get(&url)
            .query(&[("cluster_id", cluster.value())]);
        self.send("recommend_by_cluster", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Query,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn stub_router() -> Router {
        Router::new()
            .route(
                "/recommend",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let title = params.get("title").cloned().unwrap_or_default();
                    Json(json!({
                        "input": title,
                        "results": [
                            { "title": "Toy Story (1995)", "score": 0.91 },
                            { "title": "Aladdin (1992)", "score": 0.64 }
                        ]
                    }))
                }),
            )
            .route(
                "/recommend_by_genres",
                post(|Json(body): Json<Value>| async move {
                    // Echo the request back through the titles so the test can inspect it
                    let genres = body["genres"].as_array().cloned().unwrap_or_default();
                    let results: Vec<Value> = genres
                        .iter()
                        .map(|g| json!({ "title": g, "score": 1.0 }))
                        .chain(std::iter::once(json!({
                            "title": format!("min={} max={}", body["min_year"], body["max_year"]),
                            "score": 0.0
                        })))
                        .collect();
                    Json(json!({ "results": results }))
                }),
            )
            .route(
                "/recommend_by_cluster",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let id = params.get("cluster_id").cloned().unwrap_or_default();
                    Json(json!({
                        "results": [
                            { "title": "Heat (1995)", "score": 0.8, "cluster_label": format!("Cluster {}", id) }
                        ]
                    }))
                }),
            )
    }

    #[tokio::test]
    async fn test_by_title_preserves_ranking() {
        let base = spawn_stub(stub_router()).await;
        let recommender = HttpRecommender::new(HttpClient::new(), base);

        let results = recommender.by_title("Toy").await.unwrap();
        assert_eq!(
            results,
            vec![
                RecommendationEntry::new("Toy Story (1995)", 0.91),
                RecommendationEntry::new("Aladdin (1992)", 0.64),
            ]
        );
    }

    #[tokio::test]
    async fn test_by_genres_sends_bounds_when_present() {
        let base = spawn_stub(stub_router()).await;
        let recommender = HttpRecommender::new(HttpClient::new(), format!("{}/", base));

        let query = GenreQuery {
            genres: vec!["Comedy".to_string(), "Sci-Fi".to_string()],
            min_year: Some(1990),
            max_year: None,
        };
        let results = recommender.by_genres(&query).await.unwrap();

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Comedy", "Sci-Fi", "min=1990 max=null"]);
    }

    #[tokio::test]
    async fn test_by_cluster_carries_label() {
        let base = spawn_stub(stub_router()).await;
        let recommender = HttpRecommender::new(HttpClient::new(), base);

        let results = recommender
            .by_cluster(ClusterId::new(3).unwrap())
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].cluster_label.as_deref(), Some("Cluster 3"));
    }

    #[tokio::test]
    async fn test_error_status_is_external_api_error() {
        let router = Router::new().route(
            "/recommend",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let base = spawn_stub(router).await;
        let recommender = HttpRecommender::new(HttpClient::new(), base);

        let err = recommender.by_title("Heat").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_unreachable_is_external_api_error() {
        let recommender =
            HttpRecommender::new(HttpClient::new(), "http://127.0.0.1:1".to_string());

        let err = recommender.by_title("Heat").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_external_api_error() {
        let router = Router::new().route("/recommend", get(|| async { "not json" }));
        let base = spawn_stub(router).await;
        let recommender = HttpRecommender::new(HttpClient::new(), base);

        let err = recommender.by_title("Heat").await.unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }
}
