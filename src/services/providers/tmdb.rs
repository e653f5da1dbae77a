/// TMDb (The Movie Database) metadata provider
///
/// API Flow:
/// 1. `/search/movie?query=<title>` → candidate list
/// 2. First candidate is taken as-is (no similarity re-ranking)
/// 3. Poster path, vote average and release date are mapped onto [`Metadata`]
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{parse_release_year, Metadata, TmdbSearchResponse},
    services::providers::MetadataLookup,
};
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const DEFAULT_POSTER_WIDTH: &str = "w200";
const MOVIE_PAGE_BASE_URL: &str = "https://www.themoviedb.org/movie";
const DEFAULT_CACHE_TTL: u64 = 86400; // 1 day

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
    poster_width: String,
    cache: Option<Cache>,
    cache_ttl: u64,
}

impl TmdbProvider {
    /// Creates an uncached provider with the default poster base and width
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            poster_width: DEFAULT_POSTER_WIDTH.to_string(),
            cache: None,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Creates a provider from application config, with a per-request timeout
    pub fn from_config(config: &Config, cache: Option<Cache>) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(config.lookup_timeout_secs))
            .build()?;

        let mut provider = Self::new(
            http_client,
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
        )
        .with_poster_base(&config.tmdb_image_base_url, &config.poster_width);

        if let Some(cache) = cache {
            provider = provider.with_cache(cache, config.metadata_cache_ttl);
        }

        Ok(provider)
    }

    pub fn with_poster_base(mut self, image_base_url: &str, poster_width: &str) -> Self {
        self.image_base_url = image_base_url.trim_end_matches('/').to_string();
        self.poster_width = poster_width.trim_matches('/').to_string();
        self
    }

    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// Runs one search request and maps the first candidate
    async fn search(&self, title: &str) -> AppResult<Metadata> {
        let url = format!("{}/search/movie", self.api_url);
        tracing::debug!(url = %url, query = %title, "TMDb request");

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb returned status {}: {}",
                status, body
            )));
        }

        let search: TmdbSearchResponse = response.json().await?;

        let metadata = search
            .results
            .first()
            .map(|candidate| self.metadata_from_candidate(candidate))
            .unwrap_or_default();

        tracing::debug!(
            query = %title,
            candidates = search.results.len(),
            has_poster = metadata.poster_url.is_some(),
            "TMDb search completed"
        );

        Ok(metadata)
    }

    /// Maps one search candidate; each field degrades to `None` on its own
    fn metadata_from_candidate(&self, candidate: &Value) -> Metadata {
        let poster_url = candidate["poster_path"]
            .as_str()
            .filter(|path| !path.trim().is_empty())
            .map(|path| self.poster_url(path));

        let year = candidate["release_date"]
            .as_str()
            .and_then(parse_release_year);

        let details_url = candidate["id"]
            .as_u64()
            .map(|id| format!("{}/{}", MOVIE_PAGE_BASE_URL, id));

        Metadata {
            poster_url,
            rating: candidate["vote_average"].as_f64(),
            year,
            details_url,
        }
    }

    fn poster_url(&self, poster_path: &str) -> String {
        if poster_path.starts_with('/') {
            format!("{}/{}{}", self.image_base_url, self.poster_width, poster_path)
        } else {
            format!("{}/{}/{}", self.image_base_url, self.poster_width, poster_path)
        }
    }
}

#[async_trait::async_trait]
impl MetadataLookup for TmdbProvider {
    async fn lookup(&self, title: &str) -> Metadata {
        let result: AppResult<Metadata> = cached!(
            self.cache,
            CacheKey::Metadata(title.to_string()),
            self.cache_ttl,
            self.search(title)
        );

        match result {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(
                    title = %title,
                    error = %e,
                    provider = self.name(),
                    "Metadata lookup failed, using absent metadata"
                );
                Metadata::absent()
            }
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
