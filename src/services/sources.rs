use crate::{
    error::{AppError, AppResult},
    models::{
        canonical_genre, ClusterId, GenreQuery, RecommendationEntry, SearchKind, CLUSTER_COUNT,
    },
    services::recommender::Recommender,
};

/// A validated user selection, ready to become one recommender request.
///
/// Adapters only translate and forward; enrichment and filtering happen
/// downstream.
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationSource {
    Title(String),
    Genres {
        genres: Vec<String>,
        min_year: Option<i32>,
        max_year: Option<i32>,
    },
    Cluster(ClusterId),
}

impl RecommendationSource {
    /// Free-text title search; the title is trimmed and must not be empty
    pub fn title(title: &str) -> AppResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }
        Ok(Self::Title(title.to_string()))
    }

    /// Genre search. Names are matched case-insensitively against the catalogue
    /// and de-duplicated, keeping first-seen order.
    pub fn genres(
        names: &[String],
        min_year: Option<i32>,
        max_year: Option<i32>,
    ) -> AppResult<Self> {
        let mut genres: Vec<String> = Vec::with_capacity(names.len());

        for name in names {
            let genre = canonical_genre(name)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown genre: {}", name)))?;
            if !genres.iter().any(|g| g == genre) {
                genres.push(genre.to_string());
            }
        }

        if genres.is_empty() {
            return Err(AppError::InvalidInput(
                "At least one genre is required".to_string(),
            ));
        }

        Ok(Self::Genres {
            genres,
            min_year,
            max_year,
        })
    }

    /// Cluster search; the id must be one of the precomputed clusters
    pub fn cluster(cluster_id: i64) -> AppResult<Self> {
        ClusterId::new(cluster_id).map(Self::Cluster).ok_or_else(|| {
            AppError::InvalidInput(format!(
                "Cluster id must be between 0 and {}, got {}",
                CLUSTER_COUNT - 1,
                cluster_id
            ))
        })
    }

    pub fn kind(&self) -> SearchKind {
        match self {
            Self::Title(_) => SearchKind::Title,
            Self::Genres { .. } => SearchKind::Genres,
            Self::Cluster(_) => SearchKind::Cluster,
        }
    }

    /// Issues the single recommender request for this selection
    pub async fn fetch(
        &self,
        recommender: &dyn Recommender,
    ) -> AppResult<Vec<RecommendationEntry>> {
        match self {
            Self::Title(title) => recommender.by_title(title).await,
            Self::Genres {
                genres,
                min_year,
                max_year,
            } => {
                let query = GenreQuery {
                    genres: genres.clone(),
                    min_year: *min_year,
                    max_year: *max_year,
                };
                recommender.by_genres(&query).await
            }
            Self::Cluster(cluster) => recommender.by_cluster(*cluster).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::recommender::MockRecommender;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_title_trimmed() {
        assert_eq!(
            RecommendationSource::title("  Heat ").unwrap(),
            RecommendationSource::Title("Heat".to_string())
        );
    }

    #[test]
    fn test_empty_title_rejected() {
        let err = RecommendationSource::title("   ").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_genres_canonicalized_and_deduplicated() {
        let source =
            RecommendationSource::genres(&strings(&["sci-fi", "Comedy", "SCI-FI"]), None, None)
                .unwrap();

        assert_eq!(
            source,
            RecommendationSource::Genres {
                genres: strings(&["Sci-Fi", "Comedy"]),
                min_year: None,
                max_year: None,
            }
        );
        assert_eq!(source.kind(), SearchKind::Genres);
    }

    #[test]
    fn test_empty_genre_set_rejected() {
        let err = RecommendationSource::genres(&[], None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_genre_rejected() {
        let err = RecommendationSource::genres(&strings(&["Drama", "Anime"]), None, None)
            .unwrap_err();
        assert!(err.to_string().contains("Anime"));
    }

    #[test]
    fn test_cluster_id_validated() {
        assert_eq!(
            RecommendationSource::cluster(2).unwrap().kind(),
            SearchKind::Cluster
        );
        assert!(RecommendationSource::cluster(i64::from(CLUSTER_COUNT)).is_err());
        assert!(RecommendationSource::cluster(-3).is_err());
    }

    #[tokio::test]
    async fn test_title_fetch_calls_only_title_endpoint() {
        let mut recommender = MockRecommender::new();
        recommender
            .expect_by_title()
            .withf(|title: &str| title == "Heat")
            .times(1)
            .returning(|_| Ok(vec![RecommendationEntry::new("Casino (1995)", 0.7)]));
        recommender.expect_by_genres().times(0);
        recommender.expect_by_cluster().times(0);

        let source = RecommendationSource::title("Heat").unwrap();
        let results = source.fetch(&recommender).await.unwrap();

        assert_eq!(results, vec![RecommendationEntry::new("Casino (1995)", 0.7)]);
    }

    #[tokio::test]
    async fn test_genre_fetch_forwards_year_bounds() {
        let mut recommender = MockRecommender::new();
        recommender
            .expect_by_genres()
            .withf(|query: &GenreQuery| {
                query.genres == vec!["Crime".to_string()]
                    && query.min_year == Some(1990)
                    && query.max_year == Some(1999)
            })
            .times(1)
            .returning(|_| Ok(vec![]));

        let source =
            RecommendationSource::genres(&strings(&["crime"]), Some(1990), Some(1999)).unwrap();
        let results = source.fetch(&recommender).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_cluster_fetch_passes_labels_through() {
        let mut recommender = MockRecommender::new();
        recommender
            .expect_by_cluster()
            .withf(|cluster: &ClusterId| cluster.value() == 1)
            .times(1)
            .returning(|_| {
                Ok(vec![
                    RecommendationEntry::new("Alien (1979)", 0.9).with_cluster_label("Dark sci-fi")
                ])
            });

        let source = RecommendationSource::cluster(1).unwrap();
        let results = source.fetch(&recommender).await.unwrap();
        assert_eq!(results[0].cluster_label.as_deref(), Some("Dark sci-fi"));
    }

    #[tokio::test]
    async fn test_recommender_failure_propagates() {
        let mut recommender = MockRecommender::new();
        recommender
            .expect_by_title()
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));

        let source = RecommendationSource::title("Heat").unwrap();
        tokio_test::assert_err!(source.fetch(&recommender).await);
    }
}
