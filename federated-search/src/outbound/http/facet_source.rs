//! Reqwest-backed facet source.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::client::HttpBackend;
use super::dto::FlexibleId;
use crate::domain::ports::{FacetSource, SearchSourceError};
use crate::domain::{Facet, FacetCatalog};

const FACETS_PATH: &str = "search/filters";

/// Facet entry sent either as `{ id, name }` or as a bare label.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FacetDto {
    Named {
        #[serde(alias = "_id", alias = "value")]
        id: FlexibleId,
        #[serde(alias = "label")]
        name: String,
    },
    Label(String),
}

impl From<FacetDto> for Facet {
    fn from(dto: FacetDto) -> Self {
        match dto {
            FacetDto::Named { id, name } => Self::new(id.into_string(), name),
            FacetDto::Label(label) => Self::new(label.clone(), label),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FacetCatalogDto {
    #[serde(default)]
    categories: Option<Vec<FacetDto>>,
    #[serde(default)]
    difficulties: Option<Vec<FacetDto>>,
    #[serde(default)]
    genres: Option<Vec<FacetDto>>,
    #[serde(default)]
    platforms: Option<Vec<FacetDto>>,
}

impl FacetCatalogDto {
    fn into_catalog(self) -> Result<FacetCatalog, SearchSourceError> {
        if self.categories.is_none()
            && self.difficulties.is_none()
            && self.genres.is_none()
            && self.platforms.is_none()
        {
            return Err(SearchSourceError::shape_mismatch(
                "facet body carries none of the four facet lists",
            ));
        }
        let convert = |list: Option<Vec<FacetDto>>| {
            list.unwrap_or_default()
                .into_iter()
                .map(Facet::from)
                .collect::<Vec<_>>()
        };
        Ok(FacetCatalog {
            categories: convert(self.categories),
            difficulties: convert(self.difficulties),
            genres: convert(self.genres),
            platforms: convert(self.platforms),
        })
    }
}

fn parse_catalog(mut body: Value) -> Result<FacetCatalog, SearchSourceError> {
    if let Some(Value::Bool(false)) = body.get("success") {
        return Err(SearchSourceError::shape_mismatch(
            "backend reported success: false",
        ));
    }
    let wrapped = body
        .get_mut("data")
        .filter(|data| data.is_object())
        .map(Value::take);
    if let Some(data) = wrapped {
        body = data;
    }
    let dto: FacetCatalogDto = serde_json::from_value(body).map_err(|error| {
        SearchSourceError::shape_mismatch(format!("invalid facet payload: {error}"))
    })?;
    dto.into_catalog()
}

/// Facet source calling `GET /search/filters`.
#[derive(Debug, Clone)]
pub struct HttpFacetSource {
    backend: HttpBackend,
}

impl HttpFacetSource {
    /// Build an adapter over a shared backend client.
    pub const fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl FacetSource for HttpFacetSource {
    async fn load_facets(&self) -> Result<FacetCatalog, SearchSourceError> {
        let body = self.backend.get_json(FACETS_PATH, &Vec::new()).await?;
        parse_catalog(body)
    }
}
