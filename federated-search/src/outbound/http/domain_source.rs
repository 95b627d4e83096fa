//! Reqwest-backed domain search sources.
//!
//! One generic adapter serves all four domains; a [`DomainEndpoints`]
//! descriptor supplies each domain's paths, parameter names, and item DTO.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::client::{HttpBackend, QueryParams};
use super::dto::{AccountDto, CatalogDto, GuideDto, PostDto};
use super::shape::ResponseShape;
use crate::domain::ports::{
    DomainListingRequest, DomainSearchRequest, DomainSearchSource, SearchSourceError,
};
use crate::domain::{DomainEnvelope, DomainItem, FilterSet, SearchDomain};

/// Endpoint layout for one domain.
pub trait DomainEndpoints: Send + Sync + 'static {
    /// Domain served.
    const DOMAIN: SearchDomain;
    /// Collection key used by enveloped responses.
    const COLLECTION_KEY: &'static str;
    /// Primary search path, relative to the base URL.
    const SEARCH_PATH: &'static str;
    /// Name of the query-text parameter on the search path.
    const TEXT_PARAM: &'static str;
    /// Ordinary listing path, relative to the base URL.
    const LISTING_PATH: &'static str;

    /// Transport representation of one item.
    #[doc(hidden)]
    type Dto: DeserializeOwned + Into<DomainItem>;

    /// Append the filters this domain's search endpoint accepts.
    fn filter_params(_filters: &FilterSet, _params: &mut QueryParams) {}

    /// Query parameters for a listing request.
    fn listing_params(request: &DomainListingRequest) -> QueryParams;
}

/// `GET /users/search`, listing `GET /users?search=`.
#[derive(Debug, Clone, Copy)]
pub struct AccountEndpoints;

/// `GET /games`, listing `GET /games?limit=`.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEndpoints;

/// `GET /posts/search`, listing `GET /posts?page=1&limit=`.
#[derive(Debug, Clone, Copy)]
pub struct PostEndpoints;

/// `GET /guides`, listing `GET /guides?page=1&limit=`.
#[derive(Debug, Clone, Copy)]
pub struct GuideEndpoints;

fn push_opt(params: &mut QueryParams, name: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        params.push((name, value.to_owned()));
    }
}

fn push_sort(filters: &FilterSet, params: &mut QueryParams) {
    push_opt(params, "sortBy", filters.sort_by.as_deref());
    push_opt(
        params,
        "sortOrder",
        filters.sort_order.map(|order| order.as_str()),
    );
}

fn first_page(request: &DomainListingRequest) -> QueryParams {
    vec![("page", "1".to_owned()), ("limit", request.cap.to_string())]
}

impl DomainEndpoints for AccountEndpoints {
    const DOMAIN: SearchDomain = SearchDomain::Accounts;
    const COLLECTION_KEY: &'static str = "users";
    const SEARCH_PATH: &'static str = "users/search";
    const TEXT_PARAM: &'static str = "search";
    const LISTING_PATH: &'static str = "users";
    type Dto = AccountDto;

    fn listing_params(request: &DomainListingRequest) -> QueryParams {
        let mut params = QueryParams::new();
        push_opt(&mut params, "search", request.text_hint.as_deref());
        params
    }
}

impl DomainEndpoints for CatalogEndpoints {
    const DOMAIN: SearchDomain = SearchDomain::Catalog;
    const COLLECTION_KEY: &'static str = "games";
    const SEARCH_PATH: &'static str = "games";
    const TEXT_PARAM: &'static str = "search";
    const LISTING_PATH: &'static str = "games";
    type Dto = CatalogDto;

    fn filter_params(filters: &FilterSet, params: &mut QueryParams) {
        push_opt(params, "genre", filters.genre.as_deref());
        push_sort(filters, params);
    }

    fn listing_params(request: &DomainListingRequest) -> QueryParams {
        vec![("limit", request.cap.to_string())]
    }
}

impl DomainEndpoints for PostEndpoints {
    const DOMAIN: SearchDomain = SearchDomain::Posts;
    const COLLECTION_KEY: &'static str = "posts";
    const SEARCH_PATH: &'static str = "posts/search";
    const TEXT_PARAM: &'static str = "q";
    const LISTING_PATH: &'static str = "posts";
    type Dto = PostDto;

    fn listing_params(request: &DomainListingRequest) -> QueryParams {
        first_page(request)
    }
}

impl DomainEndpoints for GuideEndpoints {
    const DOMAIN: SearchDomain = SearchDomain::Guides;
    const COLLECTION_KEY: &'static str = "guides";
    const SEARCH_PATH: &'static str = "guides";
    const TEXT_PARAM: &'static str = "search";
    const LISTING_PATH: &'static str = "guides";
    type Dto = GuideDto;

    fn filter_params(filters: &FilterSet, params: &mut QueryParams) {
        push_opt(params, "category", filters.category.as_deref());
        push_opt(params, "difficulty", filters.difficulty.as_deref());
        push_sort(filters, params);
    }

    fn listing_params(request: &DomainListingRequest) -> QueryParams {
        first_page(request)
    }
}

/// Search source for the domain described by `E`.
#[derive(Debug, Clone)]
pub struct HttpDomainSource<E> {
    backend: HttpBackend,
    endpoints: PhantomData<E>,
}

/// Accounts adapter.
pub type AccountHttpSource = HttpDomainSource<AccountEndpoints>;
/// Catalog adapter.
pub type CatalogHttpSource = HttpDomainSource<CatalogEndpoints>;
/// Posts adapter.
pub type PostHttpSource = HttpDomainSource<PostEndpoints>;
/// Guides adapter.
pub type GuideHttpSource = HttpDomainSource<GuideEndpoints>;

impl<E: DomainEndpoints> HttpDomainSource<E> {
    /// Build an adapter over a shared backend client.
    pub const fn new(backend: HttpBackend) -> Self {
        Self {
            backend,
            endpoints: PhantomData,
        }
    }

    fn search_params(request: &DomainSearchRequest) -> QueryParams {
        let mut params = vec![
            (E::TEXT_PARAM, request.text.clone()),
            ("page", request.page.page().to_string()),
            ("limit", request.page.limit().to_string()),
        ];
        E::filter_params(&request.filters, &mut params);
        params
    }
}

#[async_trait]
impl<E: DomainEndpoints> DomainSearchSource for HttpDomainSource<E> {
    fn domain(&self) -> SearchDomain {
        E::DOMAIN
    }

    async fn search(
        &self,
        request: &DomainSearchRequest,
    ) -> Result<DomainEnvelope, SearchSourceError> {
        let body = self
            .backend
            .get_json(E::SEARCH_PATH, &Self::search_params(request))
            .await?;
        let shape = ResponseShape::<E::Dto>::parse(body, E::COLLECTION_KEY)?;
        Ok(shape.into_envelope(request.page).map(Into::into))
    }

    async fn list(
        &self,
        request: &DomainListingRequest,
    ) -> Result<Vec<DomainItem>, SearchSourceError> {
        let body = self
            .backend
            .get_json(E::LISTING_PATH, &E::listing_params(request))
            .await?;
        let cap = usize::try_from(request.cap).unwrap_or(usize::MAX);
        Ok(ResponseShape::<E::Dto>::parse(body, E::COLLECTION_KEY)?
            .into_items()
            .into_iter()
            .take(cap)
            .map(Into::into)
            .collect())
    }
}
