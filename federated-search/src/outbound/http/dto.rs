//! DTOs for decoding remote item payloads.
//!
//! Backends disagree on field names, so each DTO accepts the observed aliases
//! and maps into one canonical domain item.

use serde::Deserialize;

use crate::domain::{AccountSummary, CatalogEntry, DomainItem, GuideSummary, PostSummary};

/// Identifier sent either as a string or as a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    Text(String),
    Signed(i64),
    Unsigned(u64),
}

impl FlexibleId {
    pub(super) fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Signed(value) => value.to_string(),
            Self::Unsigned(value) => value.to_string(),
        }
    }
}

/// Author sent either as a bare alias or as an embedded profile.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AuthorDto {
    Alias(String),
    Profile {
        #[serde(default)]
        username: Option<String>,
        #[serde(default, rename = "displayName")]
        display_name: Option<String>,
    },
}

impl AuthorDto {
    fn into_alias(self) -> Option<String> {
        match self {
            Self::Alias(alias) => Some(alias),
            Self::Profile {
                username,
                display_name,
            } => username.or(display_name),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    #[serde(alias = "_id")]
    id: FlexibleId,
    #[serde(alias = "alias")]
    username: String,
    #[serde(default, alias = "name")]
    display_name: Option<String>,
    #[serde(default, alias = "avatar")]
    avatar_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CatalogDto {
    #[serde(alias = "_id")]
    id: FlexibleId,
    #[serde(alias = "name")]
    title: String,
    #[serde(default)]
    developer: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    platforms: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostDto {
    #[serde(alias = "_id")]
    id: FlexibleId,
    title: String,
    #[serde(default, alias = "body")]
    content: Option<String>,
    #[serde(default)]
    author: Option<AuthorDto>,
}

#[derive(Debug, Deserialize)]
pub struct GuideDto {
    #[serde(alias = "_id")]
    id: FlexibleId,
    title: String,
    #[serde(default, alias = "body")]
    content: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

impl From<AccountDto> for DomainItem {
    fn from(dto: AccountDto) -> Self {
        Self::Account(AccountSummary {
            id: dto.id.into_string(),
            username: dto.username,
            display_name: dto.display_name,
            avatar_url: dto.avatar_url,
        })
    }
}

impl From<CatalogDto> for DomainItem {
    fn from(dto: CatalogDto) -> Self {
        Self::Catalog(CatalogEntry {
            id: dto.id.into_string(),
            title: dto.title,
            developer: dto.developer,
            description: dto.description,
            genre: dto.genre,
            platforms: dto.platforms,
        })
    }
}

impl From<PostDto> for DomainItem {
    fn from(dto: PostDto) -> Self {
        Self::Post(PostSummary {
            id: dto.id.into_string(),
            title: dto.title,
            content: dto.content,
            author: dto.author.and_then(AuthorDto::into_alias),
        })
    }
}

impl From<GuideDto> for DomainItem {
    fn from(dto: GuideDto) -> Self {
        Self::Guide(GuideSummary {
            id: dto.id.into_string(),
            title: dto.title,
            content: dto.content,
            category: dto.category,
            difficulty: dto.difficulty,
        })
    }
}
