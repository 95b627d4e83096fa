//! Reqwest-backed suggestion source.

use async_trait::async_trait;
use serde::Deserialize;

use super::client::HttpBackend;
use super::dto::FlexibleId;
use super::shape::ResponseShape;
use crate::domain::ports::{SearchSourceError, SuggestionSource};
use crate::domain::{Suggestion, SuggestionKind};

const SUGGESTIONS_PATH: &str = "search/suggestions";

#[derive(Debug, Deserialize)]
pub(super) struct SuggestionDto {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(alias = "title", alias = "name")]
    text: String,
    #[serde(default, alias = "_id")]
    id: Option<FlexibleId>,
    #[serde(default)]
    subtitle: Option<String>,
}

impl From<SuggestionDto> for Suggestion {
    fn from(dto: SuggestionDto) -> Self {
        let kind = match dto.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("user" | "account") => SuggestionKind::User,
            Some("game" | "catalog") => SuggestionKind::Game,
            Some("post") => SuggestionKind::Post,
            Some("guide") => SuggestionKind::Guide,
            _ => SuggestionKind::Generic,
        };
        Self {
            kind,
            text: dto.text,
            id: dto.id.map(FlexibleId::into_string),
            subtitle: dto.subtitle,
        }
    }
}

/// Suggestion source calling `GET /search/suggestions?q=`.
#[derive(Debug, Clone)]
pub struct HttpSuggestionSource {
    backend: HttpBackend,
}

impl HttpSuggestionSource {
    /// Build an adapter over a shared backend client.
    pub const fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl SuggestionSource for HttpSuggestionSource {
    async fn suggest(&self, text: &str) -> Result<Vec<Suggestion>, SearchSourceError> {
        let body = self
            .backend
            .get_json(SUGGESTIONS_PATH, &vec![("q", text.to_owned())])
            .await?;
        Ok(ResponseShape::<SuggestionDto>::parse(body, "suggestions")?
            .into_items()
            .into_iter()
            .map(Suggestion::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_types_become_generic() {
        let body = json!({ "suggestions": [
            { "type": "game", "text": "Zelda", "id": 7, "subtitle": "Nintendo" },
            { "type": "trending", "text": "zelda speedrun" },
            { "text": "zelda lore" }
        ]});
        let suggestions: Vec<Suggestion> = ResponseShape::<SuggestionDto>::parse(body, "suggestions")
            .expect("shape parses")
            .into_items()
            .into_iter()
            .map(Suggestion::from)
            .collect();
        let kinds: Vec<_> = suggestions.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![SuggestionKind::Game, SuggestionKind::Generic, SuggestionKind::Generic]
        );
        assert_eq!(suggestions[0].id.as_deref(), Some("7"));
    }
}
