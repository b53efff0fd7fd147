//! Offset/page pagination for the admin list endpoints.
//!
//! Clients may send `limit` + `offset`, or `limit` + `page`; when both are
//! present, `page` wins. Values arrive as query-string text, so the numeric
//! fields use a deserializer that accepts `"25"` and treats the bare empty
//! value (`?limit=`) as absent.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective row offset. `page` is one-based and overrides `offset`.
    pub fn offset(&self) -> i64 {
        match self.page {
            Some(page) => (page.max(1) - 1) * self.limit(),
            None => self.offset.unwrap_or(0).max(0),
        }
    }
}

/// Page descriptor returned alongside paginated data.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

impl PaginationMeta {
    /// Describe the page `params` selects out of a `total`-row result set.
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let offset = params.offset();
        Self {
            total,
            limit,
            offset: Some(offset),
            page: params.page.map(|p| p.max(1)),
            has_more: offset + limit < total,
        }
    }
}
