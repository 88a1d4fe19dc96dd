//! Query parameter types for the visualization endpoints.

use serde::Deserialize;
use setuphub_core::listing::SortSpec;

use crate::error::AppError;

/// `?limit=&offset=&sort_by=&order=` on the per-game listing.
#[derive(Debug, Default, Deserialize)]
pub struct GameListingParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl GameListingParams {
    /// Unknown sort fields or directions are rejected.
    pub fn sort(&self) -> Result<SortSpec, AppError> {
        Ok(SortSpec::parse_strict(self.sort_by.as_deref(), self.order.as_deref())?)
    }
}

/// `?limit=` on the top-configurations ranking.
#[derive(Debug, Default, Deserialize)]
pub struct TopParams {
    pub limit: Option<i64>,
}

/// Search parameters.
///
/// Read from raw query pairs because `tags` may be repeated
/// (`?tags=a&tags=b`) or comma-separated (`?tags=a,b`), or both.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub game: Option<String>,
    pub title: Option<String>,
    pub tags: Vec<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchParams {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Result<Self, AppError> {
        let mut params = SearchParams::default();
        for (key, value) in pairs {
            match key.as_str() {
                "game" => params.game = non_blank(value),
                "title" => params.title = non_blank(value),
                "tags" | "tags[]" => params.tags.extend(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(str::to_string),
                ),
                "sort_by" => params.sort_by = non_blank(value),
                "sort_order" => params.sort_order = non_blank(value),
                "limit" => params.limit = Some(parse_int("limit", &value)?),
                "offset" => params.offset = Some(parse_int("offset", &value)?),
                _ => {}
            }
        }
        Ok(params)
    }

    /// Unknown values fall back to `created_at` / `desc`.
    pub fn sort(&self) -> SortSpec {
        SortSpec::parse_lenient(self.sort_by.as_deref(), self.sort_order.as_deref())
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_int(name: &str, value: &str) -> Result<i64, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{name} must be an integer, got {value:?}")))
}
