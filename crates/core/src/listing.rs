//! Ordering and windowing of enriched configuration listings.
//!
//! Sorting happens after enrichment because `average_rating` and
//! `likes_count` only exist on the composite view.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::CoreError;
use crate::view::ConfigurationView;

// ---------------------------------------------------------------------------
// Pagination defaults
// ---------------------------------------------------------------------------

/// Default page size for per-game listings and search.
pub const DEFAULT_LIMIT: i64 = 10;

/// Maximum page size for per-game listings.
pub const MAX_GAME_LIMIT: i64 = 50;

/// Maximum page size for search.
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Maximum number of entries in the top-configurations ranking.
pub const MAX_TOP_LIMIT: i64 = 50;

/// Clamp a user-provided limit to `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Fields a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    CreatedAt,
    AverageRating,
    Title,
    LikesCount,
    Game,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::AverageRating => "average_rating",
            SortField::Title => "title",
            SortField::LikesCount => "likes_count",
            SortField::Game => "game",
        }
    }
}

impl FromStr for SortField {
    type Err = CoreError;

    /// `popularity` is accepted as an alias of `likes_count`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortField::CreatedAt),
            "average_rating" => Ok(SortField::AverageRating),
            "title" => Ok(SortField::Title),
            "likes_count" | "popularity" => Ok(SortField::LikesCount),
            "game" => Ok(SortField::Game),
            other => Err(CoreError::Validation(format!("Unsupported sort field: {other}"))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CoreError::Validation(format!("Unsupported sort order: {other}"))),
        }
    }
}

/// A validated ordering request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortSpec {
    /// Parse both parameters, rejecting unknown values.
    pub fn parse_strict(field: Option<&str>, order: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            field: field.map(str::parse::<SortField>).transpose()?.unwrap_or_default(),
            order: order.map(str::parse::<SortOrder>).transpose()?.unwrap_or_default(),
        })
    }

    /// Parse both parameters, falling back to the defaults for unknown values.
    pub fn parse_lenient(field: Option<&str>, order: Option<&str>) -> Self {
        Self {
            field: field.and_then(|f| f.parse().ok()).unwrap_or_default(),
            order: order.and_then(|o| o.parse().ok()).unwrap_or_default(),
        }
    }
}

fn compare(field: SortField, a: &ConfigurationView, b: &ConfigurationView) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::AverageRating => a
            .average_rating
            .unwrap_or(0.0)
            .total_cmp(&b.average_rating.unwrap_or(0.0)),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::LikesCount => a.likes_count.cmp(&b.likes_count),
        SortField::Game => a.game.to_lowercase().cmp(&b.game.to_lowercase()),
    }
}

/// Sort views in place. The sort is stable: ties keep their input order in
/// both directions.
pub fn sort_views(views: &mut [ConfigurationView], spec: SortSpec) {
    let field = spec.field;
    match spec.order {
        SortOrder::Asc => views.sort_by(|a, b| compare(field, a, b)),
        SortOrder::Desc => views.sort_by(|a, b| compare(field, b, a)),
    }
}

// ---------------------------------------------------------------------------
// Windowing
// ---------------------------------------------------------------------------

/// One window of a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Number of items before windowing.
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_more: bool,
}

/// Take `limit` items starting at `offset`.
pub fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Page<T> {
    let total = items.len();
    let window = items.into_iter().skip(offset).take(limit).collect();
    Page {
        items: window,
        total,
        limit,
        offset,
        has_more: offset.saturating_add(limit) < total,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use serde_json::Map;

    use super::*;
    use crate::view::Author;

    fn view(title: &str, minutes: i64, average: Option<f64>, likes: i64) -> ConfigurationView {
        ConfigurationView {
            id: title.to_lowercase(),
            game: "StarCraft II".into(),
            title: title.into(),
            description: None,
            parameters: Map::new(),
            tags: vec![],
            author: Author { username: "someone".into(), email: None },
            user_id: "u".into(),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
            views: 0,
            average_rating: average,
            total_ratings: if average.is_some() { 1 } else { 0 },
            comments: vec![],
            comments_count: 0,
            likes_count: likes,
        }
    }

    fn spec(field: SortField, order: SortOrder) -> SortSpec {
        SortSpec { field, order }
    }

    fn titles(views: &[ConfigurationView]) -> Vec<&str> {
        views.iter().map(|v| v.title.as_str()).collect()
    }

    #[test]
    fn created_at_desc_puts_newest_first() {
        let mut views = vec![view("a", 1, None, 0), view("b", 3, None, 0), view("c", 2, None, 0)];
        sort_views(&mut views, spec(SortField::CreatedAt, SortOrder::Desc));
        assert_eq!(titles(&views), vec!["b", "c", "a"]);
    }

    #[test]
    fn missing_average_sorts_as_zero_without_changing_display() {
        let mut views = vec![
            view("unrated", 0, None, 0),
            view("low", 0, Some(1.5), 0),
            view("high", 0, Some(4.0), 0),
        ];
        sort_views(&mut views, spec(SortField::AverageRating, SortOrder::Asc));
        assert_eq!(titles(&views), vec!["unrated", "low", "high"]);
        assert_eq!(views[0].average_rating, None);
    }

    #[test]
    fn title_sort_ignores_case() {
        let mut views = vec![view("beta", 0, None, 0), view("Alpha", 0, None, 0), view("gamma", 0, None, 0)];
        sort_views(&mut views, spec(SortField::Title, SortOrder::Asc));
        assert_eq!(titles(&views), vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let make = || vec![view("first", 0, None, 2), view("second", 0, None, 2), view("third", 0, None, 5)];

        let mut desc = make();
        sort_views(&mut desc, spec(SortField::LikesCount, SortOrder::Desc));
        assert_eq!(titles(&desc), vec!["third", "first", "second"]);

        let mut asc = make();
        sort_views(&mut asc, spec(SortField::LikesCount, SortOrder::Asc));
        assert_eq!(titles(&asc), vec!["first", "second", "third"]);
    }

    #[test]
    fn parses_sort_parameters() {
        assert_eq!("popularity".parse::<SortField>().unwrap(), SortField::LikesCount);
        assert_eq!("average_rating".parse::<SortField>().unwrap(), SortField::AverageRating);
        assert!("views".parse::<SortField>().is_err());
        assert_eq!("asc".parse::<SortOrder>().unwrap(), SortOrder::Asc);
        assert!("up".parse::<SortOrder>().is_err());
        assert_eq!(SortField::default(), SortField::CreatedAt);
        assert_eq!(SortOrder::default(), SortOrder::Desc);
    }

    #[test]
    fn strict_parsing_rejects_unknown_values() {
        assert!(SortSpec::parse_strict(Some("views"), None).is_err());
        assert!(SortSpec::parse_strict(None, Some("sideways")).is_err());
        assert_eq!(
            SortSpec::parse_strict(Some("title"), Some("asc")).unwrap(),
            spec(SortField::Title, SortOrder::Asc)
        );
        assert_eq!(SortSpec::parse_strict(None, None).unwrap(), SortSpec::default());
    }

    #[test]
    fn lenient_parsing_falls_back_to_defaults() {
        assert_eq!(SortSpec::parse_lenient(Some("views"), Some("sideways")), SortSpec::default());
        assert_eq!(
            SortSpec::parse_lenient(Some("popularity"), Some("asc")),
            spec(SortField::LikesCount, SortOrder::Asc)
        );
    }

    #[test]
    fn last_partial_page_has_no_more() {
        let page = paginate((0..25).collect::<Vec<_>>(), 10, 20);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.total, 25);
        assert!(!page.has_more);
    }

    #[test]
    fn first_page_has_more() {
        let page = paginate((0..25).collect::<Vec<_>>(), 10, 0);
        assert_eq!(page.items.len(), 10);
        assert!(page.has_more);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = paginate(vec![1, 2, 3], 10, 50);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[test]
    fn clamp_limit_uses_default_and_bounds() {
        assert_eq!(clamp_limit(None, DEFAULT_LIMIT, MAX_GAME_LIMIT), 10);
        assert_eq!(clamp_limit(Some(500), DEFAULT_LIMIT, MAX_GAME_LIMIT), 50);
        assert_eq!(clamp_limit(Some(0), DEFAULT_LIMIT, MAX_GAME_LIMIT), 1);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(Some(7)), 7);
    }
}
