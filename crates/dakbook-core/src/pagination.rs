//! Page-based pagination helpers shared by all list endpoints.
//!
//! Handlers take [`PaginationParams`] from the query string and return
//! [`PaginationMeta`] alongside the page of rows. `limit` is clamped to
//! [1, 100] and `page` is 1-indexed.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Deserializes an optional query value into an optional i64, treating an
/// empty string the same as an absent parameter. Query strings arrive as
/// strings even for numeric parameters (especially under `serde(flatten)`),
/// so every numeric query field goes through this.
pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PaginationParams {
    /// Items per page (1-100, default: 20)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Page number, 1-indexed (default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl PaginationParams {
    /// Effective limit, clamped to [1, 100]. Defaults to 20.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Effective page, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Row offset derived from page and limit.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

/// Metadata included in every paginated response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total rows matching the query across all pages
    pub total: i64,
    /// Limit that was applied
    pub limit: i64,
    /// Page that was returned
    pub page: i64,
    /// Whether rows exist beyond this page
    pub has_more: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(total: i64, params: &PaginationParams) -> Self {
        let limit = params.limit();
        let page = params.page();
        Self {
            total,
            limit,
            page,
            has_more: params.offset() + limit < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_limit_clamped() {
        let params = PaginationParams {
            limit: Some(500),
            page: None,
        };
        assert_eq!(params.limit(), 100);

        let params = PaginationParams {
            limit: Some(0),
            page: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn test_offset_from_page() {
        let params = PaginationParams {
            limit: Some(25),
            page: Some(3),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn test_negative_page_clamped() {
        let params = PaginationParams {
            limit: None,
            page: Some(-4),
        };
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_meta_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            page: Some(1),
        };
        let meta = PaginationMeta::new(25, &params);
        assert!(meta.has_more);

        let params = PaginationParams {
            limit: Some(10),
            page: Some(3),
        };
        let meta = PaginationMeta::new(25, &params);
        assert!(!meta.has_more);
    }

    #[test]
    fn test_empty_string_params_treated_as_absent() {
        let params: PaginationParams =
            serde_urlencoded_like("limit=&page=").expect("should deserialize");
        assert_eq!(params.limit(), 20);
        assert_eq!(params.page(), 1);
    }

    // Query-string deserialization without pulling serde_urlencoded into
    // the dependency tree: go through serde_json with string values, which
    // exercises the same Option<String> path.
    fn serde_urlencoded_like(qs: &str) -> Result<PaginationParams, serde_json::Error> {
        let map: serde_json::Map<String, serde_json::Value> = qs
            .split('&')
            .filter_map(|pair| {
                let (k, v) = pair.split_once('=')?;
                Some((k.to_string(), serde_json::Value::String(v.to_string())))
            })
            .collect();
        serde_json::from_value(serde_json::Value::Object(map))
    }
}
