use serde::Serialize;

use crate::db::SystemLog;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            errors: None,
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            errors: None,
            code: None,
        }
    }

    #[must_use]
    pub const fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    #[must_use]
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

/// One page of a listing.
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub limit: u64,
}

impl<T> Paginated<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, page: u64, limit: u64) -> Self {
        Self {
            items,
            total,
            page,
            pages: total.div_ceil(limit.max(1)),
            limit,
        }
    }

    /// Pages through an already loaded list.
    #[must_use]
    pub fn from_vec(all: Vec<T>, page: u64, limit: u64) -> Self {
        let total = all.len() as u64;
        let skip =
            usize::try_from(page.saturating_sub(1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        let items = all.into_iter().skip(skip).take(take).collect();
        Self::new(items, total, page, limit)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogDto {
    pub id: i64,
    pub event_type: String,
    pub level: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    pub created_at: String,
}

impl From<SystemLog> for LogDto {
    fn from(model: SystemLog) -> Self {
        Self {
            id: model.id,
            event_type: model.event_type,
            level: model.level,
            message: model.message,
            details: model
                .details
                .and_then(|d| serde_json::from_str(&d).ok()),
            correlation_id: model.correlation_id,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let page = Paginated::new(vec![1, 2], 41, 1, 20);
        assert_eq!(page.pages, 3);

        let page = Paginated::<i32>::new(Vec::new(), 0, 1, 20);
        assert_eq!(page.pages, 0);
    }

    #[test]
    fn test_from_vec_slices_requested_page() {
        let page = Paginated::from_vec((1..=5).collect(), 2, 2);
        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);

        let page = Paginated::from_vec((1..=5).collect::<Vec<i32>>(), 9, 2);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_error_envelope_omits_empty_fields() {
        let body =
            serde_json::to_value(ApiResponse::<()>::error("Route not found").with_code("ROUTE_NOT_FOUND"))
                .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "ROUTE_NOT_FOUND");
        assert!(body.get("data").is_none());
        assert!(body.get("errors").is_none());
    }
}
