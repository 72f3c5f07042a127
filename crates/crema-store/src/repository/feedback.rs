//! # Feedback Repository

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crema_core::validation::validate_feedback;
use crema_core::{Feedback, FeedbackCategory};

use super::new_id;
use crate::error::{reject_if_any, StoreError, StoreResult};
use crate::store::SharedData;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFeedback {
    pub customer_id: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub rating: u8,
    pub category: FeedbackCategory,
    #[serde(default)]
    pub comment: String,
}

/// Rating overview across all feedback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSummary {
    pub count: usize,
    /// Mean rating, `None` when there is no feedback yet.
    pub average_rating: Option<f64>,
    pub by_category: Vec<(FeedbackCategory, usize)>,
}

#[derive(Debug, Clone)]
pub struct FeedbackRepository {
    data: SharedData,
}

impl FeedbackRepository {
    pub(crate) fn new(data: SharedData) -> Self {
        FeedbackRepository { data }
    }

    /// Lists feedback newest first, optionally for one customer.
    pub async fn list(&self, customer_id: Option<&str>) -> Vec<Feedback> {
        let data = self.data.read().await;
        let mut entries: Vec<Feedback> = data
            .feedback
            .iter()
            .filter(|f| customer_id.map_or(true, |id| f.customer_id == id))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));
        entries
    }

    pub async fn create(&self, input: NewFeedback) -> StoreResult<Feedback> {
        let mut data = self.data.write().await;

        let feedback = Feedback {
            id: new_id("f"),
            customer_id: input.customer_id.trim().to_string(),
            date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
            rating: input.rating,
            category: input.category,
            comment: input.comment.trim().to_string(),
        };
        let customer_exists = data.customers.iter().any(|c| c.id == feedback.customer_id);
        reject_if_any(validate_feedback(&feedback, customer_exists))?;

        data.feedback.push(feedback.clone());
        info!(feedback_id = %feedback.id, rating = feedback.rating, "Feedback recorded");
        Ok(feedback)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<Feedback> {
        let mut data = self.data.write().await;
        let index = data
            .feedback
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| StoreError::not_found("Feedback", id))?;
        Ok(data.feedback.remove(index))
    }

    pub async fn summary(&self) -> FeedbackSummary {
        let data = self.data.read().await;
        let count = data.feedback.len();
        let average_rating = (count > 0).then(|| {
            let total: u32 = data.feedback.iter().map(|f| u32::from(f.rating)).sum();
            f64::from(total) / count as f64
        });

        let by_category = [
            FeedbackCategory::Service,
            FeedbackCategory::Product,
            FeedbackCategory::Ambience,
            FeedbackCategory::Other,
        ]
        .into_iter()
        .map(|cat| (cat, data.feedback.iter().filter(|f| f.category == cat).count()))
        .collect();

        FeedbackSummary {
            count,
            average_rating,
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};

    fn input(customer_id: &str, rating: u8) -> NewFeedback {
        NewFeedback {
            customer_id: customer_id.to_string(),
            date: None,
            rating,
            category: FeedbackCategory::Service,
            comment: "Friendly staff".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let store = Store::new(StoreConfig::new()).await.unwrap();
        let f = store.feedback().create(input("c-1003", 5)).await.unwrap();

        let mine = store.feedback().list(Some("c-1003")).await;
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].id, f.id);
    }

    #[tokio::test]
    async fn test_rating_and_customer_validated() {
        let store = Store::new(StoreConfig::new()).await.unwrap();
        let err = store.feedback().create(input("c-nope", 0)).await.unwrap_err();
        let fields: Vec<String> = match err {
            StoreError::Core(e) => e.field_errors().iter().map(|v| v.field().to_string()).collect(),
            other => panic!("unexpected error: {other}"),
        };
        assert_eq!(fields, vec!["customerId", "rating"]);
        assert_eq!(store.feedback().list(None).await.len(), 3);
    }

    #[tokio::test]
    async fn test_summary() {
        let store = Store::new(StoreConfig::new()).await.unwrap();
        let summary = store.feedback().summary().await;
        assert_eq!(summary.count, 3);
        assert_eq!(summary.average_rating, Some(4.0));
        assert!(summary
            .by_category
            .contains(&(FeedbackCategory::Service, 1)));

        let empty = Store::new(StoreConfig::empty()).await.unwrap();
        assert_eq!(empty.feedback().summary().await.average_rating, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = Store::new(StoreConfig::new()).await.unwrap();
        store.feedback().delete("f-0002").await.unwrap();
        assert!(store.feedback().delete("f-0002").await.is_err());
    }
}
