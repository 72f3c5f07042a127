//! # Feedback Commands

use tracing::debug;

use crema_core::Feedback;
use crema_store::{FeedbackSummary, NewFeedback};

use crate::error::ApiError;
use crate::state::StoreState;

/// Lists feedback, newest first, optionally for one customer.
pub async fn list_feedback(store: &StoreState, customer_id: Option<String>) -> Vec<Feedback> {
    store.inner().feedback().list(customer_id.as_deref()).await
}

pub async fn create_feedback(store: &StoreState, input: NewFeedback) -> Result<Feedback, ApiError> {
    debug!(customer_id = %input.customer_id, rating = input.rating, "create_feedback command");
    Ok(store.inner().feedback().create(input).await?)
}

pub async fn delete_feedback(store: &StoreState, id: String) -> Result<Feedback, ApiError> {
    debug!(feedback_id = %id, "delete_feedback command");
    Ok(store.inner().feedback().delete(&id).await?)
}

pub async fn feedback_summary(store: &StoreState) -> FeedbackSummary {
    store.inner().feedback().summary().await
}
