use std::sync::Arc;

use models::review::{fields, NewReview, Review, ReviewPatch};

use crate::collection::Collection;
use crate::errors::ServiceError;
use crate::storage::{DeleteResult, DocumentStore, Filter, FindSpec, InsertResult, SortOrder, UpdateResult};

/// Routes over the `reviews` collection.
#[derive(Clone)]
pub struct ReviewBook {
    reviews: Collection<Review>,
}

impl ReviewBook {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self { reviews: Collection::new(store, collection) }
    }

    pub async fn create(&self, input: &NewReview) -> Result<InsertResult, ServiceError> {
        self.reviews.create(input.to_document()?).await
    }

    /// Reviews attached to a service. `service_id` is compared as a plain string.
    pub async fn for_service(&self, service_id: &str) -> Result<Vec<Review>, ServiceError> {
        let filter = Filter::eq(fields::SERVICE_ID, service_id);
        self.reviews.find(&filter, &FindSpec::default()).await
    }

    /// Reviews written by `email`, newest first. The email is mandatory.
    pub async fn for_owner(&self, email: Option<&str>) -> Result<Vec<Review>, ServiceError> {
        let email = email.filter(|e| !e.is_empty()).ok_or(ServiceError::MissingParam("email"))?;
        let filter = Filter::eq(fields::EMAIL, email);
        let spec = FindSpec::sorted_by(fields::CREATED_AT, SortOrder::Descending);
        self.reviews.find(&filter, &spec).await
    }

    pub async fn update(&self, raw_id: &str, patch: &ReviewPatch) -> Result<UpdateResult, ServiceError> {
        let id = Collection::<Review>::parse_id(raw_id)?;
        let set = patch.to_set_document()?;
        self.reviews.update_partial(&id, set).await
    }

    pub async fn delete(&self, raw_id: &str) -> Result<DeleteResult, ServiceError> {
        let id = Collection::<Review>::parse_id(raw_id)?;
        self.reviews.delete(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_support::{CountingStore, FailingStore};
    use mongodb::bson::Bson;

    fn review(service: &str, email: &str, created_at: Option<&str>, text: &str) -> NewReview {
        NewReview {
            service_id: Some(service.into()),
            email: Some(email.into()),
            text: Some(text.into()),
            rating: Some(Bson::Double(4.0)),
            created_at: created_at.map(Into::into),
            ..Default::default()
        }
    }

    async fn seeded() -> ReviewBook {
        let book = ReviewBook::new(Arc::new(MemoryStore::new()), "reviews");
        for r in [
            review("svc-1", "ann@x.com", Some("2025-01-01T10:00:00.000Z"), "first"),
            review("svc-2", "bob@x.com", Some("2025-02-01T10:00:00.000Z"), "bob's"),
            review("svc-2", "ann@x.com", Some("2025-03-01T10:00:00.000Z"), "latest"),
            review("svc-1", "ann@x.com", Some("2025-02-15T10:00:00.000Z"), "middle"),
        ] {
            book.create(&r).await.unwrap();
        }
        book
    }

    fn texts(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().filter_map(|r| r.text()).collect()
    }

    #[tokio::test]
    async fn owner_reviews_are_newest_first() {
        let book = seeded().await;
        let mine = book.for_owner(Some("ann@x.com")).await.unwrap();
        assert_eq!(texts(&mine), ["latest", "middle", "first"]);
        assert!(mine.iter().all(|r| r.email() == Some("ann@x.com")));
    }

    #[tokio::test]
    async fn owner_email_is_required() {
        let store = Arc::new(CountingStore::default());
        let book = ReviewBook::new(store.clone(), "reviews");
        assert!(matches!(book.for_owner(None).await, Err(ServiceError::MissingParam("email"))));
        assert!(matches!(book.for_owner(Some("")).await, Err(ServiceError::MissingParam("email"))));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn reviews_for_service_match_foreign_key() {
        let book = seeded().await;
        let svc1 = book.for_service("svc-1").await.unwrap();
        assert_eq!(texts(&svc1), ["first", "middle"]);
        assert!(book.for_service("svc-404").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_changes_text_and_rating_only() {
        let book = seeded().await;
        let created = book.create(&review("svc-9", "cy@x.com", None, "meh")).await.unwrap();
        let patch = ReviewPatch { text: Some("better".into()), rating: Some(Bson::Double(5.0)) };
        let res = book.update(&created.inserted_id, &patch).await.unwrap();
        assert_eq!((res.matched_count, res.modified_count), (1, 1));

        let updated = book.for_service("svc-9").await.unwrap();
        assert_eq!(updated[0].text(), Some("better"));
        assert_eq!(updated[0].rating, Some(Bson::Double(5.0)));
        assert_eq!(updated[0].email(), Some("cy@x.com"));
    }

    #[tokio::test]
    async fn delete_then_delete_again_is_not_found() {
        let book = seeded().await;
        let created = book.create(&review("svc-9", "cy@x.com", None, "bye")).await.unwrap();
        assert_eq!(book.delete(&created.inserted_id).await.unwrap().deleted_count, 1);
        assert!(matches!(book.delete(&created.inserted_id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn invalid_review_id_is_client_error() {
        let book = ReviewBook::new(Arc::new(FailingStore), "reviews");
        let patch = ReviewPatch { text: Some("x".into()), rating: None };
        let err = book.update("123", &patch).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId { entity: "review", .. }));
        let err = book.delete("123").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidId { entity: "review", .. }));
    }

    #[tokio::test]
    async fn store_failure_on_listing_is_db_error() {
        let book = ReviewBook::new(Arc::new(FailingStore), "reviews");
        assert!(matches!(book.for_service("svc-1").await, Err(ServiceError::Db(_))));
    }
}
