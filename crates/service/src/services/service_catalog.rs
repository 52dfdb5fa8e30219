use std::sync::Arc;

use models::service::{fields, NewService, Service, ServicePatch};
use mongodb::bson::Bson;
use tracing::{debug, instrument};

use crate::collection::Collection;
use crate::errors::ServiceError;
use crate::storage::{DeleteResult, DocumentStore, Filter, FindSpec, InsertResult, UpdateResult};

/// Upper bound on `GET /services/featured`.
pub const FEATURED_LIMIT: i64 = 6;

/// Category value clients send to mean "every category".
pub const ALL_CATEGORIES: &str = "All";

/// Category narrowing for the service listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    AllCategories,
    Specific(String),
}

impl CategoryFilter {
    /// Missing, empty and `"All"` all mean no narrowing.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES) => CategoryFilter::AllCategories,
            Some(name) => CategoryFilter::Specific(name.to_string()),
        }
    }
}

/// Recognised query parameters of `GET /services`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ServiceQuery {
    /// Case-insensitive substring of title, category or company.
    pub search: Option<String>,
    /// Exact owner email (`userEmail`).
    pub email: Option<String>,
    pub category: CategoryFilter,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl ServiceQuery {
    pub fn from_params(search: Option<String>, email: Option<String>, category: Option<String>) -> Self {
        Self {
            search: non_empty(search),
            email: non_empty(email),
            category: CategoryFilter::from_param(category.as_deref()),
        }
    }

    /// AND of every present condition; nothing present matches all records.
    pub fn to_filter(&self) -> Filter {
        let mut conditions = Vec::new();
        if let Some(search) = &self.search {
            conditions.push(Filter::Or(
                [fields::TITLE, fields::CATEGORY, fields::COMPANY]
                    .into_iter()
                    .map(|field| Filter::contains_ignore_case(field, search))
                    .collect(),
            ));
        }
        if let Some(email) = &self.email {
            conditions.push(Filter::eq(fields::USER_EMAIL, email.as_str()));
        }
        if let CategoryFilter::Specific(name) = &self.category {
            conditions.push(Filter::eq(fields::CATEGORY, name.as_str()));
        }
        Filter::all_of(conditions)
    }
}

/// Routes over the `services` collection.
#[derive(Clone)]
pub struct ServiceCatalog {
    services: Collection<Service>,
}

impl ServiceCatalog {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self { services: Collection::new(store, collection) }
    }

    pub async fn create(&self, input: &NewService) -> Result<InsertResult, ServiceError> {
        self.services.create(input.to_document()?).await
    }

    /// First records in store order, capped at [`FEATURED_LIMIT`].
    pub async fn featured(&self) -> Result<Vec<Service>, ServiceError> {
        self.services.find(&Filter::All, &FindSpec::limit(FEATURED_LIMIT)).await
    }

    pub async fn get(&self, raw_id: &str) -> Result<Option<Service>, ServiceError> {
        let id = Collection::<Service>::parse_id(raw_id)?;
        self.services.get(&id).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ServiceQuery) -> Result<Vec<Service>, ServiceError> {
        let found = self.services.find(&query.to_filter(), &FindSpec::default()).await?;
        debug!(count = found.len(), "services listed");
        Ok(found)
    }

    /// Distinct categories; records without a string category are skipped.
    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        let values = self.services.group_values(fields::CATEGORY).await?;
        Ok(values
            .into_iter()
            .filter_map(|v| match v {
                Bson::String(s) => Some(s),
                _ => None,
            })
            .collect())
    }

    pub async fn update(&self, raw_id: &str, patch: &ServicePatch) -> Result<UpdateResult, ServiceError> {
        let id = Collection::<Service>::parse_id(raw_id)?;
        let set = patch.to_set_document()?;
        self.services.update_partial(&id, set).await
    }

    pub async fn delete(&self, raw_id: &str) -> Result<DeleteResult, ServiceError> {
        let id = Collection::<Service>::parse_id(raw_id)?;
        self.services.delete(&id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::test_support::CountingStore;
    use serde_json::json;

    fn new_service(title: &str, category: &str, company: &str, owner: &str) -> NewService {
        serde_json::from_value(json!({
            "title": title,
            "category": category,
            "company": company,
            "userEmail": owner,
        }))
        .unwrap()
    }

    async fn seeded() -> ServiceCatalog {
        let catalog = ServiceCatalog::new(Arc::new(MemoryStore::new()), "services");
        for s in [
            new_service("Pipe Repair", "Home", "Acme Plumbing", "a@x.com"),
            new_service("Oil Change", "Auto", "Speedy", "b@x.com"),
            new_service("Garden Design", "Home", "GreenCo", "a@x.com"),
            new_service("Tax Advice", "Finance", "Numbers Ltd", "c@x.com"),
        ] {
            catalog.create(&s).await.unwrap();
        }
        catalog
    }

    fn titles(services: &[Service]) -> Vec<&str> {
        services.iter().filter_map(|s| s.title()).collect()
    }

    #[test]
    fn category_sentinel_is_not_a_literal() {
        assert_eq!(CategoryFilter::from_param(Some("All")), CategoryFilter::AllCategories);
        assert_eq!(CategoryFilter::from_param(None), CategoryFilter::AllCategories);
        assert_eq!(CategoryFilter::from_param(Some("")), CategoryFilter::AllCategories);
        assert_eq!(CategoryFilter::from_param(Some("all")), CategoryFilter::Specific("all".into()));
    }

    #[test]
    fn empty_query_matches_everything() {
        let q = ServiceQuery::from_params(Some(String::new()), None, Some("All".into()));
        assert_eq!(q.to_filter(), Filter::All);
    }

    #[test]
    fn filter_combines_conditions_with_and() {
        let q = ServiceQuery::from_params(Some("pipe".into()), Some("a@x.com".into()), Some("Home".into()));
        match q.to_filter() {
            Filter::And(parts) => {
                assert_eq!(parts.len(), 3);
                assert!(matches!(&parts[0], Filter::Or(or) if or.len() == 3));
                assert_eq!(parts[1], Filter::eq("userEmail", "a@x.com"));
                assert_eq!(parts[2], Filter::eq("category", "Home"));
            }
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_by_category_returns_exact_subset() {
        let catalog = seeded().await;
        let home = catalog.list(&ServiceQuery::from_params(None, None, Some("Home".into()))).await.unwrap();
        assert_eq!(titles(&home), ["Pipe Repair", "Garden Design"]);

        let all = catalog.list(&ServiceQuery::from_params(None, None, Some("All".into()))).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn search_is_case_insensitive_across_fields() {
        let catalog = seeded().await;
        // title
        let r = catalog.list(&ServiceQuery::from_params(Some("OIL".into()), None, None)).await.unwrap();
        assert_eq!(titles(&r), ["Oil Change"]);
        // category
        let r = catalog.list(&ServiceQuery::from_params(Some("financ".into()), None, None)).await.unwrap();
        assert_eq!(titles(&r), ["Tax Advice"]);
        // company
        let r = catalog.list(&ServiceQuery::from_params(Some("greenco".into()), None, None)).await.unwrap();
        assert_eq!(titles(&r), ["Garden Design"]);
        let r = catalog.list(&ServiceQuery::from_params(Some("nothing".into()), None, None)).await.unwrap();
        assert!(r.is_empty());
    }

    #[tokio::test]
    async fn search_and_owner_filters_intersect() {
        let catalog = seeded().await;
        let q = ServiceQuery::from_params(Some("home".into()), Some("a@x.com".into()), None);
        let r = catalog.list(&q).await.unwrap();
        assert_eq!(titles(&r), ["Pipe Repair", "Garden Design"]);
        let q = ServiceQuery::from_params(None, Some("c@x.com".into()), Some("Home".into()));
        assert!(catalog.list(&q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn featured_is_capped_at_six() {
        let catalog = ServiceCatalog::new(Arc::new(MemoryStore::new()), "services");
        for i in 0..9 {
            catalog.create(&new_service(&format!("s{i}"), "Home", "Co", "o@x.com")).await.unwrap();
        }
        let featured = catalog.featured().await.unwrap();
        assert_eq!(featured.len(), FEATURED_LIMIT as usize);
    }

    #[tokio::test]
    async fn categories_are_distinct_strings() {
        let catalog = seeded().await;
        catalog.create(&NewService::default()).await.unwrap();
        let mut cats = catalog.categories().await.unwrap();
        cats.sort();
        assert_eq!(cats, ["Auto", "Finance", "Home"]);
    }

    #[tokio::test]
    async fn invalid_ids_never_reach_the_store() {
        let store = Arc::new(CountingStore::default());
        let catalog = ServiceCatalog::new(store.clone(), "services");
        let patch = ServicePatch { title: Some("x".into()), ..Default::default() };

        assert!(matches!(catalog.update("nope", &patch).await, Err(ServiceError::InvalidId { .. })));
        assert!(matches!(catalog.delete("nope").await, Err(ServiceError::InvalidId { .. })));
        assert!(matches!(catalog.get("nope").await, Err(ServiceError::InvalidId { .. })));
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn create_update_delete_scenario() {
        let catalog = ServiceCatalog::new(Arc::new(MemoryStore::new()), "services");
        let created = catalog
            .create(&serde_json::from_value(json!({"title": "Plumbing", "category": "Home", "company": "Acme"})).unwrap())
            .await
            .unwrap();
        let id = created.inserted_id;

        let found = catalog.get(&id).await.unwrap().unwrap();
        assert_eq!(found.id.to_hex(), id);
        assert_eq!(found.category(), Some("Home"));

        let patch = ServicePatch { category: Some("Repair".into()), ..Default::default() };
        let res = catalog.update(&id, &patch).await.unwrap();
        assert_eq!(res.matched_count, 1);
        let found = catalog.get(&id).await.unwrap().unwrap();
        assert_eq!(found.category(), Some("Repair"));
        assert_eq!(found.title(), Some("Plumbing"));

        assert_eq!(catalog.delete(&id).await.unwrap().deleted_count, 1);
        assert!(catalog.get(&id).await.unwrap().is_none());
        assert!(matches!(catalog.delete(&id).await, Err(ServiceError::NotFound(_))));
    }
}
