use std::sync::Arc;

use chrono::Local;
use sea_orm::{DbErr, SqlErr};
use tracing::{error, info, instrument, warn};

use models::dog;

use crate::dog::domain::DogInput;
use crate::dog::repository::DogRepository;
use crate::dog::validation::{self, DUPLICATE_BADGE};
use crate::errors::ServiceError;

fn is_badge_conflict(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn rejected(err: ServiceError) -> ServiceError {
    warn!(code = err.code(), reason = %err, "dog_request_rejected");
    err
}

fn storage_failure(context: String, err: DbErr) -> ServiceError {
    error!(error = %err, %context, "dog_storage_failure");
    ServiceError::storage(context, err)
}

/// Application service encapsulating the roster's business rules.
/// Each call goes to the repository on its own; nothing is cached between calls.
pub struct DogService<R: DogRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: DogRepository + ?Sized> DogService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Active dogs, optionally narrowed by a free-text filter. A blank filter counts as none.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: Option<&str>) -> Result<Vec<dog::Model>, ServiceError> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());
        self.repo
            .list_active(filter)
            .await
            .map_err(|e| storage_failure("Error while retrieving all dogs".into(), e))
    }

    /// Every dog, soft-deleted ones included.
    #[instrument(skip(self))]
    pub async fn list_all(&self) -> Result<Vec<dog::Model>, ServiceError> {
        self.repo
            .list_all()
            .await
            .map_err(|e| storage_failure("Error while retrieving all dogs".into(), e))
    }

    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: i32) -> Result<dog::Model, ServiceError> {
        match self.repo.find_by_id(id).await {
            Ok(Some(found)) => Ok(found),
            Ok(None) => Err(ServiceError::not_found(id)),
            Err(e) => Err(storage_failure(format!("Error while retrieving dog with ID {id}"), e)),
        }
    }

    /// Validate a draft, insert it and return the row as stored.
    #[instrument(skip(self, draft), fields(badge_id = ?draft.badge_id))]
    pub async fn create(&self, draft: &DogInput) -> Result<dog::Model, ServiceError> {
        let new_dog = validation::validate_draft(draft).map_err(rejected)?;
        let badge_id = new_dog.badge_id;

        let existing = self
            .repo
            .count_by_badge_id(badge_id)
            .await
            .map_err(|e| storage_failure(format!("Error while checking badge ID {badge_id}"), e))?;
        if existing > 0 {
            return Err(rejected(ServiceError::validation(DUPLICATE_BADGE)));
        }

        validation::check_leaving_not_before_acquired(new_dog.leaving_date, new_dog.date_acquired)
            .map_err(rejected)?;

        let id = self.repo.insert(new_dog).await.map_err(|e| {
            if is_badge_conflict(&e) {
                rejected(ServiceError::validation(DUPLICATE_BADGE))
            } else {
                storage_failure("Error while saving new record".into(), e)
            }
        })?;

        let created = match self.get_by_id(id).await {
            Ok(found) => found,
            Err(ServiceError::NotFound { .. }) => {
                error!(id, "created dog could not be read back");
                return Err(ServiceError::unexpected(format!(
                    "Creating dog failed, record {id} could not be read back."
                )));
            }
            Err(e) => return Err(e),
        };
        info!(id = created.id, badge_id, "dog_created");
        Ok(created)
    }

    /// Change only the supplied fields of an existing dog and return the row as stored.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i32, patch: &DogInput) -> Result<dog::Model, ServiceError> {
        let existing = self.get_by_id(id).await?;
        let changes = validation::validate_patch(patch).map_err(rejected)?;

        let birth_date = patch.birth_date.or(existing.birth_date);
        let date_acquired = patch.date_acquired.or(existing.date_acquired);
        let leaving_date = patch.leaving_date.or(existing.leaving_date);
        validation::check_leaving_not_before_acquired(leaving_date, date_acquired).map_err(rejected)?;
        validation::check_birth_not_after_acquired(birth_date, date_acquired).map_err(rejected)?;

        let affected = self.repo.apply_changes(id, &changes).await.map_err(|e| {
            if is_badge_conflict(&e) {
                rejected(ServiceError::validation(DUPLICATE_BADGE))
            } else {
                storage_failure(format!("Error while updating dog with ID {id}"), e)
            }
        })?;
        if affected == 0 {
            return Err(ServiceError::not_found_for(id, "update"));
        }

        let fields: Vec<&str> = changes.iter().map(|c| c.field()).collect();
        info!(id, ?fields, "dog_updated");
        self.get_by_id(id).await
    }

    /// Stamp today's date as the deletion date. Repeating the call moves the date forward.
    #[instrument(skip(self))]
    pub async fn soft_delete(&self, id: i32) -> Result<(), ServiceError> {
        let today = Local::now().date_naive();
        let affected = self
            .repo
            .mark_deleted(id, today)
            .await
            .map_err(|e| storage_failure(format!("Error while marking dog with ID {id} as deleted"), e))?;
        if affected == 0 {
            return Err(ServiceError::not_found_for(id, "deletion"));
        }
        info!(id, %today, "dog_soft_deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dog::repo::seaorm::SeaOrmDogRepository;
    use crate::dog::repository::mock::InMemoryDogRepository;
    use crate::test_support::get_db;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn max() -> DogInput {
        DogInput {
            name: Some("Max".into()),
            breed: Some("Labrador".into()),
            badge_id: Some(42),
            status: Some("in training".into()),
            ..Default::default()
        }
    }

    fn in_memory() -> (Arc<InMemoryDogRepository>, DogService<InMemoryDogRepository>) {
        let repo = Arc::new(InMemoryDogRepository::default());
        (repo.clone(), DogService::new(repo))
    }

    fn validation_message(err: ServiceError) -> String {
        match err {
            ServiceError::Validation(m) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_returns_persisted_row() {
        let (_, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.status, "in training");
        assert_eq!(created.supplier, "");
        assert_eq!(created.date_deleted, None);
        assert_eq!(svc.get_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_accepts_status_case_variants() {
        let (_, svc) = in_memory();
        let created = svc.create(&DogInput { status: Some("Retired".into()), ..max() }).await.unwrap();
        assert_eq!(created.status, "Retired");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_badge_even_when_deleted() {
        let (repo, svc) = in_memory();
        let first = svc.create(&max()).await.unwrap();
        svc.soft_delete(first.id).await.unwrap();
        let writes = repo.mutation_count();

        let err = svc.create(&DogInput { name: Some("Other".into()), ..max() }).await.unwrap_err();
        assert_eq!(validation_message(err), DUPLICATE_BADGE);
        assert_eq!(repo.mutation_count(), writes);
    }

    #[tokio::test]
    async fn create_checks_badge_before_dates() {
        let (_, svc) = in_memory();
        svc.create(&max()).await.unwrap();
        let clash = DogInput {
            date_acquired: Some(date(2022, 1, 1)),
            leaving_date: Some(date(2021, 1, 1)),
            ..max()
        };
        assert_eq!(validation_message(svc.create(&clash).await.unwrap_err()), DUPLICATE_BADGE);
    }

    #[tokio::test]
    async fn create_rejects_leaving_before_acquired_but_not_birth_after_acquired() {
        let (repo, svc) = in_memory();
        let bad = DogInput { date_acquired: Some(date(2022, 1, 1)), leaving_date: Some(date(2021, 12, 31)), ..max() };
        assert_eq!(
            validation_message(svc.create(&bad).await.unwrap_err()),
            "Leaving date cannot be before the acquisition date."
        );
        assert_eq!(repo.mutation_count(), 0);

        let born_late = DogInput { date_acquired: Some(date(2022, 1, 1)), birth_date: Some(date(2023, 1, 1)), ..max() };
        assert!(svc.create(&born_late).await.is_ok());
    }

    #[tokio::test]
    async fn create_wraps_storage_failures() {
        let (repo, svc) = in_memory();
        repo.fail_with("connection refused");
        let err = svc.create(&max()).await.unwrap_err();
        match err {
            ServiceError::Service { message, source } => {
                assert!(message.starts_with("Error while checking badge ID 42: "));
                assert!(source.is_some());
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_trims_filter_and_treats_blank_as_absent() {
        let (_, svc) = in_memory();
        svc.create(&max()).await.unwrap();
        svc.create(&DogInput { name: Some("Bella".into()), breed: Some("Spaniel".into()), badge_id: Some(7), ..max() })
            .await
            .unwrap();

        assert_eq!(svc.list(None).await.unwrap().len(), 2);
        assert_eq!(svc.list(Some("   ")).await.unwrap().len(), 2);
        let hits = svc.list(Some("  Spaniel ")).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Bella");
        assert!(svc.list(Some("Poodle")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_by_id_missing_is_not_found() {
        let (_, svc) = in_memory();
        let err = svc.get_by_id(77).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 77, .. }));
        assert_eq!(err.to_string(), "Dog with ID 77 not found");
    }

    #[tokio::test]
    async fn update_checks_existence_before_validating_patch() {
        let (_, svc) = in_memory();
        let err = svc.update(5, &DogInput::default()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { id: 5, .. }));
    }

    #[tokio::test]
    async fn update_without_fields_writes_nothing() {
        let (repo, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        let writes = repo.mutation_count();
        let err = svc.update(created.id, &DogInput::default()).await.unwrap_err();
        assert_eq!(validation_message(err), "No update values have been provided.");
        assert_eq!(repo.mutation_count(), writes);
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let (_, svc) = in_memory();
        let created = svc
            .create(&DogInput { supplier: Some("Acme".into()), date_acquired: Some(date(2020, 5, 1)), ..max() })
            .await
            .unwrap();
        let updated = svc
            .update(created.id, &DogInput { status: Some("retired".into()), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(updated.status, "retired");
        assert_eq!(dog::Model { status: created.status.clone(), ..updated.clone() }, created);
    }

    #[tokio::test]
    async fn update_validates_dates_against_existing_values() {
        let (_, svc) = in_memory();
        let created = svc
            .create(&DogInput { date_acquired: Some(date(2021, 1, 1)), ..max() })
            .await
            .unwrap();

        let err = svc
            .update(created.id, &DogInput { leaving_date: Some(date(2020, 1, 1)), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(validation_message(err), "Leaving date cannot be before the acquisition date.");

        let err = svc
            .update(created.id, &DogInput { birth_date: Some(date(2021, 6, 1)), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(validation_message(err), "Birth date cannot be after the acquisition date.");

        let moved = svc
            .update(
                created.id,
                &DogInput { birth_date: Some(date(2021, 6, 1)), date_acquired: Some(date(2021, 7, 1)), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(moved.date_acquired, Some(date(2021, 7, 1)));
    }

    fn service_failure(err: ServiceError) -> (String, Option<DbErr>) {
        match err {
            ServiceError::Service { message, source } => (message, source),
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_that_touches_no_row_is_not_found_for_update() {
        let (repo, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        repo.lose_updates();
        let err = svc.update(created.id, &DogInput { name: Some("Rex".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert_eq!(err.to_string(), format!("Dog with ID {} not found for update", created.id));
        assert_eq!(svc.get_by_id(created.id).await.unwrap().name, "Max");
    }

    #[tokio::test]
    async fn create_that_cannot_be_read_back_is_service_error() {
        let (repo, svc) = in_memory();
        repo.forget_inserts();
        let (message, source) = service_failure(svc.create(&max()).await.unwrap_err());
        assert_eq!(message, "Creating dog failed, record 1 could not be read back.");
        assert!(source.is_none());
    }

    #[tokio::test]
    async fn get_by_id_wraps_storage_failures_until_recovered() {
        let (repo, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        repo.fail_with("connection reset");
        let (message, source) = service_failure(svc.get_by_id(created.id).await.unwrap_err());
        assert!(message.starts_with(&format!("Error while retrieving dog with ID {}: ", created.id)));
        assert!(source.is_some());

        repo.recover();
        assert_eq!(svc.get_by_id(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn update_wraps_storage_failures_during_write() {
        let (repo, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        // the existence check succeeds, the write fails
        repo.fail_after(1, "disk full");
        let err = svc.update(created.id, &DogInput { status: Some("left".into()), ..Default::default() }).await.unwrap_err();
        let (message, source) = service_failure(err);
        assert!(message.starts_with(&format!("Error while updating dog with ID {}: ", created.id)));
        assert!(message.contains("disk full"));
        assert!(source.is_some());
    }

    #[tokio::test]
    async fn soft_delete_wraps_storage_failures() {
        let (repo, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        repo.fail_with("connection reset");
        let (message, source) = service_failure(svc.soft_delete(created.id).await.unwrap_err());
        assert!(message.starts_with(&format!("Error while marking dog with ID {} as deleted: ", created.id)));
        assert!(source.is_some());
    }

    #[tokio::test]
    async fn soft_delete_hides_from_list_but_keeps_row() {
        let (_, svc) = in_memory();
        let created = svc.create(&max()).await.unwrap();
        svc.soft_delete(created.id).await.unwrap();

        assert!(svc.list(None).await.unwrap().is_empty());
        let all = svc.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].date_deleted.is_some());
        assert_eq!(svc.get_by_id(created.id).await.unwrap().date_deleted, Some(Local::now().date_naive()));

        // repeat deletes succeed
        svc.soft_delete(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn soft_delete_missing_is_not_found() {
        let (_, svc) = in_memory();
        let err = svc.soft_delete(3).await.unwrap_err();
        assert_eq!(err.to_string(), "Dog with ID 3 not found for deletion");
    }

    #[tokio::test]
    async fn roster_scenario_against_sqlite() -> Result<(), anyhow::Error> {
        let repo: Arc<dyn DogRepository> = Arc::new(SeaOrmDogRepository::new(get_db().await?));
        let svc = DogService::new(repo);

        let created = svc.create(&max()).await?;
        assert_eq!(created.status, "in training");
        assert_eq!(created.supplier, "");
        assert_eq!(created.date_deleted, None);
        assert_eq!(svc.get_by_id(created.id).await?, created);

        let updated = svc.update(created.id, &DogInput { status: Some("retired".into()), ..Default::default() }).await?;
        assert_eq!(updated.status, "retired");
        assert_eq!(updated.name, "Max");

        svc.soft_delete(created.id).await?;
        assert!(svc.list(None).await?.iter().all(|d| d.id != created.id));
        assert!(svc.list_all().await?.iter().any(|d| d.id == created.id && d.date_deleted.is_some()));
        Ok(())
    }

    #[tokio::test]
    async fn badge_moved_onto_existing_badge_is_validation_error() -> Result<(), anyhow::Error> {
        let svc = DogService::new(Arc::new(SeaOrmDogRepository::new(get_db().await?)));
        svc.create(&max()).await?;
        let other = svc.create(&DogInput { name: Some("Bella".into()), badge_id: Some(43), ..max() }).await?;

        let err = svc.update(other.id, &DogInput { badge_id: Some(42), ..Default::default() }).await.unwrap_err();
        assert_eq!(validation_message(err), DUPLICATE_BADGE);
        assert_eq!(svc.get_by_id(other.id).await?.badge_id, 43);
        Ok(())
    }
}
