use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DbErr;

use models::dog;

use crate::dog::domain::{FieldChange, NewDog};

/// Storage seam for the roster. Errors are returned raw so the service can
/// wrap them with the operation that failed.
#[async_trait]
pub trait DogRepository: Send + Sync {
    /// Rows with no deletion date; `filter` is matched as a substring of name, breed or supplier.
    async fn list_active(&self, filter: Option<&str>) -> Result<Vec<dog::Model>, DbErr>;
    async fn list_all(&self) -> Result<Vec<dog::Model>, DbErr>;
    async fn find_by_id(&self, id: i32) -> Result<Option<dog::Model>, DbErr>;
    /// Counts active and deleted rows alike.
    async fn count_by_badge_id(&self, badge_id: i32) -> Result<u64, DbErr>;
    /// Returns the storage-assigned id.
    async fn insert(&self, new: NewDog) -> Result<i32, DbErr>;
    /// Returns the number of rows affected.
    async fn apply_changes(&self, id: i32, changes: &[FieldChange]) -> Result<u64, DbErr>;
    /// Returns the number of rows affected.
    async fn mark_deleted(&self, id: i32, on: NaiveDate) -> Result<u64, DbErr>;
}

/// Simple in-memory repository for tests and local wiring
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct State {
        rows: BTreeMap<i32, dog::Model>,
        last_id: i32,
        mutations: usize,
        calls: usize,
        /// Calls beyond this count fail with the reason.
        failure: Option<(usize, String)>,
        lose_updates: bool,
        forget_inserts: bool,
    }

    /// Ordered map keyed by id. Unlike the SQL schema it does not enforce
    /// badge uniqueness; the service's own lookup is the only guard here.
    #[derive(Default)]
    pub struct InMemoryDogRepository {
        state: Mutex<State>,
    }

    impl InMemoryDogRepository {
        fn lock(&self) -> Result<MutexGuard<'_, State>, DbErr> {
            let mut state = self.state.lock().map_err(|_| DbErr::Custom("in-memory store poisoned".into()))?;
            state.calls += 1;
            if let Some((after, reason)) = &state.failure {
                if state.calls > *after {
                    return Err(DbErr::Custom(reason.clone()));
                }
            }
            Ok(state)
        }

        /// Make every following call fail with `reason` until [`Self::recover`].
        pub fn fail_with(&self, reason: &str) {
            self.fail_after(0, reason);
        }

        /// Let the next `calls` repository calls through, then fail like [`Self::fail_with`].
        pub fn fail_after(&self, calls: usize, reason: &str) {
            if let Ok(mut state) = self.state.lock() {
                state.failure = Some((state.calls + calls, reason.to_string()));
            }
        }

        /// `apply_changes` reports zero affected rows and leaves the row alone.
        pub fn lose_updates(&self) {
            if let Ok(mut state) = self.state.lock() {
                state.lose_updates = true;
            }
        }

        /// `insert` hands out an id but stores nothing.
        pub fn forget_inserts(&self) {
            if let Ok(mut state) = self.state.lock() {
                state.forget_inserts = true;
            }
        }

        pub fn recover(&self) {
            if let Ok(mut state) = self.state.lock() {
                state.failure = None;
            }
        }

        /// Number of insert/update/delete calls that reached the store.
        pub fn mutation_count(&self) -> usize {
            self.state.lock().map(|s| s.mutations).unwrap_or_default()
        }
    }

    #[async_trait]
    impl DogRepository for InMemoryDogRepository {
        async fn list_active(&self, filter: Option<&str>) -> Result<Vec<dog::Model>, DbErr> {
            let state = self.lock()?;
            Ok(state
                .rows
                .values()
                .filter(|d| d.is_active())
                .filter(|d| {
                    filter.map_or(true, |f| d.name.contains(f) || d.breed.contains(f) || d.supplier.contains(f))
                })
                .cloned()
                .collect())
        }

        async fn list_all(&self) -> Result<Vec<dog::Model>, DbErr> {
            Ok(self.lock()?.rows.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<dog::Model>, DbErr> {
            Ok(self.lock()?.rows.get(&id).cloned())
        }

        async fn count_by_badge_id(&self, badge_id: i32) -> Result<u64, DbErr> {
            Ok(self.lock()?.rows.values().filter(|d| d.badge_id == badge_id).count() as u64)
        }

        async fn insert(&self, new: NewDog) -> Result<i32, DbErr> {
            let mut state = self.lock()?;
            state.mutations += 1;
            state.last_id += 1;
            let id = state.last_id;
            if state.forget_inserts {
                return Ok(id);
            }
            state.rows.insert(
                id,
                dog::Model {
                    id,
                    name: new.name,
                    breed: new.breed,
                    supplier: new.supplier,
                    badge_id: new.badge_id,
                    gender: new.gender,
                    birth_date: new.birth_date,
                    date_acquired: new.date_acquired,
                    status: new.status,
                    leaving_date: new.leaving_date,
                    leaving_reason: new.leaving_reason,
                    kenneling_characteristics: new.kenneling_characteristics,
                    date_deleted: None,
                },
            );
            Ok(id)
        }

        async fn apply_changes(&self, id: i32, changes: &[FieldChange]) -> Result<u64, DbErr> {
            let mut state = self.lock()?;
            state.mutations += 1;
            if state.lose_updates {
                return Ok(0);
            }
            let Some(row) = state.rows.get_mut(&id) else { return Ok(0) };
            for change in changes {
                change.apply_to(row);
            }
            Ok(1)
        }

        async fn mark_deleted(&self, id: i32, on: NaiveDate) -> Result<u64, DbErr> {
            let mut state = self.lock()?;
            state.mutations += 1;
            let Some(row) = state.rows.get_mut(&id) else { return Ok(0) };
            row.date_deleted = Some(on);
            Ok(1)
        }
    }
}
