use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    Set, Value,
};

use models::dog::{self, Entity as DogEntity};

use crate::dog::domain::{FieldChange, NewDog};
use crate::dog::repository::DogRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmDogRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmDogRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn column_value(change: &FieldChange) -> (dog::Column, Value) {
    match change {
        FieldChange::Name(v) => (dog::Column::Name, v.clone().into()),
        FieldChange::Breed(v) => (dog::Column::Breed, v.clone().into()),
        FieldChange::Supplier(v) => (dog::Column::Supplier, v.clone().into()),
        FieldChange::BadgeId(v) => (dog::Column::BadgeId, (*v).into()),
        FieldChange::Gender(v) => (dog::Column::Gender, v.clone().into()),
        FieldChange::BirthDate(v) => (dog::Column::BirthDate, (*v).into()),
        FieldChange::DateAcquired(v) => (dog::Column::DateAcquired, (*v).into()),
        FieldChange::Status(v) => (dog::Column::Status, v.clone().into()),
        FieldChange::LeavingDate(v) => (dog::Column::LeavingDate, (*v).into()),
        FieldChange::LeavingReason(v) => (dog::Column::LeavingReason, v.clone().into()),
        FieldChange::KennelingCharacteristics(v) => (dog::Column::KennelingCharacteristics, v.clone().into()),
    }
}

#[async_trait::async_trait]
impl DogRepository for SeaOrmDogRepository {
    async fn list_active(&self, filter: Option<&str>) -> Result<Vec<dog::Model>, DbErr> {
        let mut finder = DogEntity::find().filter(dog::Column::DateDeleted.is_null());
        if let Some(term) = filter {
            let pattern = format!("%{term}%");
            finder = finder.filter(
                Condition::any()
                    .add(dog::Column::Name.like(pattern.as_str()))
                    .add(dog::Column::Breed.like(pattern.as_str()))
                    .add(dog::Column::Supplier.like(pattern.as_str())),
            );
        }
        finder.all(&self.db).await
    }

    async fn list_all(&self) -> Result<Vec<dog::Model>, DbErr> {
        DogEntity::find().all(&self.db).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<dog::Model>, DbErr> {
        DogEntity::find_by_id(id).one(&self.db).await
    }

    async fn count_by_badge_id(&self, badge_id: i32) -> Result<u64, DbErr> {
        DogEntity::find()
            .filter(dog::Column::BadgeId.eq(badge_id))
            .count(&self.db)
            .await
    }

    async fn insert(&self, new: NewDog) -> Result<i32, DbErr> {
        let am = dog::ActiveModel {
            id: NotSet,
            name: Set(new.name),
            breed: Set(new.breed),
            supplier: Set(new.supplier),
            badge_id: Set(new.badge_id),
            gender: Set(new.gender),
            birth_date: Set(new.birth_date),
            date_acquired: Set(new.date_acquired),
            status: Set(new.status),
            leaving_date: Set(new.leaving_date),
            leaving_reason: Set(new.leaving_reason),
            kenneling_characteristics: Set(new.kenneling_characteristics),
            date_deleted: Set(None),
        };
        let res = DogEntity::insert(am).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    async fn apply_changes(&self, id: i32, changes: &[FieldChange]) -> Result<u64, DbErr> {
        if changes.is_empty() {
            return Err(DbErr::Custom("update without columns".into()));
        }
        let mut stmt = DogEntity::update_many().filter(dog::Column::Id.eq(id));
        for change in changes {
            let (column, value) = column_value(change);
            stmt = stmt.col_expr(column, Expr::value(value));
        }
        let res = stmt.exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    async fn mark_deleted(&self, id: i32, on: NaiveDate) -> Result<u64, DbErr> {
        let res = DogEntity::update_many()
            .col_expr(dog::Column::DateDeleted, Expr::value(on))
            .filter(dog::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }
}
