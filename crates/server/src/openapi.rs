use chrono::NaiveDate;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse { pub status: String }

/// Request body for create and update. On update every field is optional.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DogInputDoc {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub supplier: Option<String>,
    #[serde(rename = "badgeID")]
    pub badge_id: Option<i32>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub date_acquired: Option<NaiveDate>,
    /// in training, in service, retired or left (any case)
    pub status: Option<String>,
    pub leaving_date: Option<NaiveDate>,
    /// transferred, retired (put down), kia, retired (re-homed) or died
    pub leaving_reason: Option<String>,
    pub kenneling_characteristics: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DogRecordDoc {
    pub id: i32,
    pub name: String,
    pub breed: String,
    pub supplier: String,
    #[serde(rename = "badgeID")]
    pub badge_id: i32,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub date_acquired: Option<NaiveDate>,
    pub status: String,
    pub leaving_date: Option<NaiveDate>,
    pub leaving_reason: String,
    pub kenneling_characteristics: String,
    pub date_deleted: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBodyDoc {
    pub message: String,
    pub status: u16,
    pub error: String,
    pub path: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::dogs::list,
        crate::routes::dogs::list_all,
        crate::routes::dogs::get,
        crate::routes::dogs::create,
        crate::routes::dogs::update,
        crate::routes::dogs::delete,
    ),
    components(
        schemas(
            HealthResponse,
            DogInputDoc,
            DogRecordDoc,
            ErrorBodyDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "dogs")
    )
)]
pub struct ApiDoc;
