use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Caller-supplied dog fields, used both as the create draft and as the
/// update patch. `None` means the field was not supplied.
/// Unknown keys (including `id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DogInput {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub supplier: Option<String>,
    #[serde(rename = "badgeID")]
    pub badge_id: Option<i32>,
    pub gender: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub date_acquired: Option<NaiveDate>,
    pub status: Option<String>,
    pub leaving_date: Option<NaiveDate>,
    pub leaving_reason: Option<String>,
    pub kenneling_characteristics: Option<String>,
}

/// A validated draft, ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDog {
    pub name: String,
    pub breed: String,
    pub supplier: String,
    pub badge_id: i32,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub date_acquired: Option<NaiveDate>,
    pub status: String,
    pub leaving_date: Option<NaiveDate>,
    pub leaving_reason: String,
    pub kenneling_characteristics: String,
}

/// One column assignment of a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Name(String),
    Breed(String),
    Supplier(String),
    BadgeId(i32),
    Gender(String),
    BirthDate(NaiveDate),
    DateAcquired(NaiveDate),
    Status(String),
    LeavingDate(NaiveDate),
    LeavingReason(String),
    KennelingCharacteristics(String),
}

impl FieldChange {
    /// Wire name of the field being changed.
    pub fn field(&self) -> &'static str {
        match self {
            FieldChange::Name(_) => "name",
            FieldChange::Breed(_) => "breed",
            FieldChange::Supplier(_) => "supplier",
            FieldChange::BadgeId(_) => "badgeID",
            FieldChange::Gender(_) => "gender",
            FieldChange::BirthDate(_) => "birthDate",
            FieldChange::DateAcquired(_) => "dateAcquired",
            FieldChange::Status(_) => "status",
            FieldChange::LeavingDate(_) => "leavingDate",
            FieldChange::LeavingReason(_) => "leavingReason",
            FieldChange::KennelingCharacteristics(_) => "kennelingCharacteristics",
        }
    }

    /// Apply this change to an in-memory row.
    pub fn apply_to(&self, row: &mut models::dog::Model) {
        match self {
            FieldChange::Name(v) => row.name = v.clone(),
            FieldChange::Breed(v) => row.breed = v.clone(),
            FieldChange::Supplier(v) => row.supplier = v.clone(),
            FieldChange::BadgeId(v) => row.badge_id = *v,
            FieldChange::Gender(v) => row.gender = v.clone(),
            FieldChange::BirthDate(v) => row.birth_date = Some(*v),
            FieldChange::DateAcquired(v) => row.date_acquired = Some(*v),
            FieldChange::Status(v) => row.status = v.clone(),
            FieldChange::LeavingDate(v) => row.leaving_date = Some(*v),
            FieldChange::LeavingReason(v) => row.leaving_reason = v.clone(),
            FieldChange::KennelingCharacteristics(v) => row.kenneling_characteristics = v.clone(),
        }
    }
}

impl DogInput {
    /// Every supplied field as a change, in column order.
    pub fn changes(&self) -> Vec<FieldChange> {
        let mut out = Vec::new();
        if let Some(v) = &self.name { out.push(FieldChange::Name(v.clone())); }
        if let Some(v) = &self.breed { out.push(FieldChange::Breed(v.clone())); }
        if let Some(v) = &self.supplier { out.push(FieldChange::Supplier(v.clone())); }
        if let Some(v) = self.badge_id { out.push(FieldChange::BadgeId(v)); }
        if let Some(v) = &self.gender { out.push(FieldChange::Gender(v.clone())); }
        if let Some(v) = self.birth_date { out.push(FieldChange::BirthDate(v)); }
        if let Some(v) = self.date_acquired { out.push(FieldChange::DateAcquired(v)); }
        if let Some(v) = &self.status { out.push(FieldChange::Status(v.clone())); }
        if let Some(v) = self.leaving_date { out.push(FieldChange::LeavingDate(v)); }
        if let Some(v) = &self.leaving_reason { out.push(FieldChange::LeavingReason(v.clone())); }
        if let Some(v) = &self.kenneling_characteristics { out.push(FieldChange::KennelingCharacteristics(v.clone())); }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wire_names_and_ignores_id() {
        let input: DogInput = serde_json::from_value(serde_json::json!({
            "id": 99,
            "name": "Max",
            "badgeID": 42,
            "dateAcquired": "2021-01-01",
            "kennelingCharacteristics": "quiet"
        }))
        .unwrap();
        assert_eq!(input.name.as_deref(), Some("Max"));
        assert_eq!(input.badge_id, Some(42));
        assert_eq!(input.date_acquired, NaiveDate::from_ymd_opt(2021, 1, 1));
        assert_eq!(input.kenneling_characteristics.as_deref(), Some("quiet"));
        assert!(input.breed.is_none());
    }

    #[test]
    fn changes_only_cover_supplied_fields() {
        let input = DogInput { status: Some("retired".into()), supplier: Some(String::new()), ..Default::default() };
        let changes = input.changes();
        assert_eq!(changes, vec![FieldChange::Supplier(String::new()), FieldChange::Status("retired".into())]);
        assert_eq!(changes[1].field(), "status");
        assert!(DogInput::default().changes().is_empty());
    }
}
