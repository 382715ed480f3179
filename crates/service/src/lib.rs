//! Record service for the kennel roster.
//! - Owns validation, partial-update construction and soft-delete rules.
//! - Talks to storage only through the `DogRepository` seam.
//! - Reports failures as a flat `ServiceError` taxonomy.

pub mod errors;
pub mod dog;
#[cfg(test)]
pub mod test_support;
