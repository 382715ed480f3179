pub mod domain;
pub mod validation;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::{DogInput, FieldChange, NewDog};
pub use repository::DogRepository;
pub use service::DogService;
