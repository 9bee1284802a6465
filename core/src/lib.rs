//! Food catalog, user profiles, and the calculations built on them: daily
//! calorie and macro targets, and meal totals compared against those targets.

pub mod catalog;
pub mod error;
pub mod meal;
pub mod models;
pub mod persistence;
pub mod profiles;
pub mod service;
pub mod table;
pub mod targets;

pub use catalog::FoodCatalog;
pub use error::{NutritionError, Result};
pub use meal::{MealPlan, aggregate, compare};
pub use persistence::{CsvPersistence, MemoryPersistence, PersistencePort};
pub use profiles::UserProfileStore;
pub use service::{NutritionService, SaveReport};
pub use targets::compute_targets;
