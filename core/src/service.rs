use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::FoodCatalog;
use crate::error::{self, NutritionError};
use crate::meal;
use crate::models::{BodyParameters, MealEntry, MenuReport, TargetReport, UserProfile};
use crate::persistence::PersistencePort;
use crate::profiles::UserProfileStore;
use crate::targets;

/// Which tables a [`NutritionService::save_all`] call actually wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SaveReport {
    pub users_written: bool,
    pub foods_written: bool,
}

impl SaveReport {
    #[must_use]
    pub fn wrote_anything(&self) -> bool {
        self.users_written || self.foods_written
    }
}

/// Owns both stores for one session and the port they are persisted through.
pub struct NutritionService {
    catalog: FoodCatalog,
    profiles: UserProfileStore,
    port: Box<dyn PersistencePort>,
    foods_source: PathBuf,
    users_source: PathBuf,
}

impl NutritionService {
    /// Loads both tables through `port`.
    pub fn open(
        port: Box<dyn PersistencePort>,
        foods_source: &Path,
        users_source: &Path,
    ) -> Result<Self> {
        let foods = port.load_food_rows(foods_source)?;
        let users = port.load_user_rows(users_source)?;
        let catalog = FoodCatalog::from_rows(foods)
            .with_context(|| format!("Invalid food table: {}", foods_source.display()))?;
        let profiles = UserProfileStore::from_rows(users)
            .with_context(|| format!("Invalid user table: {}", users_source.display()))?;
        info!(
            foods = catalog.len(),
            users = profiles.len(),
            "nutrition data loaded"
        );
        Ok(Self {
            catalog,
            profiles,
            port,
            foods_source: foods_source.to_path_buf(),
            users_source: users_source.to_path_buf(),
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut FoodCatalog {
        &mut self.catalog
    }

    #[must_use]
    pub fn profiles(&self) -> &UserProfileStore {
        &self.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut UserProfileStore {
        &mut self.profiles
    }

    /// Writes each table that changed since the last save. Calling it again
    /// with no mutation in between writes nothing.
    pub fn save_all(&mut self) -> Result<SaveReport> {
        let mut report = SaveReport::default();
        if self.profiles.is_dirty() {
            self.port
                .save_user_rows(&self.profiles.to_rows(), &self.users_source)?;
            self.profiles.mark_clean();
            report.users_written = true;
        }
        if self.catalog.is_dirty() {
            self.port
                .save_food_rows(&self.catalog.to_rows(), &self.foods_source)?;
            self.catalog.mark_clean();
            report.foods_written = true;
        }
        debug!(?report, "save_all finished");
        Ok(report)
    }

    /// Checks the password of an existing user. When the login is unknown and
    /// `register_if_missing` is set, registers it with this password instead.
    pub fn login(
        &mut self,
        login: &str,
        password: &str,
        register_if_missing: bool,
    ) -> error::Result<&UserProfile> {
        let checked = self.profiles.authenticate(login, password).map(|_| ());
        match checked {
            Ok(()) => self.profiles.find_by_login(login),
            Err(e) if e.is_not_found() && register_if_missing => {
                info!(login, "registering user on first login");
                self.profiles.register_or_find(login, password)
            }
            Err(e) => Err(e),
        }
    }

    /// Validates and stores the whole parameter set. Nothing is written when
    /// any value is out of range.
    pub fn set_parameters(
        &mut self,
        login: &str,
        params: &BodyParameters,
    ) -> error::Result<&UserProfile> {
        self.profiles.find_by_login(login)?;
        params.validate()?;
        for field in params.fields() {
            self.profiles.update_field(login, field)?;
        }
        self.profiles.find_by_login(login)
    }

    pub fn targets_for(&self, login: &str) -> error::Result<TargetReport> {
        targets::compute_targets(self.profiles.find_by_login(login)?)
    }

    /// Totals for `entries`, compared with the user's targets when those can
    /// be computed.
    pub fn menu_summary(&self, login: &str, entries: &[MealEntry]) -> error::Result<MenuReport> {
        let summary = meal::aggregate(entries, &self.catalog);
        let targets = match self.targets_for(login) {
            Ok(report) => Some(report.targets),
            Err(NutritionError::Unavailable { .. }) => None,
            Err(e) => return Err(e),
        };
        let comparison = targets.map(|t| meal::compare(&summary.totals, &t));
        Ok(MenuReport {
            summary,
            targets,
            comparison,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActivityLevel, FoodItem, Goal, Sex};
    use crate::persistence::{CsvPersistence, MemoryPersistence};

    const FOODS: &str = "foods";
    const USERS: &str = "users";

    fn open(port: &MemoryPersistence) -> NutritionService {
        NutritionService::open(Box::new(port.clone()), Path::new(FOODS), Path::new(USERS))
            .unwrap()
    }

    fn params() -> BodyParameters {
        BodyParameters {
            sex: Sex::Male,
            age: 25,
            height_cm: 180,
            weight_kg: 80,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
        }
    }

    #[test]
    fn test_save_all_is_noop_when_clean() {
        let port = MemoryPersistence::new();
        let mut svc = open(&port);

        assert!(!svc.save_all().unwrap().wrote_anything());
        assert_eq!(port.save_count().unwrap(), 0);

        svc.catalog_mut().add("Rice").unwrap();
        let report = svc.save_all().unwrap();
        assert!(report.foods_written);
        assert!(!report.users_written);
        assert_eq!(port.save_count().unwrap(), 1);

        assert!(!svc.save_all().unwrap().wrote_anything());
        assert_eq!(port.save_count().unwrap(), 1);
    }

    #[test]
    fn test_open_loads_seeded_rows() {
        let port = MemoryPersistence::new();
        port.seed_foods(Path::new(FOODS), vec![FoodItem::empty("Oats")])
            .unwrap();
        port.seed_users(Path::new(USERS), vec![UserProfile::unfilled("alice", "pw")])
            .unwrap();
        let svc = open(&port);
        assert!(svc.catalog().find_by_name("Oats").is_ok());
        assert!(svc.profiles().find_by_login("alice").is_ok());
        assert!(!svc.catalog().is_dirty());
    }

    #[test]
    fn test_open_rejects_duplicate_rows() {
        let port = MemoryPersistence::new();
        port.seed_foods(
            Path::new(FOODS),
            vec![FoodItem::empty("Oats"), FoodItem::empty("Oats")],
        )
        .unwrap();
        let result = NutritionService::open(Box::new(port), Path::new(FOODS), Path::new(USERS));
        assert!(result.is_err());
    }

    #[test]
    fn test_login_flow() {
        let port = MemoryPersistence::new();
        let mut svc = open(&port);

        assert!(svc.login("alice", "pw", false).unwrap_err().is_not_found());
        assert!(svc.profiles().is_empty());

        let user = svc.login("alice", "pw", true).unwrap();
        assert!(user.is_unfilled());

        assert!(svc.login("alice", "pw", false).is_ok());
        assert!(matches!(
            svc.login("alice", "nope", true).unwrap_err(),
            NutritionError::WrongPassword { .. }
        ));
    }

    #[test]
    fn test_set_parameters_and_targets() {
        let port = MemoryPersistence::new();
        let mut svc = open(&port);
        svc.login("alice", "pw", true).unwrap();

        assert!(matches!(
            svc.targets_for("alice").unwrap_err(),
            NutritionError::Unavailable { .. }
        ));

        svc.set_parameters("alice", &params()).unwrap();
        let report = svc.targets_for("alice").unwrap();
        assert_eq!(report.targets.calories_kcal, 3357);
        assert_eq!(report.targets.proteins_g, 125);
    }

    #[test]
    fn test_set_parameters_rejects_out_of_range() {
        let port = MemoryPersistence::new();
        let mut svc = open(&port);
        svc.login("alice", "pw", true).unwrap();
        svc.save_all().unwrap();

        let bad = BodyParameters { age: 5, ..params() };
        assert!(matches!(
            svc.set_parameters("alice", &bad).unwrap_err(),
            NutritionError::InvalidValue { field: "age", .. }
        ));
        assert!(svc.profiles().is_unfilled("alice"));
        assert!(!svc.profiles().is_dirty());

        assert!(svc.set_parameters("ghost", &params()).unwrap_err().is_not_found());
    }

    #[test]
    fn test_menu_summary_with_and_without_targets() {
        let port = MemoryPersistence::new();
        let mut svc = open(&port);
        svc.login("alice", "pw", true).unwrap();
        svc.catalog_mut().add("Rice").unwrap();
        svc.catalog_mut()
            .update_nutrients("Rice", 2.7, 0.3, 28.0)
            .unwrap();
        let entries = [MealEntry::new("Rice", 200), MealEntry::new("Ghost", 50)];

        let report = svc.menu_summary("alice", &entries).unwrap();
        assert_eq!(report.summary.totals.calories, 252);
        assert!(report.summary.skipped.contains(&1));
        assert!(report.targets.is_none());
        assert!(report.comparison.is_none());

        svc.set_parameters("alice", &params()).unwrap();
        let report = svc.menu_summary("alice", &entries).unwrap();
        assert_eq!(report.targets.unwrap().calories_kcal, 3357);
        assert!(!report.comparison.unwrap().any_exceeded());

        assert!(svc.menu_summary("ghost", &entries).unwrap_err().is_not_found());
    }

    #[test]
    fn test_csv_backed_session_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let foods = dir.path().join("Food.csv");
        let users = dir.path().join("users.csv");

        {
            let mut svc =
                NutritionService::open(Box::new(CsvPersistence::new()), &foods, &users).unwrap();
            svc.catalog_mut().add("Rice").unwrap();
            svc.catalog_mut()
                .update_nutrients("Rice", 2.7, 0.3, 28.0)
                .unwrap();
            svc.catalog_mut().add("Oats").unwrap();
            svc.login("alice", "pw", true).unwrap();
            svc.set_parameters("alice", &params()).unwrap();
            let report = svc.save_all().unwrap();
            assert!(report.foods_written && report.users_written);
        }

        let svc = NutritionService::open(Box::new(CsvPersistence::new()), &foods, &users).unwrap();
        let names: Vec<_> = svc.catalog().list_all().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Rice", "Oats"]);
        let rice = svc.catalog().find_by_name("Rice").unwrap();
        assert!((rice.calories_per_100g - 126.0).abs() < f64::EPSILON);
        assert_eq!(svc.targets_for("alice").unwrap().targets.calories_kcal, 3357);
    }
}
