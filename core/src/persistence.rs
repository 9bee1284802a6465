//! Loading and saving the food and user tables.
//!
//! The stores never touch files themselves; they hand whole tables to a
//! [`PersistencePort`]. [`CsvPersistence`] reads and writes the `Food.csv` /
//! `users.csv` layout, [`MemoryPersistence`] keeps tables in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{ActivityLevel, FoodItem, Goal, Sex, UserProfile};

/// Column headers of the persisted food table, in write order.
pub const FOOD_COLUMNS: [&str; 5] = ["product", "proteins", "fats", "carbohydrates", "calories"];

/// Column headers of the persisted user table, in write order.
pub const USER_COLUMNS: [&str; 8] = [
    "userName", "password", "sex", "age", "h", "w", "activity", "goal",
];

/// Whole-table load/save. Rows come back in the order they were saved.
pub trait PersistencePort: Send + Sync {
    fn load_food_rows(&self, source: &Path) -> Result<Vec<FoodItem>>;
    fn load_user_rows(&self, source: &Path) -> Result<Vec<UserProfile>>;
    fn save_food_rows(&self, rows: &[FoodItem], destination: &Path) -> Result<()>;
    fn save_user_rows(&self, rows: &[UserProfile], destination: &Path) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct FoodRecord {
    product: String,
    proteins: f64,
    fats: f64,
    carbohydrates: f64,
    calories: f64,
}

impl From<&FoodItem> for FoodRecord {
    fn from(food: &FoodItem) -> Self {
        Self {
            product: food.name.clone(),
            proteins: food.proteins_per_100g,
            fats: food.fats_per_100g,
            carbohydrates: food.carbs_per_100g,
            calories: food.calories_per_100g,
        }
    }
}

impl From<FoodRecord> for FoodItem {
    fn from(record: FoodRecord) -> Self {
        Self {
            name: record.product,
            proteins_per_100g: record.proteins,
            fats_per_100g: record.fats,
            carbs_per_100g: record.carbohydrates,
            calories_per_100g: record.calories,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    #[serde(rename = "userName")]
    user_name: String,
    password: String,
    sex: i64,
    age: i64,
    h: i64,
    w: i64,
    activity: i64,
    goal: i64,
}

impl From<&UserProfile> for UserRecord {
    fn from(user: &UserProfile) -> Self {
        Self {
            user_name: user.login.clone(),
            password: user.password.clone(),
            sex: user.sex.code(),
            age: user.age,
            h: user.height_cm,
            w: user.weight_kg,
            activity: user.activity_level.code(),
            goal: user.goal.code(),
        }
    }
}

impl TryFrom<UserRecord> for UserProfile {
    type Error = anyhow::Error;

    fn try_from(record: UserRecord) -> Result<Self> {
        Ok(Self {
            sex: Sex::from_code(record.sex)?,
            activity_level: ActivityLevel::from_code(record.activity)?,
            goal: Goal::from_code(record.goal)?,
            login: record.user_name,
            password: record.password,
            age: record.age,
            height_cm: record.h,
            weight_kg: record.w,
        })
    }
}

/// CSV files with a header row. Columns are matched by header name on read,
/// so files with a different column order still load.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvPersistence;

impl CsvPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn read<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<Vec<T>>> {
        if !path.exists() {
            info!(path = %path.display(), "no table file yet, starting empty");
            return Ok(None);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut rows = Vec::new();
        for (line_num, result) in rdr.deserialize().enumerate() {
            let row = result.with_context(|| {
                format!("Failed to parse {} row {}", path.display(), line_num + 2)
            })?;
            rows.push(row);
        }
        info!(path = %path.display(), rows = rows.len(), "loaded table");
        Ok(Some(rows))
    }

    fn write<T: Serialize>(path: &Path, columns: &[&str], records: &[T]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        // The header is written by hand so an empty table still gets one.
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        wtr.write_record(columns)?;
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = records.len(), "saved table");
        Ok(())
    }
}

impl PersistencePort for CsvPersistence {
    fn load_food_rows(&self, source: &Path) -> Result<Vec<FoodItem>> {
        let records: Vec<FoodRecord> = Self::read(source)?.unwrap_or_default();
        Ok(records.into_iter().map(FoodItem::from).collect())
    }

    fn load_user_rows(&self, source: &Path) -> Result<Vec<UserProfile>> {
        let records: Vec<UserRecord> = Self::read(source)?.unwrap_or_default();
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                UserProfile::try_from(record).with_context(|| {
                    format!("Invalid user in {} row {}", source.display(), i + 2)
                })
            })
            .collect()
    }

    fn save_food_rows(&self, rows: &[FoodItem], destination: &Path) -> Result<()> {
        let records: Vec<FoodRecord> = rows.iter().map(FoodRecord::from).collect();
        Self::write(destination, &FOOD_COLUMNS, &records)
    }

    fn save_user_rows(&self, rows: &[UserProfile], destination: &Path) -> Result<()> {
        let records: Vec<UserRecord> = rows.iter().map(UserRecord::from).collect();
        Self::write(destination, &USER_COLUMNS, &records)
    }
}

#[derive(Debug, Default)]
struct MemoryTables {
    foods: HashMap<PathBuf, Vec<FoodItem>>,
    users: HashMap<PathBuf, Vec<UserProfile>>,
    saves: usize,
}

/// Tables held in memory, keyed by source path. Clones share the same
/// tables, so a test can keep a handle after giving one to a service.
#[derive(Debug, Clone, Default)]
pub struct MemoryPersistence {
    tables: Arc<Mutex<MemoryTables>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryTables>> {
        self.tables
            .lock()
            .map_err(|e| anyhow!("memory tables lock poisoned: {e}"))
    }

    pub fn seed_foods(&self, source: &Path, rows: Vec<FoodItem>) -> Result<()> {
        self.lock()?.foods.insert(source.to_path_buf(), rows);
        Ok(())
    }

    pub fn seed_users(&self, source: &Path, rows: Vec<UserProfile>) -> Result<()> {
        self.lock()?.users.insert(source.to_path_buf(), rows);
        Ok(())
    }

    /// Number of table writes performed so far.
    pub fn save_count(&self) -> Result<usize> {
        Ok(self.lock()?.saves)
    }
}

impl PersistencePort for MemoryPersistence {
    fn load_food_rows(&self, source: &Path) -> Result<Vec<FoodItem>> {
        Ok(self.lock()?.foods.get(source).cloned().unwrap_or_default())
    }

    fn load_user_rows(&self, source: &Path) -> Result<Vec<UserProfile>> {
        Ok(self.lock()?.users.get(source).cloned().unwrap_or_default())
    }

    fn save_food_rows(&self, rows: &[FoodItem], destination: &Path) -> Result<()> {
        let mut tables = self.lock()?;
        tables.foods.insert(destination.to_path_buf(), rows.to_vec());
        tables.saves += 1;
        Ok(())
    }

    fn save_user_rows(&self, rows: &[UserProfile], destination: &Path) -> Result<()> {
        let mut tables = self.lock()?;
        tables.users.insert(destination.to_path_buf(), rows.to_vec());
        tables.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rice() -> FoodItem {
        FoodItem {
            name: "Rice".to_string(),
            proteins_per_100g: 2.7,
            fats_per_100g: 0.3,
            carbs_per_100g: 28.0,
            calories_per_100g: 126.0,
        }
    }

    fn alice() -> UserProfile {
        UserProfile {
            sex: Sex::Male,
            age: 25,
            height_cm: 180,
            weight_kg: 80,
            activity_level: ActivityLevel::Moderate,
            goal: Goal::Maintain,
            ..UserProfile::unfilled("alice", "pw")
        }
    }

    #[test]
    fn test_csv_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let port = CsvPersistence::new();
        assert!(port.load_food_rows(&dir.path().join("Food.csv")).unwrap().is_empty());
        assert!(port.load_user_rows(&dir.path().join("users.csv")).unwrap().is_empty());
    }

    #[test]
    fn test_csv_food_table_written_with_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Food.csv");
        let port = CsvPersistence::new();
        port.save_food_rows(&[rice(), FoodItem::empty("Oats")], &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("product,proteins,fats,carbohydrates,calories"));
        assert_eq!(lines.next(), Some("Rice,2.7,0.3,28.0,126.0"));
        assert_eq!(lines.next(), Some("Oats,0.0,0.0,0.0,0.0"));

        let loaded = port.load_food_rows(&path).unwrap();
        assert_eq!(loaded, vec![rice(), FoodItem::empty("Oats")]);
    }

    #[test]
    fn test_csv_empty_table_keeps_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        let port = CsvPersistence::new();
        port.save_user_rows(&[], &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_end(), "userName,password,sex,age,h,w,activity,goal");
        assert!(port.load_user_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn test_csv_user_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("users.csv");
        let port = CsvPersistence::new();
        let users = vec![alice(), UserProfile::unfilled("bob", "hunter2")];
        port.save_user_rows(&users, &path).unwrap();
        let loaded = port.load_user_rows(&path).unwrap();
        assert_eq!(loaded, users);
    }

    #[test]
    fn test_csv_reads_columns_by_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(
            &path,
            "userName,password,sex,age,w,h,activity,goal\nalice,pw,1,25,80,180,1,1\n",
        )
        .unwrap();
        let loaded = CsvPersistence::new().load_user_rows(&path).unwrap();
        assert_eq!(loaded, vec![alice()]);
    }

    #[test]
    fn test_csv_rejects_bad_enum_code() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.csv");
        std::fs::write(
            &path,
            "userName,password,sex,age,h,w,activity,goal\nalice,pw,1,25,180,80,9,1\n",
        )
        .unwrap();
        let err = CsvPersistence::new().load_user_rows(&path).unwrap_err();
        assert!(format!("{err:#}").contains("row 2"));
    }

    #[test]
    fn test_csv_rejects_malformed_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Food.csv");
        std::fs::write(
            &path,
            "product,proteins,fats,carbohydrates,calories\nRice,lots,0.3,28,126\n",
        )
        .unwrap();
        assert!(CsvPersistence::new().load_food_rows(&path).is_err());
    }

    #[test]
    fn test_memory_port_shares_state_between_clones() {
        let port = MemoryPersistence::new();
        let handle = port.clone();
        let path = Path::new("foods");
        port.save_food_rows(&[rice()], path).unwrap();
        assert_eq!(handle.load_food_rows(path).unwrap(), vec![rice()]);
        assert_eq!(handle.save_count().unwrap(), 1);
        assert!(handle.load_user_rows(Path::new("users")).unwrap().is_empty());
    }
}
