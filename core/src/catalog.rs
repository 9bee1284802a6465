use tracing::debug;

use crate::error::{NutritionError, Result};
use crate::models::FoodItem;
use crate::table::{Keyed, Table};

impl Keyed for FoodItem {
    type Key = String;

    fn key(&self) -> &String {
        &self.name
    }

    fn set_key(&mut self, key: String) {
        self.name = key;
    }
}

/// Energy per 100g derived from macros (4/9/4 kcal per gram), rounded to a
/// whole kcal.
#[must_use]
pub fn calories_from_macros(proteins: f64, fats: f64, carbs: f64) -> f64 {
    (proteins * 4.0 + carbs * 4.0 + fats * 9.0).round()
}

fn check_nutrient(field: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(NutritionError::invalid(field, "must be a number"));
    }
    if value < 0.0 {
        return Err(NutritionError::invalid(field, "cannot be negative"));
    }
    Ok(value)
}

fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(NutritionError::invalid("name", "cannot be empty"));
    }
    Ok(())
}

/// The food catalog, keyed by exact (case-sensitive) food name.
#[derive(Debug, Clone)]
pub struct FoodCatalog {
    table: Table<FoodItem>,
}

impl Default for FoodCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FoodCatalog {
    const KIND: &'static str = "Food";

    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(Self::KIND),
        }
    }

    pub fn from_rows(rows: Vec<FoodItem>) -> Result<Self> {
        Ok(Self {
            table: Table::from_rows(Self::KIND, rows)?,
        })
    }

    pub fn find_by_name(&self, name: &str) -> Result<&FoodItem> {
        self.table.get(name)
    }

    pub fn add(&mut self, name: &str) -> Result<&FoodItem> {
        check_name(name)?;
        debug!(food = name, "adding food");
        self.table.insert(FoodItem::empty(name))
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<&FoodItem> {
        if new_name.is_empty() {
            self.table.get(old_name)?;
        }
        check_name(new_name)?;
        debug!(from = old_name, to = new_name, "renaming food");
        self.table.rekey(old_name, new_name.to_string())
    }

    pub fn update_nutrients(
        &mut self,
        name: &str,
        proteins: f64,
        fats: f64,
        carbs: f64,
    ) -> Result<&FoodItem> {
        let proteins = check_nutrient("proteins", proteins)?;
        let fats = check_nutrient("fats", fats)?;
        let carbs = check_nutrient("carbs", carbs)?;
        let calories = calories_from_macros(proteins, fats, carbs);
        if !calories.is_finite() {
            return Err(NutritionError::invalid("calories", "too large to store"));
        }
        debug!(food = name, proteins, fats, carbs, calories, "updating nutrients");
        self.table.update(name, |food| {
            food.proteins_per_100g = proteins;
            food.fats_per_100g = fats;
            food.carbs_per_100g = carbs;
            food.calories_per_100g = calories;
        })
    }

    pub fn remove(&mut self, name: &str) -> Result<FoodItem> {
        debug!(food = name, "removing food");
        self.table.remove(name)
    }

    /// Every food, in the order it was added.
    pub fn list_all(&self) -> impl Iterator<Item = &FoodItem> {
        self.table.iter()
    }

    /// Default name for a food created from a blank entry: "New Product N",
    /// with N starting one past the current number of foods and bumped until
    /// the name is free.
    #[must_use]
    pub fn next_placeholder_name(&self) -> String {
        let mut n = self.table.len() + 1;
        loop {
            let name = format!("New Product {n}");
            if !self.table.contains(name.as_str()) {
                return name;
            }
            n += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.table.is_dirty()
    }

    pub fn mark_clean(&mut self) {
        self.table.mark_clean();
    }

    #[must_use]
    pub fn to_rows(&self) -> Vec<FoodItem> {
        self.table.to_rows()
    }
}
