use anyhow::Result;

use macrobook_core::NutritionService;

use super::helpers::{print_food_table, print_json};

pub(crate) fn cmd_food_list(svc: &NutritionService, json: bool) -> Result<()> {
    let foods: Vec<_> = svc.catalog().list_all().collect();

    if json {
        print_json(&foods)?;
    } else if foods.is_empty() {
        eprintln!("No foods yet. Use `macrobook food add <name>` to add one.");
    } else {
        print_food_table(&foods);
    }
    Ok(())
}

pub(crate) fn cmd_food_show(svc: &NutritionService, name: &str, json: bool) -> Result<()> {
    let food = svc.catalog().find_by_name(name)?;

    if json {
        print_json(food)?;
    } else {
        println!("{}", food.name);
        println!("  Proteins: {:.1} g/100g", food.proteins_per_100g);
        println!("  Fats:     {:.1} g/100g", food.fats_per_100g);
        println!("  Carbs:    {:.1} g/100g", food.carbs_per_100g);
        println!("  Calories: {:.0} kcal/100g", food.calories_per_100g);
    }
    Ok(())
}

pub(crate) fn cmd_food_add(svc: &mut NutritionService, name: &str, json: bool) -> Result<()> {
    let food = svc.catalog_mut().add(name)?;

    if json {
        print_json(food)?;
    } else {
        println!("Added food: {}", food.name);
    }
    Ok(())
}

/// Adds a food under the next free "New Product N" name.
pub(crate) fn cmd_food_new(svc: &mut NutritionService, json: bool) -> Result<()> {
    let name = svc.catalog().next_placeholder_name();
    cmd_food_add(svc, &name, json)
}

pub(crate) fn cmd_food_rename(
    svc: &mut NutritionService,
    old_name: &str,
    new_name: &str,
    json: bool,
) -> Result<()> {
    let food = svc.catalog_mut().rename(old_name, new_name)?;

    if json {
        print_json(food)?;
    } else {
        println!("Renamed {old_name} to {}", food.name);
    }
    Ok(())
}

pub(crate) fn cmd_food_set(
    svc: &mut NutritionService,
    name: &str,
    proteins: f64,
    fats: f64,
    carbs: f64,
    json: bool,
) -> Result<()> {
    let food = svc
        .catalog_mut()
        .update_nutrients(name, proteins, fats, carbs)?;

    if json {
        print_json(food)?;
    } else {
        println!(
            "{}: P {proteins:.1}  F {fats:.1}  C {carbs:.1}  ({:.0} kcal/100g)",
            food.name, food.calories_per_100g
        );
    }
    Ok(())
}

pub(crate) fn cmd_food_remove(svc: &mut NutritionService, name: &str, json: bool) -> Result<()> {
    let food = svc.catalog_mut().remove(name)?;

    if json {
        print_json(&food)?;
    } else {
        println!("Removed food: {}", food.name);
    }
    Ok(())
}
