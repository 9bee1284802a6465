use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use macrobook_core::NutritionService;
use macrobook_core::meal::MealPlan;
use macrobook_core::models::{MealEntry, MenuReport};

use super::helpers::{parse_menu_entry, print_json, truncate};

/// Builds the menu from `name=grams` arguments. Foods without a portion get
/// the default; a zero portion takes the entry back off.
fn build_plan(items: &[String]) -> Result<MealPlan> {
    let mut plan = MealPlan::new();
    for item in items {
        let (name, grams) = parse_menu_entry(item)?;
        let index = plan.add(&name);
        if let Some(grams) = grams {
            plan.set_portion(index, grams)?;
        }
    }
    Ok(plan)
}

fn print_menu(entries: &[MealEntry], report: &MenuReport) {
    #[derive(Tabled)]
    struct EntryRow {
        #[tabled(rename = "#")]
        idx: usize,
        #[tabled(rename = "Food")]
        food: String,
        #[tabled(rename = "Grams")]
        grams: u32,
        #[tabled(rename = "kcal")]
        calories: String,
    }

    let summary = &report.summary;
    let rows: Vec<EntryRow> = entries
        .iter()
        .zip(&summary.per_entry_calories)
        .enumerate()
        .map(|(i, (entry, kcal))| EntryRow {
            idx: i + 1,
            food: truncate(&entry.food_name, 35),
            grams: entry.portion_grams,
            calories: if summary.skipped.contains(&i) {
                "not in catalog".to_string()
            } else {
                kcal.to_string()
            },
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    let totals = &summary.totals;
    if let (Some(targets), Some(cmp)) = (&report.targets, &report.comparison) {
        let mark = |over: bool| if over { "  over!" } else { "" };
        println!(
            "Calories: {} / {} kcal{}",
            totals.calories,
            targets.calories_kcal,
            mark(cmp.calories_exceeded)
        );
        println!(
            "Proteins: {} / {} g{}",
            totals.proteins,
            targets.proteins_g,
            mark(cmp.proteins_exceeded)
        );
        println!(
            "Fats:     {} / {} g{}",
            totals.fats,
            targets.fats_g,
            mark(cmp.fats_exceeded)
        );
        println!(
            "Carbs:    {} / {} g{}",
            totals.carbs,
            targets.carbs_g,
            mark(cmp.carbs_exceeded)
        );
    } else {
        println!("Calories: {} kcal", totals.calories);
        println!("Proteins: {} g", totals.proteins);
        println!("Fats:     {} g", totals.fats);
        println!("Carbs:    {} g", totals.carbs);
        eprintln!("Set your parameters with `macrobook user set` to compare against targets.");
    }
}

pub(crate) fn cmd_menu(
    svc: &mut NutritionService,
    login: &str,
    password: &str,
    items: &[String],
    json: bool,
) -> Result<()> {
    svc.login(login, password, false)?;
    let plan = build_plan(items)?;
    let report = svc.menu_summary(login, plan.entries())?;

    if json {
        #[derive(serde::Serialize)]
        struct MenuOutput<'a> {
            entries: &'a [MealEntry],
            #[serde(flatten)]
            report: &'a MenuReport,
        }
        print_json(&MenuOutput {
            entries: plan.entries(),
            report: &report,
        })?;
    } else if plan.is_empty() {
        eprintln!("The menu is empty.");
    } else {
        print_menu(plan.entries(), &report);
    }
    Ok(())
}
