use anyhow::Result;

use macrobook_core::NutritionService;

use super::helpers::print_json;

pub(crate) fn cmd_targets(
    svc: &mut NutritionService,
    login: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    svc.login(login, password, false)?;
    let report = svc.targets_for(login)?;

    if json {
        print_json(&report)?;
    } else {
        let t = &report.targets;
        println!("Daily targets for {login}:");
        println!("  Calories: {} kcal", t.calories_kcal);
        println!("  Proteins: {} g", t.proteins_g);
        println!("  Fats:     {} g", t.fats_g);
        println!("  Carbs:    {} g", t.carbs_g);
        println!();
        println!("BMI {:.1}: {}", report.bmi, report.band.advice());
    }
    Ok(())
}
