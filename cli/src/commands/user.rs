use anyhow::Result;
use serde::Serialize;

use macrobook_core::NutritionService;
use macrobook_core::models::{BodyParameters, UserProfile};

use super::helpers::print_json;

#[derive(Serialize)]
struct ProfileView<'a> {
    #[serde(flatten)]
    profile: &'a UserProfile,
    unfilled: bool,
    plausible: bool,
}

impl<'a> ProfileView<'a> {
    fn new(profile: &'a UserProfile) -> Self {
        Self {
            profile,
            unfilled: profile.is_unfilled(),
            plausible: profile.is_plausible(),
        }
    }
}

fn print_profile(profile: &UserProfile) {
    println!("User: {}", profile.login);
    if profile.is_unfilled() {
        println!("  Parameters not set yet. Use `macrobook user set` to fill them in.");
        return;
    }
    println!("  Sex:      {}", profile.sex);
    println!("  Age:      {}", profile.age);
    println!("  Height:   {} cm", profile.height_cm);
    println!("  Weight:   {} kg", profile.weight_kg);
    println!("  Activity: {}", profile.activity_level);
    println!("  Goal:     {}", profile.goal);
    if !profile.is_plausible() {
        println!("  Warning: these parameters are outside the supported ranges.");
    }
}

pub(crate) fn cmd_user_login(
    svc: &mut NutritionService,
    login: &str,
    password: &str,
    register: bool,
    json: bool,
) -> Result<()> {
    let existed = svc.profiles().find_by_login(login).is_ok();
    let profile = svc.login(login, password, register)?;

    if json {
        print_json(&ProfileView::new(profile))?;
    } else if existed {
        println!("Logged in as {}", profile.login);
    } else {
        println!("Registered new user {}", profile.login);
    }
    Ok(())
}

pub(crate) fn cmd_user_show(
    svc: &mut NutritionService,
    login: &str,
    password: &str,
    json: bool,
) -> Result<()> {
    let profile = svc.login(login, password, false)?;

    if json {
        print_json(&ProfileView::new(profile))?;
    } else {
        print_profile(profile);
    }
    Ok(())
}

pub(crate) fn cmd_user_set(
    svc: &mut NutritionService,
    login: &str,
    password: &str,
    params: &BodyParameters,
    json: bool,
) -> Result<()> {
    svc.login(login, password, false)?;
    let profile = svc.set_parameters(login, params)?;

    if json {
        print_json(&ProfileView::new(profile))?;
    } else {
        print_profile(profile);
    }
    Ok(())
}
