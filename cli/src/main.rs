mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_food_add, cmd_food_list, cmd_food_new, cmd_food_remove, cmd_food_rename, cmd_food_set,
    cmd_food_show, cmd_menu, cmd_targets, cmd_user_login, cmd_user_set, cmd_user_show,
};
use crate::config::Config;
use macrobook_core::models::{ActivityLevel, BodyParameters, Goal, Sex};
use macrobook_core::{CsvPersistence, NutritionService};

#[derive(Parser)]
#[command(
    name = "macrobook",
    version,
    about = "A personal nutrition tracker: foods, body parameters, daily targets, and menus"
)]
struct Cli {
    /// Directory holding Food.csv and users.csv (default: platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the food catalog
    Food {
        #[command(subcommand)]
        command: FoodCommands,
    },
    /// Log in, register, and edit body parameters
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Show daily calorie and macro targets
    Targets {
        /// User login
        login: String,
        /// User password
        #[arg(short, long)]
        password: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Total a menu and compare it against daily targets
    Menu {
        /// User login
        login: String,
        /// User password
        #[arg(short, long)]
        password: String,
        /// Menu entries as "food=grams" (grams default to 100; 0 drops the entry)
        #[arg(required = true)]
        items: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FoodCommands {
    /// List all foods
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one food
    Show {
        /// Food name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a food with zeroed nutrients
    Add {
        /// Food name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a food under the next free "New Product N" name
    New {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rename a food
    Rename {
        /// Current name
        old_name: String,
        /// New name
        new_name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set nutrients per 100g; calories are derived from them
    Set {
        /// Food name
        name: String,
        /// Proteins per 100g
        #[arg(long)]
        proteins: f64,
        /// Fats per 100g
        #[arg(long)]
        fats: f64,
        /// Carbohydrates per 100g
        #[arg(long)]
        carbs: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove a food
    Remove {
        /// Food name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Check a login and password
    Login {
        /// User login
        login: String,
        /// User password
        #[arg(short, long)]
        password: String,
        /// Register the user if the login is unknown
        #[arg(long)]
        register: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a user's body parameters
    Show {
        /// User login
        login: String,
        /// User password
        #[arg(short, long)]
        password: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set all body parameters at once
    Set {
        /// User login
        login: String,
        /// User password
        #[arg(short, long)]
        password: String,
        /// female or male (or 0/1)
        #[arg(long)]
        sex: Sex,
        /// Age in years (7-119)
        #[arg(long)]
        age: i64,
        /// Height in cm (61-249)
        #[arg(long)]
        height: i64,
        /// Weight in kg (21-599)
        #[arg(long)]
        weight: i64,
        /// light, moderate, high, or extreme (or 0-3)
        #[arg(long)]
        activity: ActivityLevel,
        /// lose, maintain, or gain (or 0-2)
        #[arg(long)]
        goal: Goal,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir.as_deref())?;
    debug!(
        foods = %config.foods_path.display(),
        users = %config.users_path.display(),
        "using data files"
    );
    let mut svc = NutritionService::open(
        Box::new(CsvPersistence::new()),
        &config.foods_path,
        &config.users_path,
    )?;

    match cli.command {
        Commands::Food { command } => match command {
            FoodCommands::List { json } => cmd_food_list(&svc, json),
            FoodCommands::Show { name, json } => cmd_food_show(&svc, &name, json),
            FoodCommands::Add { name, json } => cmd_food_add(&mut svc, &name, json),
            FoodCommands::New { json } => cmd_food_new(&mut svc, json),
            FoodCommands::Rename {
                old_name,
                new_name,
                json,
            } => cmd_food_rename(&mut svc, &old_name, &new_name, json),
            FoodCommands::Set {
                name,
                proteins,
                fats,
                carbs,
                json,
            } => cmd_food_set(&mut svc, &name, proteins, fats, carbs, json),
            FoodCommands::Remove { name, json } => cmd_food_remove(&mut svc, &name, json),
        },
        Commands::User { command } => match command {
            UserCommands::Login {
                login,
                password,
                register,
                json,
            } => cmd_user_login(&mut svc, &login, &password, register, json),
            UserCommands::Show {
                login,
                password,
                json,
            } => cmd_user_show(&mut svc, &login, &password, json),
            UserCommands::Set {
                login,
                password,
                sex,
                age,
                height,
                weight,
                activity,
                goal,
                json,
            } => {
                let params = BodyParameters {
                    sex,
                    age,
                    height_cm: height,
                    weight_kg: weight,
                    activity_level: activity,
                    goal,
                };
                cmd_user_set(&mut svc, &login, &password, &params, json)
            }
        },
        Commands::Targets {
            login,
            password,
            json,
        } => cmd_targets(&mut svc, &login, &password, json),
        Commands::Menu {
            login,
            password,
            items,
            json,
        } => cmd_menu(&mut svc, &login, &password, &items, json),
    }?;

    svc.save_all()?;
    Ok(())
}
