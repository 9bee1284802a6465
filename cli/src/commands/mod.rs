mod food;
mod helpers;
mod menu;
mod targets;
mod user;

pub(crate) use food::{
    cmd_food_add, cmd_food_list, cmd_food_new, cmd_food_remove, cmd_food_rename, cmd_food_set,
    cmd_food_show,
};
pub(crate) use menu::cmd_menu;
pub(crate) use targets::cmd_targets;
pub(crate) use user::{cmd_user_login, cmd_user_set, cmd_user_show};
