use tracing::debug;

use crate::error::{NutritionError, Result};
use crate::models::{ProfileField, UserProfile};
use crate::table::{Keyed, Table};

impl Keyed for UserProfile {
    type Key = String;

    fn key(&self) -> &String {
        &self.login
    }

    fn set_key(&mut self, key: String) {
        self.login = key;
    }
}

/// User profiles keyed by login.
#[derive(Debug, Clone)]
pub struct UserProfileStore {
    table: Table<UserProfile>,
}

impl Default for UserProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserProfileStore {
    const KIND: &'static str = "User";

    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(Self::KIND),
        }
    }

    pub fn from_rows(rows: Vec<UserProfile>) -> Result<Self> {
        Ok(Self {
            table: Table::from_rows(Self::KIND, rows)?,
        })
    }

    pub fn find_by_login(&self, login: &str) -> Result<&UserProfile> {
        self.table.get(login)
    }

    /// Returns the profile for `login`, creating an unfilled one if needed.
    ///
    /// An existing profile is returned as-is: the password is neither checked
    /// nor replaced. Use [`UserProfileStore::authenticate`] for that.
    pub fn register_or_find(&mut self, login: &str, password: &str) -> Result<&UserProfile> {
        if login.is_empty() {
            return Err(NutritionError::invalid("login", "cannot be empty"));
        }
        if self.table.contains(login) {
            return self.table.get(login);
        }
        if password.is_empty() {
            return Err(NutritionError::invalid("password", "cannot be empty"));
        }
        debug!(login, "registering new user");
        self.table.insert(UserProfile::unfilled(login, password))
    }

    // TODO: store a salted hash instead of the plaintext password once the
    // users.csv format can change.
    pub fn authenticate(&self, login: &str, password: &str) -> Result<&UserProfile> {
        let user = self.table.get(login)?;
        if user.password != password {
            return Err(NutritionError::WrongPassword {
                login: login.to_string(),
            });
        }
        Ok(user)
    }

    pub fn update_field(&mut self, login: &str, field: ProfileField) -> Result<&UserProfile> {
        debug!(login, field = field.name(), "updating profile field");
        self.table.update(login, |user| user.apply(field))
    }

    /// True when the profile exists and has never had its parameters set.
    #[must_use]
    pub fn is_unfilled(&self, login: &str) -> bool {
        self.table.get(login).is_ok_and(UserProfile::is_unfilled)
    }

    #[must_use]
    pub fn is_physiologically_plausible(&self, login: &str) -> bool {
        self.table.get(login).is_ok_and(UserProfile::is_plausible)
    }

    pub fn list_all(&self) -> impl Iterator<Item = &UserProfile> {
        self.table.iter()
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
    pub fn to_rows(&self) -> Vec<UserProfile> {
        self.table.to_rows()
    }
}
