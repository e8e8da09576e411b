//! User aggregate and its validated value types.
//!
//! Every string that reaches a [`User`] passes through one of the newtypes
//! below, so adapters can rely on the invariants documented on each type.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum username length in characters.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 50;
/// Minimum first/last name length in characters.
pub const PERSON_NAME_MIN: usize = 2;
/// Maximum first/last name length in characters.
pub const PERSON_NAME_MAX: usize = 50;
/// Oldest accepted age.
pub const AGE_MAX: u8 = 150;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("{field} must be between {min} and {max} characters")]
    NameLength {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("role must be one of user, psychologist, admin")]
    InvalidRole,
    #[error("age must be between 0 and {max}")]
    AgeOutOfRange { max: u8 },
}

impl UserValidationError {
    /// Stable machine-readable code used in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_uuid",
            Self::UsernameLength { .. } => "invalid_username",
            Self::InvalidEmail => "invalid_email",
            Self::NameLength { .. } => "invalid_name",
            Self::InvalidRole => "invalid_role",
            Self::AgeOutOfRange { .. } => "invalid_age",
        }
    }

    /// Input field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidId => "id",
            Self::UsernameLength { .. } => "username",
            Self::InvalidEmail => "email",
            Self::NameLength { field, .. } => field,
            Self::InvalidRole => "role",
            Self::AgeOutOfRange { .. } => "age",
        }
    }
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from a string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Unique login handle, trimmed and 3 to 50 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(UserValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Derive the base username from an email address.
    ///
    /// Uses the local part, right-padded with `_` up to the minimum length
    /// and truncated to leave room for a numeric suffix.
    ///
    /// # Examples
    /// ```
    /// use mindspace::domain::{EmailAddress, Username};
    ///
    /// let email = EmailAddress::new("jo@example.com").unwrap();
    /// assert_eq!(Username::base_from_email(&email), "jo_");
    /// ```
    pub fn base_from_email(email: &EmailAddress) -> String {
        let mut base: String = email
            .local_part()
            .chars()
            .take(USERNAME_MAX - 6)
            .collect();
        while base.chars().count() < USERNAME_MIN {
            base.push('_');
        }
        base
    }

    /// Candidate username for the `attempt`-th collision.
    pub fn candidate(base: &str, attempt: u32) -> Result<Self, UserValidationError> {
        if attempt == 0 {
            Self::new(base)
        } else {
            Self::new(format!("{base}{attempt}"))
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Lowercased, trimmed email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use mindspace::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("  Ada@Example.org ").unwrap();
    /// assert_eq!(email.as_ref(), "ada@example.org");
    /// assert!(EmailAddress::new("not-an-email").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = value.as_ref().trim().to_lowercase();
        if !email_regex().is_match(&normalised) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }

    /// Portion before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.split('@').next().unwrap_or_default()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// First or last name, trimmed and 2 to 50 characters long.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name; `field` names the offending input in errors.
    pub fn new(field: &'static str, value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();
        if !(PERSON_NAME_MIN..=PERSON_NAME_MAX).contains(&length) {
            return Err(UserValidationError::NameLength {
                field,
                min: PERSON_NAME_MIN,
                max: PERSON_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Psychologist,
    Admin,
}

impl Role {
    /// Lowercase wire and storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Psychologist => "psychologist",
            Self::Admin => "admin",
        }
    }

    /// Role applied at self-registration. Only `user` and `psychologist`
    /// may be self-selected; anything else falls back to `user`.
    pub fn for_registration(requested: Option<&str>) -> Self {
        match requested.map(str::parse) {
            Some(Ok(Self::Psychologist)) => Self::Psychologist,
            _ => Self::User,
        }
    }

    /// Whether the role carries the staff flag exposed as `isAdmin`.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Psychologist)
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "psychologist" => Ok(Self::Psychologist),
            "admin" => Ok(Self::Admin),
            _ => Err(UserValidationError::InvalidRole),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age in years, 0 to 150 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Age(u8);

impl Age {
    /// Validate an age.
    pub fn new(value: i64) -> Result<Self, UserValidationError> {
        u8::try_from(value)
            .ok()
            .filter(|age| *age <= AGE_MAX)
            .map(Self)
            .ok_or(UserValidationError::AgeOutOfRange { max: AGE_MAX })
    }

    /// Age as an integer.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Age {
    type Error = UserValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for u8 {
    fn from(value: Age) -> Self {
        value.0
    }
}

/// Optional personal details attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<Age>,
    pub location: Option<String>,
    pub is_phone_verified: bool,
}

/// Partial profile update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<Age>,
    pub location: Option<String>,
}

impl ProfileChanges {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.gender.is_none()
            && self.phone_number.is_none()
            && self.age.is_none()
            && self.location.is_none()
    }
}

impl UserProfile {
    /// Apply a partial update. Blank strings clear the field.
    pub fn apply(&mut self, changes: ProfileChanges) {
        fn merge(slot: &mut Option<String>, value: Option<String>) {
            if let Some(value) = value {
                let trimmed = value.trim();
                *slot = (!trimmed.is_empty()).then(|| trimmed.to_owned());
            }
        }
        merge(&mut self.gender, changes.gender);
        merge(&mut self.phone_number, changes.phone_number);
        merge(&mut self.location, changes.location);
        if changes.age.is_some() {
            self.age = changes.age;
        }
    }
}

/// Opaque PHC-formatted password hash. Never serialised.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw PHC string for persistence and verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registered account.
///
/// ## Invariants
/// - `password_hash` always holds a hash, never plaintext.
/// - `is_staff()` is derived from `role`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: PasswordHash,
    pub role: Role,
    pub profile: UserProfile,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Staff flag surfaced to clients as `isAdmin`.
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }

    /// Whether the user may moderate content.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Whether the user may author articles.
    pub fn can_author_articles(&self) -> bool {
        matches!(self.role, Role::Admin | Role::Psychologist)
    }
}
