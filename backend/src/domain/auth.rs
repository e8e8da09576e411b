//! Authentication primitives: login credentials, registration input, and
//! plaintext passwords.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Age, EmailAddress, PersonName, ProfileChanges, Role, UserValidationError};

/// Minimum accepted password length in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Identifier or password was missing or blank.
    #[error("Please provide email and password")]
    MissingFields,
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `identifier` is trimmed and non-empty. It is matched against both the
///   email address and the username.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use mindspace::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "password").unwrap();
/// assert_eq!(creds.identifier(), "ada@example.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw identifier/password inputs.
    pub fn try_from_parts(identifier: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = identifier.trim();
        if normalized.is_empty() || password.is_empty() {
            return Err(LoginValidationError::MissingFields);
        }

        Ok(Self {
            identifier: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address or username supplied by the caller.
    pub fn identifier(&self) -> &str {
        self.identifier.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// Plaintext password awaiting hashing. Zeroed on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct PlainPassword(Zeroizing<String>);

impl PlainPassword {
    /// Validate the minimum length.
    pub fn new(value: &str) -> Result<Self, RegistrationError> {
        if value.chars().count() < PASSWORD_MIN {
            return Err(RegistrationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self(Zeroizing::new(value.to_owned())))
    }

    /// Borrow the plaintext for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PlainPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlainPassword(..)")
    }
}

/// Reasons a registration request is rejected before touching storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Please provide all required fields")]
    MissingFields { missing: Vec<&'static str> },
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("{0}")]
    Invalid(#[from] UserValidationError),
}

/// Raw registration input as received from an adapter.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub gender: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<i64>,
    pub location: Option<String>,
}

/// Validated registration details.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: PlainPassword,
    pub role: Role,
    pub profile: ProfileChanges,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl TryFrom<RegistrationRequest> for RegistrationDetails {
    type Error = RegistrationError;

    /// Checks run in a fixed order: required fields, password length,
    /// email format, then the remaining field rules.
    fn try_from(value: RegistrationRequest) -> Result<Self, Self::Error> {
        let email = present(value.email.as_ref());
        let first_name = present(value.first_name.as_ref());
        let last_name = present(value.last_name.as_ref());
        let password = value.password.as_deref().filter(|raw| !raw.is_empty());

        let (Some(email), Some(first_name), Some(last_name), Some(password)) =
            (email, first_name, last_name, password)
        else {
            let missing = [
                ("email", email.is_none()),
                ("first_name", first_name.is_none()),
                ("last_name", last_name.is_none()),
                ("password", password.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, absent)| absent.then_some(field))
            .collect();
            return Err(RegistrationError::MissingFields { missing });
        };

        let password = PlainPassword::new(password)?;
        let email = EmailAddress::new(email)?;
        let first_name = PersonName::new("first_name", first_name)?;
        let last_name = PersonName::new("last_name", last_name)?;
        let age = value.age.map(Age::new).transpose()?;

        Ok(Self {
            email,
            first_name,
            last_name,
            password,
            role: Role::for_registration(value.role.as_deref()),
            profile: ProfileChanges {
                gender: value.gender,
                phone_number: value.phone_number,
                age,
                location: value.location,
            },
        })
    }
}
