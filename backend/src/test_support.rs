//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`,
//! through the `test-support` feature).

pub mod fixtures {
    //! Ready-made domain values.

    use chrono::Utc;

    use crate::domain::{
        ArticleDraft, ArticleInput, EmailAddress, PasswordHash, PersonName, Role, User, UserId,
        UserProfile, Username,
    };

    /// PHC-shaped placeholder; never verified against a real hasher.
    pub const FIXTURE_HASH: &str = "$argon2id$v=19$m=8,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2g";

    /// A user with the given handle and email.
    pub fn user_named(username: &str, email: &str, role: Role) -> User {
        let now = Utc::now();
        User {
            id: UserId::random(),
            username: Username::new(username).expect("fixture username"),
            email: EmailAddress::new(email).expect("fixture email"),
            first_name: PersonName::new("first_name", "Ada").expect("fixture first name"),
            last_name: PersonName::new("last_name", "Lovelace").expect("fixture last name"),
            password_hash: PasswordHash::new(FIXTURE_HASH),
            role,
            profile: UserProfile::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// A user with a unique handle derived from a fresh id.
    pub fn user(role: Role) -> User {
        let tag = uuid::Uuid::new_v4().simple().to_string();
        let handle = format!("user{}", &tag[..8]);
        user_named(&handle, &format!("{handle}@example.com"), role)
    }

    /// Raw input for an external article.
    pub fn external_input(title: &str) -> ArticleInput {
        ArticleInput {
            title: Some(title.to_owned()),
            excerpt: Some(format!("{title}, in brief.")),
            external_url: Some("https://example.org/wellbeing".to_owned()),
            external_source: Some("Example Health".to_owned()),
            ..ArticleInput::default()
        }
    }

    /// A validated external article draft.
    pub fn external_draft(title: &str) -> ArticleDraft {
        ArticleDraft::try_from(external_input(title)).expect("fixture draft")
    }

    /// A validated internal article draft.
    pub fn internal_draft(title: &str) -> ArticleDraft {
        ArticleDraft::try_from(ArticleInput {
            title: Some(title.to_owned()),
            article_type: Some("internal".to_owned()),
            content: Some("Breathe in for four, hold for four.".to_owned()),
            excerpt: Some(format!("{title}, in brief.")),
            ..ArticleInput::default()
        })
        .expect("fixture draft")
    }
}

pub mod harness {
    //! In-memory wiring of every driving port, for handler and flow tests.

    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use crate::domain::ports::{PasswordHasher, TokenService, UserRepository};
    use crate::domain::{
        ArticleService, AuthService, EmailAddress, MoodTrackerService, PersonName, PlainPassword,
        Role, User, UserId, UserProfile, UserService, Username,
    };
    use crate::inbound::http::state::{HttpState, HttpStatePorts};
    use crate::outbound::memory::{
        InMemoryArticleRepository, InMemoryMoodEntryRepository, InMemoryUserRepository,
    };
    use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

    /// Signing key shared by every test token service.
    pub const TEST_JWT_SECRET: &[u8] = b"mindspace-test-signing-key";

    /// Password given to users created by [`Harness::seed_user`].
    pub const SEED_PASSWORD: &str = "correct horse battery";

    /// Ports plus handles on the adapters behind them.
    pub struct Harness {
        pub state: HttpState,
        pub users: Arc<InMemoryUserRepository>,
        pub hasher: Arc<Argon2PasswordHasher>,
        pub tokens: Arc<JwtTokenService>,
    }

    impl Default for Harness {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Harness {
        /// Fresh empty stores with a low-cost Argon2 configuration.
        pub fn new() -> Self {
            let users = Arc::new(InMemoryUserRepository::new());
            let hasher =
                Arc::new(Argon2PasswordHasher::with_params(1024, 1, 1).expect("argon2 params"));
            let tokens = Arc::new(
                JwtTokenService::new(TEST_JWT_SECRET, Duration::days(30)).expect("jwt secret"),
            );
            let ports = ports_over(users.clone(), hasher.clone(), tokens.clone());
            Self {
                state: HttpState::new(ports),
                users,
                hasher,
                tokens,
            }
        }

        /// Store a user directly, bypassing registration rules (so admins
        /// can be created), and return it with a valid bearer token.
        pub async fn seed_user(&self, username: &str, role: Role) -> (User, String) {
            let now = Utc::now();
            let password = PlainPassword::new(SEED_PASSWORD).expect("seed password");
            let user = User {
                id: UserId::random(),
                username: Username::new(username).expect("seed username"),
                email: EmailAddress::new(format!("{username}@example.com")).expect("seed email"),
                first_name: PersonName::new("first_name", "Sam").expect("seed first name"),
                last_name: PersonName::new("last_name", "Rivera").expect("seed last name"),
                password_hash: self.hasher.hash(&password).expect("seed hash"),
                role,
                profile: UserProfile::default(),
                created_at: now,
                updated_at: now,
            };
            self.users.insert(&user).await.expect("seed insert");
            let token = self.tokens.issue(&user.id).expect("seed token");
            (user, token)
        }
    }

    /// Build every port over the given user store and credential adapters,
    /// with fresh article and mood stores.
    pub fn ports_over(
        users: Arc<InMemoryUserRepository>,
        hasher: Arc<Argon2PasswordHasher>,
        tokens: Arc<JwtTokenService>,
    ) -> HttpStatePorts {
        let auth = Arc::new(AuthService::new(users.clone(), hasher.clone(), tokens));
        let accounts = Arc::new(UserService::new(users, hasher));
        let articles = Arc::new(ArticleService::new(Arc::new(
            InMemoryArticleRepository::new(),
        )));
        let mood = Arc::new(MoodTrackerService::new(Arc::new(
            InMemoryMoodEntryRepository::new(),
        )));
        HttpStatePorts {
            auth,
            users: accounts.clone(),
            users_command: accounts,
            articles: articles.clone(),
            articles_command: articles,
            mood: mood.clone(),
            mood_query: mood,
        }
    }
}

pub use harness::Harness;

/// Ports backed entirely by in-process stores.
pub fn in_memory_ports() -> crate::inbound::http::state::HttpStatePorts {
    let Harness {
        users,
        hasher,
        tokens,
        ..
    } = Harness::new();
    harness::ports_over(users, hasher, tokens)
}

/// [`HttpState`](crate::inbound::http::state::HttpState) over in-process stores.
pub fn in_memory_state() -> crate::inbound::http::state::HttpState {
    Harness::new().state
}
