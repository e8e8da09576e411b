//! Builders for HTTP state ports over the configured repositories.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use mindspace::domain::ports::{ArticleRepository, MoodEntryRepository, UserRepository};
use mindspace::domain::{ArticleService, AuthService, MoodTrackerService, UserService};
use mindspace::inbound::http::state::{HttpState, HttpStatePorts};
use mindspace::outbound::memory::{
    InMemoryArticleRepository, InMemoryMoodEntryRepository, InMemoryUserRepository,
};
use mindspace::outbound::persistence::{
    DbPool, DieselArticleRepository, DieselMoodEntryRepository, DieselUserRepository,
};
use mindspace::outbound::security::{Argon2PasswordHasher, JwtTokenService};

use super::ServerConfig;

/// Wire every driving port over one set of repositories.
fn ports_over<U, A, M>(
    users: Arc<U>,
    articles: Arc<A>,
    mood_entries: Arc<M>,
    tokens: Arc<JwtTokenService>,
) -> HttpStatePorts
where
    U: UserRepository + 'static,
    A: ArticleRepository + 'static,
    M: MoodEntryRepository + 'static,
{
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let auth = Arc::new(AuthService::new(users.clone(), hasher.clone(), tokens));
    let accounts = Arc::new(UserService::new(users, hasher));
    let articles = Arc::new(ArticleService::new(articles));
    let mood = Arc::new(MoodTrackerService::new(mood_entries));
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

fn diesel_ports(pool: &DbPool, tokens: Arc<JwtTokenService>) -> HttpStatePorts {
    ports_over(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselArticleRepository::new(pool.clone())),
        Arc::new(DieselMoodEntryRepository::new(pool.clone())),
        tokens,
    )
}

fn in_memory_ports(tokens: Arc<JwtTokenService>) -> HttpStatePorts {
    warn!(store = "users", "no database configured; using in-memory store");
    warn!(store = "articles", "no database configured; using in-memory store");
    warn!(store = "mood_entries", "no database configured; using in-memory store");
    ports_over(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryArticleRepository::new()),
        Arc::new(InMemoryMoodEntryRepository::new()),
        tokens,
    )
}

/// Build the HTTP state from configuration.
///
/// Uses the Diesel repositories when a pool is configured and in-process
/// stores otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] when the token signing key is rejected.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let tokens = JwtTokenService::new(&config.jwt_secret, config.token_ttl)
        .map(Arc::new)
        .map_err(|err| std::io::Error::other(format!("token service setup failed: {err}")))?;
    let ports = match &config.db_pool {
        Some(pool) => diesel_ports(pool, tokens),
        None => in_memory_ports(tokens),
    };
    Ok(web::Data::new(HttpState::new(ports)))
}
