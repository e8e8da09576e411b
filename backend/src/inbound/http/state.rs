//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ArticlesCommand, ArticlesQuery, AuthCommand, MoodTrackerCommand, MoodTrackerQuery,
    UsersCommand, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub auth: Arc<dyn AuthCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub articles: Arc<dyn ArticlesQuery>,
    pub articles_command: Arc<dyn ArticlesCommand>,
    pub mood: Arc<dyn MoodTrackerCommand>,
    pub mood_query: Arc<dyn MoodTrackerQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthCommand>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub articles: Arc<dyn ArticlesQuery>,
    pub articles_command: Arc<dyn ArticlesCommand>,
    pub mood: Arc<dyn MoodTrackerCommand>,
    pub mood_query: Arc<dyn MoodTrackerQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```ignore
    /// use mindspace::inbound::http::state::HttpState;
    /// use mindspace::test_support::in_memory_ports;
    ///
    /// let state = HttpState::new(in_memory_ports());
    /// let _auth = state.auth.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            auth,
            users,
            users_command,
            articles,
            articles_command,
            mood,
            mood_query,
        } = ports;
        Self {
            auth,
            users,
            users_command,
            articles,
            articles_command,
            mood,
            mood_query,
        }
    }
}
