use uuid::Uuid;

use super::Engine;

use crate::{
    entities::{Role, Session},
    error::{session_not_found_error, Error},
};

impl Engine {
    /// Runs `f` against the session while holding the session table, marking
    /// the session active first. `f` must not await.
    #[tracing::instrument(skip(self, f))]
    pub(super) async fn update_session<T, F>(&self, token: &Uuid, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Session) -> T,
    {
        let mut sessions = self.sessions.lock().await;

        let session = sessions
            .get_mut(token)
            .ok_or_else(session_not_found_error)?;

        session.touch();

        Ok(f(session))
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn fetch_session(&self, token: &Uuid) -> Result<Session, Error> {
        self.update_session(token, |session| session.clone()).await
    }

    /// Drops everything hanging off sessions that no longer exist: pending
    /// searches and quotes.
    pub(super) async fn release_sessions(&self, tokens: &[Uuid]) {
        for token in tokens {
            self.debouncer.cancel(&(*token, Role::Pickup)).await;
            self.debouncer.cancel(&(*token, Role::Drop)).await;
        }

        self.quotes
            .lock()
            .await
            .retain(|_, quote| !tokens.contains(&quote.session_token));
    }
}
