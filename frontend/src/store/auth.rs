use shared::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
use tracing::{info, warn};

use crate::services::api::ApiClient;
use crate::services::session_storage::{SessionStorage, TOKEN_KEY, USER_KEY};
use crate::store::RequestState;

/// Session of the logged-in user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub request: RequestState,
}

impl AuthState {
    /// Initial state: the stored token is picked up, but the session is not
    /// trusted until `refresh_user` restores the user.
    pub fn new(session: &dyn SessionStorage) -> Self {
        let token = session.get_item(TOKEN_KEY).unwrap_or_else(|e| {
            warn!(error = %e, "could not read stored token");
            None
        });
        Self {
            token,
            ..Self::default()
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated && self.role() == Some(Role::Admin)
    }

    pub async fn login(
        &mut self,
        api: &ApiClient,
        credentials: &LoginRequest,
    ) -> Result<User, String> {
        self.request.start();
        let result = api.login(credentials).await;
        let response = self.request.settle(result, "Login failed")?;
        info!(email = %response.email, "logged in");
        Ok(self.set_credentials(api.session(), &response))
    }

    pub async fn register(
        &mut self,
        api: &ApiClient,
        registration: &RegisterRequest,
    ) -> Result<User, String> {
        self.request.start();
        let result = api.register(registration).await;
        let response = self.request.settle(result, "Registration failed")?;
        info!(email = %response.email, "registered");
        Ok(self.set_credentials(api.session(), &response))
    }

    /// Adopt an issued session and persist it
    pub fn set_credentials(&mut self, session: &dyn SessionStorage, response: &AuthResponse) -> User {
        let user = response.to_user();
        self.is_authenticated = true;
        self.token = Some(response.token.clone());
        self.user = Some(user.clone());

        if let Err(e) = session.set_item(TOKEN_KEY, &response.token) {
            warn!(error = %e, "failed to persist token");
        }
        match serde_json::to_string(&user) {
            Ok(json) => {
                if let Err(e) = session.set_item(USER_KEY, &json) {
                    warn!(error = %e, "failed to persist user");
                }
            }
            Err(e) => warn!(error = %e, "failed to serialize user"),
        }
        user
    }

    /// Restore the session from storage.
    ///
    /// A missing token or user wipes the session. `error` is left alone so
    /// a stale session never shows up as a form error.
    pub fn refresh_user(&mut self, session: &dyn SessionStorage) -> Result<User, String> {
        match read_stored_user(session) {
            Ok(user) => {
                self.is_authenticated = true;
                self.user = Some(user.clone());
                Ok(user)
            }
            Err(message) => {
                info!(reason = %message, "stored session discarded");
                self.clear_session(session);
                Err(message)
            }
        }
    }

    pub fn logout(&mut self, session: &dyn SessionStorage) {
        self.clear_session(session);
        info!("logged out");
    }

    fn clear_session(&mut self, session: &dyn SessionStorage) {
        self.is_authenticated = false;
        self.user = None;
        self.token = None;
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = session.remove_item(key) {
                warn!(error = %e, key, "failed to clear session entry");
            }
        }
    }
}

fn read_stored_user(session: &dyn SessionStorage) -> Result<User, String> {
    let token = session.get_item(TOKEN_KEY).map_err(|e| e.to_string())?;
    if token.is_none() {
        return Err("No token found".to_string());
    }
    let user_json = session
        .get_item(USER_KEY)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "No user data found".to_string())?;
    serde_json::from_str(&user_json).map_err(|_| "Failed to refresh user".to_string())
}
