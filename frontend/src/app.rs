use shared::User;
use tracing::{debug, info};

use crate::router::{resolve, Navigation, Route};
use crate::services::api::ApiClient;
use crate::services::notifications::{Toast, ToastVariant, Toaster};
use crate::store::Store;

/// Top-level client: the store, the API client, and the toast queue that
/// every view reports into
pub struct Dashboard {
    pub store: Store,
    pub api: ApiClient,
    pub toaster: Toaster,
    current_route: Option<Route>,
}

impl Dashboard {
    pub fn new(api: ApiClient) -> Self {
        let store = Store::new(api.session());
        Self {
            store,
            api,
            toaster: Toaster::new(),
            current_route: None,
        }
    }

    /// Restore a persisted session, if any
    pub fn bootstrap(&mut self) -> Option<User> {
        match self.store.auth.refresh_user(self.api.session()) {
            Ok(user) => {
                info!(email = %user.email, "session restored");
                Some(user)
            }
            Err(reason) => {
                debug!(%reason, "no session to restore");
                None
            }
        }
    }

    /// Resolve `path` through the guard and remember where we landed
    pub fn navigate(&mut self, path: &str) -> Navigation {
        let navigation = resolve(path, &self.store.auth);
        if let Navigation::Denied { .. } = navigation {
            self.toaster.push(Toast::new(
                "Access Denied",
                Some("You don't have permission to access this page".to_string()),
                ToastVariant::Destructive,
            ));
        }
        debug!(path, target = %navigation.target(), "navigated");
        self.current_route = Some(navigation.target());
        navigation
    }

    pub fn current_route(&self) -> Option<Route> {
        self.current_route
    }

    pub fn home(&self) -> Route {
        Route::home_for(self.store.auth.role())
    }

    pub fn logout(&mut self) {
        self.store.auth.logout(self.api.session());
        self.current_route = Some(Route::Login);
    }
}
