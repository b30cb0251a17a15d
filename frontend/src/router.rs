//! Route table and access guard.
//!
//! Public routes always render. Everything else needs a session, and the
//! `/admin` tree additionally needs the `ADMIN` role.

use std::fmt;

use shared::Role;

use crate::store::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    UserDashboard,
    UserTransactions,
    NewTransaction,
    UserTransactionDetail(i64),
    PaymentMethods,
    Profile,
    AdminDashboard,
    AdminUsers,
    AdminTransactions,
    AdminTransactionDetail(i64),
    AdminErrorLogs,
    AdminRetryConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

/// Outcome of resolving a path against the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
    /// Authenticated, but the role may not see the page
    Denied { redirect: Route },
}

impl Navigation {
    /// The route that ends up on screen
    pub fn target(&self) -> Route {
        match *self {
            Navigation::Render(route) | Navigation::Redirect(route) => route,
            Navigation::Denied { redirect } => redirect,
        }
    }
}

impl Route {
    /// Match a path, ignoring a trailing slash and any query string
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            [] => Route::UserDashboard,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["transactions"] => Route::UserTransactions,
            ["transactions", "new"] => Route::NewTransaction,
            ["transactions", id] => Route::UserTransactionDetail(id.parse().ok()?),
            ["payment-methods"] => Route::PaymentMethods,
            ["profile"] => Route::Profile,
            ["admin"] => Route::AdminDashboard,
            ["admin", "users"] => Route::AdminUsers,
            ["admin", "transactions"] => Route::AdminTransactions,
            ["admin", "transactions", id] => Route::AdminTransactionDetail(id.parse().ok()?),
            ["admin", "error-logs"] => Route::AdminErrorLogs,
            ["admin", "retry-config"] => Route::AdminRetryConfig,
            _ => return None,
        };
        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::UserDashboard => "/".to_string(),
            Route::UserTransactions => "/transactions".to_string(),
            Route::NewTransaction => "/transactions/new".to_string(),
            Route::UserTransactionDetail(id) => format!("/transactions/{}", id),
            Route::PaymentMethods => "/payment-methods".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::AdminDashboard => "/admin".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminTransactions => "/admin/transactions".to_string(),
            Route::AdminTransactionDetail(id) => format!("/admin/transactions/{}", id),
            Route::AdminErrorLogs => "/admin/error-logs".to_string(),
            Route::AdminRetryConfig => "/admin/retry-config".to_string(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register => Access::Public,
            Route::UserDashboard
            | Route::UserTransactions
            | Route::NewTransaction
            | Route::UserTransactionDetail(_)
            | Route::PaymentMethods
            | Route::Profile => Access::Authenticated,
            Route::AdminDashboard
            | Route::AdminUsers
            | Route::AdminTransactions
            | Route::AdminTransactionDetail(_)
            | Route::AdminErrorLogs
            | Route::AdminRetryConfig => Access::Admin,
        }
    }

    /// Landing page for a role
    pub fn home_for(role: Option<Role>) -> Route {
        match role {
            Some(Role::Admin) => Route::AdminDashboard,
            _ => Route::UserDashboard,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Decide what a navigation to `path` shows for the given session
pub fn resolve(path: &str, auth: &AuthState) -> Navigation {
    let Some(route) = Route::parse(path) else {
        return if auth.is_authenticated {
            Navigation::Redirect(Route::home_for(auth.role()))
        } else {
            Navigation::Redirect(Route::Login)
        };
    };

    match route.access() {
        Access::Public => Navigation::Render(route),
        _ if !auth.is_authenticated => Navigation::Redirect(Route::Login),
        Access::Admin if auth.role() != Some(Role::Admin) => Navigation::Denied {
            redirect: Route::home_for(auth.role()),
        },
        _ => Navigation::Render(route),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_user;

    fn session(role: Option<Role>) -> AuthState {
        match role {
            Some(role) => AuthState {
                is_authenticated: true,
                user: Some(sample_user(1, "Ada", role)),
                token: Some("jwt".to_string()),
                ..AuthState::default()
            },
            None => AuthState::default(),
        }
    }

    #[test]
    fn test_parse_every_route() {
        for route in [
            Route::Login,
            Route::Register,
            Route::UserDashboard,
            Route::UserTransactions,
            Route::NewTransaction,
            Route::UserTransactionDetail(17),
            Route::PaymentMethods,
            Route::Profile,
            Route::AdminDashboard,
            Route::AdminUsers,
            Route::AdminTransactions,
            Route::AdminTransactionDetail(3),
            Route::AdminErrorLogs,
            Route::AdminRetryConfig,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_edge_cases() {
        assert_eq!(Route::parse("/transactions/new/"), Some(Route::NewTransaction));
        assert_eq!(Route::parse("/transactions?page=2"), Some(Route::UserTransactions));
        assert_eq!(Route::parse("/transactions/abc"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_public_routes_always_render() {
        assert_eq!(resolve("/login", &session(None)), Navigation::Render(Route::Login));
        assert_eq!(
            resolve("/register", &session(Some(Role::Admin))),
            Navigation::Render(Route::Register)
        );
    }

    #[test]
    fn test_protected_routes_need_session() {
        assert_eq!(resolve("/", &session(None)), Navigation::Redirect(Route::Login));
        assert_eq!(resolve("/admin/users", &session(None)), Navigation::Redirect(Route::Login));
        assert_eq!(
            resolve("/transactions/5", &session(Some(Role::User))),
            Navigation::Render(Route::UserTransactionDetail(5))
        );
    }

    #[test]
    fn test_admin_routes_deny_users() {
        let navigation = resolve("/admin/error-logs", &session(Some(Role::User)));
        assert_eq!(
            navigation,
            Navigation::Denied {
                redirect: Route::UserDashboard
            }
        );
        assert_eq!(navigation.target(), Route::UserDashboard);
        assert_eq!(
            resolve("/admin/error-logs", &session(Some(Role::Admin))),
            Navigation::Render(Route::AdminErrorLogs)
        );
    }

    #[test]
    fn test_admins_may_open_user_pages() {
        assert_eq!(
            resolve("/payment-methods", &session(Some(Role::Admin))),
            Navigation::Render(Route::PaymentMethods)
        );
    }

    #[test]
    fn test_unknown_paths_go_home() {
        assert_eq!(resolve("/nope", &session(None)), Navigation::Redirect(Route::Login));
        assert_eq!(
            resolve("/nope", &session(Some(Role::User))),
            Navigation::Redirect(Route::UserDashboard)
        );
        assert_eq!(
            resolve("/nope", &session(Some(Role::Admin))),
            Navigation::Redirect(Route::AdminDashboard)
        );
    }
}
