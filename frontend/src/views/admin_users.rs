use shared::{User, UserUpdateRequest};

use crate::app::Dashboard;
use crate::services::api::DEFAULT_PAGE_SIZE;
use crate::views::report_invalid;
use crate::views::validation::{required, ValidationError};

/// Paged user list for admins
#[derive(Debug, Clone, PartialEq)]
pub struct UserListView {
    pub page: u32,
    pub size: u32,
}

impl Default for UserListView {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl UserListView {
    pub async fn load(&self, dashboard: &mut Dashboard) -> Result<(), String> {
        dashboard
            .store
            .users
            .fetch_all_users(&dashboard.api, self.page, self.size)
            .await
    }

    pub async fn go_to_page(&mut self, dashboard: &mut Dashboard, page: u32) -> Result<(), String> {
        self.page = page;
        self.load(dashboard).await
    }

    pub fn can_go_next(&self, dashboard: &Dashboard) -> bool {
        dashboard.store.users.pagination.has_next()
    }

    pub fn can_go_previous(&self, dashboard: &Dashboard) -> bool {
        dashboard.store.users.pagination.has_previous()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserEditForm {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub enabled: bool,
}

impl UserEditForm {
    /// `None` for users the server returned without an id
    pub fn from_user(user: &User) -> Option<Self> {
        Some(Self {
            id: user.id?,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            enabled: user.enabled.unwrap_or(true),
        })
    }

    pub fn validate(&self) -> Result<UserUpdateRequest, ValidationError> {
        Ok(UserUpdateRequest {
            name: Some(required("Name", &self.name)?),
            email: Some(required("Email", &self.email)?),
            phone: Some(required("Phone", &self.phone)?),
            enabled: Some(self.enabled),
        })
    }

    pub async fn submit(&self, dashboard: &mut Dashboard) -> Result<User, String> {
        let update = self
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard
            .store
            .users
            .update_user(&dashboard.api, self.id, &update)
            .await
        {
            Ok(user) => {
                dashboard
                    .toaster
                    .success("User Updated", "User information has been updated successfully.");
                Ok(user)
            }
            Err(error) => {
                dashboard.toaster.error("Update Failed", error.clone());
                Err(error)
            }
        }
    }
}

pub async fn delete_user(dashboard: &mut Dashboard, id: i64) -> Result<(), String> {
    match dashboard.store.users.delete_user(&dashboard.api, id).await {
        Ok(()) => {
            dashboard
                .toaster
                .success("User Deleted", "User has been deleted successfully.");
            Ok(())
        }
        Err(error) => {
            dashboard.toaster.error("Delete Failed", error.clone());
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{client_with, paged_json, sample_user, MockTransport};
    use serde_json::json;
    use shared::Role;
    use std::sync::Arc;

    #[test]
    fn test_form_defaults_enabled() {
        let mut user = sample_user(2, "Grace", Role::User);
        user.enabled = None;
        assert!(UserEditForm::from_user(&user).unwrap().enabled);

        user.id = None;
        assert_eq!(UserEditForm::from_user(&user), None);
    }

    #[tokio::test]
    async fn test_disable_user() {
        let transport = Arc::new(MockTransport::new());
        let users = vec![sample_user(1, "Ada", Role::Admin), sample_user(2, "Grace", Role::User)];
        let mut disabled = users[1].clone();
        disabled.enabled = Some(false);
        transport.respond_json(200, paged_json(&users, 0, 10, 2, 1, true));
        transport.respond_json(200, serde_json::to_value(&disabled).unwrap());
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let view = UserListView::default();
        view.load(&mut dashboard).await.unwrap();
        assert!(!view.can_go_next(&dashboard));

        let mut form = UserEditForm::from_user(&users[1]).unwrap();
        form.enabled = false;
        form.submit(&mut dashboard).await.unwrap();

        let request = transport.last_request().unwrap();
        assert_eq!(request.path, "/users/2");
        assert_eq!(request.body.unwrap()["enabled"], json!(false));
        assert_eq!(dashboard.store.users.users[1], disabled);
        assert_eq!(dashboard.toaster.last().unwrap().title, "User Updated");
    }

    #[tokio::test]
    async fn test_delete_failure_toast() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(403, json!({"message": "Cannot delete yourself"}));
        let (api, _session) = client_with(transport);
        let mut dashboard = Dashboard::new(api);

        assert_eq!(delete_user(&mut dashboard, 1).await.unwrap_err(), "Cannot delete yourself");
        assert_eq!(dashboard.toaster.last().unwrap().title, "Delete Failed");
    }

    #[tokio::test]
    async fn test_go_to_page() {
        let transport = Arc::new(MockTransport::new());
        transport.respond_json(200, paged_json::<i64>(&[], 2, 10, 25, 3, true));
        let (api, _session) = client_with(transport.clone());
        let mut dashboard = Dashboard::new(api);

        let mut view = UserListView::default();
        view.go_to_page(&mut dashboard, 2).await.unwrap();
        assert_eq!(transport.last_request().unwrap().query_value("page"), Some("2"));
        assert!(view.can_go_previous(&dashboard));
        assert!(!view.can_go_next(&dashboard));
    }
}
