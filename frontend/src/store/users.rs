use shared::{User, UserUpdateRequest};

use crate::services::api::ApiClient;
use crate::store::{replace_by_id, Pagination, RequestState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub users: Vec<User>,
    /// Either the logged-in user or the user being edited by an admin
    pub current_user: Option<User>,
    pub pagination: Pagination,
    pub request: RequestState,
}

impl UserState {
    pub async fn fetch_current_user(&mut self, api: &ApiClient) -> Result<User, String> {
        self.request.start();
        let result = api.get_current_user().await;
        let user = self.request.settle(result, "Failed to fetch current user")?;
        self.current_user = Some(user.clone());
        Ok(user)
    }

    pub async fn update_current_user(
        &mut self,
        api: &ApiClient,
        update: &UserUpdateRequest,
    ) -> Result<User, String> {
        self.request.start();
        let result = api.update_current_user(update).await;
        let user = self.request.settle(result, "Failed to update user")?;
        self.current_user = Some(user.clone());
        Ok(user)
    }

    pub async fn fetch_all_users(&mut self, api: &ApiClient, page: u32, size: u32) -> Result<(), String> {
        self.request.start();
        let result = api.get_all_users(page, size).await;
        let page = self.request.settle(result, "Failed to fetch users")?;
        self.pagination = Pagination::from_page(&page);
        self.users = page.content;
        Ok(())
    }

    pub async fn fetch_user_by_id(&mut self, api: &ApiClient, id: i64) -> Result<User, String> {
        self.request.start();
        let result = api.get_user_by_id(id).await;
        let user = self.request.settle(result, "Failed to fetch user")?;
        self.current_user = Some(user.clone());
        Ok(user)
    }

    pub async fn update_user(
        &mut self,
        api: &ApiClient,
        id: i64,
        update: &UserUpdateRequest,
    ) -> Result<User, String> {
        self.request.start();
        let result = api.update_user(id, update).await;
        let user = self.request.settle(result, "Failed to update user")?;
        replace_by_id(&mut self.users, &user, |u| u.id);
        self.current_user = Some(user.clone());
        Ok(user)
    }

    pub async fn delete_user(&mut self, api: &ApiClient, id: i64) -> Result<(), String> {
        self.request.start();
        let result = api.delete_user(id).await;
        self.request.settle(result, "Failed to delete user")?;
        self.users.retain(|user| user.id != Some(id));
        if self
            .current_user
            .as_ref()
            .is_some_and(|user| user.id == Some(id))
        {
            self.current_user = None;
        }
        Ok(())
    }

    pub fn clear_current_user(&mut self) {
        self.current_user = None;
    }
}
