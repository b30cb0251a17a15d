use shared::{User, UserUpdateRequest};

use crate::app::Dashboard;
use crate::views::report_invalid;
use crate::views::validation::{required, ValidationError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        }
    }

    /// Fetch `/users/me` and seed the form from it
    pub async fn load(dashboard: &mut Dashboard) -> Result<Self, String> {
        let user = dashboard
            .store
            .users
            .fetch_current_user(&dashboard.api)
            .await?;
        Ok(Self::from_user(&user))
    }

    pub fn validate(&self) -> Result<UserUpdateRequest, ValidationError> {
        Ok(UserUpdateRequest {
            name: Some(required("Name", &self.name)?),
            email: Some(required("Email", &self.email)?),
            phone: Some(required("Phone", &self.phone)?),
            enabled: None,
        })
    }

    pub async fn submit(&self, dashboard: &mut Dashboard) -> Result<User, String> {
        let update = self
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard
            .store
            .users
            .update_current_user(&dashboard.api, &update)
            .await
        {
            Ok(user) => {
                dashboard
                    .toaster
                    .success("Profile Updated", "Your profile has been updated successfully.");
                Ok(user)
            }
            Err(error) => {
                dashboard.toaster.error("Update Failed", error.clone());
                Err(error)
            }
        }
    }
}
