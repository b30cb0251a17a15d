use shared::{LoginRequest, RegisterRequest};

use crate::app::Dashboard;
use crate::router::Route;
use crate::views::report_invalid;
use crate::views::validation::{required, ValidationError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        Ok(LoginRequest {
            email: required("Email", &self.email)?,
            password: required("Password", &self.password)?,
        })
    }

    /// Log in and land on the role's home page
    pub async fn submit(&self, dashboard: &mut Dashboard) -> Result<Route, String> {
        let request = self
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard.store.auth.login(&dashboard.api, &request).await {
            Ok(_) => {
                let home = dashboard.home();
                dashboard.navigate(&home.path());
                dashboard.toaster.success("Login Successful", "Welcome back!");
                Ok(home)
            }
            Err(error) => {
                dashboard.toaster.error("Login Failed", error.clone());
                Err(error)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        Ok(RegisterRequest {
            name: required("Name", &self.name)?,
            email: required("Email", &self.email)?,
            phone: required("Phone", &self.phone)?,
            password: required("Password", &self.password)?,
            role: None,
        })
    }

    pub async fn submit(&self, dashboard: &mut Dashboard) -> Result<Route, String> {
        let request = self
            .validate()
            .map_err(|e| report_invalid(&mut dashboard.toaster, &e))?;

        match dashboard.store.auth.register(&dashboard.api, &request).await {
            Ok(_) => {
                let home = dashboard.home();
                dashboard.navigate(&home.path());
                dashboard
                    .toaster
                    .success("Registration Successful", "Your account has been created.");
                Ok(home)
            }
            Err(error) => {
                dashboard.toaster.error("Registration Failed", error.clone());
                Err(error)
            }
        }
    }
}
