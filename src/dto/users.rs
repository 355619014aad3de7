use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Full name is required"))]
    pub full_name: Option<String>,
    #[validate(custom(function = "crate::validation::validate_phone", message = "Phone number must be 10 digits"))]
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(custom(function = "crate::validation::not_blank", message = "Full name is required"))]
    pub full_name: Option<String>,
    #[validate(custom(function = "crate::validation::validate_phone", message = "Phone number must be 10 digits"))]
    pub phone: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserList {
    pub items: Vec<User>,
}
