use serde::{ Deserialize, Serialize };

use crate::models::LoginEmployee;

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct LoginForm {
    #[serde(rename = "_token")]
    pub token: Option<String>,
    pub code: String,
    pub password: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct TokenForm {
    #[serde(rename = "_token")]
    pub token: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct LoginContext {
    pub login_employee: Option<LoginEmployee>,
    pub flash: Option<String>,
    pub token: String,
    pub code: String,
    pub errors: Vec<String>,
}

#[derive(Serialize, Debug)]
pub struct LogoutContext {
    pub login_employee: Option<LoginEmployee>,
    pub token: String,
}
