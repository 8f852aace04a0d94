use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(rename = "_csrf")]
    pub csrf: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct LogoutForm {
    #[serde(rename = "_csrf")]
    pub csrf: Option<String>,
}

/// `/login?error` after a failed attempt, `/login?logout` after signing out.
#[derive(Debug, Deserialize, Default)]
pub struct LoginPageQuery {
    pub error: Option<String>,
    pub logout: Option<String>,
}
