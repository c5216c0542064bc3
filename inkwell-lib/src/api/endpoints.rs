//! Endpoint paths, relative to the API base URL.

pub mod auth {
    pub fn login() -> &'static str {
        "/v1/auth/login"
    }

    pub fn refresh() -> &'static str {
        "/v1/auth/refresh"
    }

    pub fn logout() -> &'static str {
        "/v1/auth/logout"
    }
}

pub fn me() -> &'static str {
    "/v1/me"
}

pub mod users {
    /// One-based page of the user list.
    pub fn list(page: u32) -> String {
        format!("/v1/users?page={}", page)
    }

    pub fn by_id(id: &str) -> String {
        format!("/v1/users/{}", urlencoding::encode(id))
    }

    pub fn create() -> &'static str {
        "/v1/users"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        assert_eq!(auth::login(), "/v1/auth/login");
        assert_eq!(users::list(1), "/v1/users?page=1");
        assert_eq!(users::by_id("a b"), "/v1/users/a%20b");
    }
}
