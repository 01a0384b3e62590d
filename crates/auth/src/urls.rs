//! Login/logout redirect URLs handed out by the identity provider.

/// Base URLs of the provider's login and logout endpoints.
///
/// Generated links carry the page to come back to in a `continue` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUrls {
    login_base: String,
    logout_base: String,
}

impl AuthUrls {
    pub fn new(login_base: impl Into<String>, logout_base: impl Into<String>) -> Self {
        Self {
            login_base: login_base.into(),
            logout_base: logout_base.into(),
        }
    }

    pub fn login_url(&self, return_to: &str) -> String {
        with_continue(&self.login_base, return_to)
    }

    pub fn logout_url(&self, return_to: &str) -> String {
        with_continue(&self.logout_base, return_to)
    }
}

fn with_continue(base: &str, return_to: &str) -> String {
    let sep = if base.contains('?') { '&' } else { '?' };
    format!("{base}{sep}continue={}", urlencoding::encode(return_to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn return_path_is_encoded() {
        let urls = AuthUrls::new("/_auth/login", "https://id.example/logout?app=hipnosis");
        assert_eq!(urls.login_url("/habit/3"), "/_auth/login?continue=%2Fhabit%2F3");
        assert_eq!(
            urls.logout_url("/"),
            "https://id.example/logout?app=hipnosis&continue=%2F"
        );
    }
}
