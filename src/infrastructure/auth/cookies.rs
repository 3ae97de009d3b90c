//! HTTP-only cookie transport for token pairs

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use super::jwt::TokenPair;

pub const DEFAULT_ACCESS_COOKIE: &str = "access_token";
pub const DEFAULT_REFRESH_COOKIE: &str = "refresh_token";
const COOKIE_PATH: &str = "/";

/// Attributes applied to every auth cookie
#[derive(Debug, Clone, PartialEq)]
pub struct CookiePolicy {
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    pub access_max_age: Duration,
    pub refresh_max_age: Duration,
    /// Set the `Secure` attribute; off only in debug deployments
    pub secure: bool,
}

impl CookiePolicy {
    pub fn new(access_token_minutes: i64, refresh_token_days: i64, debug: bool) -> Self {
        Self {
            access_cookie_name: DEFAULT_ACCESS_COOKIE.to_string(),
            refresh_cookie_name: DEFAULT_REFRESH_COOKIE.to_string(),
            access_max_age: Duration::minutes(access_token_minutes),
            refresh_max_age: Duration::days(refresh_token_days),
            secure: !debug,
        }
    }

    pub fn with_cookie_names(
        mut self,
        access_cookie_name: impl Into<String>,
        refresh_cookie_name: impl Into<String>,
    ) -> Self {
        self.access_cookie_name = access_cookie_name.into();
        self.refresh_cookie_name = refresh_cookie_name.into();
        self
    }
}

/// Adds and removes the auth cookies on outgoing responses
#[derive(Debug, Clone)]
pub struct CookieManager {
    policy: CookiePolicy,
}

impl CookieManager {
    pub fn new(policy: CookiePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CookiePolicy {
        &self.policy
    }

    /// Set both token cookies
    pub fn attach(&self, jar: CookieJar, tokens: &TokenPair) -> CookieJar {
        jar.add(self.build(
            &self.policy.access_cookie_name,
            tokens.access_token.clone(),
            self.policy.access_max_age,
        ))
        .add(self.build(
            &self.policy.refresh_cookie_name,
            tokens.refresh_token.clone(),
            self.policy.refresh_max_age,
        ))
    }

    /// Set only the access cookie; any refresh cookie is left alone
    pub fn attach_access_only(&self, jar: CookieJar, access_token: &str) -> CookieJar {
        jar.add(self.build(
            &self.policy.access_cookie_name,
            access_token.to_string(),
            self.policy.access_max_age,
        ))
    }

    /// Expire both cookies.
    ///
    /// Removal cookies are always emitted, with the same path and same-site
    /// attributes as at set-time, whether or not the request carried them.
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal(&self.policy.access_cookie_name))
            .add(self.removal(&self.policy.refresh_cookie_name))
    }

    /// Read the refresh token from the request cookies
    pub fn refresh_token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.policy.refresh_cookie_name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn build(&self, name: &str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name.to_string(), value))
            .http_only(true)
            .secure(self.policy.secure)
            .same_site(SameSite::Lax)
            .path(COOKIE_PATH)
            .max_age(max_age)
            .build()
    }

    fn removal(&self, name: &str) -> Cookie<'static> {
        Cookie::build((name.to_string(), String::new()))
            .http_only(true)
            .secure(self.policy.secure)
            .same_site(SameSite::Lax)
            .path(COOKIE_PATH)
            .max_age(Duration::ZERO)
            .expires(time::OffsetDateTime::UNIX_EPOCH)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    fn manager(debug: bool) -> CookieManager {
        CookieManager::new(CookiePolicy::new(15, 7, debug))
    }

    fn tokens() -> TokenPair {
        TokenPair {
            access_token: "access.jwt".to_string(),
            refresh_token: "refresh.jwt".to_string(),
        }
    }

    #[test]
    fn test_policy_defaults() {
        let policy = CookiePolicy::new(15, 7, false);

        assert_eq!(policy.access_cookie_name, "access_token");
        assert_eq!(policy.refresh_cookie_name, "refresh_token");
        assert_eq!(policy.access_max_age.whole_seconds(), 900);
        assert_eq!(policy.refresh_max_age.whole_seconds(), 604_800);
        assert!(policy.secure);
        assert!(!CookiePolicy::new(15, 7, true).secure);
    }

    #[test]
    fn test_attach_sets_both_cookies() {
        let jar = manager(false).attach(CookieJar::new(), &tokens());

        let access = jar.get("access_token").unwrap();
        assert_eq!(access.value(), "access.jwt");
        assert_eq!(access.http_only(), Some(true));
        assert_eq!(access.secure(), Some(true));
        assert_eq!(access.same_site(), Some(SameSite::Lax));
        assert_eq!(access.path(), Some("/"));
        assert_eq!(access.max_age(), Some(Duration::minutes(15)));

        let refresh = jar.get("refresh_token").unwrap();
        assert_eq!(refresh.value(), "refresh.jwt");
        assert_eq!(refresh.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_debug_cookies_are_not_secure() {
        let jar = manager(true).attach(CookieJar::new(), &tokens());
        assert_eq!(jar.get("access_token").unwrap().secure(), Some(false));
    }

    #[test]
    fn test_attach_access_only_keeps_refresh_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("refresh_token=old.refresh"),
        );
        let jar = CookieJar::from_headers(&headers);

        let jar = manager(false).attach_access_only(jar, "new.access");

        assert_eq!(jar.get("access_token").unwrap().value(), "new.access");
        assert_eq!(jar.get("refresh_token").unwrap().value(), "old.refresh");
        assert_eq!(jar.iter().count(), 2);
    }

    #[test]
    fn test_clear_emits_removal_cookies_without_request_cookies() {
        let jar = manager(false).clear(CookieJar::new());

        for name in ["access_token", "refresh_token"] {
            let cookie = jar.get(name).unwrap();
            assert_eq!(cookie.value(), "");
            assert_eq!(cookie.max_age(), Some(Duration::ZERO));
            assert_eq!(cookie.path(), Some("/"));
            assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        }
    }

    #[test]
    fn test_refresh_token_lookup() {
        let manager = manager(false);
        assert_eq!(manager.refresh_token(&CookieJar::new()), None);

        let jar = manager.attach(CookieJar::new(), &tokens());
        assert_eq!(manager.refresh_token(&jar), Some("refresh.jwt".to_string()));
    }
}
