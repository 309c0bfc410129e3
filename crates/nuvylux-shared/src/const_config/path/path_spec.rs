use reqwest::Method;
use std::borrow::Cow;

/// An endpoint on the backend together with the HTTP method used to call it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: Cow<'static, str>,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path: Cow::Borrowed(path),
            method: Method::POST,
        }
    }

    /// For endpoints only known at runtime (For example marketplace resources
    /// with an id in the path)
    pub fn new<S: Into<String>>(method: Method, path: S) -> Self {
        Self {
            path: Cow::Owned(path.into()),
            method,
        }
    }
}

impl std::fmt::Display for PathSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}
