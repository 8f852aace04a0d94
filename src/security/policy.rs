/// Paths reachable without credentials and exempt from CSRF checks.
pub const PUBLIC_URIS: [&str; 4] = ["/messages", "/messages/**", "/actuator", "/actuator/**"];

/// Form login endpoints. Reachable without credentials, but their handlers
/// still check the CSRF token.
pub const LOGIN_URIS: [&str; 2] = ["/login", "/logout"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    /// `base/**`: the base path itself and anything below it.
    Subtree(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(base) => PathPattern::Subtree(base.to_string()),
            None => PathPattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Subtree(base) => match path.strip_prefix(base.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/'),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct AccessPolicy {
    public: Vec<PathPattern>,
    login: Vec<PathPattern>,
}

impl AccessPolicy {
    pub fn new<'a, I>(patterns: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            public: patterns.into_iter().map(PathPattern::parse).collect(),
            login: LOGIN_URIS.into_iter().map(PathPattern::parse).collect(),
        }
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public.iter().any(|pattern| pattern.matches(path))
    }

    pub fn is_login_path(&self, path: &str) -> bool {
        self.login.iter().any(|pattern| pattern.matches(path))
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(PUBLIC_URIS)
    }
}

/// False for paths whose meaning would change under normalisation: `.` or
/// `..` segments, empty segments, backslashes, or encoded dots and slashes.
/// Matching such a path against the allow-list is not meaningful.
pub fn is_normalized(path: &str) -> bool {
    let lowered = path.to_ascii_lowercase();
    if ["%2e", "%2f", "%5c", "\\"]
        .iter()
        .any(|needle| lowered.contains(needle))
    {
        return false;
    }

    let segments: Vec<&str> = path.split('/').skip(1).collect();
    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .all(|(index, segment)| match *segment {
            "." | ".." => false,
            // a single trailing slash is fine, `//` is not
            "" => index == last,
            _ => true,
        })
}
