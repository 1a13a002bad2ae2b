use secrecy::{ExposeSecret, SecretString};

/// The caller on whose behalf a workspace environment is resolved.
///
/// Produced by the authentication layer and passed by reference through the
/// resolver. Only the variant that carries a field exposes it: a guessed
/// subject has no bearer token, an anonymous one has nothing at all.
#[derive(Debug, Clone)]
pub enum Subject {
    /// A caller that presented a real bearer token.
    Authenticated(AuthenticatedSubject),
    /// A caller whose identity and namespace were inferred without a
    /// directory lookup.
    Guessed(GuessedSubject),
    /// The anonymous sentinel. Never allowed to resolve an environment.
    Anonymous,
}

impl Subject {
    /// Create an authenticated subject.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self::Authenticated(AuthenticatedSubject::new(user_id, token))
    }

    /// Create a guessed subject.
    #[must_use]
    pub fn guessed(user_id: Option<String>, namespace: impl Into<String>) -> Self {
        Self::Guessed(GuessedSubject::new(user_id, namespace))
    }

    /// The anonymous sentinel.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// User identifier, if the variant carries one.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated(s) => Some(s.user_id()),
            Self::Guessed(s) => s.user_id(),
            Self::Anonymous => None,
        }
    }

    /// Bearer token of a directly authenticated caller.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&SecretString> {
        match self {
            Self::Authenticated(s) => Some(s.token()),
            Self::Guessed(_) | Self::Anonymous => None,
        }
    }
}

/// Identity of a caller authenticated with its own bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject {
    user_id: String,
    /// Wrapped in `SecretString` so `Debug` redacts the value.
    token: SecretString,
}

impl AuthenticatedSubject {
    #[must_use]
    pub fn new(user_id: impl Into<String>, token: impl Into<SecretString>) -> Self {
        Self {
            user_id: user_id.into(),
            token: token.into(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Whether the presented token is an empty string.
    #[must_use]
    pub fn has_empty_token(&self) -> bool {
        self.token.expose_secret().is_empty()
    }
}

/// Identity inferred from request context rather than a directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessedSubject {
    user_id: Option<String>,
    namespace: String,
}

impl GuessedSubject {
    #[must_use]
    pub fn new(user_id: Option<String>, namespace: impl Into<String>) -> Self {
        Self {
            user_id,
            namespace: namespace.into(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Namespace inferred for this caller.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}
