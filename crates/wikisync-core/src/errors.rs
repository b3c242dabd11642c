use thiserror::Error;

/// Result type alias using SyncError
pub type Result<T> = std::result::Result<T, SyncError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure the sync engine can observe maps to one of these kinds.
/// None of them is fatal to the host: each degrades to "try again next
/// cycle". The stable code is what ends up in structured log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncErrorKind {
    // Readiness
    /// Host is not in a syncable state (not logged in, no local player)
    NotReady,
    /// The host's main context is gone and can no longer run reads
    HostUnavailable,

    // Manifest
    /// Network failure or non-2xx status while fetching the manifest
    ManifestFetch,
    /// Manifest bytes are not valid UTF-8 JSON, or a list has the wrong type
    InvalidManifest,
    /// A required manifest list (`varbits`, `varps`) is absent
    MissingField,

    // Submission
    /// The collector could not be reached
    Transport,
    /// A request exceeded its timeout
    Timeout,
    /// The collector answered with a non-2xx status
    ServerRejected,

    // Local
    Serialization,
    InvalidConfig,
    Io,

    // Internal
    Internal,
}

impl SyncErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            SyncErrorKind::NotReady => "ERR_NOT_READY",
            SyncErrorKind::HostUnavailable => "ERR_HOST_UNAVAILABLE",
            SyncErrorKind::ManifestFetch => "ERR_MANIFEST_FETCH",
            SyncErrorKind::InvalidManifest => "ERR_INVALID_MANIFEST",
            SyncErrorKind::MissingField => "ERR_MISSING_FIELD",
            SyncErrorKind::Transport => "ERR_TRANSPORT",
            SyncErrorKind::Timeout => "ERR_TIMEOUT",
            SyncErrorKind::ServerRejected => "ERR_SERVER_REJECTED",
            SyncErrorKind::Serialization => "ERR_SERIALIZATION",
            SyncErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            SyncErrorKind::Io => "ERR_IO",
            SyncErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification used for programmatic handling plus enough
/// context (operation, profile, HTTP status) to make a log line useful.
#[derive(Debug, Clone)]
pub struct SyncError {
    kind: SyncErrorKind,
    op: Option<String>,
    profile: Option<String>,
    status: Option<u16>,
    message: String,
}

impl SyncError {
    /// Create a new error with the specified kind
    pub fn new(kind: SyncErrorKind) -> Self {
        Self {
            kind,
            op: None,
            profile: None,
            status: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add profile context (display form of a `ProfileKey`)
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Add the HTTP status the remote answered with
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> SyncErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {})", status)?;
        }
        if let Some(profile) = &self.profile {
            write!(f, " (profile: {})", profile)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyncError {}

// ========== End Error Facility ==========

/// Errors raised while loading or validating a `SyncConfig`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl From<ConfigError> for SyncError {
    fn from(err: ConfigError) -> Self {
        let kind = match &err {
            ConfigError::Read { .. } => SyncErrorKind::Io,
            ConfigError::Parse(_) | ConfigError::Invalid { .. } => SyncErrorKind::InvalidConfig,
        };
        SyncError::new(kind)
            .with_op("load_config")
            .with_message(err.to_string())
    }
}
