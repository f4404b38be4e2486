use std::error::Error;
use std::fmt;

/// Error type used by external collaborators (host console, image snapshotter).
pub type CollaboratorError = Box<dyn Error + Send + Sync + 'static>;

#[derive(Debug)]
pub enum TraceError {
    /// The target already has a member under the interceptor's private alias.
    InstrumentationNameCollision { member: String, alias: String },
    /// `end` was called on a session that had already ended.
    DoubleEndSession,
    /// `trace` was requested while the session was still recording.
    SessionStillRunning,
    /// A snapshot was requested before the canonical key list was discovered.
    MissingCanonicalKeys,
    /// A call named a member the target does not have.
    UnknownMember { name: String },
    /// The host console or image snapshotter failed.
    Collaborator(CollaboratorError),
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstrumentationNameCollision { member, alias } => write!(
                f,
                "cannot instrument `{member}`: target already has a member named `{alias}`"
            ),
            Self::DoubleEndSession => write!(f, "profiling session has already ended"),
            Self::SessionStillRunning => {
                write!(f, "profiling session is still running; end it before reading the trace")
            }
            Self::MissingCanonicalKeys => write!(
                f,
                "invariant violated: state snapshot taken before canonical keys were discovered"
            ),
            Self::UnknownMember { name } => write!(f, "`{name}` is not a function"),
            Self::Collaborator(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TraceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Collaborator(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<CollaboratorError> for TraceError {
    fn from(err: CollaboratorError) -> Self {
        Self::Collaborator(err)
    }
}
