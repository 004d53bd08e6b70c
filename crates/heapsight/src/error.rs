use std::fmt;

/// Error type for snapshot ingest.
///
/// This is the only error surface of the crate: once a [`Step`](crate::Step)
/// exists, every downstream stage degrades to a weaker rendering instead of
/// failing, so a single bad snapshot can never break a replay session.
#[derive(Debug)]
pub enum SnapshotError {
    /// The tracer's JSON did not parse into the step schema.
    Json(serde_json::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(error) => write!(f, "snapshot parse error: {error}"),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(error) => Some(error),
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error)
    }
}
