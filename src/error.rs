use thiserror::Error;

/// Failures building an [`OwnerDirectory`](crate::owners::OwnerDirectory) from tables.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("owner table has an empty name")]
    EmptyOwner,
    #[error("team table entry {team:?} maps to an empty owner")]
    EmptyTeamOwner { team: String },
    #[error("invalid owner pattern for {owner:?}: {source}")]
    Pattern {
        owner: String,
        #[source]
        source: regex::Error,
    },
}
