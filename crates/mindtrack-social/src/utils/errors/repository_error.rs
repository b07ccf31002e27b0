use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("An error occurred while accessing the database")]
    Database(#[from] sqlx::Error),

    /// An edge endpoint did not exist when the write was attempted.
    #[error("User {0} does not exist")]
    MissingUser(Uuid),

    /// Login and email are unique across the directory.
    #[error("A user with this {field} already exists")]
    DuplicateUser { field: &'static str },

    /// The commit itself failed; the write may or may not have landed.
    #[error("Transaction commit failed: {0}")]
    Aborted(sqlx::Error),
}
