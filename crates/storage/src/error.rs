/// Errors from the object store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The request never got a response.
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store answered with a non-success status. `message` is the
    /// store's own error text when it sent one.
    #[error("{message}")]
    Rejected { status: u16, message: String },
}
