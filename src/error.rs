use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Collection {0} has no items container ([data-collection-container])")]
    MissingContainer(String),

    #[error("Collection {0} has no item template (<template>)")]
    MissingTemplate(String),

    #[error("Item template of collection {0} does not contain any element")]
    EmptyTemplate(String),

    #[error("Node is not an element: {0}")]
    NotAnElement(String),

    #[error("No collection at index {index} ({count} collections on the page)")]
    NoSuchCollection { index: usize, count: usize },

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
