#[derive(Debug, Clone, PartialEq)]
pub enum CartError {
    StorageFailure(String),
    NotProvided,
}

impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartError::StorageFailure(msg) => {
                write!(f, "Cart storage failure: {}", msg)
            }
            CartError::NotProvided => {
                write!(f, "Cart must be used within a provisioned provider")
            }
        }
    }
}

impl std::error::Error for CartError {}

pub type CartResult<T> = Result<T, CartError>;
