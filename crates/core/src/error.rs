use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInputError {
    EmptySymbol,
    NoSymbolAnalyzed,
    InvalidQuantity,
}

impl fmt::Display for UserInputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            UserInputError::EmptySymbol => "Please enter a stock symbol",
            UserInputError::NoSymbolAnalyzed => "Please analyze a stock first",
            UserInputError::InvalidQuantity => "Please enter a valid quantity",
        };
        f.write_str(message)
    }
}

impl std::error::Error for UserInputError {}

/// The backend answered, but declined the request (`success: false`, `status != "success"`).
#[derive(Debug, Clone)]
pub struct BusinessError {
    pub operation: &'static str,
    pub message: String,
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rejected: {}", self.operation, self.message)
    }
}

impl std::error::Error for BusinessError {}
