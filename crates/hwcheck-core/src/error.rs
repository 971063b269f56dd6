//! Error types for hwcheck-core

use std::fmt;

/// Result type alias for hwcheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of a single call to the language model.
///
/// Callers only ever see extracted text or one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// No API key was configured for the model service
    #[error("GEMINI_API_KEY environment variable not set")]
    MissingApiKey,

    /// The request never produced an HTTP response
    #[error("model request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("model API returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },

    /// The response decoded but carried no usable text
    #[error("model returned an empty response")]
    EmptyResponse,

    /// The response body could not be decoded
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// Main error type for hwcheck operations
///
/// Every variant is fatal: the CLI logs it, emits an `::error::` annotation
/// and exits with status 1.
#[derive(Debug)]
pub enum Error {
    /// Invalid or missing configuration (environment variables, arguments)
    Config(String),

    /// I/O error
    Io(std::io::Error),

    /// GitHub event parsing error
    EventParse(String),

    /// HTTP/API error talking to GitHub
    Http(String),

    /// Language model call failed
    Model(CompletionError),

    /// Pattern compilation error
    Pattern(String),

    /// Changed files span more than one language
    MixedLanguages(String),

    /// Entry point could not be determined
    EntryPoint(String),

    /// Homework instructions could not be loaded
    Instructions(String),

    /// Generated test cases could not be decoded
    TestGeneration(String),

    /// Student code failed to compile
    Compile(String),

    /// Runtime error (Tokio, process spawning, etc.)
    Runtime(String),

}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::EventParse(msg) => write!(f, "Event parse error: {}", msg),
            Error::Http(msg) => write!(f, "HTTP error: {}", msg),
            Error::Model(err) => write!(f, "Model error: {}", err),
            Error::Pattern(msg) => write!(f, "Pattern error: {}", msg),
            Error::MixedLanguages(msg) => write!(f, "Mixed language push: {}", msg),
            Error::EntryPoint(msg) => write!(f, "Entry point error: {}", msg),
            Error::Instructions(msg) => write!(f, "Instructions error: {}", msg),
            Error::TestGeneration(msg) => write!(f, "Test generation error: {}", msg),
            Error::Compile(msg) => write!(f, "Compilation failed: {}", msg),
            Error::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<CompletionError> for Error {
    fn from(err: CompletionError) -> Self {
        Error::Model(err)
    }
}

impl From<globset::Error> for Error {
    fn from(err: globset::Error) -> Self {
        Error::Pattern(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

/// Fieldless error category for zero-cost pattern matching.
///
/// Single byte representation (`#[repr(u8)]`), `Copy`, no allocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Configuration error
    Config,
    /// I/O operation error
    Io,
    /// GitHub event parsing error
    EventParse,
    /// HTTP/API error
    Http,
    /// Language model error
    Model,
    /// Pattern compilation error
    Pattern,
    /// Mixed language push
    MixedLanguages,
    /// Entry point resolution error
    EntryPoint,
    /// Instructions loading error
    Instructions,
    /// Test case generation error
    TestGeneration,
    /// Compilation error
    Compile,
    /// Runtime error
    Runtime,
}

impl Error {
    /// Get the error kind, zero allocation.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::EventParse(_) => ErrorKind::EventParse,
            Error::Http(_) => ErrorKind::Http,
            Error::Model(_) => ErrorKind::Model,
            Error::Pattern(_) => ErrorKind::Pattern,
            Error::MixedLanguages(_) => ErrorKind::MixedLanguages,
            Error::EntryPoint(_) => ErrorKind::EntryPoint,
            Error::Instructions(_) => ErrorKind::Instructions,
            Error::TestGeneration(_) => ErrorKind::TestGeneration,
            Error::Compile(_) => ErrorKind::Compile,
            Error::Runtime(_) => ErrorKind::Runtime,
        }
    }

    /// Borrow the error message, zero allocation.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Config(msg)
            | Error::EventParse(msg)
            | Error::Http(msg)
            | Error::Pattern(msg)
            | Error::MixedLanguages(msg)
            | Error::EntryPoint(msg)
            | Error::Instructions(msg)
            | Error::TestGeneration(msg)
            | Error::Compile(msg)
            | Error::Runtime(msg) => msg,
            Error::Io(_) => "I/O error",
            Error::Model(_) => "model error",
        }
    }
}
