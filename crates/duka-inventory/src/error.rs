//! Error types for catalogue generation
//!
//! Generation has exactly one recovery policy (substitute the fallback
//! catalogue), so these errors mostly exist to be logged and tested.

/// Transport-level failures talking to the content API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// No API key configured
    #[error("no API credential configured")]
    MissingCredential,

    /// HTTP client could not be built
    #[error("client build failed: {0}")]
    Build(String),

    /// Request could not be sent or timed out
    #[error("http request failed: {0}")]
    Http(String),

    /// Non-success status
    #[error("http status {code}: {message}")]
    HttpStatus { code: u16, message: String },

    /// Response envelope could not be decoded
    #[error("decode response failed: {0}")]
    Decode(String),

    /// Response had no candidate text
    #[error("reply carried no candidate text")]
    EmptyCandidate,
}

/// Catalogue generation failures
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Content request failed
    #[error("content request failed: {0}")]
    Client(#[from] ClientError),

    /// Reply text is not JSON
    #[error("reply is not valid JSON: {0}")]
    Parse(String),

    /// Reply is JSON but not the declared shape
    #[error("reply does not match schema: {0}")]
    SchemaMismatch(String),

    /// Reply schema could not be compiled
    #[error("schema compilation failed: {0}")]
    Schema(String),
}

impl GenerationError {
    /// Whether the failure happened before a reply was received
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}
