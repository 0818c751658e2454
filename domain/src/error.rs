use thiserror::Error;

/// Failures raised by the session itself, as opposed to transport errors
/// bubbling up from a service.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Failed to get a valid response from the completion service")]
    InvalidResponse,

    #[error("A completion request is already in flight for this session")]
    Busy,
}
