use thiserror::Error;

/// The three failure kinds that surface to callers.
///
/// Every failure is terminal and side-effect free: a rejected operation has
/// consumed no message id and emitted no notification. Internal invariant
/// violations (say, a message id indexed but missing from its container) are
/// not represented here; those panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The session token did not resolve to a user. Always checked first.
    #[error("invalid session token")]
    Unauthorized,

    /// Valid identity, insufficient membership or ownership.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Malformed input: bad id, out-of-range length, duplicate reaction,
    /// already-pinned, past fire time.
    #[error("bad request: {0}")]
    BadRequest(&'static str),
}

pub type CoreResult<T> = Result<T, CoreError>;
