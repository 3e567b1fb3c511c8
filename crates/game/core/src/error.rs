//! Common error infrastructure for game-core.
//!
//! Domain-specific errors (`MoveError`, `AttackError`, `DuelError`, ...) live
//! next to the operations they guard. This module only provides the shared
//! severity classification they all report through [`GameError`].
//!
//! # Severity mapping
//!
//! - Turn-rule rejections are shown to the player and leave state untouched.
//! - Snapshot problems abort session setup entirely.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: may succeed later without the player changing anything
///   (a blocked tile can clear up)
/// - **Validation**: the request itself is not allowed in the current phase
/// - **Internal**: unexpected state inconsistency
/// - **Fatal**: the session cannot start or continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error must abort the surrounding session.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }
}

/// Common trait for all game-core errors.
///
/// Gives session layers a uniform way to decide whether an error becomes a
/// user-facing message or tears the session down.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
