use std::num::TryFromIntError;

use thiserror::Error;

pub(crate) mod result;

/// Errors raised by the cryptography provider.
///
/// Each variant is an error kind the caller can match on: the verification
/// harness only tolerates [`CryptoError::InvalidAccess`] for signatures that
/// are not expected to be valid.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Conversion Error: {0}")]
    ConversionError(String),

    /// The key material is malformed or inconsistent with the requested algorithm.
    #[error("Data Error: {0}")]
    Data(String),

    #[error("{0}")]
    Default(String),

    /// The operation was refused before any computation: wrong key usage,
    /// algorithm mismatch or a signature whose length does not match the key.
    #[error("Invalid Access: {0}")]
    InvalidAccess(String),

    #[error("Not Supported: {0}")]
    NotSupported(String),

    #[error("OpenSSL Error: {0}")]
    OpenSSL(String),

    /// The request itself is ill-formed, e.g. a usage a public key cannot carry.
    #[error("Syntax Error: {0}")]
    Syntax(String),
}

impl CryptoError {
    /// Whether the provider refused the operation outright rather than computing a result.
    #[must_use]
    pub const fn is_invalid_access(&self) -> bool {
        matches!(self, Self::InvalidAccess(_))
    }
}

impl From<openssl::error::ErrorStack> for CryptoError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::OpenSSL(format!("Error: {e}. Details: {e:?}"))
    }
}

impl From<TryFromIntError> for CryptoError {
    fn from(e: TryFromIntError) -> Self {
        Self::ConversionError(e.to_string())
    }
}

impl From<base64::DecodeError> for CryptoError {
    fn from(e: base64::DecodeError) -> Self {
        Self::Data(format!("invalid base64url encoding: {e}"))
    }
}

/// Return early with an error if a condition is not satisfied.
///
/// This macro is equivalent to `if !$cond { return Err(From::from($err)); }`.
#[macro_export]
macro_rules! crypto_ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($crate::crypto_error!($msg));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err($err);
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return ::core::result::Result::Err($crate::crypto_error!($fmt, $($arg)*));
        }
    };
}

/// Construct a crypto error from a string.
#[macro_export]
macro_rules! crypto_error {
    ($msg:literal) => {
        $crate::CryptoError::Default(::core::format_args!($msg).to_string())
    };
    ($err:expr $(,)?) => ({
        $crate::CryptoError::Default($err.to_string())
    });
    ($fmt:expr, $($arg:tt)*) => {
        $crate::CryptoError::Default(::core::format_args!($fmt, $($arg)*).to_string())
    };
}

/// Return early with an error if a condition is not satisfied.
#[macro_export]
macro_rules! crypto_bail {
    ($msg:literal) => {
        return ::core::result::Result::Err($crate::crypto_error!($msg))
    };
    ($err:expr $(,)?) => {
        return ::core::result::Result::Err($err)
    };
    ($fmt:expr, $($arg:tt)*) => {
        return ::core::result::Result::Err($crate::crypto_error!($fmt, $($arg)*))
    };
}
