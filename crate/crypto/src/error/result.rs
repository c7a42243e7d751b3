use crate::error::CryptoError;

pub type CryptoResult<R> = Result<R, CryptoError>;

pub trait CryptoResultHelper<T> {
    fn context(self, context: &str) -> CryptoResult<T>;

    /// Same as `context` but classifies the failure as malformed key material.
    fn data_context(self, context: &str) -> CryptoResult<T>;
}

impl<T, E> CryptoResultHelper<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context(self, context: &str) -> CryptoResult<T> {
        self.map_err(|e| CryptoError::Default(format!("{context}: {e}")))
    }

    fn data_context(self, context: &str) -> CryptoResult<T> {
        self.map_err(|e| CryptoError::Data(format!("{context}: {e}")))
    }
}

impl<T> CryptoResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> CryptoResult<T> {
        self.ok_or_else(|| CryptoError::Default(context.to_owned()))
    }

    fn data_context(self, context: &str) -> CryptoResult<T> {
        self.ok_or_else(|| CryptoError::Data(context.to_owned()))
    }
}
