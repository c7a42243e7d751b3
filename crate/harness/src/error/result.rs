use crate::error::HarnessError;

pub type HarnessResult<R> = Result<R, HarnessError>;

pub trait HarnessResultHelper<T> {
    /// Turn any failure into a corpus error prefixed by `context`.
    fn context(self, context: &str) -> HarnessResult<T>;
}

impl<T, E> HarnessResultHelper<T> for Result<T, E>
where
    E: std::error::Error,
{
    fn context(self, context: &str) -> HarnessResult<T> {
        self.map_err(|e| HarnessError::Corpus(format!("{context}: {e}")))
    }
}

impl<T> HarnessResultHelper<T> for Option<T> {
    fn context(self, context: &str) -> HarnessResult<T> {
        self.ok_or_else(|| HarnessError::Corpus(context.to_owned()))
    }
}
