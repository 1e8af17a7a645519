//! `Outcome` - the success/failure value every repository call returns.

use anyhow::Error;

/// Result of a repository operation, delivered as data.
///
/// Exactly two cases: a value, or the error that prevented it. Callers
/// inspect the case instead of handling errors, and observable streams
/// keep running after emitting a `Failure`.
#[derive(Debug)]
pub enum Outcome<T> {
    /// The operation produced a value.
    Success(T),
    /// The operation failed with this cause.
    Failure(Error),
}

impl<T> Outcome<T> {
    /// Returns `true` for [`Outcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` for [`Outcome::Failure`].
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Consumes the outcome, keeping only a successful value.
    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Borrows the successful value, if any.
    #[must_use]
    pub const fn as_success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Borrows the failure cause, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&Error> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    /// Maps the successful value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(err) => Outcome::Failure(err),
        }
    }

    /// Converts back into `anyhow::Result` for `?`-style callers.
    ///
    /// # Errors
    ///
    /// Returns the failure cause for [`Outcome::Failure`].
    pub fn into_result(self) -> anyhow::Result<T> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(err) => Err(err),
        }
    }
}

impl<T> From<anyhow::Result<T>> for Outcome<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Failure(err),
        }
    }
}

/// Collapses per-item outcomes into one, first failure wins.
///
/// Folds left to right in input order: the first `Failure` encountered is
/// returned and every other item is discarded; otherwise all values are
/// returned in input order.
pub fn reduce_failures_or_success<T, I>(outcomes: I) -> Outcome<Vec<T>>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    let iter = outcomes.into_iter();
    let mut values = Vec::with_capacity(iter.size_hint().0);
    for outcome in iter {
        match outcome {
            Outcome::Success(value) => values.push(value),
            Outcome::Failure(err) => return Outcome::Failure(err),
        }
    }
    Outcome::Success(values)
}
