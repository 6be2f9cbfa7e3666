//! Request result states.

use crate::{Error, Result};

/// The state of a request that produces a value.
///
/// A request starts [`Outcome::Pending`] and moves once to either
/// [`Outcome::Succeeded`] or [`Outcome::Failed`]; both are terminal.
///
/// ```
/// use coax_core::{Error, Outcome};
///
/// let outcome: Outcome<u32> = Ok(2).into();
/// assert_eq!(outcome.map(|n| n * 2).value(), Some(&4));
///
/// let failed: Outcome<u32> = Err(Error::Serialization).into();
/// assert!(failed.is_terminal());
/// assert!(!failed.is_succeeded());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Outcome<T> {
    /// Not resolved yet.
    #[default]
    Pending,
    /// Resolved with a value.
    Succeeded(T),
    /// Resolved with an error.
    Failed(Error),
}

impl<T> Outcome<T> {
    /// Returns `true` if not resolved yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if resolved with a value.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Returns `true` if resolved with an error.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns `true` once resolved.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// The value, if succeeded.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// The error, if failed.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Consume into the value, if succeeded.
    #[must_use]
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the value.
    #[must_use]
    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Self::Pending => Outcome::Pending,
            Self::Succeeded(value) => Outcome::Succeeded(value),
            Self::Failed(err) => Outcome::Failed(err.clone()),
        }
    }

    /// Transform the value; pending and failed outcomes are kept as-is.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Pending => Outcome::Pending,
            Self::Succeeded(value) => Outcome::Succeeded(f(value)),
            Self::Failed(err) => Outcome::Failed(err),
        }
    }

    /// Forget the value.
    #[must_use]
    pub fn effect(self) -> Effect {
        match self {
            Self::Pending => Effect::Pending,
            Self::Succeeded(_) => Effect::Succeeded,
            Self::Failed(err) => Effect::Failed(err),
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// Project each element of a succeeded list; empty otherwise.
    ///
    /// ```
    /// use coax_core::Outcome;
    ///
    /// let names = Outcome::Succeeded(vec![1, 2]).map_each(|n| n.to_string());
    /// assert_eq!(names, ["1", "2"]);
    /// assert!(Outcome::<Vec<u8>>::Pending.map_each(|n| n).is_empty());
    /// ```
    #[must_use]
    pub fn map_each<U>(self, f: impl FnMut(T) -> U) -> Vec<U> {
        match self {
            Self::Succeeded(values) => values.into_iter().map(f).collect(),
            _ => Vec::new(),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Succeeded(value),
            Err(err) => Self::Failed(err),
        }
    }
}

/// The state of a request whose success carries no value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Effect {
    /// Not resolved yet.
    #[default]
    Pending,
    /// Resolved successfully.
    Succeeded,
    /// Resolved with an error.
    Failed(Error),
}

impl Effect {
    /// Returns `true` if not resolved yet.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` if resolved successfully.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns `true` if resolved with an error.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Returns `true` once resolved.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    /// The error, if failed.
    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Result<()>> for Effect {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Succeeded,
            Err(err) => Self::Failed(err),
        }
    }
}
