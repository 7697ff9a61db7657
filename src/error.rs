//! The error type for `chronology_rs`.

use alloc::borrow::Cow;
use core::fmt;

/// The error kind of a [`ChronoError`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A generic error, including a field resolution that fails to converge.
    #[default]
    Generic,
    /// A value was outside its valid range, or a date was invalid.
    Range,
    /// Two sources disagreed about the value of a field.
    Conflict,
    /// A field is not supported by the calendar system in use.
    Unsupported,
    /// A runtime registration (era or deviation table) was attempted twice.
    Registration,
    /// A configuration string could not be parsed.
    Syntax,
    /// An internal invariant was broken.
    Assert,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generic => "generic",
            Self::Range => "range",
            Self::Conflict => "conflict",
            Self::Unsupported => "unsupported",
            Self::Registration => "registration",
            Self::Syntax => "syntax",
            Self::Assert => "assert",
        })
    }
}

/// The error type of `chronology_rs`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChronoError {
    kind: ErrorKind,
    msg: Cow<'static, str>,
}

impl ChronoError {
    #[inline]
    #[must_use]
    const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            msg: Cow::Borrowed(""),
        }
    }

    /// Creates a generic error.
    #[inline]
    #[must_use]
    pub const fn general() -> Self {
        Self::new(ErrorKind::Generic)
    }

    /// Creates a range error.
    #[inline]
    #[must_use]
    pub const fn range() -> Self {
        Self::new(ErrorKind::Range)
    }

    /// Creates a conflict error.
    #[inline]
    #[must_use]
    pub const fn conflict() -> Self {
        Self::new(ErrorKind::Conflict)
    }

    /// Creates an unsupported-field error.
    #[inline]
    #[must_use]
    pub const fn unsupported() -> Self {
        Self::new(ErrorKind::Unsupported)
    }

    /// Creates a registration error.
    #[inline]
    #[must_use]
    pub const fn registration() -> Self {
        Self::new(ErrorKind::Registration)
    }

    /// Creates a syntax error.
    #[inline]
    #[must_use]
    pub const fn syntax() -> Self {
        Self::new(ErrorKind::Syntax)
    }

    /// Creates an assertion error for a broken internal invariant.
    #[inline]
    #[must_use]
    pub const fn assert() -> Self {
        Self::new(ErrorKind::Assert)
    }

    /// Attaches a message to this error.
    #[inline]
    #[must_use]
    pub fn with_message<S>(mut self, msg: S) -> Self
    where
        S: Into<Cow<'static, str>>,
    {
        self.msg = msg.into();
        self
    }

    /// Returns this error's kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns this error's message.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.msg
    }

    /// Consumes this error, returning its message.
    #[inline]
    #[must_use]
    pub fn into_message(self) -> Cow<'static, str> {
        self.msg
    }
}

impl fmt::Display for ChronoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.msg.is_empty() {
            write!(f, ": {}", self.msg)?;
        }
        Ok(())
    }
}

impl core::error::Error for ChronoError {}
