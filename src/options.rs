//! Options for resolving field values.

use core::{fmt, str::FromStr};

/// A parsing error for [`ResolverStyle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseResolverStyleError;

impl fmt::Display for ParseResolverStyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("provided string was not a valid ResolverStyle")
    }
}

/// `ResolverStyle` governs how leniently parsed field values combine
/// into a date or time.
///
/// - `Strict` requires every value to be valid for the exact date.
/// - `Smart` validates against the field's outer range and constrains
///   sensibly (a day-of-month past the end of the month clamps to the
///   last day).
/// - `Lenient` treats values as offsets and lets them roll into
///   neighboring months, years, and days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolverStyle {
    /// Resolve strictly.
    Strict,
    /// Resolve in a smart, or intelligent, manner. (default)
    #[default]
    Smart,
    /// Resolve leniently.
    Lenient,
}

impl ResolverStyle {
    #[inline]
    pub(crate) fn is_lenient(self) -> bool {
        self == Self::Lenient
    }

    #[inline]
    pub(crate) fn is_strict(self) -> bool {
        self == Self::Strict
    }
}

impl FromStr for ResolverStyle {
    type Err = ParseResolverStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(Self::Strict),
            "smart" => Ok(Self::Smart),
            "lenient" => Ok(Self::Lenient),
            _ => Err(ParseResolverStyleError),
        }
    }
}

impl fmt::Display for ResolverStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "strict",
            Self::Smart => "smart",
            Self::Lenient => "lenient",
        })
    }
}
