use std::error;
use std::fmt;

use crate::value::ValueKind;

// -----------------------------------------------------------------------------
// FilterError

/// An error raised by a filtering entry point.
///
/// Both variants are raised before any output mapping is produced; filtering
/// never partially succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// The input reference was absent.
    NilInput,
    /// The input value is not a filterable record.
    NotARecord {
        /// Full type name of the offending value.
        type_name: &'static str,
        /// Its declared kind.
        kind: ValueKind,
    },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NilInput => f.write_str("input cannot be nil"),
            Self::NotARecord { type_name, kind } => {
                write!(
                    f,
                    "invalid input `{type_name}` of kind `{kind}`: input must be a filterable record"
                )
            }
        }
    }
}

impl error::Error for FilterError {}
