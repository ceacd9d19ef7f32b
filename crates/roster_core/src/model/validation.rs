//! Field validators and the cross-entity reference lookup contract.

use super::RecordId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Earliest accepted review year.
pub const MIN_REVIEW_YEAR: i64 = 2000;

/// A field assignment was rejected before it reached the entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text field was empty or whitespace-only.
    BlankText { field: &'static str },
    /// Review year below `MIN_REVIEW_YEAR`.
    YearOutOfRange { year: i64, minimum: i64 },
    /// Referential field points at a row that does not exist right now.
    MissingReference {
        field: &'static str,
        target: &'static str,
        id: RecordId,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText { field } => write!(f, "{field} must be a non-empty string"),
            Self::YearOutOfRange { year, minimum } => {
                write!(f, "year must be an integer >= {minimum}, got {year}")
            }
            Self::MissingReference { field, target, id } => {
                write!(f, "{field} must reference an existing {target}, got {id}")
            }
        }
    }
}

impl Error for ValidationError {}

/// Answers "is there a persisted row with this id right now?".
///
/// Implemented by the repositories an entity references. The answer is a
/// point-in-time check: nothing keeps the referenced row alive afterwards.
pub trait ReferenceLookup {
    /// Error produced by the lookup itself; must also carry validation failures.
    type Error: From<ValidationError>;

    fn reference_exists(&self, id: RecordId) -> Result<bool, Self::Error>;
}

pub(crate) fn non_blank(field: &'static str, value: String) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankText { field });
    }
    Ok(value)
}

pub(crate) fn review_year(year: i64) -> Result<i64, ValidationError> {
    if year < MIN_REVIEW_YEAR {
        return Err(ValidationError::YearOutOfRange {
            year,
            minimum: MIN_REVIEW_YEAR,
        });
    }
    Ok(year)
}

pub(crate) fn existing_reference<L: ReferenceLookup>(
    field: &'static str,
    target: &'static str,
    id: RecordId,
    lookup: &L,
) -> Result<RecordId, L::Error> {
    if lookup.reference_exists(id)? {
        Ok(id)
    } else {
        Err(ValidationError::MissingReference { field, target, id }.into())
    }
}
