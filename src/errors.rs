//! Error types reported when building views of inspected arrays.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that can occur when constructing an [`ArrayView`](crate::ArrayView)
/// for an object that was recognized as an array.
///
/// An object that is not an array at all is not an error. Matchers report
/// that case as `None`.
#[derive(Debug)]
pub enum ViewError {
    /// None of the bound fields for the first axis were present and
    /// decodable, so the array has no usable dimensions.
    BoundsNotFound,

    /// The element storage field is missing from the object.
    StorageNotFound {
        /// Name of the field that was probed.
        field: String,
    },

    /// The element count or the byte extent of the storage cannot be
    /// represented on this platform.
    TooLarge,

    /// The host failed to resolve the element type, element size or data
    /// address while the view was being constructed.
    Host(Box<dyn Error + Send + Sync>),
}

impl ViewError {
    pub(crate) fn host(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Host(Box::new(err))
    }
}

impl Display for ViewError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewError::BoundsNotFound => write!(f, "no bounds found"),
            ViewError::StorageNotFound { field } => {
                write!(f, "element storage field \"{}\" not found", field)
            }
            ViewError::TooLarge => write!(f, "array is too large to address"),
            ViewError::Host(err) => write!(f, "host error: {}", err),
        }
    }
}

impl Error for ViewError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ViewError::Host(err) => Some(&**err),
            _ => None,
        }
    }
}
