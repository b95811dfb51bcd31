use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unsupported type {} for field {}", .ty, .field)]
    UnsupportedFieldType {
        field: &'static str,
        ty: &'static str,
    },

    #[error("Unsupported sequence type {} for field {}: only Vec<String> is supported", .ty, .field)]
    UnsupportedSequenceElementType {
        field: &'static str,
        ty: &'static str,
    },

    #[error("Unsupported reference type {} for field {}: the target must be a record", .ty, .field)]
    UnsupportedReferenceTarget {
        field: &'static str,
        ty: &'static str,
    },

    #[cfg(feature = "fetch")]
    #[error("Error while fetching the page: {}", .0)]
    FetchError(String),
}

impl Error {
    /// Name of the record field the error was raised for, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Error::UnsupportedFieldType { field, .. }
            | Error::UnsupportedSequenceElementType { field, .. }
            | Error::UnsupportedReferenceTarget { field, .. } => Some(*field),
            #[cfg(feature = "fetch")]
            Error::FetchError(_) => None,
        }
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::FetchError(value.to_string())
    }
}
