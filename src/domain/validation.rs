use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidPhoneNumber { input: String },
    MessageIdOutOfRange { min: u32, max: u32, actual: u32 },
    ForbiddenCharacter { field: &'static str, ch: char },
    IdPhoneCountMismatch { ids: usize, phones: usize },
    NotSupportedByMailRelay { what: &'static str },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number: {input}"),
            Self::MessageIdOutOfRange { min, max, actual } => {
                write!(f, "message id out of range: {actual} (expected {min}..={max})")
            }
            Self::ForbiddenCharacter { field, ch } => {
                write!(f, "{field} must not contain {ch:?}")
            }
            Self::IdPhoneCountMismatch { ids, phones } => {
                write!(
                    f,
                    "every message id needs a phone: got {ids} ids and {phones} phones"
                )
            }
            Self::NotSupportedByMailRelay { what } => {
                write!(f, "{what} cannot be sent through the mail relay")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
