use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown section identifier: {0:?}")]
pub struct ParseSectionError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown contact form field: {0:?}")]
pub struct UnknownFieldError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name, email and message are all required")]
    MissingFields,
}
