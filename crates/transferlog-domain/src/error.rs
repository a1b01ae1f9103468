use thiserror::Error;

/// Category of a domain failure. Transport layers map these onto response
/// codes without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    ConstraintViolation,
    IngestFailure,
    Internal,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error("Data entry not found: {0}")]
    DataEntryNotFound(i64),

    #[error("Company already exists: {0}")]
    CompanyAlreadyExists(String),

    #[error("UID already exists: {0}")]
    UidAlreadyExists(String),

    #[error("Invalid company name: {0}")]
    InvalidCompanyName(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {value}")]
    InvalidFieldValue { field: &'static str, value: String },

    #[error("No fields provided to update")]
    EmptyUpdate,

    #[error("Unreadable import file: {0}")]
    IngestFailure(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Repository error: {0}")]
    RepositoryError(#[from] anyhow::Error),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidCompanyName(_)
            | DomainError::MissingField(_)
            | DomainError::InvalidFieldValue { .. }
            | DomainError::EmptyUpdate => ErrorKind::InvalidArgument,
            DomainError::CompanyNotFound(_) | DomainError::DataEntryNotFound(_) => {
                ErrorKind::NotFound
            }
            DomainError::CompanyAlreadyExists(_) | DomainError::UidAlreadyExists(_) => {
                ErrorKind::AlreadyExists
            }
            DomainError::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
            DomainError::IngestFailure(_) => ErrorKind::IngestFailure,
            DomainError::RepositoryError(_) => ErrorKind::Internal,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
