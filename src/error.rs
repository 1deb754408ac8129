use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// The active connection mode is missing its required field.
    ConfigMissing(&'static str),
    Timeout,
    Network(reqwest::Error),
    HttpStatus(u16),
    OutOfRange { value: i64, min: i64, max: i64 },
    Unsupported(&'static str),
    /// Generic setup-time failure; deliberately carries no transport detail.
    CannotConnect,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConfigMissing(field) => write!(f, "missing configuration: {field}"),
            Error::Timeout => write!(f, "request timed out"),
            Error::Network(e) => write!(f, "network error: {e}"),
            Error::HttpStatus(code) => write!(f, "HTTP {code}"),
            Error::OutOfRange { value, min, max } => {
                write!(f, "value {value} out of range {min}..={max}")
            }
            Error::Unsupported(what) => write!(f, "unsupported operation: {what}"),
            Error::CannotConnect => write!(f, "cannot connect to stove"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Network(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return Error::Timeout;
        }
        if let Some(status) = e.status() {
            return Error::HttpStatus(status.as_u16());
        }
        Error::Network(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
