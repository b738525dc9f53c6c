use thiserror::Error;

/// Transport-level failures talking to the classification service.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("invalid classifier configuration: {0}")]
    Config(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier api error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("classifier returned no text")]
    EmptyResponse,

    #[error("classifier call timed out")]
    Timeout,
}

/// The classifier answered, but not with a usable event.
#[derive(Error, Debug)]
pub enum ClassificationError {
    #[error("response is not a classification object: {0}")]
    Json(#[from] serde_json::Error),
}

/// A classification that parsed but must not be persisted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("magnitude was not extracted ({0})")]
    MissingMagnitude(f64),

    #[error("location is unknown")]
    UnknownLocation,

    #[error("date is unknown")]
    UnknownDate,

    #[error("date '{0}' is not YYYY-MM-DD")]
    MalformedDate(String),
}
