use thiserror::Error;

/// Why a weather data source could not produce an observation.
///
/// The `Display` text is for logs; [`FetchError::user_message`] is what the
/// user sees.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("location not found: {0}")]
    NotFound(String),

    #[error("provider rejected credentials: {0}")]
    AuthError(String),

    #[error("request failed: {0}")]
    TransientFailure(String),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "City not found. Please check the spelling and try again.",
            FetchError::AuthError(_) => "API key error. Please check your configuration.",
            FetchError::TransientFailure(_) | FetchError::MalformedResponse(_) => {
                "Unable to fetch weather data. Please try again."
            }
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::TransientFailure(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::MalformedResponse(err.to_string())
    }
}

/// A search the query context refused or could not complete.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Please enter a city name")]
    EmptyCity,

    #[error("City name must be at least 2 characters long")]
    CityTooShort,

    #[error("Already displaying weather for this city. Please try a different city!")]
    DuplicateCity,

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl QueryError {
    pub fn user_message(&self) -> String {
        match self {
            QueryError::Fetch(err) => err.user_message().to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_reads_like_transient_to_the_user() {
        let malformed = FetchError::MalformedResponse("missing main.temp".into());
        let transient = FetchError::TransientFailure("timeout".into());
        assert_eq!(malformed.user_message(), transient.user_message());
    }

    #[test]
    fn query_error_messages() {
        assert_eq!(QueryError::EmptyCity.user_message(), "Please enter a city name");
        assert_eq!(
            QueryError::from(FetchError::NotFound("Atlantis".into())).user_message(),
            "City not found. Please check the spelling and try again."
        );
        assert_eq!(
            QueryError::from(FetchError::AuthError("401".into())).user_message(),
            "API key error. Please check your configuration."
        );
    }
}
