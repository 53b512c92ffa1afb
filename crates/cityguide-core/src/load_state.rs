use thiserror::Error;

/// Whole-fetch failure, as recorded in a [`LoadState::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure, including timeouts and non-2xx statuses.
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The body was not JSON or did not have the expected shape.
    #[error("invalid response shape: {0}")]
    InvalidResponseShape(String),

    /// The requested entity does not exist.
    #[error("location {0} does not exist")]
    NotFound(String),
}

impl FetchError {
    /// `NotFound` is terminal; everything else can be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::NotFound(_))
    }

    /// Short message for the view layer.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "location does not exist",
            FetchError::NetworkFailure(_) | FetchError::InvalidResponseShape(_) => {
                "could not load data, please retry"
            }
        }
    }
}

/// Lifecycle of a fetch-backed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    NotStarted,
    Loading,
    Loaded(T),
    Failed(FetchError),
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    /// `Loaded` or `Failed`.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, LoadState::Loaded(_) | LoadState::Failed(_))
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn failure(&self) -> Option<&FetchError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn map<U, F>(self, f: F) -> LoadState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            LoadState::NotStarted => LoadState::NotStarted,
            LoadState::Loading => LoadState::Loading,
            LoadState::Loaded(value) => LoadState::Loaded(f(value)),
            LoadState::Failed(err) => LoadState::Failed(err),
        }
    }
}

impl<T> From<Result<T, FetchError>> for LoadState<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(err) => LoadState::Failed(err),
        }
    }
}
