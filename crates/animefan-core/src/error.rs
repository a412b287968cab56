use thiserror::Error;

/// A request could not be built from the fields on the page.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("не заполнено поле «{0}»")]
    MissingField(&'static str),
    #[error("некорректный идентификатор в поле «{field}»: {value}")]
    InvalidIdentifier { field: &'static str, value: String },
    #[error("неизвестный статус: {0}")]
    UnknownStatus(String),
    #[error("оценка должна быть целым числом, получено «{0}»")]
    InvalidRating(String),
    #[error("оценка должна быть от 1 до 10, получено {0}")]
    RatingOutOfRange(i64),
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never reached the server.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered outside of the 2xx range.
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error("unexpected error: {0}")]
    Unexpected(String),
    #[error(transparent)]
    Invalid(#[from] PayloadError),
}

impl ApiError {
    /// Text shown to the user in the error toast.
    pub fn toast_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Ошибка сети".to_string(),
            ApiError::Rejected {
                message: Some(message),
                ..
            } => format!("Ошибка: {}", message),
            ApiError::Rejected {
                status,
                message: None,
            } => format!("Ошибка: {}", status),
            ApiError::Unexpected(_) => "Что-то пошло не так".to_string(),
            ApiError::Invalid(e) => format!("Ошибка: {}", e),
        }
    }
}
