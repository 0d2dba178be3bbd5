use crate::client::ClientError;
use crate::entry::EntryError;
use crate::retro::UnknownImprovement;
use crate::week::WeekError;
use axum::http::StatusCode;
use tracing::warn;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }
}

impl From<WeekError> for AppError {
    fn from(err: WeekError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<EntryError> for AppError {
    fn from(err: EntryError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<UnknownImprovement> for AppError {
    fn from(err: UnknownImprovement) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        warn!("reporting api call failed: {err}");
        Self::bad_gateway(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
