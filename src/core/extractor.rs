use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::core::error::AppError;

/// JSON body extractor that also runs the payload's `validator` rules.
///
/// Syntax errors, data errors and failed validations all surface as
/// `AppError` so every rejection shares the `ApiResponse` error envelope.
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_to_error)?;

        value
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(Self(value))
    }
}

fn json_rejection_to_error(rejection: JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
        JsonRejection::MissingJsonContentType(err) => {
            format!("Missing JSON content type: {}", err)
        }
        _ => "Failed to parse JSON body".to_string(),
    };

    AppError::BadRequest(message)
}
