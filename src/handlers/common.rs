use crate::{errors::ServiceError, metrics::CALCULATION_METRICS};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON body that has been deserialized and validated
///
/// Rejections are reported as [`ServiceError`] so malformed JSON, type
/// mismatches and failed constraints all share the standard error body.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            CALCULATION_METRICS.record_validation_failure();
            ServiceError::from(rejection)
        })?;

        value.validate().map_err(|errors| {
            CALCULATION_METRICS.record_validation_failure();
            ServiceError::from(errors)
        })?;

        Ok(Self(value))
    }
}
