//! Result helpers for turning failures into HTTP errors.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::{debug, error};

pub(crate) trait ResultExt<T> {
    /// Log the error and answer 500 without exposing it.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Answer 400 with the error message as the brief.
    fn or_400(self) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self) -> Result<T, StatusError> {
        self.map_err(|error| {
            debug!("rejected request input: {error}");

            StatusError::bad_request().brief(error.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use shipments_app::domain::shipments::models::ShipmentStatus;

    use super::*;

    #[test]
    fn parse_failures_become_bad_requests_with_message() {
        let result = "lost".parse::<ShipmentStatus>().or_400();

        let error = result.err();

        assert_eq!(error.as_ref().map(|e| e.code), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            error.map(|e| e.brief),
            Some("unknown shipment status \"lost\"".to_string())
        );
    }

    #[test]
    fn internal_failures_hide_the_message() {
        let result: Result<(), &str> = Err("connection reset");

        let error = result.or_500("failed to write response").err();

        assert_eq!(
            error.as_ref().map(|e| e.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert_ne!(error.map(|e| e.brief), Some("connection reset".to_string()));
    }
}
