use serde::de::DeserializeOwned;

use super::*;

impl QuranApiClient {
    /// GET an API path and unwrap the `data` field of its envelope.
    pub(super) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, QuranError> {
        let body = self.transport.get(path).await?;
        parse_envelope(&body).inspect_err(|e| {
            tracing::warn!(path, error = %e, "Failed to unwrap API response");
        })
    }
}

/// Unwrap `{code, message, data}`. A `code` other than 200 is a failure
/// even when the HTTP status was successful.
pub(crate) fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<T, QuranError> {
    let envelope: ApiEnvelope<serde_json::Value> = serde_json::from_str(body)?;

    if envelope.code != 200 {
        return Err(QuranError::Remote {
            status: envelope.code,
            message: envelope.message,
        });
    }

    let data = envelope.data.ok_or_else(|| QuranError::Remote {
        status: envelope.code,
        message: "response envelope has no data".into(),
    })?;

    Ok(serde_json::from_value(data)?)
}
