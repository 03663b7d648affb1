use serde_json::Value;
use taskwatch_types::{AdminRequest, AdminResponse};

use crate::error::AdminError;

/// The two calls a cluster control plane must expose.
///
/// The waiter takes this capability as an explicit parameter instead of
/// consulting a process-global cluster handle, so tests can script the
/// control plane at this seam and production code can point independent
/// waiters at independent clusters.
#[allow(async_fn_in_trait)]
pub trait ControlApi {
    /// Submit a serialized admin request and return the raw response body.
    async fn admin_post(&self, body: &[u8]) -> Result<Vec<u8>, AdminError>;

    /// Fetch the health report of each serving node.
    async fn health(&self) -> Result<Vec<String>, AdminError>;
}

/// Run one admin request end to end: serialize, post, decode the envelope,
/// and treat a non-empty error list as failure.
///
/// Returns the raw data payload; callers decode the operation-specific
/// shape themselves.
pub async fn run_admin<C: ControlApi>(api: &C, request: &AdminRequest) -> Result<Value, AdminError> {
    let body = serde_json::to_vec(request).map_err(AdminError::Encode)?;
    let response_body = api.admin_post(&body).await?;
    let response: AdminResponse = serde_json::from_slice(&response_body)?;
    response
        .into_data()
        .map_err(|errors| AdminError::Remote { errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct CannedApi {
        body: Vec<u8>,
    }

    impl ControlApi for CannedApi {
        async fn admin_post(&self, _body: &[u8]) -> Result<Vec<u8>, AdminError> {
            Ok(self.body.clone())
        }

        async fn health(&self) -> Result<Vec<String>, AdminError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn returns_data_payload() {
        let api = CannedApi {
            body: json!({ "data": { "task": { "status": "Success" } } })
                .to_string()
                .into_bytes(),
        };
        let data = run_admin(&api, &AdminRequest::new("query task")).await.unwrap();
        assert_eq!(data["task"]["status"], "Success");
    }

    #[tokio::test]
    async fn nonempty_error_list_is_a_hard_failure() {
        let api = CannedApi {
            body: json!({ "errors": [{ "message": "unauthorized" }] })
                .to_string()
                .into_bytes(),
        };
        let err = run_admin(&api, &AdminRequest::new("mutation backup"))
            .await
            .unwrap_err();
        match err {
            AdminError::Remote { errors } => assert_eq!(errors[0].message, "unauthorized"),
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let api = CannedApi {
            body: b"<html>bad gateway</html>".to_vec(),
        };
        let err = run_admin(&api, &AdminRequest::new("query task")).await.unwrap_err();
        assert!(matches!(err, AdminError::Decode(_)));
    }
}
