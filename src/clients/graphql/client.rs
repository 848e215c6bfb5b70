//! GraphQL client implementation for the backend project endpoint.

use serde::Deserialize;

use crate::auth::BearerToken;
use crate::clients::graphql::{GraphqlError, GraphqlErrorEntry};
use crate::clients::{HttpClient, HttpError, HttpRequest};
use crate::config::ActionParameters;

/// Path of the GraphQL endpoint below the project base path.
const GRAPHQL_PATH: &str = "graphql";

/// GraphQL client bound to one project and one bearer credential.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use commerce_bridge::auth::BearerToken;
/// use commerce_bridge::clients::GraphqlClient;
///
/// let client = GraphqlClient::new(&params, &BearerToken::new("token"));
/// let response = client.query("{ me { customer { id } } }", serde_json::json!({})).await?;
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    http_client: HttpClient,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new GraphQL client for the project named in `params`.
    ///
    /// The constructor is infallible; the credential is only checked by the
    /// backend on the first request.
    #[must_use]
    pub fn new(params: &ActionParameters, bearer: &BearerToken) -> Self {
        let base_path = format!("/{}", params.project_key().as_ref());
        Self {
            http_client: HttpClient::new(base_path, params, bearer),
        }
    }

    /// Returns the full endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}{}/{GRAPHQL_PATH}",
            self.http_client.base_uri(),
            self.http_client.base_path()
        )
    }

    /// Executes a GraphQL document with variables.
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] for network errors and for non-2xx
    /// responses whose body carries no `errors` array. Returns
    /// [`GraphqlError::InvalidResponse`] when a 2xx body is not a GraphQL
    /// response.
    ///
    /// Backend rejections (`errors` in the body) are returned as
    /// `Ok(GraphqlResponse)` regardless of the HTTP status.
    pub async fn query(
        &self,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<GraphqlResponse, GraphqlError> {
        let body = serde_json::json!({
            "query": document,
            "variables": variables,
        });

        match self.http_client.request(HttpRequest::post(GRAPHQL_PATH, body)).await {
            Ok(response) => GraphqlResponse::from_body(response.code, response.body),
            Err(HttpError::Response(error)) if has_errors_array(&error.body) => {
                tracing::debug!(
                    "Backend answered GraphQL request with status {} and structured errors",
                    error.code
                );
                GraphqlResponse::from_body(error.code, error.body)
            }
            Err(error) => Err(error.into()),
        }
    }
}

fn has_errors_array(body: &serde_json::Value) -> bool {
    body.get("errors")
        .and_then(serde_json::Value::as_array)
        .is_some_and(|errors| !errors.is_empty())
}

/// Parsed GraphQL response envelope.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphqlResponse {
    /// The `data` member, absent or `null` when the operation failed.
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    /// The `errors` member.
    #[serde(default)]
    pub errors: Vec<GraphqlErrorEntry>,
    /// The `extensions` member.
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphqlResponse {
    fn from_body(status: u16, body: serde_json::Value) -> Result<Self, GraphqlError> {
        serde_json::from_value(body).map_err(|e| GraphqlError::InvalidResponse {
            status,
            message: e.to_string(),
        })
    }

    /// Returns the first backend error, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&GraphqlErrorEntry> {
        self.errors.first()
    }
}
