//! HTTP request type.
//!
//! Every call the bridge makes against the backend project endpoint is a
//! JSON `POST`, so [`HttpRequest`] carries only a relative path and a body.

/// A JSON `POST` to a path below the client's base path.
///
/// # Example
///
/// ```rust
/// use commerce_bridge::clients::HttpRequest;
/// use serde_json::json;
///
/// let request = HttpRequest::post(
///     "graphql",
///     json!({"query": "{ cart(id: \"1\") { version } }", "variables": {}}),
/// );
///
/// assert_eq!(request.path, "graphql");
/// assert_eq!(request.body["variables"], json!({}));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    /// The path, relative to the client's base path.
    pub path: String,
    /// The JSON body sent with the request.
    pub body: serde_json::Value,
}

impl HttpRequest {
    /// Creates a `POST` of `body` to `path`.
    #[must_use]
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            path: path.into(),
            body,
        }
    }

    /// Renders the body as sent on the wire.
    #[must_use]
    pub fn encoded_body(&self) -> String {
        self.body.to_string()
    }
}
