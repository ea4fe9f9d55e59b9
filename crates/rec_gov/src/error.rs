/// Errors returned while talking to recreation.gov.
#[derive(Debug, thiserror::Error)]
pub enum RecGovError {
    /// Upstream answered with anything other than 200 OK.
    #[error("ERROR, {status} code received from {url}: {body}")]
    UpstreamRequestFailed {
        /// HTTP status code returned by upstream.
        status: u16,
        /// URL that was requested.
        url: String,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request never produced a response (DNS, TLS, timeout...).
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The body was not JSON or lacked an expected field.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The underlying HTTP client could not be created.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}
