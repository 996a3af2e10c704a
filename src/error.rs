//! Error types shared across the crate.
//!
//! API failures are a typed [`ApiError`] so the UI can show them in a modal;
//! everything at the binary/terminal boundary uses `anyhow`.

/// Application-level result used by the event loop and the binary.
pub type Result<T> = anyhow::Result<T>;

/// Failure of one of the REST operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid api base url `{0}`")]
    BaseUrl(String),

    #[error("{method} {path}: request failed: {source}")]
    Transport {
        method: &'static str,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {path}: server responded {status}{}", fmt_body(.body))]
    Status {
        method: &'static str,
        path: String,
        status: u16,
        body: String,
    },

    #[error("{method} {path}: invalid response body: {source}")]
    Decode {
        method: &'static str,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Longest slice of a response body carried into the error message.
const MAX_BODY_CHARS: usize = 200;

fn fmt_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    match trimmed.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!(": {}...", trimmed[..cut].trim_end()),
        None => format!(": {trimmed}"),
    }
}

impl ApiError {
    /// HTTP status when the server answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_includes_body_when_present() {
        let e = ApiError::Status {
            method: "DELETE",
            path: "/remove/7".into(),
            status: 404,
            body: " not found \n".into(),
        };
        assert_eq!(e.to_string(), "DELETE /remove/7: server responded 404: not found");
        assert_eq!(e.status(), Some(404));

        let e = ApiError::Status {
            method: "GET",
            path: "/all".into(),
            status: 500,
            body: String::new(),
        };
        assert_eq!(e.to_string(), "GET /all: server responded 500");
    }

    #[test]
    fn long_status_body_is_cut() {
        let e = ApiError::Status {
            method: "GET",
            path: "/all".into(),
            status: 502,
            body: "é".repeat(5000),
        };
        let msg = e.to_string();
        let prefix = "GET /all: server responded 502: ";
        assert!(msg.starts_with(prefix));
        assert!(msg.ends_with("..."));
        assert_eq!(msg.chars().count(), prefix.chars().count() + MAX_BODY_CHARS + 3);

        let exact = "x".repeat(MAX_BODY_CHARS);
        assert_eq!(fmt_body(&exact), format!(": {exact}"));
    }
}
