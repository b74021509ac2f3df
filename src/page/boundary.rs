//! Fault-isolation boundary: turn a structured failure into a user-facing
//! error presentation.
//!
//! Production builds get a status-coded generic presentation with no
//! internal detail; development builds additionally carry the data source,
//! error kind, causing error, and an actionable remediation hint. This
//! asymmetry is deliberate.

use crate::config::BuildMode;
use crate::error::{ErrorKind, StructuredError};
use serde::Serialize;
use std::sync::Arc;

/// External translation lookup. Receives a message key, returns localized
/// text. The engine ships only keys; the identity translator echoes them.
pub type Translator = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Translator that returns the key itself. Useful default for hosts that
/// have not wired a translation table yet, and for tests.
pub fn identity_translator() -> Translator {
    Arc::new(|key: &str| key.to_string())
}

/// Developer-only diagnostic block of an error presentation.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
    pub kind: String,
    /// Message of the causing error, when one was recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// What the host actually shows for a failed page: an icon-worthy status,
/// localized title and message, and developer diagnostics when allowed.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPresentation {
    pub status: u16,
    pub kind: ErrorKind,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Diagnostics>,
}

/// Translation key pair for an error kind.
const fn message_keys(kind: ErrorKind) -> (&'static str, &'static str) {
    match kind {
        ErrorKind::NotFound => ("errors.notFound.title", "errors.notFound.message"),
        ErrorKind::AccessDenied => ("errors.accessDenied.title", "errors.accessDenied.message"),
        ErrorKind::ServerError => ("errors.serverError.title", "errors.serverError.message"),
        ErrorKind::RateLimit => ("errors.rateLimit.title", "errors.rateLimit.message"),
        ErrorKind::NetworkError => ("errors.network.title", "errors.network.message"),
        ErrorKind::FileError => ("errors.file.title", "errors.file.message"),
        ErrorKind::ConnectionError => ("errors.connection.title", "errors.connection.message"),
        ErrorKind::ComponentError => ("errors.component.title", "errors.component.message"),
        ErrorKind::Unknown => ("errors.general.title", "errors.general.message"),
    }
}

/// Remediation hint for developers, keyed off where the failure came from.
fn hint_for(err: &StructuredError) -> Option<String> {
    match (err.kind, err.data_source.as_deref()) {
        (_, Some("remote")) => Some(
            "Set TRELLIS_DATA_SOURCE=local to serve pages from the local static tree".to_string(),
        ),
        (ErrorKind::ComponentError, _) => Some(
            "Check the component name and ensure it exists in a components folder".to_string(),
        ),
        (ErrorKind::ConnectionError, _) => Some(
            "Verify the preferred data source is configured, or switch preference to auto"
                .to_string(),
        ),
        _ => None,
    }
}

/// Build the user-facing presentation for a structured failure.
pub fn present(err: &StructuredError, mode: BuildMode, translate: &Translator) -> ErrorPresentation {
    let (title_key, message_key) = message_keys(err.kind);

    let detail = if mode.is_production() {
        None
    } else {
        Some(Diagnostics {
            data_source: err.data_source.clone(),
            kind: err.kind.as_str().to_string(),
            original: err
                .source
                .as_ref()
                .map(|source| source.to_string())
                .or_else(|| Some(err.message.clone())),
            hint: hint_for(err),
        })
    };

    ErrorPresentation {
        status: err.status,
        kind: err.kind,
        title: translate(title_key),
        message: translate(message_key),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_presentation_hides_detail() {
        let err = StructuredError::new(ErrorKind::ServerError, 503, "edge melted")
            .with_data_source("remote")
            .with_source(anyhow::anyhow!("tcp reset"));
        let presentation = present(&err, BuildMode::Production, &identity_translator());

        assert_eq!(presentation.status, 503);
        assert_eq!(presentation.kind, ErrorKind::ServerError);
        assert_eq!(presentation.title, "errors.serverError.title");
        assert!(presentation.detail.is_none());
    }

    #[test]
    fn test_development_presentation_carries_diagnostics() {
        let err = StructuredError::new(ErrorKind::ServerError, 503, "edge melted")
            .with_data_source("remote")
            .with_source(anyhow::anyhow!("tcp reset"));
        let presentation = present(&err, BuildMode::Development, &identity_translator());

        let detail = presentation.detail.unwrap();
        assert_eq!(detail.data_source.as_deref(), Some("remote"));
        assert_eq!(detail.kind, "SERVER_ERROR");
        assert_eq!(detail.original.as_deref(), Some("tcp reset"));
        assert!(detail.hint.unwrap().contains("TRELLIS_DATA_SOURCE=local"));
    }

    #[test]
    fn test_presentation_uses_translator() {
        let translate: Translator = Arc::new(|key: &str| match key {
            "errors.notFound.title" => "Page not found".to_string(),
            "errors.notFound.message" => "We looked everywhere.".to_string(),
            other => other.to_string(),
        });
        let err = StructuredError::not_found("Page not found: /gone");
        let presentation = present(&err, BuildMode::Production, &translate);

        assert_eq!(presentation.title, "Page not found");
        assert_eq!(presentation.message, "We looked everywhere.");
    }

    #[test]
    fn test_component_error_hint() {
        let err = StructuredError::new(ErrorKind::ComponentError, 500, "Component 'X' not found");
        let presentation = present(&err, BuildMode::Development, &identity_translator());
        let detail = presentation.detail.unwrap();
        assert!(detail.hint.unwrap().contains("components folder"));
        // No source recorded: the structured message itself is the original.
        assert!(detail.original.unwrap().contains("'X'"));
    }
}
