//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [sources] Section Defaults
// ============================================================================

pub mod sources {
    pub fn preference() -> String {
        "auto".into()
    }

    pub fn remote_domain() -> Option<String> {
        None
    }

    pub fn remote_path() -> String {
        "database/json".into()
    }

    pub fn local_base() -> String {
        "database/json".into()
    }
}

// ============================================================================
// [render] Section Defaults
// ============================================================================

pub mod render {
    pub fn mode() -> String {
        "development".into()
    }

    pub fn debug_prefix() -> String {
        "/tests".into()
    }
}
