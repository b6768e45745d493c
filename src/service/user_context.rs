//! Per-request caller context

use crate::catalog::namespace::Namespace;

/// Everything derived from the request before storage is touched
#[derive(Debug, Clone, PartialEq)]
pub struct UserContext {
    /// Verified subject identifier
    pub subject: String,
    /// Storage partition derived from the subject
    pub namespace: Namespace,
    /// Caller origin the upload session is bound to
    pub origin: String,
    /// Display offset in minutes, from `X-Timezone-Offset`
    pub tz_offset_minutes: i32,
}

impl UserContext {
    pub fn new(subject: String, origin: String, tz_offset_minutes: i32) -> Self {
        Self {
            namespace: Namespace::for_subject(&subject),
            subject,
            origin,
            tz_offset_minutes,
        }
    }
}
