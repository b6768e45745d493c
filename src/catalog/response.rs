//! Catalog responder: presentation of the catalog and the new upload slot

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::catalog::session::UploadSession;
use crate::catalog::CatalogEntry;

/// `01 Jan 2024 12:30AM`
pub const CREATED_FORMAT: &str = "%d %b %Y %I:%M%p";

/// Parse `X-Timezone-Offset` minutes; absent or unparseable means UTC
pub fn parse_timezone_offset(header: Option<&str>) -> i32 {
    header
        .and_then(|value| value.trim().parse::<i32>().ok())
        .unwrap_or(0)
}

/// Render a creation time for display. The offset follows the browser
/// convention (minutes behind UTC), so it is subtracted.
pub fn format_created(created: DateTime<Utc>, offset_minutes: i32) -> String {
    let shifted = TimeDelta::try_minutes(i64::from(offset_minutes))
        .and_then(|delta| created.checked_sub_signed(delta))
        .unwrap_or(created);
    shifted.format(CREATED_FORMAT).to_string()
}

/// One catalog row as sent to the caller
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProjectView {
    pub created: String,
    pub id: String,
    pub name: String,
}

/// Response body for a successful listing
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CatalogResponse {
    pub projects: Vec<ProjectView>,
    pub new_project_upload_url: String,
    pub new_project_uuid: String,
}

impl CatalogResponse {
    pub fn assemble(entries: Vec<CatalogEntry>, session: UploadSession, offset_minutes: i32) -> Self {
        let projects = entries
            .into_iter()
            .map(|entry| ProjectView {
                created: format_created(entry.created, offset_minutes),
                id: entry.id,
                name: entry.name,
            })
            .collect();

        Self {
            projects,
            new_project_upload_url: session.target.url,
            new_project_uuid: session.entry_id,
        }
    }
}
