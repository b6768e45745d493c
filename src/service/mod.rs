//service/mod.rs
pub mod user_context;

use actix_web::http::header;
use actix_web::error::ErrorInternalServerError;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use log::{debug, error, info};
use log_mdc;

use crate::app_state::AppState;
use crate::auth::bearer_token;
use crate::catalog::build_catalog;
use crate::catalog::response::{parse_timezone_offset, CatalogResponse};
use crate::catalog::session::issue_upload_session;
use crate::error::CatalogError;
use crate::service::user_context::UserContext;
use crate::storage::StorageError;

pub const TIMEZONE_OFFSET_HEADER: &str = "X-Timezone-Offset";
pub const PREFLIGHT_MAX_AGE_SECS: u32 = 3600;

const MDC_USER: &str = "user";
const MDC_NAMESPACE: &str = "namespace";

/// Log context of the request being handled on this thread. Creating it
/// clears whatever a previous request left behind; dropping it clears the
/// keys again.
struct RequestLogContext;

impl RequestLogContext {
    fn begin() -> Self {
        Self::clear();
        RequestLogContext
    }

    fn tag(&self, context: &UserContext) {
        log_mdc::insert(MDC_USER, &context.subject);
        log_mdc::insert(MDC_NAMESPACE, context.namespace.name());
    }

    fn clear() {
        log_mdc::remove(MDC_USER);
        log_mdc::remove(MDC_NAMESPACE);
    }
}

impl Drop for RequestLogContext {
    fn drop(&mut self) {
        Self::clear();
    }
}

fn header_str<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Authenticate the caller and collect the request inputs.
/// Runs before any storage access, so a rejected caller costs nothing.
async fn header_handler(req: &HttpRequest, app_state: &AppState) -> Result<UserContext, CatalogError> {
    let token = bearer_token(header_str(req, "Authorization"))?;
    let identity = app_state.verifier.verify(token).await?;

    let origin = header_str(req, "Origin")
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .ok_or(CatalogError::MissingOrigin)?
        .to_string();
    let tz_offset = parse_timezone_offset(header_str(req, TIMEZONE_OFFSET_HEADER));

    Ok(UserContext::new(identity.subject, origin, tz_offset))
}

/// List the caller's datasets and issue an upload target for a new one
pub async fn list_projects_service(req: HttpRequest, app_state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    let log_context = RequestLogContext::begin();
    let context = header_handler(&req, &app_state).await?;
    log_context.tag(&context);
    debug!("Listing projects for namespace {}", context.namespace.name());

    let store = app_state.open_store();
    let bucket = store.bucket().to_string();

    let bucket_exists = store.bucket_exists().await.map_err(|e| {
        error!("Failed to look up data bucket {}: {}", bucket, e);
        CatalogError::StorageUnavailable(format!("Couldn't find data bucket {}", bucket))
    })?;
    if !bucket_exists {
        error!("Data bucket {} does not exist", bucket);
        return Err(CatalogError::StorageUnavailable(format!("Couldn't find data bucket {}", bucket)).into());
    }

    let entries = build_catalog(store.as_ref(), &context.namespace)
        .await
        .map_err(|e| {
            error!("Failed to list namespace {} in bucket {}: {}", context.namespace.name(), bucket, e);
            match e {
                StorageError::BucketNotFound(_) => {
                    CatalogError::StorageUnavailable(format!("Couldn't find data bucket {}", bucket))
                }
                other => CatalogError::StorageUnavailable(format!("Couldn't list data bucket {}: {}", bucket, other)),
            }
        })?;

    let session = issue_upload_session(
        store.as_ref(),
        &context.namespace,
        &context.origin,
        app_state.config.storage.upload_ttl(),
    )
    .await?;

    info!(
        "Listed {} projects for namespace {}, new project {}",
        entries.len(),
        context.namespace.name(),
        session.entry_id
    );
    let response = CatalogResponse::assemble(entries, session, context.tz_offset_minutes);
    let body = serde_json::to_string(&response).map_err(ErrorInternalServerError)?;

    Ok(HttpResponse::Ok()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::CONTENT_TYPE, "text/json"))
        .body(body))
}

/// CORS pre-flight answer; identical for every origin
pub fn preflight_response() -> HttpResponse {
    HttpResponse::NoContent()
        .insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, "*"))
        .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, "*"))
        .insert_header((header::ACCESS_CONTROL_MAX_AGE, PREFLIGHT_MAX_AGE_SECS.to_string()))
        .insert_header((header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mdc_value(key: &str) -> Option<String> {
        log_mdc::get(key, |value| value.map(str::to_string))
    }

    #[test]
    fn test_request_log_context_is_scoped() {
        log_mdc::insert(MDC_USER, "previous-caller");

        let log_context = RequestLogContext::begin();
        assert_eq!(mdc_value(MDC_USER), None);

        log_context.tag(&UserContext::new("sub|1".to_string(), "https://a.example.com".to_string(), 0));
        assert_eq!(mdc_value(MDC_USER).as_deref(), Some("sub|1"));
        assert_eq!(mdc_value(MDC_NAMESPACE).as_deref(), Some("sub%7C1"));

        drop(log_context);
        assert_eq!(mdc_value(MDC_USER), None);
        assert_eq!(mdc_value(MDC_NAMESPACE), None);
    }
}
