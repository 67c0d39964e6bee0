use actix_web::middleware::Next;
use actix_web::{
    Error, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
};
use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use std::cell::RefCell;
use std::sync::RwLock;

use crate::models::ApiEnvelope;

/// Process-wide default zone. Written once at startup (last writer wins),
/// read on every timestamp conversion.
static DEFAULT_TZ: Lazy<RwLock<Tz>> = Lazy::new(|| RwLock::new(chrono_tz::Asia::Kolkata));

tokio::task_local! {
    /// Per-request override, scoped to the handler's task so concurrent
    /// requests never observe each other's zone.
    static REQUEST_TZ: RefCell<Option<Tz>>;
}

/// Resolve a zone id to a chrono-tz zone. Accepts IANA ids plus the
/// Windows alias of the default zone ("India Standard Time").
pub fn resolve_time_zone(id: &str) -> Result<Tz> {
    if let Ok(tz) = id.parse::<Tz>() {
        return Ok(tz);
    }
    if id.eq_ignore_ascii_case("India Standard Time") {
        return Ok(chrono_tz::Asia::Kolkata);
    }
    Err(anyhow!("Unrecognized time zone id: {}", id))
}

/// Set the process-wide default zone. Intended to be called once at startup.
pub fn set_default_time_zone(id: &str) -> Result<()> {
    let tz = resolve_time_zone(id)?;
    *DEFAULT_TZ.write().unwrap() = tz;
    Ok(())
}

/// Set (or with `None`, clear) the override for the current request scope.
/// Fails outside a scoped call chain or for an unknown zone id.
pub fn set_request_time_zone(id: Option<&str>) -> Result<()> {
    let tz = match id {
        Some(id) => Some(resolve_time_zone(id)?),
        None => None,
    };
    REQUEST_TZ
        .try_with(|cell| *cell.borrow_mut() = tz)
        .map_err(|_| anyhow!("No request time zone scope is active"))
}

/// Run a future with its own request-zone slot, pre-seeded with `tz`.
pub async fn scope_request_time_zone<F>(tz: Option<Tz>, fut: F) -> F::Output
where
    F: std::future::Future,
{
    REQUEST_TZ.scope(RefCell::new(tz), fut).await
}

/// The override when one is set for this call chain, else the default.
pub fn effective_time_zone() -> Tz {
    REQUEST_TZ
        .try_with(|cell| *cell.borrow())
        .ok()
        .flatten()
        .unwrap_or_else(|| *DEFAULT_TZ.read().unwrap())
}

pub fn effective_time_zone_id() -> String {
    effective_time_zone().name().to_string()
}

/// Convert a UTC instant into effective-zone wall-clock time.
/// The result carries no zone marker.
pub fn utc_to_app_tz(instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(&effective_time_zone()).naive_local()
}

pub fn now_in_app_tz() -> NaiveDateTime {
    utc_to_app_tz(Utc::now())
}

pub fn today_in_app_tz() -> NaiveDate {
    now_in_app_tz().date()
}

/// Middleware: seed the request's zone slot from the X-Time-Zone header.
/// An unknown header value is rejected before the handler runs.
pub async fn time_zone_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let header = req
        .headers()
        .get("X-Time-Zone")
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned);

    let tz = match header {
        Some(id) => match resolve_time_zone(&id) {
            Ok(tz) => Some(tz),
            Err(_) => {
                let resp = HttpResponse::BadRequest()
                    .json(ApiEnvelope::<()>::fail(format!("Unknown time zone: {}", id)));
                return Ok(req.into_response(resp.map_into_boxed_body()));
            }
        },
        None => None,
    };

    scope_request_time_zone(tz, next.call(req)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use tokio::sync::Barrier;

    #[test]
    fn resolves_iana_id() {
        assert_eq!(resolve_time_zone("Asia/Kolkata").unwrap(), chrono_tz::Asia::Kolkata);
        assert_eq!(resolve_time_zone("Europe/Berlin").unwrap(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn resolves_windows_alias_of_ist() {
        assert_eq!(
            resolve_time_zone("India Standard Time").unwrap(),
            chrono_tz::Asia::Kolkata
        );
    }

    #[test]
    fn rejects_unknown_id() {
        assert!(resolve_time_zone("Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn default_applies_outside_any_scope() {
        // No scope active on this thread, so the process default is used.
        assert_eq!(effective_time_zone(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn set_request_time_zone_fails_outside_scope() {
        assert!(set_request_time_zone(Some("Asia/Kolkata")).is_err());
    }

    #[tokio::test]
    async fn override_is_visible_within_scope_and_clearable() {
        scope_request_time_zone(None, async {
            assert_eq!(effective_time_zone_id(), "Asia/Kolkata");

            set_request_time_zone(Some("Europe/Berlin")).unwrap();
            assert_eq!(effective_time_zone_id(), "Europe/Berlin");

            set_request_time_zone(None).unwrap();
            assert_eq!(effective_time_zone_id(), "Asia/Kolkata");
        })
        .await;
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_scopes_do_not_leak_overrides() {
        let barrier = Arc::new(Barrier::new(2));

        let b1 = barrier.clone();
        let t1 = tokio::spawn(scope_request_time_zone(None, async move {
            set_request_time_zone(Some("Europe/Berlin")).unwrap();
            b1.wait().await;
            assert_eq!(effective_time_zone_id(), "Europe/Berlin");
        }));

        let b2 = barrier.clone();
        let t2 = tokio::spawn(scope_request_time_zone(None, async move {
            set_request_time_zone(Some("America/New_York")).unwrap();
            b2.wait().await;
            assert_eq!(effective_time_zone_id(), "America/New_York");
        }));

        t1.await.unwrap();
        t2.await.unwrap();
    }

    #[tokio::test]
    async fn utc_instant_converts_to_effective_zone() {
        scope_request_time_zone(None, async {
            let utc = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
            // IST is UTC+05:30
            let local = utc_to_app_tz(utc);
            assert_eq!(local.to_string(), "2026-01-15 17:30:00");

            set_request_time_zone(Some("Europe/Berlin")).unwrap();
            let berlin = utc_to_app_tz(utc);
            assert_eq!(berlin.to_string(), "2026-01-15 13:00:00");
        })
        .await;
    }
}
