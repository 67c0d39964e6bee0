use crate::config::Config;
use crate::models::{ApiEnvelope, Claims};
use actix_web::{FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized, web::Data};
use futures::future::{Ready, ready};
use jsonwebtoken::decode;
use jsonwebtoken::{DecodingKey, Validation};

pub struct AuthUser {
    pub user_id: u64,
    pub username: String,

    /// Tenant the caller operates in; absent for system-level users.
    pub tenant_id: Option<u64>,

    /// Present only if this user is linked to a guard record
    pub guard_id: Option<u64>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = match req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
        {
            Some(t) => t,
            None => return ready(Err(ErrorUnauthorized("Missing token"))),
        };

        let config = match req.app_data::<Data<Config>>() {
            Some(c) => c,
            None => {
                return ready(Err(actix_web::error::ErrorInternalServerError(
                    "Config missing",
                )));
            }
        };

        let data = match decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(d) => d,
            Err(_) => return ready(Err(ErrorUnauthorized("Invalid token"))),
        };

        ready(Ok(AuthUser {
            user_id: data.claims.user_id,
            username: data.claims.sub,
            tenant_id: data.claims.tenant_id,
            guard_id: data.claims.guard_id,
        }))
    }
}

impl AuthUser {
    /// Tenant context is checked before anything else; a caller without
    /// one gets its own message, never a not-found.
    pub fn require_tenant(&self) -> Result<u64, actix_web::HttpResponse> {
        self.tenant_id.ok_or_else(|| {
            actix_web::HttpResponse::BadRequest()
                .json(ApiEnvelope::<()>::fail("Tenant context is missing"))
        })
    }

    /// Guard-only endpoints (check-in/out) need a linked guard record.
    pub fn require_guard(&self) -> actix_web::Result<u64> {
        self.guard_id
            .ok_or_else(|| actix_web::error::ErrorForbidden("No guard profile"))
    }
}
