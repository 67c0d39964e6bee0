use crate::{
    api::{assignment, attendance, guard, menu, role, site, visitor},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    utils::app_time::time_zone_middleware,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Menu resolution tolerates anonymous callers (empty tree, not 401),
    // so it sits outside the auth middleware. Registered before the
    // protected scope so it matches first.
    cfg.service(
        web::scope(&format!("{}/menus/my", config.api_prefix))
            .wrap(from_fn(time_zone_middleware))
            .wrap(protected_limiter.clone())
            .service(web::resource("").route(web::get().to(menu::my_menus))),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            // per-request time zone scope must wrap every handler
            .wrap(from_fn(time_zone_middleware))
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(handlers::protected)
            .service(
                web::scope("/guards")
                    // /guards
                    .service(
                        web::resource("")
                            .route(web::post().to(guard::create_guard))
                            .route(web::get().to(guard::list_guards)),
                    )
                    // /guards/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(guard::update_guard))
                            .route(web::get().to(guard::get_guard)),
                    ),
            )
            .service(
                web::scope("/sites")
                    .service(
                        web::resource("")
                            .route(web::post().to(site::create_site))
                            .route(web::get().to(site::list_sites)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(site::update_site))
                            .route(web::get().to(site::get_site))
                            .route(web::delete().to(site::deactivate_site)),
                    ),
            )
            .service(
                web::scope("/assignments")
                    .service(
                        web::resource("")
                            .route(web::post().to(assignment::create_assignment))
                            .route(web::get().to(assignment::list_assignments)),
                    )
                    .service(
                        web::resource("/{id}/end")
                            .route(web::put().to(assignment::end_assignment)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(web::resource("").route(web::get().to(attendance::list_attendance)))
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(
                        web::resource("/check-out").route(web::post().to(attendance::check_out)),
                    )
                    .service(
                        web::resource("/mark").route(web::post().to(attendance::mark_attendance)),
                    ),
            )
            .service(
                web::scope("/menus")
                    .service(
                        web::resource("")
                            .route(web::post().to(menu::create_menu))
                            .route(web::get().to(menu::list_menus)),
                    )
                    .service(web::resource("/sub").route(web::post().to(menu::create_sub_menu)))
                    .service(
                        web::resource("/{id}").route(web::delete().to(menu::deactivate_menu)),
                    ),
            )
            .service(
                web::scope("/roles")
                    .service(
                        web::resource("")
                            .route(web::post().to(role::create_role))
                            .route(web::get().to(role::list_roles)),
                    )
                    .service(
                        web::resource("/permissions")
                            .route(web::get().to(role::list_permissions)),
                    )
                    .service(web::resource("/assign").route(web::post().to(role::assign_roles)))
                    .service(
                        web::resource("/{id}/permissions")
                            .route(web::post().to(role::grant_permissions)),
                    )
                    .service(
                        web::resource("/{id}/menus").route(web::post().to(role::grant_menus)),
                    ),
            )
            .service(
                web::scope("/visitors")
                    .service(
                        web::resource("")
                            .route(web::post().to(visitor::log_visitor_entry))
                            .route(web::get().to(visitor::list_visitors)),
                    )
                    .service(
                        web::resource("/{id}/exit")
                            .route(web::put().to(visitor::mark_visitor_exit)),
                    ),
            )
            .service(
                web::scope("/vehicles")
                    .service(
                        web::resource("")
                            .route(web::post().to(visitor::log_vehicle_entry))
                            .route(web::get().to(visitor::list_vehicles)),
                    )
                    .service(
                        web::resource("/{id}/exit")
                            .route(web::put().to(visitor::mark_vehicle_exit)),
                    ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token
//  └─ X-Time-Zone: optional per-request zone override

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
