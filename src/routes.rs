use crate::{
    api::{leave_request, manager, user},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
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
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::resource("/login")
            .wrap(login_limiter.clone())
            .route(web::post().to(handlers::login)),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/leave-requests")
                    // /leave-requests
                    .service(
                        web::resource("")
                            .route(web::post().to(leave_request::submit_leave))
                            .route(web::delete().to(leave_request::cancel_leave)),
                    )
                    // /leave-requests/approve
                    .service(
                        web::resource("/approve")
                            .route(web::patch().to(leave_request::approve_leave)),
                    )
                    // /leave-requests/reject
                    .service(
                        web::resource("/reject")
                            .route(web::patch().to(leave_request::reject_leave)),
                    )
                    // /leave-requests/status/{userID}
                    .service(
                        web::resource("/status/{user_id}")
                            .route(web::get().to(leave_request::leave_status)),
                    )
                    // /leave-requests/remaining/{userID}
                    .service(
                        web::resource("/remaining/{user_id}")
                            .route(web::get().to(leave_request::leave_balance)),
                    ),
            )
            .service(
                web::scope("/users")
                    // /users
                    .service(
                        web::resource("")
                            .route(web::get().to(user::list_users))
                            .route(web::post().to(user::create_user))
                            .route(web::patch().to(user::update_user)),
                    )
                    // /users/email/{emailAddress}
                    .service(
                        web::resource("/email/{email}")
                            .route(web::get().to(user::get_user_by_email)),
                    )
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(user::get_user))
                            .route(web::delete().to(user::delete_user)),
                    ),
            )
            .service(
                web::scope("/managers")
                    // /managers
                    .service(
                        web::resource("")
                            .route(web::get().to(manager::list_manager_pairs))
                            .route(web::post().to(manager::create_manager_pair))
                            .route(web::patch().to(manager::update_manager_pair)),
                    )
                    // /managers/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(manager::get_manager_pair))
                            .route(web::delete().to(manager::delete_manager_pair)),
                    ),
            ),
    );
}
