// Route exports
pub mod doctors;

use actix_web::web;

pub use doctors::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(doctors::configure),
    );
}
