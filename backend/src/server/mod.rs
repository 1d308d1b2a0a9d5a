//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{ServerConfig, StoreBackend};

use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use address_book::Trace;
#[cfg(debug_assertions)]
use address_book::doc::ApiDoc;
use address_book::inbound::http::configure_addresses;
use address_book::inbound::http::health::{HealthState, live, ready};
use address_book::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure_addresses)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness
/// is flagged once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        policy,
        store,
    } = config;
    let http_state = web::Data::new(build_http_state(&store, policy));

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(
        %bind_addr,
        store = store.name(),
        max_addresses = policy.max_addresses(),
        home_identity = %policy.home_identity(),
        "address book server listening"
    );
    health_state.mark_ready();
    Ok(server)
}
