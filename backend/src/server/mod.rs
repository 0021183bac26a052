//! Server construction and middleware wiring.

mod config;
mod migrations;
mod state_builders;

pub use config::ServerConfig;
pub use migrations::{MigrationError, run_pending as run_migrations};

use state_builders::build_services;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use dynasty::Trace;
use dynasty::inbound::graphql::{AppSchema, build_schema};
use dynasty::inbound::http::avatars::avatar;
use dynasty::inbound::http::error::route_not_found;
use dynasty::inbound::http::graphql;
use dynasty::inbound::http::health::{HealthState, live, ready};
use dynasty::inbound::http::state::HttpState;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    schema: web::Data<AppSchema>,
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
        schema,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(schema)
        .wrap(Trace)
        .configure(graphql::configure)
        .service(avatar)
        .service(ready)
        .service(live)
        .default_service(web::to(route_not_found))
}

/// Construct the Actix HTTP server.
///
/// The schema and its services are built once and shared by all workers, so
/// the in-memory store and the employee event bus are process-wide.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let schema = web::Data::new(build_schema(build_services(&config), config.cookies.clone()));
    let http_state = web::Data::new(HttpState::new(config.tokens.clone(), config.avatars.clone()));
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            schema: schema.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
