//! GraphQL transport: queries and mutations over HTTP, subscriptions over
//! WebSocket, and GraphiQL in debug builds.

use actix_web::{HttpRequest, HttpResponse, web};
use async_graphql::Data;
use async_graphql_actix_web::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};

use super::auth::request_user;
use super::state::HttpState;
use crate::inbound::graphql::AppSchema;

/// Path of the query/mutation endpoint.
pub const GRAPHQL_PATH: &str = "/graphql";
/// Path of the subscription endpoint.
pub const GRAPHQL_WS_PATH: &str = "/graphql/ws";

pub async fn execute(
    schema: web::Data<AppSchema>,
    state: web::Data<HttpState>,
    req: HttpRequest,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let user = request_user(&req, state.tokens.as_ref());
    schema.execute(request.into_inner().data(user)).await.into()
}

pub async fn subscriptions(
    schema: web::Data<AppSchema>,
    state: web::Data<HttpState>,
    req: HttpRequest,
    payload: web::Payload,
) -> actix_web::Result<HttpResponse> {
    let mut data = Data::default();
    data.insert(request_user(&req, state.tokens.as_ref()));
    GraphQLSubscription::new(schema.get_ref().clone())
        .with_data(data)
        .start(&req, payload)
}

#[cfg(debug_assertions)]
pub async fn graphiql() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(
            async_graphql::http::GraphiQLSource::build()
                .endpoint(GRAPHQL_PATH)
                .subscription_endpoint(GRAPHQL_WS_PATH)
                .finish(),
        )
}

/// Register the GraphQL routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(GRAPHQL_PATH, web::post().to(execute))
        .route(GRAPHQL_WS_PATH, web::get().to(subscriptions));
    #[cfg(debug_assertions)]
    cfg.route(GRAPHQL_PATH, web::get().to(graphiql));
    #[cfg(not(debug_assertions))]
    cfg.route(GRAPHQL_PATH, web::get().to(execute));
}
