use async_graphql::Object;

/// Liveness greeting.
#[derive(Default)]
pub struct AppQuery;

#[Object]
impl AppQuery {
    async fn get_hello(&self) -> &'static str {
        "Hello World!"
    }
}
