mod http_handler;

use gallery_shared::{config, telemetry, AppState};
use http_handler::function_handler;
use lambda_http::{run, service_fn, Error};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let table_name = config::table_name()?;
    let state = AppState::new().await;

    // One table handle per container, reused by every request
    let table = Arc::new(state.image_table(&table_name));

    run(service_fn(move |event| {
        let table = table.clone();
        async move { function_handler(event, table.as_ref()).await }
    }))
    .await
}
