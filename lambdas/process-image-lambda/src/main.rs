mod event_handler;

use event_handler::{function_handler, Pipeline};
use gallery_shared::{config::ProcessImageConfig, telemetry, AppState};
use lambda_runtime::{run, service_fn, Error};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let config = ProcessImageConfig::from_env()?;
    let state = AppState::new().await;

    // Clients are built once per container and shared by every invocation
    let pipeline = Arc::new(Pipeline {
        store: state.object_store(),
        analyzer: state.analyzer(),
        table: state.image_table(&config.table_name),
        thumbnails_bucket: config.thumbnails_bucket,
    });

    run(service_fn(move |event| {
        let pipeline = pipeline.clone();
        async move { function_handler(event, pipeline.as_ref()).await }
    }))
    .await
}
