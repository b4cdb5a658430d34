mod event_handler;

use event_handler::function_handler;
use gallery_shared::{config, telemetry, AppState};
use lambda_runtime::{run, service_fn, Error};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Error> {
    telemetry::init_tracing();

    let thumbnails_bucket: Arc<str> = config::thumbnails_bucket()?.into();
    let store = Arc::new(AppState::new().await.object_store());

    run(service_fn(move |event| {
        let store = store.clone();
        let thumbnails_bucket = thumbnails_bucket.clone();
        async move { function_handler(event, store.as_ref(), &thumbnails_bucket).await }
    }))
    .await
}
