use gallery_atoms::records::ImageTable;
use gallery_atoms::GalleryError;
use gallery_block::search;
use lambda_http::{
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        StatusCode,
    },
    Body, Error, Request, RequestExt, Response,
};

fn with_cors_headers(mut resp: Response<Body>) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    resp
}

/// 500 with the error text. Built without the fallible builder so it cannot fail itself.
fn server_error(err: &GalleryError) -> Response<Body> {
    let body = serde_json::json!({ "error": err.to_string() }).to_string();
    let mut resp = Response::new(Body::from(body));
    *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    resp.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    resp
}

fn finalize_response(resp: Result<Response<Body>, GalleryError>) -> Response<Body> {
    let resp = resp.unwrap_or_else(|e| {
        tracing::error!("❌ request failed: {}", e);
        server_error(&e)
    });
    with_cors_headers(resp)
}

/// Path as the gateway received it. REST APIs put the stage in front of the
/// request URI (`/prod/images`); the raw path never carries it.
fn request_path(event: &Request) -> &str {
    match event.raw_http_path() {
        "" => event.uri().path(),
        raw => raw,
    }
}

/// Main Lambda handler - routes image list/search/get requests.
/// Failures become 500 responses; the invocation itself always succeeds.
pub(crate) async fn function_handler(
    event: Request,
    table: &impl ImageTable,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = request_path(&event);
    let search = event
        .query_string_parameters_ref()
        .and_then(|params| params.first("search"));

    tracing::info!("🚀 Image API invoked - Method: {} Path: {}", method, path);

    Ok(finalize_response(
        search::route(table, method, path, search).await,
    ))
}
