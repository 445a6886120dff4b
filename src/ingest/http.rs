use super::sink::{IngestError, IngestSink};
use crate::record::Record;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Builds the submission router: `GET /` and `POST /`.
pub fn submission_router(sink: IngestSink) -> Router {
    Router::new()
        .route("/", get(submit_query).post(submit_body))
        .with_state(sink)
}

/// Binds `addr` and serves HTTP submissions until the listener fails.
pub async fn run_http_listener(addr: String, sink: IngestSink) -> io::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    info!("HTTP listener started on {addr}");
    serve_http(listener, sink).await
}

/// Serves HTTP submissions on an already bound listener.
pub async fn serve_http(listener: TcpListener, sink: IngestSink) -> io::Result<()> {
    axum::serve(listener, submission_router(sink)).await
}

/// `GET /` submission: the record is built entirely from the query string,
/// which must include `source`.
async fn submit_query(
    State(sink): State<IngestSink>,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    match Record::from_fields(fields_from_query(params)) {
        Some(record) => respond(sink.accept(record)),
        None => StatusCode::BAD_REQUEST,
    }
}

/// `POST /` submission: a JSON object body naming a `source` is the record;
/// otherwise the query string must name the source and the whole body
/// becomes the payload.
async fn submit_body(
    State(sink): State<IngestSink>,
    Query(params): Query<HashMap<String, String>>,
    body: Bytes,
) -> StatusCode {
    let parsed: Option<Value> = serde_json::from_slice(&body).ok();

    if let Some(Value::Object(fields)) = &parsed {
        if fields.contains_key("source") {
            return match Record::from_fields(fields.clone()) {
                Some(record) => respond(sink.accept(record)),
                None => StatusCode::BAD_REQUEST,
            };
        }
    }

    let Some(source) = params.get("source") else {
        return StatusCode::BAD_REQUEST;
    };
    let payload = parsed
        .unwrap_or_else(|| Value::String(String::from_utf8_lossy(&body).to_string()));
    respond(sink.accept(Record::new(source.clone(), payload)))
}

fn fields_from_query(params: HashMap<String, String>) -> Map<String, Value> {
    params
        .into_iter()
        .map(|(k, v)| (k, Value::String(v)))
        .collect()
}

/// Acceptance acknowledges the durable write only, never delivery.
fn respond(result: Result<String, IngestError>) -> StatusCode {
    match result {
        Ok(_) => StatusCode::ACCEPTED,
        Err(IngestError::MissingSource) | Err(IngestError::InvalidUid(_)) => {
            StatusCode::BAD_REQUEST
        }
        Err(e) => {
            error!("failed to accept submission: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}
