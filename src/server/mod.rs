mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::API;
use crate::server::handlers::{fares, quotes, sessions, suggestions};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: Arc<T>) -> Router {
    let api = api as DynAPI;

    Router::new()
        .route("/sessions", post(sessions::create))
        .route(
            "/sessions/:token",
            get(sessions::find).delete(sessions::delete),
        )
        .route(
            "/sessions/:token/search_results",
            post(sessions::pick_search_result),
        )
        .route("/sessions/:token/map_clicks", post(sessions::click_map))
        .route("/sessions/:token/swap", patch(sessions::swap))
        .route("/sessions/:token/reset", patch(sessions::reset))
        .route("/sessions/:token/suggestions", get(suggestions::find))
        .route("/sessions/:token/quotes", post(quotes::create))
        .route("/quotes/:token", get(quotes::find))
        .route("/fares/estimate", get(fares::estimate))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: Arc<T>, addr: SocketAddr) {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    if let Err(err) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server error: {}", err);
    }
}

#[cfg(test)]
async fn get_json(app: Router, uri: &str) -> (axum::http::StatusCode, serde_json::Value) {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    let status = response.status();
    let body = hyper::body::to_bytes(response.into_body()).await.unwrap();

    (status, serde_json::from_slice(&body).unwrap())
}

#[test]
fn fare_estimate_reads_query_string() {
    use crate::test_utils::test_engine;

    tokio_test::block_on(async {
        let app = router(Arc::new(test_engine()));

        let (status, body) = get_json(
            app,
            "/fares/estimate?distance_km=12.5&vehicle=bike&hour=18&traffic_level=6",
        )
        .await;

        assert_eq!(status, axum::http::StatusCode::OK);
        assert_eq!(body["fare"], 151800);
        assert_eq!(body["vehicle"], "bike");
        assert_eq!(body["vehicle_label"], "Motorbike");
        assert_eq!(body["hour_of_day"], 18);
        assert_eq!(body["traffic_level"], 6);
    });
}

#[test]
fn unknown_tokens_are_not_found() {
    use crate::test_utils::test_engine;
    use uuid::Uuid;

    tokio_test::block_on(async {
        let engine = Arc::new(test_engine());

        let uri = format!("/sessions/{}", Uuid::new_v4());
        let (status, body) = get_json(router(engine.clone()), &uri).await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 104);

        let uri = format!("/quotes/{}", Uuid::new_v4());
        let (status, body) = get_json(router(engine), &uri).await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 105);
    });
}
