use std::time::Duration;

use axum::{
    Json, Router,
    error_handling::HandleErrorLayer,
    extract::State,
    routing::{get, post},
};
use chainage_core::prelude::*;
use chrono::Utc;
use geojson::GeoJson;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer, timeout::TimeoutLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::{AppError, AppJson, handle_middleware_error};

#[derive(Debug, Clone)]
pub struct AppState {
    pub calculator: ChainageCalculator,
}

/// Road geometry as sent by clients
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RouteInput {
    Points(Polyline),
    GeoJson(GeoJson),
    Overpass(OverpassResponse),
}

impl RouteInput {
    pub fn into_polyline(self) -> Result<Polyline, Error> {
        let polyline = match self {
            RouteInput::Points(polyline) => polyline,
            RouteInput::GeoJson(geojson) => polyline_from_geojson(&geojson)?,
            RouteInput::Overpass(response) => road_from_overpass(&response)?.geometry,
        };

        if let Some(invalid) = polyline.points().iter().find(|p| !p.is_valid()) {
            return Err(Error::InvalidCoordinate {
                latitude: invalid.latitude,
                longitude: invalid.longitude,
            });
        }
        Ok(polyline)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainageRequest {
    pub route: RouteInput,
    pub observed: GeoPoint,
    pub snap_tolerance_meters: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchChainageRequest {
    pub route: RouteInput,
    pub observed: Vec<GeoPoint>,
    pub snap_tolerance_meters: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchChainageResponse {
    pub results: Vec<ChainageResult>,
}

#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub location: Option<GeoPoint>,
    pub route: Option<RouteInput>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateResponse {
    #[serde(flatten)]
    pub annotation: CaptureAnnotation,
    pub formatted_chainage: String,
}

pub fn router(config: &ServerConfig) -> Result<Router, Error> {
    let state = AppState {
        calculator: ChainageCalculator::from_config(&config.chainage)?,
    };

    Ok(Router::new()
        .route("/health", get(health))
        .route("/chainage", post(chainage))
        .route("/chainage/batch", post(chainage_batch))
        .route("/annotate", post(annotate))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                )))
                .layer(GlobalConcurrencyLimitLayer::new(config.concurrency_limit)),
        ))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn chainage(
    State(state): State<AppState>,
    AppJson(request): AppJson<ChainageRequest>,
) -> Result<Json<ChainageResult>, AppError> {
    let calculator = calculator_for(&state, request.snap_tolerance_meters)?;
    let observed = GeoPoint::try_new(request.observed.latitude, request.observed.longitude)?;
    let route = request.route.into_polyline()?;

    let result = calculator.compute(&route, observed);
    debug!(
        "Chainage {:.1} m on a {}-point route",
        result.distance_meters,
        route.len()
    );
    Ok(Json(result))
}

async fn chainage_batch(
    State(state): State<AppState>,
    AppJson(request): AppJson<BatchChainageRequest>,
) -> Result<Json<BatchChainageResponse>, AppError> {
    let calculator = calculator_for(&state, request.snap_tolerance_meters)?;
    let observed = request
        .observed
        .iter()
        .map(|p| GeoPoint::try_new(p.latitude, p.longitude))
        .collect::<Result<Vec<_>, _>>()?;
    let route = request.route.into_polyline()?;

    // Not cancelled by the request timeout: the batch runs to completion
    // and its result is dropped.
    let results = tokio::task::spawn_blocking(move || calculator.compute_many(&route, &observed))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(BatchChainageResponse { results }))
}

async fn annotate(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnnotateRequest>,
) -> Result<Json<AnnotateResponse>, AppError> {
    let annotation = match request.location.filter(GeoPoint::is_valid) {
        Some(location) => {
            // A bad road does not fail the capture, it only loses its chainage
            let route = request
                .route
                .map(RouteInput::into_polyline)
                .transpose()
                .unwrap_or_else(|e| {
                    warn!("Ignoring unusable road geometry: {e}");
                    None
                });
            CaptureAnnotation::annotate(
                location,
                route.as_ref(),
                request.address,
                &state.calculator,
                Utc::now(),
            )
        }
        None => {
            warn!("Capture without a usable location");
            CaptureAnnotation::unavailable(Utc::now())
        }
    };

    Ok(Json(AnnotateResponse {
        formatted_chainage: annotation.formatted_chainage(),
        annotation,
    }))
}

fn calculator_for(
    state: &AppState,
    snap_tolerance_meters: Option<f64>,
) -> Result<ChainageCalculator, Error> {
    match snap_tolerance_meters {
        Some(tolerance) => ChainageCalculator::new(tolerance),
        None => Ok(state.calculator),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::*;

    fn app() -> Router {
        router(&ServerConfig::default()).unwrap()
    }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(uri, body.to_string()).await
    }

    async fn post_raw(uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn meridian() -> Value {
        json!([
            {"latitude": 0.0, "longitude": 0.0},
            {"latitude": 0.001, "longitude": 0.0},
            {"latitude": 0.002, "longitude": 0.0}
        ])
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn chainage_from_point_list() {
        let (status, body) = post_json(
            "/chainage",
            json!({"route": meridian(), "observed": {"latitude": 0.0015, "longitude": 0.0}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let distance = body["distanceMeters"].as_f64().unwrap();
        assert!((distance - 166.79).abs() < 0.01, "distance was {distance}");
        assert_eq!(body["snap"]["segmentIndex"], 1);
    }

    #[tokio::test]
    async fn chainage_from_geojson_and_overpass() {
        let geojson = json!({
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [0.0, 0.001], [0.0, 0.002]]
        });
        let overpass = json!({"elements": [{
            "type": "way",
            "id": 7,
            "geometry": [{"lat": 0.0, "lon": 0.0}, {"lat": 0.001, "lon": 0.0}, {"lat": 0.002, "lon": 0.0}]
        }]});

        let observed = json!({"latitude": 0.0015, "longitude": 0.0});
        let (_, from_points) =
            post_json("/chainage", json!({"route": meridian(), "observed": observed})).await;
        let (_, from_overpass) =
            post_json("/chainage", json!({"route": overpass, "observed": observed})).await;
        assert_eq!(from_points, from_overpass);

        let (status, from_geojson) = post_json(
            "/chainage",
            json!({"route": geojson, "observed": observed}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(from_geojson["distanceMeters"], from_points["distanceMeters"]);
    }

    #[tokio::test]
    async fn tolerance_override_and_validation() {
        let (status, body) = post_json(
            "/chainage",
            json!({
                "route": meridian(),
                "observed": {"latitude": 0.001, "longitude": 0.01},
                "snapToleranceMeters": 5000.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["snap"]["segmentIndex"], 0);

        let (status, body) = post_json(
            "/chainage",
            json!({
                "route": meridian(),
                "observed": {"latitude": 0.0, "longitude": 0.0},
                "snapToleranceMeters": -1.0
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("snap tolerance"));
    }

    #[tokio::test]
    async fn empty_overpass_response_is_bad_request() {
        let (status, body) = post_json(
            "/chainage",
            json!({"route": {"elements": []}, "observed": {"latitude": 0.0, "longitude": 0.0}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No roads found in the response");
    }

    #[tokio::test]
    async fn malformed_geojson_is_not_read_as_overpass() {
        let (status, body) = post_json(
            "/chainage",
            json!({
                "route": {"type": "LineString", "coordinates": "x"},
                "observed": {"latitude": 0.0, "longitude": 0.0}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert_ne!(message, "No roads found in the response");
    }

    #[tokio::test]
    async fn missing_field_is_json_bad_request() {
        let (status, body) = post_json("/chainage", json!({"route": meridian()})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("observed"));

        let (status, body) = post_json("/chainage/batch", json!({"observed": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unparsable_body_is_json_bad_request() {
        for uri in ["/chainage", "/chainage/batch", "/annotate"] {
            let (status, body) = post_raw(uri, "nope").await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn out_of_range_observation_is_bad_request() {
        let (status, _) = post_json(
            "/chainage",
            json!({"route": meridian(), "observed": {"latitude": 95.0, "longitude": 0.0}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn batch_keeps_order() {
        let (status, body) = post_json(
            "/chainage/batch",
            json!({
                "route": meridian(),
                "observed": [
                    {"latitude": 0.002, "longitude": 0.0},
                    {"latitude": 0.0, "longitude": 0.0},
                    {"latitude": 0.001, "longitude": 0.5}
                ]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert!((results[0]["distanceMeters"].as_f64().unwrap() - 222.39).abs() < 0.01);
        assert_eq!(results[1]["distanceMeters"], 0.0);
        assert!(results[2]["snap"].is_null());
    }

    #[tokio::test]
    async fn annotate_with_route_and_address() {
        let (status, body) = post_json(
            "/annotate",
            json!({
                "location": {"latitude": 0.0015, "longitude": 0.0},
                "route": meridian(),
                "address": "Bahnhofstraße 1"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "Bahnhofstraße 1");
        assert_eq!(body["formattedChainage"], "0.167 km");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn annotate_without_location_is_unavailable() {
        let (status, body) = post_json("/annotate", json!({"address": "ignored"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["address"], "Location unavailable");
        assert_eq!(body["chainageMeters"], 0.0);
        assert_eq!(body["location"]["latitude"], 0.0);
    }

    #[tokio::test]
    async fn annotate_ignores_broken_road() {
        let (status, body) = post_json(
            "/annotate",
            json!({
                "location": {"latitude": 54.3, "longitude": 10.1},
                "route": {"elements": []}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chainageMeters"], 0.0);
        assert_eq!(body["address"], "Unknown address");
        assert_eq!(body["formattedChainage"], "0.000 km");
    }
}
