//! HTTP handler functions for the AQI tracker API.

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, web};
use aqi_tracker_auth::Claims;
use aqi_tracker_dataset::RefreshOptions;
use aqi_tracker_server_models::{
    ApiAqiRecord, ApiError, ApiHealth, ApiMessage, AqiQueryParams, LoginRequest, LoginResponse,
};

use crate::AppState;

/// Validates the request's bearer token.
///
/// Missing tokens are a 401, invalid or expired ones a 403, matching
/// what the map client expects for its login redirect.
fn authorize(req: &HttpRequest, state: &AppState) -> Result<Claims, HttpResponse> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = aqi_tracker_auth::bearer_token(header_value)
        .map_err(|_| HttpResponse::Unauthorized().finish())?;

    aqi_tracker_auth::verify_token(token, &state.auth.secret).map_err(|e| {
        log::debug!("Rejected token: {e}");
        HttpResponse::Forbidden().finish()
    })
}

/// `GET /health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `POST /login`
///
/// Checks the supplied credentials against the configured operator
/// account and returns a bearer token.
pub async fn login(state: web::Data<AppState>, body: web::Json<LoginRequest>) -> HttpResponse {
    if body.username != state.auth.username || body.password != state.auth.password {
        return HttpResponse::Unauthorized().json(ApiMessage {
            message: "Invalid credentials".to_string(),
        });
    }

    match aqi_tracker_auth::issue_token(&body.username, &state.auth.secret) {
        Ok(token) => HttpResponse::Ok().json(LoginResponse { token }),
        Err(e) => {
            log::error!("Failed to issue token: {e}");
            HttpResponse::InternalServerError().json(ApiMessage {
                message: "Error issuing token".to_string(),
            })
        }
    }
}

/// `GET /getAqiData?refresh=<bool>`
///
/// Returns the enriched dataset. With `refresh=true` the CSV snapshot
/// is invalidated and every location is re-geocoded past the cache.
pub async fn get_aqi_data(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<AqiQueryParams>,
) -> HttpResponse {
    if let Err(resp) = authorize(&req, &state) {
        return resp;
    }

    let opts = RefreshOptions::from_force_refresh(params.refresh);

    match state.pipeline.build(opts).await {
        Ok(records) => {
            let api_records: Vec<ApiAqiRecord> =
                records.into_iter().map(ApiAqiRecord::from).collect();
            HttpResponse::Ok().json(api_records)
        }
        Err(e) => {
            log::error!("Failed to build AQI dataset: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                message: "Error fetching data".to_string(),
                error: e.to_string(),
            })
        }
    }
}

/// `POST /clearCache`
///
/// Drops both the CSV snapshot and every cached geocode result.
pub async fn clear_cache(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Err(resp) = authorize(&req, &state) {
        return resp;
    }

    state.geocode_cache.clear();
    state.snapshots.invalidate().await;
    log::info!("All caches cleared via API request");

    HttpResponse::Ok().json(ApiMessage {
        message: "Cache cleared successfully".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AuthConfig;
    use actix_web::{App, test};
    use aqi_tracker_dataset::pipeline::DEFAULT_BATCH_SIZE;
    use aqi_tracker_dataset::source::RowSource;
    use aqi_tracker_dataset::{AqiRow, DatasetError, EnrichmentPipeline, SnapshotCache};
    use aqi_tracker_geocoder::pacing::NoDelay;
    use aqi_tracker_geocoder::{
        GeoPoint, GeocodeCache, GeocodeError, GeocodeMatch, GeocodeResolver, Geocoder,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct FixedSource(Vec<AqiRow>);

    #[async_trait]
    impl RowSource for FixedSource {
        async fn fetch_rows(&self) -> Result<Vec<AqiRow>, DatasetError> {
            Ok(self.0.clone())
        }
    }

    struct FixedGeocoder;

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn search(&self, _query: &str) -> Result<Vec<GeocodeMatch>, GeocodeError> {
            Ok(vec![GeocodeMatch {
                lat: 28.6,
                lng: 77.2,
            }])
        }
    }

    fn test_state() -> web::Data<AppState> {
        let geocode_cache = Arc::new(GeocodeCache::new());
        let resolver = Arc::new(GeocodeResolver::new(
            Arc::new(FixedGeocoder),
            geocode_cache.clone(),
            Arc::new(NoDelay),
            GeoPoint {
                lat: 0.0,
                lng: 0.0,
                is_default: true,
            },
        ));
        let snapshots = Arc::new(SnapshotCache::new(Duration::from_secs(300)));
        let pipeline = Arc::new(EnrichmentPipeline::new(
            Arc::new(FixedSource(vec![AqiRow {
                customer_name: "Acme Corp".to_string(),
                location_name: "Noida".to_string(),
                aqi: 182,
            }])),
            snapshots.clone(),
            resolver,
            DEFAULT_BATCH_SIZE,
        ));

        web::Data::new(AppState {
            pipeline,
            snapshots,
            geocode_cache,
            auth: AuthConfig {
                secret: "test-secret".to_string(),
                username: "admin".to_string(),
                password: "admin".to_string(),
            },
        })
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .route("/login", web::post().to(login))
                    .route("/getAqiData", web::get().to(get_aqi_data))
                    .route("/clearCache", web::post().to(clear_cache)),
            )
            .await
        };
    }

    macro_rules! login_token {
        ($app:expr) => {{
            let req = test::TestRequest::post()
                .uri("/login")
                .set_json(serde_json::json!({"username": "admin", "password": "admin"}))
                .to_request();
            let body: serde_json::Value = test::call_and_read_body_json(&$app, req).await;
            body["token"].as_str().unwrap().to_string()
        }};
    }

    #[actix_web::test]
    async fn login_rejects_bad_credentials() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(serde_json::json!({"username": "admin", "password": "wrong"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn aqi_data_requires_a_token() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::get().uri("/getAqiData").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/getAqiData")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn aqi_data_returns_enriched_records() {
        let state = test_state();
        let app = test_app!(state);
        let token = login_token!(app);

        let req = test::TestRequest::get()
            .uri("/getAqiData")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["customerName"], "Acme Corp");
        assert_eq!(records[0]["location"], "Noida");
        assert_eq!(records[0]["aqi"], 182);
        assert_eq!(records[0]["isDefaultLocation"], false);
    }

    #[actix_web::test]
    async fn clear_cache_empties_both_caches() {
        let state = test_state();
        let app = test_app!(state);
        let token = login_token!(app);

        let req = test::TestRequest::get()
            .uri("/getAqiData")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        test::call_service(&app, req).await;
        assert!(!state.geocode_cache.is_empty());

        let req = test::TestRequest::post()
            .uri("/clearCache")
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert!(state.geocode_cache.is_empty());
        assert!(state.snapshots.fetched_at().await.is_none());
    }
}
