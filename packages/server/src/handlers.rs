//! HTTP handler functions for the dashboard.

use actix_web::{HttpResponse, http::header::ContentType, web};
use ipc_dashboard_analytics::filter;
use ipc_dashboard_server_models::{ApiError, ApiHealth, DashboardQuery};

use crate::{AppState, DashboardData, page};

type QueryPairs = web::Query<Vec<(String, String)>>;

fn unavailable(reason: &str) -> HttpResponse {
    HttpResponse::ServiceUnavailable().json(ApiError {
        error: format!("Crime data unavailable: {reason}"),
    })
}

/// `GET /`
///
/// Renders the dashboard page for the query's selection.
pub async fn index(state: web::Data<AppState>, params: QueryPairs) -> HttpResponse {
    let query = DashboardQuery::from_pairs(params.into_inner());

    match page::render_page(&state.data, &query, state.chart_size) {
        Ok(html) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(html),
        Err(e) => {
            log::error!("Failed to render dashboard page: {e}");
            HttpResponse::InternalServerError().json(ApiError {
                error: format!("Failed to render dashboard: {e}"),
            })
        }
    }
}

/// `GET /api/health`
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        data_available: matches!(state.data, DashboardData::Ready(_)),
        records: state.data.records().map_or(0, <[_]>::len),
    })
}

/// `GET /api/summary`
///
/// Returns every aggregate series for the query's selection.
pub async fn summary(state: web::Data<AppState>, params: QueryPairs) -> HttpResponse {
    let records = match &state.data {
        DashboardData::Ready(records) => records,
        DashboardData::Unavailable { reason } => return unavailable(reason),
    };

    let query = DashboardQuery::from_pairs(params.into_inner());
    let selection = query.selection(state.data.year_range());

    HttpResponse::Ok().json(ipc_dashboard_analytics::summarize(records, &selection))
}

/// `GET /api/options`
///
/// Lists selectable years, states and districts. Districts narrow to the
/// states given in the query.
pub async fn options(state: web::Data<AppState>, params: QueryPairs) -> HttpResponse {
    let records = match &state.data {
        DashboardData::Ready(records) => records,
        DashboardData::Unavailable { reason } => return unavailable(reason),
    };

    let query = DashboardQuery::from_pairs(params.into_inner());
    let selection = query.selection(state.data.year_range());

    HttpResponse::Ok().json(filter::selector_options(records, &selection.states))
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use ipc_dashboard_crime_models::{Coordinates, CrimeRecord, OffenseCounts};
    use serde_json::Value;

    use crate::{AppState, DashboardData, configure};

    fn records() -> Vec<CrimeRecord> {
        vec![
            CrimeRecord::new(2011, "KERALA", "KOLLAM", 10, OffenseCounts::new([1; 6]))
                .with_coordinates(Coordinates::new(10.0, 76.0)),
            CrimeRecord::new(2012, "KERALA", "ERNAKULAM", 20, OffenseCounts::new([2; 6]))
                .with_coordinates(Coordinates::new(10.0, 76.0)),
            CrimeRecord::new(2012, "GOA", "NORTH GOA", 30, OffenseCounts::new([3; 6])),
        ]
    }

    macro_rules! app {
        ($data:expr) => {
            test::init_service(
                App::new()
                    .app_data(actix_web::web::Data::new(AppState::new($data)))
                    .configure(configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn health_reports_record_count() {
        let app = app!(DashboardData::ready(records()));
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["healthy"], true);
        assert_eq!(body["dataAvailable"], true);
        assert_eq!(body["records"], 3);
    }

    #[actix_web::test]
    async fn summary_applies_query_selection() {
        let app = app!(DashboardData::ready(records()));
        let req = test::TestRequest::get()
            .uri("/api/summary?start_year=2011&end_year=2012&state=KERALA&district=KOLLAM&district=ERNAKULAM")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["selectedRecords"], 2);
        assert_eq!(body["yearRangeRecords"], 3);
        assert_eq!(body["yearlyTotals"].as_array().map(Vec::len), Some(2));
    }

    #[actix_web::test]
    async fn options_narrow_districts_to_states() {
        let app = app!(DashboardData::ready(records()));
        let req = test::TestRequest::get()
            .uri("/api/options?state=GOA")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["districts"], serde_json::json!(["NORTH GOA"]));
        assert_eq!(body["states"], serde_json::json!(["GOA", "KERALA"]));
    }

    #[actix_web::test]
    async fn api_reports_unavailable_data() {
        let app = app!(DashboardData::unavailable("connection refused"));
        let req = test::TestRequest::get().uri("/api/summary").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn index_renders_html_page() {
        let app = app!(DashboardData::ready(records()));
        let req = test::TestRequest::get()
            .uri("/?state=KERALA&district=KOLLAM")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("<svg"));
        assert!(html.contains("Police"));
        assert!(html.contains("data-kind=\"protection_map\""));
        assert!(html.contains("KOLLAM (0.64)"));
    }
}
