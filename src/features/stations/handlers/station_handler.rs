use axum::{
    extract::{Query, State},
    Json,
};
use validator::Validate;

use crate::core::error::Result;
use crate::features::stations::dtos::{NearbyStationsQuery, StationResponseDto};
use crate::features::stations::routes::StationState;
use crate::shared::types::{ApiResponse, Meta};

/// List police stations near a point, nearest first
#[utoipa::path(
    get,
    path = "/api/police/stations",
    params(NearbyStationsQuery),
    responses(
        (status = 200, description = "Nearby police stations", body = ApiResponse<Vec<StationResponseDto>>),
        (status = 400, description = "Invalid coordinates or radius")
    ),
    tag = "stations"
)]
pub async fn list_nearby_stations(
    State(state): State<StationState>,
    Query(query): Query<NearbyStationsQuery>,
) -> Result<Json<ApiResponse<Vec<StationResponseDto>>>> {
    query.validate()?;

    let radius = query.radius.unwrap_or(state.default_radius_meters);
    let stations = state.locator.nearest(&query.point(), radius).await?;
    let total = stations.len() as i64;
    let dtos: Vec<StationResponseDto> = stations.into_iter().map(Into::into).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::stations::routes;
    use crate::features::stations::services::StationDirectory;
    use crate::shared::types::ApiResponse;
    use axum_test::TestServer;
    use std::sync::Arc;

    use super::StationResponseDto;

    fn server() -> TestServer {
        let app = routes::routes(Arc::new(StationDirectory::builtin()), 5_000.0);
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_list_nearby_stations_sorted_by_distance() {
        let response = server()
            .get("/api/police/stations")
            .add_query_param("lat", 12.97)
            .add_query_param("lon", 77.59)
            .add_query_param("radius", 2000)
            .await;

        response.assert_status_ok();
        let body: ApiResponse<Vec<StationResponseDto>> = response.json();
        let stations = body.data.unwrap();
        assert!(!stations.is_empty());
        assert!(stations.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!(stations.iter().all(|s| s.distance <= 2_000.0));
    }

    #[tokio::test]
    async fn test_list_nearby_stations_rejects_bad_latitude() {
        let response = server()
            .get("/api/police/stations")
            .add_query_param("lat", 200)
            .add_query_param("lon", 77.59)
            .await;

        response.assert_status_bad_request();
    }
}
