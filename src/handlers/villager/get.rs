use axum::{extract::State, Json};
use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
};
use std::sync::Arc;

use super::helper::villager_by_id;
use crate::{
    auth::AdminClaims,
    constants::*,
    models::{Villager, VillagerListParams, VillagerListResponse, VillagerResponse},
    state::AppState,
    utils::{AppError, ValidatedPath, ValidatedQuery},
};

/// List villagers
///
/// Optionally filtered by village and panchayat, newest first
#[utoipa::path(
    get,
    path = "/api/villagers",
    params(VillagerListParams),
    responses(
        (status = 200, description = "List of villagers", body = VillagerListResponse),
        (status = 401, description = "Invalid token", body = crate::models::ErrorResponse),
        (status = 403, description = "Not an admin session", body = crate::models::ErrorResponse)
    ),
    tag = "Villager API",
    security(("authorization" = []))
)]
pub async fn list_villagers_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedQuery(params): ValidatedQuery<VillagerListParams>,
) -> Result<Json<VillagerListResponse>, AppError> {
    let mut filter = Document::new();
    if let Some(village) = &params.village {
        filter.insert("village", village.trim());
    }
    if let Some(panchayat) = &params.panchayat {
        filter.insert("panchayat", panchayat.trim());
    }
    let options = page_options(params.page_index, params.page_size, doc! {"id": -1});
    let data = state
        .db
        .find::<Villager>(DB_NAME, COLL_VILLAGERS, Some(filter), Some(options))
        .await?;
    let res = VillagerListResponse {
        success: true,
        data,
    };
    Ok(Json(res))
}

/// Get villager by id
#[utoipa::path(
    get,
    path = "/api/villagers/{id}",
    params(("id" = u32, Path, description = "villager id")),
    responses(
        (status = 200, description = "Villager record", body = VillagerResponse),
        (status = 404, description = "Villager not found", body = crate::models::ErrorResponse)
    ),
    tag = "Villager API",
    security(("authorization" = []))
)]
pub async fn get_villager_handler(
    State(state): State<Arc<AppState>>,
    _admin: AdminClaims,
    ValidatedPath(id): ValidatedPath<u32>,
) -> Result<Json<VillagerResponse>, AppError> {
    let villager = villager_by_id(&state.db, id).await?;
    let res = VillagerResponse {
        success: true,
        data: villager,
    };
    Ok(Json(res))
}

/// Find options for one page of results
pub fn page_options(page_index: Option<u64>, page_size: Option<u64>, sort: Document) -> FindOptions {
    let limit = page_size
        .and_then(|size| i64::try_from(size).ok())
        .filter(|size| *size > 0)
        .unwrap_or(DEFAULT_QUERY_LIMIT)
        .min(DEFAULT_QUERY_LIMIT);
    let skip = page_index.unwrap_or_default().saturating_mul(limit as u64);
    let mut options = FindOptions::default();
    options.sort = Some(sort);
    options.limit = Some(limit);
    options.skip = Some(skip);
    options
}

#[cfg(test)]
mod tests {
    use axum::{http::Method, http::StatusCode, routing::get, Router};
    use mockall::predicate::{eq, function};
    use tower::ServiceExt;

    use super::*;
    use crate::{database::MockAppDatabase, models::ErrorResponse, state::test_support::*};

    fn app(state: Arc<AppState>) -> Router {
        Router::new()
            .route("/api/villagers", get(list_villagers_handler))
            .route("/api/villagers/:id", get(get_villager_handler))
            .with_state(state)
    }

    #[test]
    fn test_page_options() {
        let options = page_options(Some(2), Some(10), doc! {"id": -1});
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.skip, Some(20));
        let options = page_options(None, Some(0), doc! {"id": -1});
        assert_eq!(options.limit, Some(DEFAULT_QUERY_LIMIT));
        assert_eq!(options.skip, Some(0));
        let options = page_options(None, Some(50_000), doc! {"id": -1});
        assert_eq!(options.limit, Some(DEFAULT_QUERY_LIMIT));
    }

    #[tokio::test]
    async fn test_list_villagers_with_filter() {
        let mut mock_db = MockAppDatabase::default();
        let filter = Some(doc! {"panchayat": "Rampur GP"});
        mock_db
            .expect_find::<Villager>()
            .with(
                eq(DB_NAME),
                eq(COLL_VILLAGERS),
                eq(filter),
                function(|options: &Option<FindOptions>| {
                    options.as_ref().and_then(|o| o.limit) == Some(5)
                }),
            )
            .times(1)
            .returning(|_, _, _, _| Ok(vec![sample_villager(2), sample_villager(1)]));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let uri = "/api/villagers?panchayat=Rampur%20GP&pageSize=5";
        let req = build_request(Method::GET, uri, Some(&token), None);
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: VillagerListResponse = read_json(res).await;
        assert_eq!(res.data.len(), 2);
        assert_eq!(res.data[0].id, 2);
    }

    #[tokio::test]
    async fn test_list_villagers_requires_token() {
        let state = test_state(MockAppDatabase::default());
        let req = build_request(Method::GET, "/api/villagers", None, None);
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let res: ErrorResponse = read_json(res).await;
        assert_eq!(res.code, "MISSING_TOKEN");
    }

    #[tokio::test]
    async fn test_get_villager_not_found() {
        let mut mock_db = MockAppDatabase::default();
        mock_db
            .expect_find_one::<Villager>()
            .times(1)
            .returning(|_, _, _, _| Ok(None));
        let state = test_state(mock_db);
        let token = admin_token(&state);
        let req = build_request(Method::GET, "/api/villagers/99", Some(&token), None);
        let res = app(state).oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
