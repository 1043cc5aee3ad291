use std::sync::Arc;

use anyhow::{Context, Result};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use super::handlers::health;
use crate::auth::{bearer_token, Actor};
use crate::config::AppConfig;
use crate::graphql::{build_schema, GraphQLContext, GraphQLSchema};
use crate::services::{AuthService, Mailer};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub graphql_schema: GraphQLSchema,
    pub auth_service: Arc<AuthService>,
}

pub async fn create_app(db: DatabaseConnection, config: AppConfig, mailer: Arc<dyn Mailer>) -> Result<Router> {
    let cors = cors_layer(config.cors_origin.as_deref())?;
    let media_root = config.media_root.clone();

    let context = GraphQLContext::new(db.clone(), config, mailer);
    let state = AppState {
        db,
        auth_service: context.auth_service.clone(),
        graphql_schema: build_schema(context),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/graphql",
            get(graphql_playground)
                .post(graphql_handler)
                .options(|| async { StatusCode::OK }),
        )
        .nest_service("/media", ServeDir::new(media_root))
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn cors_layer(cors_origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let layer = match cors_origin {
        Some(origin) => {
            let origin = origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))?;
            layer.allow_origin(origin)
        }
        None => layer.allow_origin(Any),
    };

    Ok(layer)
}

/// Executes a GraphQL request (JSON or multipart) as the caller named by the
/// `Authorization` header.
async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token);

    let actor = match token {
        Some(token) => state.auth_service.actor_for_token(token).await,
        None => Actor::anonymous(),
    };

    tracing::debug!("GraphQL request received (user {:?})", actor.user_id);
    let response = state
        .graphql_schema
        .execute(request.into_inner().data(actor))
        .await;
    tracing::debug!("GraphQL request completed");

    response.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
