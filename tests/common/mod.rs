#![allow(dead_code)]

use std::io::{Seek, Write};
use std::sync::Arc;

use async_graphql::{Request, Response, UploadValue, Variables};
use harusmile::auth::Actor;
use harusmile::config::AppConfig;
use harusmile::database::entities::users;
use harusmile::database::connect_and_migrate;
use harusmile::graphql::global_id::to_global_id;
use harusmile::graphql::{build_schema, GraphQLContext, GraphQLSchema};
use harusmile::services::{AuthService, MemoryMailer};
use sea_orm::{ActiveModelTrait, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;

pub const PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub schema: GraphQLSchema,
    pub context: GraphQLContext,
    pub mailer: Arc<MemoryMailer>,
    pub config: AppConfig,
    pub media: TempDir,
}

pub fn test_config(media: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.database = ":memory:".to_string();
    config.media_root = media.path().to_path_buf();
    config.auth.jwt_secret = Some("integration-test-secret".to_string());
    config.auth.password_hash_cost = 4;
    config
}

pub async fn setup() -> anyhow::Result<TestApp> {
    let db = connect_and_migrate(":memory:").await?;

    let media = tempfile::tempdir()?;
    let config = test_config(&media);
    let mailer = Arc::new(MemoryMailer::new());

    let context = GraphQLContext::new(db.clone(), config.clone(), mailer.clone());
    let schema = build_schema(context.clone());

    Ok(TestApp {
        db,
        schema,
        context,
        mailer,
        config,
        media,
    })
}

impl TestApp {
    /// Executes `query` as `actor` and returns the response serialized to JSON.
    pub async fn execute(&self, query: &str, variables: Value, actor: Option<&users::Model>) -> Value {
        self.run(request(query, variables, actor)).await
    }

    /// Executes `query` with `bytes` attached as the upload at `var_path`,
    /// e.g. `variables.input.profileImage`.
    pub async fn execute_with_upload(
        &self,
        query: &str,
        variables: Value,
        var_path: &str,
        filename: &str,
        bytes: &[u8],
        actor: Option<&users::Model>,
    ) -> Value {
        let mut content = tempfile::tempfile().expect("upload file");
        content.write_all(bytes).expect("write upload");
        content.rewind().expect("rewind upload");

        let mut request = request(query, variables, actor);
        request.set_upload(
            var_path,
            UploadValue {
                filename: filename.to_string(),
                content_type: Some("image/png".to_string()),
                content,
            },
        );
        self.run(request).await
    }

    async fn run(&self, request: Request) -> Value {
        let response: Response = self.schema.execute(request).await;
        serde_json::to_value(&response).expect("response serializes")
    }

    /// Inserts an already verified account.
    pub async fn active_user(&self, email: &str) -> users::Model {
        let hash = AuthService::hash_password(PASSWORD, 4).expect("hash");
        users::ActiveModel::new(email.to_string(), hash)
            .activate()
            .insert(&self.db)
            .await
            .expect("insert user")
    }

    pub async fn staff_user(&self, email: &str) -> users::Model {
        self.context
            .auth_service
            .create_superuser(email, PASSWORD)
            .await
            .expect("create superuser")
    }
}

fn request(query: &str, variables: Value, actor: Option<&users::Model>) -> Request {
    let actor = match actor {
        Some(user) => Actor::user(user.id).with_staff(user.is_staff),
        None => Actor::anonymous(),
    };
    Request::new(query)
        .variables(Variables::from_json(variables))
        .data(actor)
}

pub fn gid(type_name: &str, pk: i32) -> String {
    to_global_id(type_name, pk).0
}

pub fn error_code(response: &Value) -> Option<&str> {
    response["errors"][0]["extensions"]["code"].as_str()
}

pub fn assert_no_errors(response: &Value) {
    assert!(
        response.get("errors").map_or(true, |errors| errors.is_null()),
        "unexpected errors: {}",
        response["errors"]
    );
}
