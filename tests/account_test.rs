mod common;

use common::{assert_no_errors, error_code, setup, PASSWORD};
use harusmile::database::entities::users;
use harusmile::errors::{CoreError, CoreErrorKind};
use harusmile::services::VERIFICATION_SUBJECT;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use serde_json::json;

const CREATE_USER: &str = r#"
    mutation CreateUser($input: CreateUserInput!) {
        createUser(input: $input) {
            user { id email isActive }
            clientMutationId
        }
    }
"#;

const UPDATE_USER: &str = r#"
    mutation UpdateUser($token: String!) {
        updateUser(input: { token: $token }) { ok }
    }
"#;

const TOKEN_AUTH: &str = r#"
    mutation TokenAuth($email: String!, $password: String!) {
        tokenAuth(email: $email, password: $password) {
            token
            refreshToken
            refreshExpiresIn
            payload { email exp origIat }
        }
    }
"#;

fn token_from_link(body: &str) -> String {
    let start = body.find("token=").expect("mail contains a token") + "token=".len();
    body[start..]
        .chars()
        .take_while(|c| *c != '&' && *c != '"' && !c.is_whitespace())
        .collect()
}

#[tokio::test]
async fn create_user_stores_hash_and_mails_verification() -> anyhow::Result<()> {
    let app = setup().await?;

    let response = app
        .execute(
            CREATE_USER,
            json!({ "input": { "email": "hanako@example.com", "password": PASSWORD, "clientMutationId": "m1" } }),
            None,
        )
        .await;
    assert_no_errors(&response);

    let payload = &response["data"]["createUser"];
    assert_eq!(payload["user"]["email"], "hanako@example.com");
    assert_eq!(payload["user"]["isActive"], false);
    assert_eq!(payload["clientMutationId"], "m1");

    let stored = users::Entity::find()
        .filter(users::Column::Email.eq("hanako@example.com"))
        .one(&app.db)
        .await?
        .expect("user row");
    assert_ne!(stored.password_hash, PASSWORD);
    assert!(stored.password_hash.starts_with("$2"));
    assert!(bcrypt::verify(PASSWORD, &stored.password_hash)?);

    let sent = app.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "hanako@example.com");
    assert_eq!(sent[0].subject, VERIFICATION_SUBJECT);
    assert!(sent[0].html_body.contains("http://localhost:3000/auth/verify?token="));

    Ok(())
}

#[tokio::test]
async fn duplicate_and_invalid_registrations_are_rejected() -> anyhow::Result<()> {
    let app = setup().await?;
    app.active_user("taro@example.com").await;

    let response = app
        .execute(
            CREATE_USER,
            json!({ "input": { "email": "taro@example.com", "password": PASSWORD } }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("CONFLICT"));

    let response = app
        .execute(
            CREATE_USER,
            json!({ "input": { "email": "not-an-email", "password": PASSWORD } }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));

    let response = app
        .execute(
            CREATE_USER,
            json!({ "input": { "email": "jiro@example.com", "password": "short" } }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));
    assert!(app.mailer.sent().await.is_empty());

    Ok(())
}

#[tokio::test]
async fn unique_email_violation_is_a_conflict() -> anyhow::Result<()> {
    let app = setup().await?;
    let existing = app.active_user("taro@example.com").await;

    // Bypasses the service lookup and hits the unique index directly
    let err = users::ActiveModel::new(existing.email.clone(), "hash".to_string())
        .insert(&app.db)
        .await
        .expect_err("duplicate email");
    assert_eq!(CoreError::from(err).kind(), CoreErrorKind::Conflict);

    let accounts = &app.context.account_service;
    let (first, second) = tokio::join!(
        accounts.register("hanako@example.com", PASSWORD),
        accounts.register("hanako@example.com", PASSWORD),
    );
    let failure = match (first, second) {
        (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
        other => panic!("expected exactly one registration to succeed: {:?}", other),
    };
    assert_eq!(failure.kind(), CoreErrorKind::Conflict);

    Ok(())
}

#[tokio::test]
async fn verification_token_activates_once() -> anyhow::Result<()> {
    let app = setup().await?;

    app.execute(
        CREATE_USER,
        json!({ "input": { "email": "hanako@example.com", "password": PASSWORD } }),
        None,
    )
    .await;

    // Inactive accounts cannot log in yet
    let response = app
        .execute(
            TOKEN_AUTH,
            json!({ "email": "hanako@example.com", "password": PASSWORD }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let mail = app.mailer.sent().await.remove(0);
    let token = token_from_link(&mail.html_body);

    let response = app.execute(UPDATE_USER, json!({ "token": token }), None).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["updateUser"]["ok"], true);

    let response = app.execute(UPDATE_USER, json!({ "token": token }), None).await;
    assert_eq!(error_code(&response), Some("BAD_REQUEST"));

    let response = app
        .execute(UPDATE_USER, json!({ "token": "garbage" }), None)
        .await;
    assert_eq!(error_code(&response), Some("BAD_REQUEST"));

    let response = app
        .execute(
            TOKEN_AUTH,
            json!({ "email": "hanako@example.com", "password": PASSWORD }),
            None,
        )
        .await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["tokenAuth"]["payload"]["email"],
        "hanako@example.com"
    );

    Ok(())
}

#[tokio::test]
async fn token_auth_refresh_and_revoke() -> anyhow::Result<()> {
    let app = setup().await?;
    let user = app.active_user("taro@example.com").await;

    let response = app
        .execute(
            TOKEN_AUTH,
            json!({ "email": "taro@example.com", "password": "wrong-password" }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let response = app
        .execute(
            TOKEN_AUTH,
            json!({ "email": "taro@example.com", "password": PASSWORD }),
            None,
        )
        .await;
    assert_no_errors(&response);
    let auth = &response["data"]["tokenAuth"];
    assert_eq!(auth["refreshExpiresIn"], 7 * 24 * 60 * 60);
    let access = auth["token"].as_str().expect("access token").to_string();
    let refresh = auth["refreshToken"].as_str().expect("refresh token").to_string();

    // The access token identifies the user
    let actor = app.context.auth_service.actor_for_token(&access).await;
    assert_eq!(actor.user_id, Some(user.id));

    let refresh_query = r#"
        mutation Refresh($token: String!) {
            refreshToken(refreshToken: $token) { token refreshToken }
        }
    "#;
    let response = app.execute(refresh_query, json!({ "token": refresh }), None).await;
    assert_no_errors(&response);
    let rotated = response["data"]["refreshToken"]["refreshToken"]
        .as_str()
        .expect("rotated token")
        .to_string();
    assert_ne!(rotated, refresh);

    // The old refresh token was revoked by the rotation
    let response = app.execute(refresh_query, json!({ "token": refresh }), None).await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let revoke_query = r#"
        mutation Revoke($token: String!) {
            revokeToken(refreshToken: $token) { revoked }
        }
    "#;
    let response = app.execute(revoke_query, json!({ "token": rotated }), None).await;
    assert_no_errors(&response);
    assert!(response["data"]["revokeToken"]["revoked"].as_i64().unwrap_or_default() > 0);

    let response = app.execute(refresh_query, json!({ "token": rotated }), None).await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let response = app
        .execute(revoke_query, json!({ "token": "unknown" }), None)
        .await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    Ok(())
}

#[tokio::test]
async fn login_user_requires_a_caller() -> anyhow::Result<()> {
    let app = setup().await?;
    let user = app.active_user("taro@example.com").await;
    let query = "{ loginUser { email } }";

    let response = app.execute(query, json!({}), None).await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let response = app.execute(query, json!({}), Some(&user)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUser"]["email"], "taro@example.com");

    Ok(())
}

#[tokio::test]
async fn invalid_access_token_resolves_to_anonymous() -> anyhow::Result<()> {
    let app = setup().await?;
    let actor = app.context.auth_service.actor_for_token("not-a-jwt").await;
    assert!(!actor.is_authenticated());
    Ok(())
}
