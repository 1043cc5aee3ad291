mod common;

use common::{assert_no_errors, error_code, gid, setup, TestApp};
use harusmile::database::entities::users;
use serde_json::{json, Value};

const CREATE_PLAN: &str = r#"
    mutation CreatePlan($input: CreatePlanInput!) {
        createPlan(input: $input) {
            plan { id title price isPublished planAuthor { email } }
        }
    }
"#;

async fn create_plan(app: &TestApp, author: &users::Model, title: &str) -> String {
    let response = app
        .execute(
            CREATE_PLAN,
            json!({
                "input": {
                    "title": title,
                    "content": "志望校の選び方を一緒に考えます",
                    "isPublished": true,
                    "price": 1500,
                }
            }),
            Some(author),
        )
        .await;
    assert_no_errors(&response);
    response["data"]["createPlan"]["plan"]["id"]
        .as_str()
        .expect("plan id")
        .to_string()
}

async fn create_room(app: &TestApp, caller: &users::Model, plan_id: &str, opponent: &users::Model) -> Value {
    app.execute(
        r#"
        mutation CreateTalkRoom($input: CreateTalkRoomInput!) {
            createTalkRoom(input: $input) {
                talkRoom { id isApproved talkRoomDescription selectedPlan { title } opponentUser { email } }
            }
        }
        "#,
        json!({
            "input": {
                "selectedPlan": plan_id,
                "opponentUser": gid("UserNode", opponent.id),
                "talkRoomDescription": "相談させてください",
            }
        }),
        Some(caller),
    )
    .await
}

fn room_id(response: &Value) -> String {
    response["data"]["createTalkRoom"]["talkRoom"]["id"]
        .as_str()
        .expect("room id")
        .to_string()
}

async fn set_approval(app: &TestApp, caller: &users::Model, room_id: &str, approve: bool) -> Value {
    app.execute(
        r#"
        mutation UpdateTalkRoom($input: UpdateTalkRoomInput!) {
            updateTalkRoom(input: $input) { talkRoom { isApproved } }
        }
        "#,
        json!({ "input": { "talkRoomId": room_id, "isApprove": approve } }),
        Some(caller),
    )
    .await
}

async fn send_message(app: &TestApp, caller: &users::Model, room_id: &str, text: &str) -> Value {
    app.execute(
        r#"
        mutation CreateMessage($input: CreateMessageInput!) {
            createMessage(input: $input) {
                message { id text isViewed sender { email } talkingRoom { id } }
            }
        }
        "#,
        json!({ "input": { "talkingRoomId": room_id, "text": text } }),
        Some(caller),
    )
    .await
}

#[tokio::test]
async fn plans_are_owned_by_their_author() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;
    let other = app.active_user("other@example.com").await;

    let response = app
        .execute(
            CREATE_PLAN,
            json!({ "input": { "title": "英語", "content": "", "isPublished": true, "price": 100 } }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let mine = create_plan(&app, &author, "英語の勉強法").await;
    create_plan(&app, &other, "数学の勉強法").await;

    let response = app
        .execute(
            "{ loginUserPlans { totalCount edges { node { title planAuthor { email } } } } }",
            json!({}),
            Some(&author),
        )
        .await;
    assert_no_errors(&response);
    let plans = &response["data"]["loginUserPlans"];
    assert_eq!(plans["totalCount"], 1);
    assert_eq!(plans["edges"][0]["node"]["title"], "英語の勉強法");
    assert_eq!(
        plans["edges"][0]["node"]["planAuthor"]["email"],
        "provider@example.com"
    );

    let update = r#"
        mutation UpdatePlan($input: UpdatePlanInput!) {
            updatePlan(input: $input) { plan { title price } }
        }
    "#;
    let input = json!({
        "input": { "id": mine, "title": "英語長文の読み方", "content": "", "price": 2000, "isPublished": true }
    });

    let response = app.execute(update, input.clone(), Some(&other)).await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = app.execute(update, input, Some(&author)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["updatePlan"]["plan"]["title"], "英語長文の読み方");
    assert_eq!(response["data"]["updatePlan"]["plan"]["price"], 2000);

    Ok(())
}

#[tokio::test]
async fn plan_image_survives_updates_without_upload() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;

    let response = app
        .execute_with_upload(
            r#"
            mutation CreatePlan($input: CreatePlanInput!) {
                createPlan(input: $input) { plan { id planImage } }
            }
            "#,
            json!({
                "input": {
                    "title": "essay",
                    "content": "小論文の添削",
                    "isPublished": true,
                    "price": 1000,
                    "planImage": null,
                }
            }),
            "variables.input.planImage",
            "cover.JPG",
            b"cover",
            Some(&author),
        )
        .await;
    assert_no_errors(&response);
    let plan = &response["data"]["createPlan"]["plan"];
    let expected = format!("todos/{}essay.jpg", author.id);
    assert_eq!(plan["planImage"], expected.as_str());
    let id = plan["id"].as_str().expect("plan id").to_string();
    assert_eq!(std::fs::read(app.config.media_root.join(&expected))?, b"cover");

    let response = app
        .execute(
            r#"
            mutation UpdatePlan($input: UpdatePlanInput!) {
                updatePlan(input: $input) { plan { price planImage } }
            }
            "#,
            json!({
                "input": { "id": id, "title": "essay", "content": "", "price": 1200, "isPublished": true }
            }),
            Some(&author),
        )
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["updatePlan"]["plan"]["price"], 1200);
    assert_eq!(response["data"]["updatePlan"]["plan"]["planImage"], expected.as_str());
    assert_eq!(std::fs::read(app.config.media_root.join(&expected))?, b"cover");

    Ok(())
}

#[tokio::test]
async fn plan_price_is_bounded() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;

    for price in [-1, 32_768] {
        let response = app
            .execute(
                CREATE_PLAN,
                json!({ "input": { "title": "高すぎる", "content": "", "isPublished": true, "price": price } }),
                Some(&author),
            )
            .await;
        assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));
        assert_eq!(response["errors"][0]["extensions"]["field"], "price");
    }

    Ok(())
}

#[tokio::test]
async fn deleted_plan_leaves_listings() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;
    let plan = create_plan(&app, &author, "英語の勉強法").await;
    create_plan(&app, &author, "数学の勉強法").await;

    let response = app
        .execute(
            r#"
            mutation DeletePlan($input: DeletePlanInput!) {
                deletePlan(input: $input) { plan { title } clientMutationId }
            }
            "#,
            json!({ "input": { "id": plan, "clientMutationId": "d1" } }),
            Some(&author),
        )
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["deletePlan"]["plan"]["title"], "英語の勉強法");
    assert_eq!(response["data"]["deletePlan"]["clientMutationId"], "d1");

    let response = app
        .execute("{ allPlans { totalCount edges { node { title } } } }", json!({}), None)
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["allPlans"]["totalCount"], 1);
    assert_eq!(
        response["data"]["allPlans"]["edges"][0]["node"]["title"],
        "数学の勉強法"
    );

    let response = app
        .execute(
            "query Plan($id: ID!) { plan(id: $id) { title } }",
            json!({ "id": plan }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));

    Ok(())
}

#[tokio::test]
async fn plan_title_filter_matches_wildcards_literally() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;
    create_plan(&app, &author, "plain title").await;
    create_plan(&app, &author, "100% pass_rate").await;

    let query = r#"
        query Plans($fragment: String) {
            allPlans(filter: { titleIcontains: $fragment }) { totalCount edges { node { title } } }
        }
    "#;
    for (fragment, expected) in [("PLAIN", 1), ("Title", 1), ("%", 1), ("_", 1), ("0%", 1), ("n_t", 0), ("x", 0)] {
        let response = app.execute(query, json!({ "fragment": fragment }), None).await;
        assert_no_errors(&response);
        assert_eq!(
            response["data"]["allPlans"]["totalCount"], expected,
            "fragment {:?}",
            fragment
        );
    }

    let response = app.execute(query, json!({ "fragment": "_" }), None).await;
    assert_eq!(
        response["data"]["allPlans"]["edges"][0]["node"]["title"],
        "100% pass_rate"
    );

    Ok(())
}

#[tokio::test]
async fn private_relations_require_a_login() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;
    let customer = app.active_user("customer@example.com").await;
    let plan = create_plan(&app, &author, "英語の勉強法").await;
    let room = room_id(&create_room(&app, &customer, &plan, &customer).await);
    assert_no_errors(&send_message(&app, &customer, &room, "secret chat").await);

    let nested = "{ allPlans { edges { node { talkRooms { messages { text sender { email } } } } } } }";
    let response = app.execute(nested, json!({}), None).await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));
    assert!(!response.to_string().contains("secret chat"));

    let response = app
        .execute(
            "query Room($id: ID!) { plan(id: $id) { title talkRooms { id } } }",
            json!({ "id": plan }),
            None,
        )
        .await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let response = app.execute(nested, json!({}), Some(&author)).await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["allPlans"]["edges"][0]["node"]["talkRooms"][0]["messages"],
        json!([{ "text": "secret chat", "sender": { "email": "customer@example.com" } }])
    );

    Ok(())
}

#[tokio::test]
async fn reviews_validate_stars_and_reviewer() -> anyhow::Result<()> {
    let app = setup().await?;
    let provider = app.active_user("provider@example.com").await;
    let customer = app.active_user("customer@example.com").await;

    let create = r#"
        mutation CreateReview($input: CreateReviewInput!) {
            createReview(input: $input) {
                review { stars reviewText provider { email } customer { email } }
            }
        }
    "#;

    for stars in [0, 6] {
        let response = app
            .execute(
                create,
                json!({ "input": { "provider": gid("UserNode", provider.id), "reviewText": "良い", "stars": stars } }),
                Some(&customer),
            )
            .await;
        assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));
    }

    let response = app
        .execute(
            create,
            json!({ "input": { "provider": gid("UserNode", customer.id), "reviewText": "自画自賛", "stars": 5 } }),
            Some(&customer),
        )
        .await;
    assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));

    let response = app
        .execute(
            create,
            json!({ "input": { "provider": gid("UserNode", provider.id), "reviewText": "とても丁寧でした", "stars": 5 } }),
            Some(&customer),
        )
        .await;
    assert_no_errors(&response);
    let review = &response["data"]["createReview"]["review"];
    assert_eq!(review["stars"], 5);
    assert_eq!(review["provider"]["email"], "provider@example.com");
    assert_eq!(review["customer"]["email"], "customer@example.com");

    let query = "{ loginUserReviews { totalCount } loginUserSendReviews { totalCount } }";
    let response = app.execute(query, json!({}), Some(&provider)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUserReviews"]["totalCount"], 1);
    assert_eq!(response["data"]["loginUserSendReviews"]["totalCount"], 0);

    let response = app.execute(query, json!({}), Some(&customer)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUserReviews"]["totalCount"], 0);
    assert_eq!(response["data"]["loginUserSendReviews"]["totalCount"], 1);

    let response = app
        .execute("{ allReviews(filter: { stars: 5 }) { totalCount } }", json!({}), None)
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["allReviews"]["totalCount"], 1);

    Ok(())
}

#[tokio::test]
async fn talk_room_approval_is_monotonic() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;
    let customer = app.active_user("customer@example.com").await;
    let plan = create_plan(&app, &author, "英語の勉強法").await;

    let response = create_room(&app, &customer, &plan, &customer).await;
    assert_no_errors(&response);
    let room = &response["data"]["createTalkRoom"]["talkRoom"];
    assert_eq!(room["isApproved"], false);
    assert_eq!(room["selectedPlan"]["title"], "英語の勉強法");
    assert_eq!(room["opponentUser"]["email"], "customer@example.com");
    let room = room_id(&response);

    // Only the plan author decides
    let response = set_approval(&app, &customer, &room, true).await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    // Declining a pending room keeps it pending
    let response = set_approval(&app, &author, &room, false).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["updateTalkRoom"]["talkRoom"]["isApproved"], false);

    let response = set_approval(&app, &author, &room, true).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["updateTalkRoom"]["talkRoom"]["isApproved"], true);

    let response = set_approval(&app, &author, &room, true).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["updateTalkRoom"]["talkRoom"]["isApproved"], true);

    let response = set_approval(&app, &author, &room, false).await;
    assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));

    Ok(())
}

#[tokio::test]
async fn messages_flow_between_participants() -> anyhow::Result<()> {
    let app = setup().await?;
    let author = app.active_user("provider@example.com").await;
    let customer = app.active_user("customer@example.com").await;
    let outsider = app.active_user("outsider@example.com").await;
    let plan = create_plan(&app, &author, "英語の勉強法").await;
    let room = room_id(&create_room(&app, &customer, &plan, &customer).await);

    let response = send_message(&app, &outsider, &room, "こんにちは").await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = send_message(&app, &customer, &room, "よろしくお願いします").await;
    assert_no_errors(&response);
    let message = &response["data"]["createMessage"]["message"];
    assert_eq!(message["isViewed"], false);
    assert_eq!(message["sender"]["email"], "customer@example.com");
    assert_eq!(message["talkingRoom"]["id"], room.as_str());
    let message_id = message["id"].as_str().expect("message id").to_string();

    let update = r#"
        mutation UpdateMessages($input: UpdateMessagesInput!) {
            updateMessages(input: $input) { messages { isViewed } }
        }
    "#;

    // Senders cannot mark their own messages
    let response = app
        .execute(update, json!({ "input": { "messageIds": [message_id] } }), Some(&customer))
        .await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    // One unknown id fails the whole batch
    let response = app
        .execute(
            update,
            json!({ "input": { "messageIds": [message_id, gid("MessageNode", 999)] } }),
            Some(&author),
        )
        .await;
    assert_eq!(error_code(&response), Some("NOT_FOUND"));

    let response = app
        .execute(update, json!({ "input": { "messageIds": [message_id] } }), Some(&author))
        .await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["updateMessages"]["messages"],
        json!([{ "isViewed": true }])
    );

    let response = app
        .execute(
            "query Room($id: ID!) { talkRoom(id: $id) { messages { text isViewed } } }",
            json!({ "id": room }),
            Some(&author),
        )
        .await;
    assert_no_errors(&response);
    assert_eq!(
        response["data"]["talkRoom"]["messages"],
        json!([{ "text": "よろしくお願いします", "isViewed": true }])
    );

    let query = "{ loginUserTalkRooms { totalCount } loginUserMessages { totalCount } }";
    let response = app.execute(query, json!({}), Some(&author)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUserTalkRooms"]["totalCount"], 1);
    assert_eq!(response["data"]["loginUserMessages"]["totalCount"], 0);

    let response = app.execute(query, json!({}), Some(&outsider)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUserTalkRooms"]["totalCount"], 0);

    // Rooms with messages keep their plan alive
    let response = app
        .execute(
            "mutation D($input: DeletePlanInput!) { deletePlan(input: $input) { plan { id } } }",
            json!({ "input": { "id": plan } }),
            Some(&author),
        )
        .await;
    assert_eq!(error_code(&response), Some("CONFLICT"));

    Ok(())
}

#[tokio::test]
async fn notifications_are_checked_by_their_receiver() -> anyhow::Result<()> {
    let app = setup().await?;
    let sender = app.active_user("customer@example.com").await;
    let receiver = app.active_user("provider@example.com").await;

    let create = r#"
        mutation CreateNotification($input: CreateNotificationInput!) {
            createNotification(input: $input) {
                notification { id isChecked notificationType notificator { email } receiver { email } }
            }
        }
    "#;

    let mut ids = Vec::new();
    for kind in ["talk_request", "review"] {
        let response = app
            .execute(
                create,
                json!({ "input": { "receiver": gid("UserNode", receiver.id), "notificationType": kind } }),
                Some(&sender),
            )
            .await;
        assert_no_errors(&response);
        let notification = &response["data"]["createNotification"]["notification"];
        assert_eq!(notification["isChecked"], false);
        assert_eq!(notification["notificator"]["email"], "customer@example.com");
        assert_eq!(notification["receiver"]["email"], "provider@example.com");
        ids.push(notification["id"].as_str().expect("notification id").to_string());
    }

    let update = r#"
        mutation UpdateNotifications($input: UpdateNotificationsInput!) {
            updateNotifications(input: $input) {
                notifications { isChecked notificationType }
                notification { notificationType }
            }
        }
    "#;

    let response = app
        .execute(update, json!({ "input": { "notificationIds": ids } }), Some(&sender))
        .await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = app
        .execute(update, json!({ "input": { "notificationIds": ids } }), Some(&receiver))
        .await;
    assert_no_errors(&response);
    let payload = &response["data"]["updateNotifications"];
    assert_eq!(
        payload["notifications"],
        json!([
            { "isChecked": true, "notificationType": "talk_request" },
            { "isChecked": true, "notificationType": "review" },
        ])
    );
    assert_eq!(payload["notification"]["notificationType"], "review");

    let response = app
        .execute(
            "{ loginUserNotifications(filter: { isChecked: false }) { totalCount } }",
            json!({}),
            Some(&receiver),
        )
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUserNotifications"]["totalCount"], 0);

    let response = app
        .execute("{ loginUserNotifications { totalCount } }", json!({}), Some(&sender))
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["loginUserNotifications"]["totalCount"], 0);

    Ok(())
}
