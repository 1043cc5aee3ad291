mod common;

use common::{assert_no_errors, error_code, gid, setup};
use serde_json::json;

const GENDERS: &str = r#"
    query Genders($first: Int, $after: String, $last: Int, $before: String) {
        allGenders(first: $first, after: $after, last: $last, before: $before) {
            totalCount
            pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
            edges { cursor node { genderName } }
        }
    }
"#;

#[tokio::test]
async fn forward_pagination_walks_the_listing() -> anyhow::Result<()> {
    let app = setup().await?;
    for name in ["男性", "女性", "その他"] {
        app.context.lookup_service.create_gender(name).await?;
    }

    let response = app.execute(GENDERS, json!({ "first": 2 }), None).await;
    assert_no_errors(&response);
    let page = &response["data"]["allGenders"];
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["pageInfo"]["hasNextPage"], true);
    assert_eq!(page["pageInfo"]["hasPreviousPage"], false);
    assert_eq!(page["edges"][0]["cursor"], "YXJyYXljb25uZWN0aW9uOjA=");
    assert_eq!(page["edges"][0]["node"]["genderName"], "男性");
    assert_eq!(page["edges"][1]["node"]["genderName"], "女性");

    let end_cursor = page["pageInfo"]["endCursor"].as_str().expect("end cursor").to_string();
    let response = app
        .execute(GENDERS, json!({ "first": 2, "after": end_cursor }), None)
        .await;
    assert_no_errors(&response);
    let page = &response["data"]["allGenders"];
    assert_eq!(page["totalCount"], 3);
    assert_eq!(page["pageInfo"]["hasNextPage"], false);
    assert_eq!(page["pageInfo"]["hasPreviousPage"], true);
    assert_eq!(page["edges"].as_array().map(Vec::len), Some(1));
    assert_eq!(page["edges"][0]["node"]["genderName"], "その他");

    Ok(())
}

#[tokio::test]
async fn backward_pagination_takes_the_tail() -> anyhow::Result<()> {
    let app = setup().await?;
    for name in ["男性", "女性", "その他"] {
        app.context.lookup_service.create_gender(name).await?;
    }

    let response = app.execute(GENDERS, json!({ "last": 2 }), None).await;
    assert_no_errors(&response);
    let page = &response["data"]["allGenders"];
    assert_eq!(page["edges"][0]["node"]["genderName"], "女性");
    assert_eq!(page["edges"][1]["node"]["genderName"], "その他");
    assert_eq!(page["pageInfo"]["hasPreviousPage"], true);

    let response = app
        .execute(GENDERS, json!({ "after": "not-a-cursor" }), None)
        .await;
    assert!(response["errors"][0]["message"].is_string());

    Ok(())
}

#[tokio::test]
async fn filters_narrow_the_total_count() -> anyhow::Result<()> {
    let app = setup().await?;
    for name in ["東京都", "東京湾岸", "大阪府"] {
        app.context.lookup_service.create_address(name).await?;
    }

    let response = app
        .execute(
            r#"{
                exact: allAddresses(filter: { addressName: "大阪府" }) { totalCount }
                partial: allAddresses(filter: { addressNameIcontains: "東京" }, first: 1) {
                    totalCount
                    edges { node { addressName } }
                }
            }"#,
            json!({}),
            None,
        )
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["exact"]["totalCount"], 1);
    assert_eq!(response["data"]["partial"]["totalCount"], 2);
    assert_eq!(
        response["data"]["partial"]["edges"][0]["node"]["addressName"],
        "東京都"
    );

    Ok(())
}

#[tokio::test]
async fn node_resolves_global_ids() -> anyhow::Result<()> {
    let app = setup().await?;
    let user = app.active_user("hanako@example.com").await;
    let gender = app.context.lookup_service.create_gender("女性").await?;
    let tag = app.context.lookup_service.create_tag("数学").await?;

    let query = r#"
        query Node($id: ID!) {
            node(id: $id) {
                id
                ... on GenderNode { genderName }
                ... on UserNode { email }
                ... on TagNode { tagName }
            }
        }
    "#;

    let gender_id = gid("GenderNode", gender.id);
    let response = app.execute(query, json!({ "id": gender_id }), None).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["node"]["id"], gender_id.as_str());
    assert_eq!(response["data"]["node"]["genderName"], "女性");

    // Types behind a login stay hidden from anonymous callers
    let user_id = gid("UserNode", user.id);
    let response = app.execute(query, json!({ "id": user_id }), None).await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let response = app.execute(query, json!({ "id": user_id }), Some(&user)).await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["node"]["email"], "hanako@example.com");

    let response = app
        .execute(query, json!({ "id": gid("TagNode", tag.id) }), Some(&user))
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["node"]["tagName"], "数学");

    let response = app
        .execute(query, json!({ "id": gid("GenderNode", 999) }), None)
        .await;
    assert_no_errors(&response);
    assert!(response["data"]["node"].is_null());

    for bad in [gid("SecretNode", 1), "@@@".to_string()] {
        let response = app.execute(query, json!({ "id": bad }), None).await;
        assert_eq!(error_code(&response), Some("VALIDATION_FAILED"));
    }

    Ok(())
}

#[tokio::test]
async fn staff_manage_lookup_values() -> anyhow::Result<()> {
    let app = setup().await?;
    let staff = app.staff_user("admin@example.com").await;
    let member = app.active_user("member@example.com").await;

    let create = r#"
        mutation CreateTag($input: CreateLookupInput!) {
            createTag(input: $input) { tag { tagName } }
        }
    "#;

    let response = app
        .execute(create, json!({ "input": { "name": "英語" } }), Some(&member))
        .await;
    assert_eq!(error_code(&response), Some("FORBIDDEN"));

    let response = app
        .execute(create, json!({ "input": { "name": "英語" } }), Some(&staff))
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["createTag"]["tag"]["tagName"], "英語");

    let response = app
        .execute(create, json!({ "input": { "name": "英語" } }), Some(&staff))
        .await;
    assert_eq!(error_code(&response), Some("CONFLICT"));

    let response = app
        .execute("{ allTags { totalCount } }", json!({}), None)
        .await;
    assert_eq!(error_code(&response), Some("UNAUTHORIZED"));

    let response = app
        .execute("{ allTags { totalCount } }", json!({}), Some(&member))
        .await;
    assert_no_errors(&response);
    assert_eq!(response["data"]["allTags"]["totalCount"], 1);

    Ok(())
}
