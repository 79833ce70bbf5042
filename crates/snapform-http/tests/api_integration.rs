//! Integration tests for the JSON API: accounts, form management, themes,
//! public access, submissions, and pagination.

use serde_json::{json, Value};
use snapform_test::{sign_up, signed_in_client, test_app, test_state, TestClient, TEST_PASSWORD};

// ── Helpers ─────────────────────────────────────────────────────────

fn survey() -> Value {
    json!({
        "name": "Customer Survey",
        "description": "Tell us what you think",
        "fields": [
            { "type": "TEXT", "label": "Name", "required": true },
            { "type": "CHECKBOX", "label": "Colors", "options": ["Red", "Blue"] },
            { "type": "EMAIL", "label": "Contact" },
        ],
    })
}

fn theme_body(name: &str, public: bool) -> Value {
    json!({
        "name": name,
        "primaryColor": "#112233",
        "secondaryColor": "#445566",
        "backgroundColor": "#ffffff",
        "accentColor": "#e5e7eb",
        "textColor": "#000000",
        "fontFamily": "Inter",
        "isPublic": public,
    })
}

async fn create_form(client: &mut TestClient, body: &Value) -> Value {
    let response = client.post_json("/api/forms", body).await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    response.value()
}

async fn publish(client: &mut TestClient, form_id: &str) {
    let response = client.put(&format!("/api/forms/{form_id}/publish")).await;
    assert_eq!(response.status_code(), 200, "{}", response.text());
}

fn field_id(form: &Value, label: &str) -> String {
    form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["label"] == label)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ═════════════════════════════════════════════════════════════════════
// 1. Accounts
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_signup_login_logout() {
    let mut client = TestClient::new(test_app().await);

    let response = client
        .post_json(
            "/api/auth/signup",
            &json!({ "name": "Ada", "email": "ada@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(response.status_code(), 201);
    let body = response.value();
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let response = client
        .post_json(
            "/api/auth/login",
            &json!({ "email": "ada@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(response.status_code(), 200);
    let token = response.value()["token"].as_str().unwrap().to_string();

    client.set_token(&token);
    assert_eq!(client.get("/api/profile").await.status_code(), 200);

    let response = client.post("/api/auth/logout").await;
    assert_eq!(response.value()["success"], true);
    assert_eq!(client.get("/api/profile").await.status_code(), 401);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let state = test_state().await;
    sign_up(&state, "bob@example.com").await;
    let mut client = TestClient::new(snapform_http::build_router(state));

    let response = client
        .post_json(
            "/api/auth/login",
            &json!({ "email": "bob@example.com", "password": "not-the-password" }),
        )
        .await;
    assert_eq!(response.status_code(), 401);
    assert_eq!(response.error_message().as_deref(), Some("Invalid email or password"));
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let state = test_state().await;
    sign_up(&state, "taken@example.com").await;
    let mut client = TestClient::new(snapform_http::build_router(state));

    let response = client
        .post_json(
            "/api/auth/signup",
            &json!({ "email": "taken@example.com", "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(response.status_code(), 409);

    let response = client
        .post_json("/api/auth/signup", &json!({ "email": "short@example.com", "password": "short" }))
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Password must be at least 8 characters")
    );
    assert!(response.value()["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let mut client = TestClient::new(test_app().await);
    let response = client.post_raw("/api/auth/signup", "{not json").await;
    assert_eq!(response.status_code(), 400);
    assert!(response.error_message().is_some());
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let mut client = TestClient::new(test_app().await);
    for path in ["/api/forms", "/api/themes", "/api/themes/default", "/api/profile"] {
        let response = client.get(path).await;
        assert_eq!(response.status_code(), 401, "{path}");
        assert_eq!(response.error_message().as_deref(), Some("Unauthorized"));
    }

    client.set_token("not-a-real-token");
    assert_eq!(client.get("/api/forms").await.status_code(), 401);
}

#[tokio::test]
async fn test_profile_update_and_password_change() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "carol@example.com").await;

    let profile = client.get("/api/profile").await.value();
    assert_eq!(profile["user"]["role"], "user");

    let response = client
        .patch_json(
            "/api/profile/update",
            &json!({ "name": "Carol", "email": "carol@example.org" }),
        )
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.value()["user"]["email"], "carol@example.org");

    let response = client
        .patch_json(
            "/api/profile/password",
            &json!({
                "currentPassword": "wrong-password",
                "newPassword": "new-password-1",
                "confirmPassword": "new-password-1",
            }),
        )
        .await;
    assert_eq!(response.status_code(), 400);

    let response = client
        .patch_json(
            "/api/profile/password",
            &json!({
                "currentPassword": TEST_PASSWORD,
                "newPassword": "new-password-1",
                "confirmPassword": "new-password-1",
            }),
        )
        .await;
    assert_eq!(response.status_code(), 200);

    let response = client
        .post_json(
            "/api/auth/login",
            &json!({ "email": "carol@example.org", "password": "new-password-1" }),
        )
        .await;
    assert_eq!(response.status_code(), 200);
}

// ═════════════════════════════════════════════════════════════════════
// 2. Form management
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_create_form_assigns_field_order() {
    let state = test_state().await;
    let (mut client, session) = signed_in_client(&state, "owner@example.com").await;

    let form = create_form(&mut client, &survey()).await;
    assert_eq!(form["status"], "DRAFT");
    assert_eq!(form["userId"], session.user.id.as_str());
    assert_eq!(form["responseCount"], 0);
    let orders: Vec<i64> = form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["order"].as_i64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1, 2]);
}

#[tokio::test]
async fn test_create_form_rejects_short_name_and_blank_labels() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;

    let response = client
        .post_json(
            "/api/forms",
            &json!({ "name": "ab", "fields": [{ "type": "TEXT", "label": "  " }] }),
        )
        .await;
    assert_eq!(response.status_code(), 400);
    let errors = &response.value()["errors"];
    assert!(errors["name"].is_array());
    assert!(errors["fields[0].label"].is_array());
}

#[tokio::test]
async fn test_forms_are_scoped_to_their_owner() {
    let state = test_state().await;
    let (mut alice, _) = signed_in_client(&state, "alice@example.com").await;
    let (mut mallory, _) = signed_in_client(&state, "mallory@example.com").await;

    let form = create_form(&mut alice, &survey()).await;
    let path = format!("/api/forms/{}", form["id"].as_str().unwrap());

    assert_eq!(mallory.get(&path).await.status_code(), 404);
    assert_eq!(mallory.delete(&path).await.status_code(), 404);
    assert_eq!(
        mallory
            .put_json(&path, &json!({ "name": "Hijacked" }))
            .await
            .status_code(),
        404
    );
    assert_eq!(mallory.get("/api/forms").await.value()["forms"], json!([]));

    assert_eq!(alice.get(&path).await.value()["name"], "Customer Survey");
}

#[tokio::test]
async fn test_update_form_field_actions() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut client, &survey()).await;
    let id = form["id"].as_str().unwrap();
    let name_id = field_id(&form, "Name");
    let contact_id = field_id(&form, "Contact");

    let response = client
        .put_json(
            &format!("/api/forms/{id}"),
            &json!({
                "name": "Renamed Survey",
                "showProgressBar": true,
                "fields": [
                    { "id": name_id, "type": "TEXT", "label": "Full name", "required": true, "_action": "update" },
                    { "id": contact_id, "type": "EMAIL", "_action": "delete" },
                    { "type": "DATE", "label": "Birthday" },
                ],
            }),
        )
        .await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let updated = client.get(&format!("/api/forms/{id}")).await.value();
    assert_eq!(updated["name"], "Renamed Survey");
    assert_eq!(updated["showProgressBar"], true);
    let labels: Vec<&str> = updated["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["Full name", "Colors", "Birthday"]);
}

#[tokio::test]
async fn test_list_forms_filters_by_status_and_paginates() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;

    let mut ids = Vec::new();
    for i in 0..3 {
        let body = json!({ "name": format!("Form number {i}"), "fields": [] });
        ids.push(create_form(&mut client, &body).await["id"].as_str().unwrap().to_string());
    }
    publish(&mut client, &ids[0]).await;

    let body = client.get("/api/forms?status=ACTIVE").await.value();
    assert_eq!(body["forms"].as_array().unwrap().len(), 1);
    assert_eq!(body["forms"][0]["id"], ids[0].as_str());

    let body = client.get("/api/forms?status=DRAFT").await.value();
    assert_eq!(body["pagination"]["total"], 2);

    let body = client.get("/api/forms?page=2&limit=2").await.value();
    assert_eq!(body["forms"].as_array().unwrap().len(), 1);
    let pagination = &body["pagination"];
    assert_eq!(pagination["total"], 3);
    assert_eq!(pagination["totalPages"], 2);
    assert_eq!(pagination["currentPage"], 2);
    assert_eq!(pagination["limit"], 2);
    assert_eq!(pagination["hasMore"], false);

    let body = client.get("/api/forms?page=1&limit=2").await.value();
    assert_eq!(body["pagination"]["hasMore"], true);
}

#[tokio::test]
async fn test_page_far_past_the_end_is_empty() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;
    create_form(&mut client, &json!({ "name": "Only form", "fields": [] })).await;

    for path in [
        format!("/api/forms?page={}", usize::MAX),
        format!("/api/themes?includePublic=true&page={}", usize::MAX),
    ] {
        let response = client.get(&path).await;
        assert_eq!(response.status_code(), 200, "{}", response.text());
        let body = response.value();
        let items = body.get("forms").or_else(|| body.get("themes")).unwrap();
        assert!(items.as_array().unwrap().is_empty());
        assert_eq!(body["pagination"]["currentPage"].as_u64(), Some(usize::MAX as u64));
        assert_eq!(body["pagination"]["hasMore"], false);
    }
}

#[tokio::test]
async fn test_duplicate_form_is_a_fresh_draft() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut client, &survey()).await;
    let id = form["id"].as_str().unwrap();
    publish(&mut client, id).await;

    let response = client.post(&format!("/api/forms/{id}/duplicate")).await;
    assert_eq!(response.status_code(), 200);
    let body = response.value();
    assert_eq!(body["success"], true);
    let copy = &body["data"];
    assert_ne!(copy["id"], form["id"]);
    assert_eq!(copy["name"], "Customer Survey (Copy)");
    assert_eq!(copy["status"], "DRAFT");
    assert_eq!(copy["fields"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_delete_form() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut client, &survey()).await;
    let path = format!("/api/forms/{}", form["id"].as_str().unwrap());

    assert_eq!(client.delete(&path).await.value()["success"], true);
    assert_eq!(client.get(&path).await.status_code(), 404);
}

// ═════════════════════════════════════════════════════════════════════
// 3. Publishing and public access
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_draft_forms_are_not_public() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut owner, &survey()).await;
    let id = form["id"].as_str().unwrap();

    let mut visitor = TestClient::new(snapform_http::build_router(state.clone()));
    let response = visitor.get(&format!("/api/public-forms/{id}")).await;
    assert_eq!(response.status_code(), 404);

    let basic = visitor.get(&format!("/api/public-forms/{id}/basic")).await;
    assert_eq!(basic.status_code(), 200);
    assert_eq!(basic.value()["name"], "Customer Survey");

    let response = owner.put(&format!("/api/forms/{id}/publish")).await;
    assert_eq!(response.value()["data"]["status"], "ACTIVE");

    let public = visitor.get(&format!("/api/public-forms/{id}")).await;
    assert_eq!(public.status_code(), 200);
    let body = public.value();
    assert_eq!(body["status"], "ACTIVE");
    assert_eq!(body["fields"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_public_form() {
    let mut client = TestClient::new(test_app().await);
    let response = client.get("/api/public-forms/missing/basic").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(response.error_message().as_deref(), Some("Form not found"));
}

// ═════════════════════════════════════════════════════════════════════
// 4. Submissions
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_submit_to_draft_form_is_refused() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut owner, &survey()).await;
    let id = form["id"].as_str().unwrap();

    let mut visitor = TestClient::new(snapform_http::build_router(state.clone()));
    let response = visitor
        .post_json(
            &format!("/api/forms/{id}/submit"),
            &json!({ "responses": [{ "fieldId": field_id(&form, "Name"), "value": "Ada" }] }),
        )
        .await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Form not found or not active")
    );
}

#[tokio::test]
async fn test_submit_records_response_and_counts() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut owner, &survey()).await;
    let id = form["id"].as_str().unwrap();
    publish(&mut owner, id).await;

    let mut visitor = TestClient::new(snapform_http::build_router(state.clone()));
    let response = visitor
        .post_json(
            &format!("/api/forms/{id}/submit"),
            &json!({
                "responses": [
                    { "fieldId": field_id(&form, "Name"), "value": "Ada" },
                    { "fieldId": field_id(&form, "Colors"), "value": ["Red", "Blue"] },
                ],
            }),
        )
        .await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let receipt = response.value();
    assert_eq!(receipt["success"], true);
    assert_eq!(receipt["message"], "Form submitted successfully");
    assert!(receipt["responseId"].is_string());

    let detail = owner.get(&format!("/api/forms/{id}")).await.value();
    assert_eq!(detail["responseCount"], 1);

    let body = owner.get(&format!("/api/forms/{id}/responses")).await.value();
    assert_eq!(body["pagination"]["total"], 1);
    let record = &body["responses"][0];
    assert_eq!(record["id"], receipt["responseId"]);
    assert_eq!(record["fields"]["Name"]["value"], "Ada");
    assert_eq!(record["fields"]["Colors"]["value"], "Red, Blue");
    assert_eq!(record["fields"]["Colors"]["type"], "CHECKBOX");
}

#[tokio::test]
async fn test_submit_lists_missing_required_fields() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut owner, &survey()).await;
    let id = form["id"].as_str().unwrap();
    publish(&mut owner, id).await;

    let response = owner
        .post_json(
            &format!("/api/forms/{id}/submit"),
            &json!({ "responses": [{ "fieldId": field_id(&form, "Colors"), "value": ["Red"] }] }),
        )
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.value()["missingRequiredFields"],
        json!([field_id(&form, "Name")])
    );

    let detail = owner.get(&format!("/api/forms/{id}")).await.value();
    assert_eq!(detail["responseCount"], 0);
}

#[tokio::test]
async fn test_limit_one_response_per_email() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let mut body = survey();
    body["collectEmails"] = json!(true);
    body["limitOneResponsePerUser"] = json!(true);
    let form = create_form(&mut owner, &body).await;
    let id = form["id"].as_str().unwrap();
    publish(&mut owner, id).await;

    let payload = json!({
        "email": "respondent@example.com",
        "responses": [{ "fieldId": field_id(&form, "Name"), "value": "Ada" }],
    });
    let mut visitor = TestClient::new(snapform_http::build_router(state.clone()));
    let path = format!("/api/forms/{id}/submit");

    assert_eq!(visitor.post_json(&path, &payload).await.status_code(), 201);

    let second = visitor.post_json(&path, &payload).await;
    assert_eq!(second.status_code(), 400);
    assert_eq!(
        second.error_message().as_deref(),
        Some("You have already submitted a response to this form")
    );

    let without_email = json!({
        "responses": [{ "fieldId": field_id(&form, "Name"), "value": "Ada" }],
    });
    let response = visitor.post_json(&path, &without_email).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Email is required for this form")
    );
}

#[tokio::test]
async fn test_repeat_respondent_is_told_before_missing_fields() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let mut body = survey();
    body["limitOneResponsePerUser"] = json!(true);
    let form = create_form(&mut owner, &body).await;
    let id = form["id"].as_str().unwrap();
    publish(&mut owner, id).await;

    let mut visitor = TestClient::new(snapform_http::build_router(state.clone()));
    let path = format!("/api/forms/{id}/submit");
    let first = json!({
        "email": "a@b.com",
        "responses": [{ "fieldId": field_id(&form, "Name"), "value": "Ada" }],
    });
    assert_eq!(visitor.post_json(&path, &first).await.status_code(), 201);

    let second = visitor
        .post_json(&path, &json!({ "email": "a@b.com", "responses": [] }))
        .await;
    assert_eq!(second.status_code(), 400);
    assert_eq!(
        second.error_message().as_deref(),
        Some("You have already submitted a response to this form")
    );
    assert!(second.value().get("missingRequiredFields").is_none());

    let other = visitor
        .post_json(&path, &json!({ "email": "c@d.com", "responses": [] }))
        .await;
    assert_eq!(other.status_code(), 400);
    assert!(other.value()["missingRequiredFields"].is_array());
}

#[tokio::test]
async fn test_submit_rejects_foreign_field_ids() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let form = create_form(&mut owner, &survey()).await;
    let id = form["id"].as_str().unwrap();
    publish(&mut owner, id).await;

    let response = owner
        .post_json(
            &format!("/api/forms/{id}/submit"),
            &json!({
                "responses": [
                    { "fieldId": field_id(&form, "Name"), "value": "Ada" },
                    { "fieldId": "someone-elses-field", "value": "x" },
                ],
            }),
        )
        .await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Field someone-elses-field does not belong to this form")
    );
}

#[tokio::test]
async fn test_responses_are_owner_only() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let (mut other, _) = signed_in_client(&state, "other@example.com").await;
    let form = create_form(&mut owner, &survey()).await;
    let id = form["id"].as_str().unwrap();

    let response = other.get(&format!("/api/forms/{id}/responses")).await;
    assert_eq!(response.status_code(), 404);
}

// ═════════════════════════════════════════════════════════════════════
// 5. Themes
// ═════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_theme_crud_and_ownership() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let (mut other, _) = signed_in_client(&state, "other@example.com").await;

    let response = owner.post_json("/api/themes", &theme_body("Midnight", false)).await;
    assert_eq!(response.status_code(), 201, "{}", response.text());
    let theme_id = response.value()["id"].as_str().unwrap().to_string();
    let path = format!("/api/themes/{theme_id}");

    assert_eq!(owner.get(&path).await.status_code(), 200);

    let response = other.get(&path).await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(
        response.error_message().as_deref(),
        Some("Unauthorized access to theme")
    );

    let response = other.put_json(&path, &json!({ "name": "Stolen" })).await;
    assert_eq!(response.status_code(), 403);
    assert_eq!(
        response.error_message().as_deref(),
        Some("You don't have permission to update this theme")
    );

    let response = other.delete(&path).await;
    assert_eq!(response.status_code(), 403);

    let response = owner.put_json(&path, &json!({ "name": "Midnight Blue" })).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.value()["name"], "Midnight Blue");

    let response = owner.delete(&path).await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.value()["success"], "Theme deleted successfully");
    assert_eq!(owner.get(&path).await.status_code(), 404);
}

#[tokio::test]
async fn test_theme_validation() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;

    let mut body = theme_body("Ok", false);
    body["primaryColor"] = json!("blue");
    body["borderRadius"] = json!(40);
    let response = client.post_json("/api/themes", &body).await;
    assert_eq!(response.status_code(), 400);
    let errors = &response.value()["errors"];
    assert!(errors["name"].is_array());
    assert!(errors["primaryColor"].is_array());
    assert!(errors["borderRadius"].is_array());
}

#[tokio::test]
async fn test_theme_in_use_cannot_be_deleted() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;

    let theme = client.post_json("/api/themes", &theme_body("Sunrise", false)).await.value();
    let theme_id = theme["id"].as_str().unwrap();

    let mut body = survey();
    body["themeId"] = json!(theme_id);
    let form = create_form(&mut client, &body).await;
    assert_eq!(form["themeId"], theme_id);

    let response = client.delete(&format!("/api/themes/{theme_id}")).await;
    assert_eq!(response.status_code(), 409);
    assert_eq!(
        response.error_message().as_deref(),
        Some("This theme is currently in use by forms. Update the forms to use another theme before deleting.")
    );

    let form_id = form["id"].as_str().unwrap();
    client
        .put_json(&format!("/api/forms/{form_id}"), &json!({ "themeId": null }))
        .await;
    assert_eq!(
        client.delete(&format!("/api/themes/{theme_id}")).await.status_code(),
        200
    );
}

#[tokio::test]
async fn test_forms_cannot_use_private_themes_of_others() {
    let state = test_state().await;
    let (mut alice, _) = signed_in_client(&state, "alice@example.com").await;
    let (mut bob, _) = signed_in_client(&state, "bob@example.com").await;

    let private = alice.post_json("/api/themes", &theme_body("Private", false)).await.value();
    let public = alice.post_json("/api/themes", &theme_body("Shared", true)).await.value();

    let mut body = survey();
    body["themeId"] = private["id"].clone();
    let response = bob.post_json("/api/forms", &body).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(response.error_message().as_deref(), Some("Theme not found"));

    body["themeId"] = public["id"].clone();
    assert_eq!(bob.post_json("/api/forms", &body).await.status_code(), 201);
}

#[tokio::test]
async fn test_theme_listing() {
    let state = test_state().await;
    let (mut client, _) = signed_in_client(&state, "owner@example.com").await;
    client.post_json("/api/themes", &theme_body("Mine", false)).await;

    let own = client.get("/api/themes").await.value();
    assert_eq!(own["themes"].as_array().unwrap().len(), 1);
    assert_eq!(own["pagination"]["total"], 1);

    let with_public = client.get("/api/themes?includePublic=true&limit=100").await.value();
    let total = with_public["pagination"]["total"].as_u64().unwrap();
    assert!(total > 1);

    let available = client.get("/api/themes/default").await.value();
    let names: Vec<&str> = available["themes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.last(), Some(&"Mine"));
    assert_eq!(names.len() as u64, total);
}

#[tokio::test]
async fn test_public_theme_is_readable_anonymously() {
    let state = test_state().await;
    let (mut owner, _) = signed_in_client(&state, "owner@example.com").await;
    let theme = owner.post_json("/api/themes", &theme_body("Open House", true)).await.value();

    let mut visitor = TestClient::new(snapform_http::build_router(state.clone()));
    let response = visitor
        .get(&format!("/api/themes/{}", theme["id"].as_str().unwrap()))
        .await;
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.value()["name"], "Open House");
}
