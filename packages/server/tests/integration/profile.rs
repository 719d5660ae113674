use reqwest::multipart::{Form, Part};

use crate::common::{PASSWORD, TestApp, routes};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";

fn photo(bytes: &[u8], file_name: &str) -> Part {
    Part::bytes(bytes.to_vec()).file_name(file_name.to_string())
}

#[tokio::test]
async fn name_and_email_can_be_changed() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    let form = Form::new()
        .text("name", "Asha V. Verma")
        .text("email", "asha.v@example.edu");
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["name"], "Asha V. Verma");
    assert_eq!(res.body["email"], "asha.v@example.edu");
    assert_eq!(res.body["designation"], "Warden");

    let me = app.get_with_token(routes::ME, &asha.token).await;
    assert_eq!(me.body["name"], "Asha V. Verma");
}

#[tokio::test]
async fn empty_fields_are_left_unchanged() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    let form = Form::new()
        .text("name", "")
        .text("email", "   ")
        .text("password", "");
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["name"], "Asha Verma");
    assert_eq!(app.login("9876543210", PASSWORD).await.status, 200);
}

#[tokio::test]
async fn password_change_takes_effect_on_next_login() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    let form = Form::new().text("password", "a-brand-new-secret");
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    assert_eq!(app.login("9876543210", PASSWORD).await.status, 401);
    assert_eq!(app.login("9876543210", "a-brand-new-secret").await.status, 200);

    let stored = app.officers().require(asha.id).await.unwrap();
    assert!(stored.password.starts_with("$argon2"));
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    let form = Form::new().text("email", "not-an-email");
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn uploaded_photo_is_stored_and_served() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    let form = Form::new().part("profile_photo", photo(PNG_BYTES, "me.png"));
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    let uri = res.body["profile_photo"].as_str().unwrap().to_string();
    assert!(uri.starts_with("/api/v1/photos/"), "{uri}");
    assert!(uri.ends_with(".png"), "{uri}");

    let served = app.get_without_token(&uri).await;
    assert_eq!(served.status, 200);
    assert_eq!(served.content_type.as_deref(), Some("image/png"));
    assert_eq!(served.bytes, PNG_BYTES);
}

#[tokio::test]
async fn non_image_uploads_are_rejected() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    let form = Form::new().part("profile_photo", photo(b"%PDF-1.7", "cv.pdf"));
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
    let stored = app.officers().require(asha.id).await.unwrap();
    assert!(stored.profile_photo.is_none());
}

#[tokio::test]
async fn oversized_photo_is_rejected() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;

    // Above the photo limit but within the request body allowance.
    let big = vec![0u8; 64 * 1024 + 1];
    let form = Form::new().part("profile_photo", photo(&big, "huge.jpg"));
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;

    assert_eq!(res.status, 400, "{}", res.text);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_photos_are_not_found() {
    let app = TestApp::spawn().await;

    let missing = format!("/api/v1/photos/{}.png", "ab".repeat(32));
    assert_eq!(app.get_without_token(&missing).await.status, 404);
    assert_eq!(
        app.get_without_token("/api/v1/photos/not-a-hash.png")
            .await
            .status,
        404
    );
}

#[tokio::test]
async fn profile_update_requires_a_token() {
    let app = TestApp::spawn().await;

    let res = app
        .client
        .patch(app.url(routes::MY_PROFILE))
        .multipart(Form::new().text("name", "Nobody"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status().as_u16(), 401);
}

#[tokio::test]
async fn replacing_a_photo_keeps_a_shared_one_served() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;
    let ravi = app.officer("Ravi Kumar", "9123456780").await;

    let mut uris = Vec::new();
    for officer in [&asha, &ravi] {
        let form = Form::new().part("profile_photo", photo(PNG_BYTES, "crest.png"));
        let res = app
            .patch_form_with_token(routes::MY_PROFILE, form, &officer.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        uris.push(res.body["profile_photo"].as_str().unwrap().to_string());
    }
    assert_eq!(uris[0], uris[1]);

    let form = Form::new().part("profile_photo", photo(b"\x89PNG\r\n\x1a\nnewer", "me.png"));
    let res = app
        .patch_form_with_token(routes::MY_PROFILE, form, &asha.token)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_ne!(res.body["profile_photo"], uris[0].as_str());

    let served = app.get_without_token(&uris[1]).await;
    assert_eq!(served.status, 200);
    assert_eq!(served.bytes, PNG_BYTES);
}
