use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

mod login {
    use super::*;

    #[tokio::test]
    async fn officer_can_log_in_with_valid_credentials() {
        let app = TestApp::spawn().await;
        let id = app.provision_officer("Asha Verma", "9876543210").await;

        let res = app.login("9876543210", PASSWORD).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert!(res.body["expires_at"].is_string());
        assert_eq!(res.body["officer"]["id"], id);
        assert_eq!(res.body["officer"]["name"], "Asha Verma");
        assert_eq!(res.body["officer"]["designation"], "Warden");
        assert!(res.body["officer"].get("password").is_none());
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.provision_officer("Asha Verma", "9876543210").await;

        let res = app.login("9876543210", "not-the-password").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn unknown_mobile_gets_the_same_answer_as_a_wrong_password() {
        let app = TestApp::spawn().await;
        app.provision_officer("Asha Verma", "9876543210").await;

        let unknown = app.login("9000000000", PASSWORD).await;
        let wrong = app.login("9876543210", "not-the-password").await;

        assert_eq!(unknown.status, 401);
        assert_eq!(unknown.body, wrong.body);
    }

    #[tokio::test]
    async fn blank_fields_are_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::LOGIN, &json!({"mobile": "  ", "password": "x"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let res = app
            .post_without_token(routes::LOGIN, &json!({"mobile": "9876543210"}))
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod session {
    use super::*;

    #[tokio::test]
    async fn me_returns_the_token_holder() {
        let app = TestApp::spawn().await;
        let officer = app.officer("Asha Verma", "9876543210").await;

        let res = app.get_with_token(routes::ME, &officer.token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.id(), officer.id);
        assert_eq!(res.body["mobile"], officer.mobile.as_str());
    }

    #[tokio::test]
    async fn missing_and_invalid_tokens_are_rejected_uniformly() {
        let app = TestApp::spawn().await;

        let missing = app.get_without_token(routes::GRIEVANCES).await;
        let invalid = app.get_with_token(routes::GRIEVANCES, "not.a.jwt").await;

        assert_eq!(missing.status, 401);
        assert_eq!(invalid.status, 401);
        assert_eq!(missing.body["code"], "UNAUTHENTICATED");
        assert_eq!(missing.body, invalid.body);
    }

    #[tokio::test]
    async fn every_officer_endpoint_requires_a_token() {
        let app = TestApp::spawn().await;
        let id = app.submit_grievance("Broken fan").await;

        for path in [
            routes::ME.to_string(),
            routes::GRIEVANCES.to_string(),
            routes::grievance(id),
            routes::DASHBOARD_STATS.to_string(),
        ] {
            let res = app.get_without_token(&path).await;
            assert_eq!(res.status, 401, "GET {path} should need a token");
        }

        for path in [routes::claim(id), routes::resolve(id)] {
            let res = app
                .patch_without_token(&path, &json!({"remarks": "x", "status": "Resolved"}))
                .await;
            assert_eq!(res.status, 401, "PATCH {path} should need a token");
        }

        let untouched = app.grievances().find(id).await.unwrap().unwrap();
        assert!(untouched.handled_by.is_none());
    }

    #[tokio::test]
    async fn token_of_a_removed_officer_is_unauthenticated() {
        let app = TestApp::spawn().await;
        let officer = app.officer("Asha Verma", "9876543210").await;

        app.officers().remove(officer.id).await.unwrap();

        let res = app.get_with_token(routes::GRIEVANCES, &officer.token).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "UNAUTHENTICATED");
    }
}
