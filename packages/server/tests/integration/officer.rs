use grievance_server::officer::NewOfficer;
use grievance_server::store::ServiceError;

use crate::common::{PASSWORD, TestApp};

fn new_officer(mobile: &str) -> NewOfficer {
    NewOfficer {
        name: "Meera Iyer".to_string(),
        mobile: mobile.to_string(),
        password: PASSWORD.to_string(),
        email: "meera.iyer@example.edu".to_string(),
        designation: "Dean".to_string(),
        department: "Student Affairs".to_string(),
    }
}

#[tokio::test]
async fn provisioning_hashes_the_password() {
    let app = TestApp::spawn().await;

    let officer = app.officers().provision(new_officer("9988776655")).await.unwrap();

    assert_ne!(officer.password, PASSWORD);
    assert!(officer.password.starts_with("$argon2"));
    assert!(officer.profile_photo.is_none());
}

#[tokio::test]
async fn duplicate_mobile_is_a_conflict() {
    let app = TestApp::spawn().await;
    app.officers().provision(new_officer("9988776655")).await.unwrap();

    let err = app
        .officers()
        .provision(new_officer("9988776655"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)), "{err:?}");
}

#[tokio::test]
async fn invalid_mobile_is_rejected() {
    let app = TestApp::spawn().await;

    let err = app
        .officers()
        .provision(new_officer("call-me"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)), "{err:?}");
}

#[tokio::test]
async fn officer_without_assignments_can_be_removed() {
    let app = TestApp::spawn().await;
    let id = app.provision_officer("Meera Iyer", "9988776655").await;

    app.officers().remove(id).await.unwrap();

    assert!(app.officers().find(id).await.unwrap().is_none());
    let err = app.officers().remove(id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "{err:?}");
}

#[tokio::test]
async fn officer_with_assignments_cannot_be_removed() {
    let app = TestApp::spawn().await;
    let asha = app.officer("Asha Verma", "9876543210").await;
    let open = app.submit_grievance("No hot water").await;
    let closed = app.submit_grievance("Broken window").await;
    app.claim(open, &asha.token).await;
    app.claim(closed, &asha.token).await;
    assert_eq!(app.resolve(closed, "fixed", "Resolved", &asha.token).await.status, 200);

    let err = app.officers().remove(asha.id).await.unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)), "{err:?}");
    assert!(app.officers().find(asha.id).await.unwrap().is_some());
    let stored = app.grievances().find(open).await.unwrap().unwrap();
    assert_eq!(stored.handled_by, Some(asha.id));
}

#[tokio::test]
async fn submitted_grievances_start_pending_with_a_deadline() {
    let app = TestApp::spawn().await;
    let id = app.submit_grievance("No hot water").await;

    let stored = app.grievances().find(id).await.unwrap().unwrap();

    assert_eq!(stored.status, ::common::GrievanceStatus::Pending);
    assert!(stored.handled_by.is_none());
    assert!(stored.deadline > stored.created_at);
    assert!(stored.check_invariants().is_ok());
}
