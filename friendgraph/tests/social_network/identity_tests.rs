use super::support::*;

#[tokio::test]
async fn register_creates_user_with_profile() {
    let h = Harness::new();
    let alice = h.user("Alice").await;

    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.email, "alice@example.com");
    assert_ne!(alice.password_hash, PASSWORD);
    assert_eq!(alice.join_date, h.clock.now());
    assert_eq!(alice.url(), format!("/users/{}", alice.id));

    let by_id = h.network.identity().find_by_id(&alice.id).await.expect("find by id");
    assert_eq!(by_id.as_ref().map(|u| u.email.as_str()), Some("alice@example.com"));

    let profile = h.network.profiles().find_profile(&alice.id).await.expect("find profile");
    let profile = profile.expect("profile created with user");
    assert_eq!(profile.owner, alice.id);
    assert!(profile.status.is_empty());
}

#[tokio::test]
async fn email_lookup_ignores_case_and_whitespace() {
    let h = Harness::new();
    let alice = h.user("Alice").await;

    let found = h
        .network
        .identity()
        .find_by_email("  ALICE@Example.com ")
        .await
        .expect("find by email")
        .expect("user exists");
    assert_eq!(found.id, alice.id);

    let missing = h.network.identity().find_by_email("nobody@example.com").await.expect("lookup");
    assert!(missing.is_none());
}

#[tokio::test]
async fn create_rejects_duplicate_email() {
    let h = Harness::new();
    h.user("Alice").await;

    let err = h
        .network
        .identity()
        .create("Impostor", "Alice@Example.com", "hash")
        .await
        .expect_err("duplicate email");
    assert!(matches!(err, GraphError::DuplicateEmail { ref email } if email == "alice@example.com"));
}

#[tokio::test]
async fn register_reports_duplicate_email_as_validation_issue() {
    let h = Harness::new();
    h.user("Alice").await;

    let err = h
        .network
        .identity()
        .register(&registration("Alice Again", "alice@example.com"))
        .await
        .expect_err("duplicate email");
    match err {
        GraphError::Validation(validation) => {
            assert_eq!(validation.issues.len(), 1);
            assert_eq!(validation.issues[0].field, "email");
            assert_eq!(validation.issues[0].code, "validation.unique");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn register_collects_every_issue() {
    let h = Harness::new();
    let form = Registration {
        name: " Al ".to_string(),
        email: "not-an-email".to_string(),
        password: "short".to_string(),
        confirm_password: "different".to_string(),
    };

    let err = h.network.identity().register(&form).await.expect_err("invalid form");
    let GraphError::Validation(validation) = err else {
        panic!("expected validation error");
    };
    let codes: Vec<(&str, &str)> = validation
        .issues
        .iter()
        .map(|issue| (issue.field.as_str(), issue.code.as_str()))
        .collect();
    assert_eq!(
        codes,
        [
            ("name", "validation.length"),
            ("email", "validation.email"),
            ("password", "validation.length"),
            ("password", "validation.confirmation"),
        ]
    );
    assert_eq!(h.store().key_count().expect("key count"), 0);
}

#[tokio::test]
async fn verify_credentials_distinguishes_unknown_and_wrong_password() {
    let h = Harness::new();
    let alice = h.user("Alice").await;
    let identity = h.network.identity();

    let verified = identity
        .verify_credentials("alice@example.com", PASSWORD)
        .await
        .expect("valid credentials");
    assert_eq!(verified.id, alice.id);

    let err = identity
        .verify_credentials("alice@example.com", "wrong-password")
        .await
        .expect_err("wrong password");
    assert!(matches!(err, GraphError::InvalidCredentials));

    let err = identity
        .verify_credentials("ghost@example.com", PASSWORD)
        .await
        .expect_err("unknown email");
    assert!(matches!(err, GraphError::NotFound { ref entity, .. } if entity == "user"));
}

#[tokio::test]
async fn malformed_ids_are_simply_absent() {
    let h = Harness::new();
    let found = h
        .network
        .identity()
        .find_by_id("../../etc/passwd")
        .await
        .expect("lookup");
    assert!(found.is_none());
}
