use authlite_core::gateway::memory::{INVALID_CREDENTIALS, MISSING_SESSION, UNREACHABLE};
use authlite_core::{
    AuthController, AuthService, InMemoryAuthGateway, LocalAuthRecord, MemorySessionStore,
    ScreenMode, ServiceError, SessionStore, SqliteSessionStore,
};
use std::sync::Arc;

fn service_with(
    gateway: InMemoryAuthGateway,
) -> AuthService<InMemoryAuthGateway, SqliteSessionStore> {
    AuthService::new(gateway, SqliteSessionStore::open_in_memory().unwrap())
}

#[tokio::test]
async fn login_success_is_mirrored_locally() {
    let service = service_with(InMemoryAuthGateway::new().with_account("a@x.com", "pw1"));

    let session = service.login("a@x.com", "pw1").await.unwrap();
    assert_eq!(session.provider.as_deref(), Some("email"));
    assert_eq!(
        service.load_record().unwrap(),
        LocalAuthRecord::logged_in("a@x.com")
    );
}

#[tokio::test]
async fn wrong_password_leaves_store_unchanged() {
    let service = service_with(InMemoryAuthGateway::new().with_account("a@x.com", "pw1"));

    let err = service.login("a@x.com", "wrong").await.unwrap_err();
    match err {
        ServiceError::Auth(auth) => assert_eq!(auth.message(), INVALID_CREDENTIALS),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(service.load_record().unwrap(), LocalAuthRecord::logged_out());
}

#[tokio::test]
async fn failed_login_keeps_previous_login() {
    let service = service_with(
        InMemoryAuthGateway::new()
            .with_account("a@x.com", "pw1")
            .with_account("b@x.com", "pw2"),
    );
    service.login("a@x.com", "pw1").await.unwrap();

    service.login("b@x.com", "nope").await.unwrap_err();
    assert_eq!(
        service.load_record().unwrap(),
        LocalAuthRecord::logged_in("a@x.com")
    );
}

#[tokio::test]
async fn register_never_touches_the_store() {
    let gateway = InMemoryAuthGateway::new();
    let store = MemorySessionStore::new();
    let service = AuthService::new(gateway, store);

    let user = service.register("new@x.com", "pw2").await.unwrap();
    assert_eq!(user.email, "new@x.com");
    assert_eq!(service.load_record().unwrap(), LocalAuthRecord::logged_out());
    assert_eq!(service.store().write_count(), 0);
    assert!(service.gateway().current_session().is_none());
}

#[tokio::test]
async fn register_then_login_then_logout() {
    let service = service_with(InMemoryAuthGateway::new());

    service.register("new@x.com", "pw2").await.unwrap();
    service.login("new@x.com", "pw2").await.unwrap();
    assert_eq!(
        service.load_record().unwrap(),
        LocalAuthRecord::logged_in("new@x.com")
    );

    service.logout().await.unwrap();
    assert_eq!(service.load_record().unwrap(), LocalAuthRecord::logged_out());
}

#[tokio::test]
async fn logout_failure_keeps_logged_in_record() {
    let service = service_with(InMemoryAuthGateway::new().with_account("a@x.com", "pw1"));
    service.login("a@x.com", "pw1").await.unwrap();

    service.gateway().set_offline(true);
    service.logout().await.unwrap_err();
    assert_eq!(
        service.load_record().unwrap(),
        LocalAuthRecord::logged_in("a@x.com")
    );
}

#[tokio::test]
async fn concurrent_logins_resolve_to_exactly_one_outcome() {
    let service = Arc::new(service_with(
        InMemoryAuthGateway::new()
            .with_account("a@x.com", "pw1")
            .with_account("b@x.com", "pw2"),
    ));

    let first = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.login("a@x.com", "pw1").await.map(|_| ()) }
    });
    let second = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.login("b@x.com", "pw2").await.map(|_| ()) }
    });
    first.await.unwrap().unwrap();
    second.await.unwrap().unwrap();

    let record = service.load_record().unwrap();
    assert!(
        record == LocalAuthRecord::logged_in("a@x.com")
            || record == LocalAuthRecord::logged_in("b@x.com"),
        "unexpected record: {record:?}"
    );
}

#[tokio::test]
async fn controller_toggles_screen_and_persists() {
    let service = service_with(InMemoryAuthGateway::new().with_account("a@x.com", "pw1"));
    let controller = AuthController::start(service).unwrap();
    assert!(controller.view().shows_register());

    controller.set_email("a@x.com");
    controller.set_password("pw1");
    controller.login().await.unwrap();

    let view = controller.view();
    assert_eq!(
        view.mode,
        ScreenMode::LoggedIn {
            label: "Logged in as a@x.com".to_string()
        }
    );
    assert_eq!(view.error_line, None);

    controller.logout().await.unwrap();
    assert_eq!(controller.view().mode, ScreenMode::LoggedOut);
    assert_eq!(
        controller.service().load_record().unwrap(),
        LocalAuthRecord::logged_out()
    );
}

#[tokio::test]
async fn controller_prefixes_failures_and_clears_them_on_success() {
    let gateway = InMemoryAuthGateway::new().with_account("a@x.com", "pw1");
    let controller = AuthController::start(service_with(gateway)).unwrap();

    controller.set_email("a@x.com");
    controller.set_password("wrong");
    controller.login().await.unwrap_err();
    assert_eq!(
        controller.view().error_line.as_deref(),
        Some(format!("Login failed: {INVALID_CREDENTIALS}").as_str())
    );
    assert!(!controller.screen().is_logged_in());

    controller.register().await.unwrap_err();
    assert!(controller
        .view()
        .error_line
        .unwrap()
        .starts_with("Registration failed: "));

    controller.logout().await.unwrap_err();
    assert_eq!(
        controller.view().error_line.as_deref(),
        Some(format!("Logout failed: {MISSING_SESSION}").as_str())
    );

    controller.set_password("pw1");
    controller.login().await.unwrap();
    assert_eq!(controller.view().error_line, None);
}

#[tokio::test]
async fn controller_register_stays_logged_out() {
    let controller = AuthController::start(service_with(InMemoryAuthGateway::new())).unwrap();
    controller.set_email("new@x.com");
    controller.set_password("pw2");

    controller.register().await.unwrap();
    assert!(!controller.screen().is_logged_in());
    assert_eq!(controller.view().error_line, None);
    assert_eq!(
        controller.service().load_record().unwrap(),
        LocalAuthRecord::logged_out()
    );
}

#[tokio::test]
async fn controller_starts_from_persisted_login() {
    let store = MemorySessionStore::with_record(LocalAuthRecord::logged_in("a@x.com"));
    let controller =
        AuthController::start(AuthService::new(InMemoryAuthGateway::new(), store)).unwrap();

    assert_eq!(controller.screen().user, "a@x.com");
    assert!(!controller.view().shows_register());
}

#[tokio::test]
async fn unreachable_service_is_surfaced_without_retry() {
    let gateway = InMemoryAuthGateway::new().with_account("a@x.com", "pw1");
    gateway.set_offline(true);
    let controller = AuthController::start(AuthService::new(gateway, MemorySessionStore::new()))
        .unwrap();
    controller.set_email("a@x.com");
    controller.set_password("pw1");

    controller.login().await.unwrap_err();
    assert_eq!(
        controller.view().error_line.as_deref(),
        Some(format!("Login failed: {UNREACHABLE}").as_str())
    );
    assert_eq!(controller.service().store().write_count(), 0);
}

#[tokio::test]
async fn store_records_are_shared_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auth.sqlite3");

    let service = AuthService::new(
        InMemoryAuthGateway::new().with_account("a@x.com", "pw1"),
        SqliteSessionStore::open(&path).unwrap(),
    );
    service.login("a@x.com", "pw1").await.unwrap();
    drop(service);

    let restarted = SqliteSessionStore::open(&path).unwrap();
    assert_eq!(restarted.load().unwrap(), LocalAuthRecord::logged_in("a@x.com"));
}

#[tokio::test]
async fn explicit_credentials_ignore_fields_typed_for_another_press() {
    let controller = AuthController::start(service_with(
        InMemoryAuthGateway::new()
            .with_account("a@x.com", "pa")
            .with_account("b@x.com", "pb"),
    ))
    .unwrap();

    // A second press has already overwritten the typed fields.
    controller.set_email("b@x.com");
    controller.set_password("pb");

    controller
        .login_with("a@x.com".to_string(), "pa".to_string())
        .await
        .unwrap();
    assert_eq!(controller.screen().user, "a@x.com");
    assert_eq!(
        controller.service().load_record().unwrap(),
        LocalAuthRecord::logged_in("a@x.com")
    );
}

#[tokio::test]
async fn overlapping_presses_each_use_their_own_credentials() {
    let controller = AuthController::start(service_with(
        InMemoryAuthGateway::new().with_account("a@x.com", "pa"),
    ))
    .unwrap();

    let (login, register) = tokio::join!(
        controller.login_with("a@x.com".to_string(), "pa".to_string()),
        controller.register_with("c@x.com".to_string(), "pc".to_string()),
    );
    login.unwrap();
    register.unwrap();

    assert_eq!(controller.service().gateway().account_count(), 2);
    assert_eq!(
        controller.service().load_record().unwrap(),
        LocalAuthRecord::logged_in("a@x.com")
    );
}
