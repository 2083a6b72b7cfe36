//! Full client flows against the in-process development backend.

use talent_client::api::types::REGISTERED_MESSAGE;
use talent_client::api::TalentClient;
use talent_client::auth::{Role, Route};
use talent_client::backend::{self, RunningBackend};
use talent_client::config::AppConfig;
use talent_client::error::ClientError;
use talent_client::forms::{LoginForm, ProfileForm, SignupForm};
use talent_client::session::Session;
use talent_client::upload::ImageFile;
use talent_client::views::{resolve, Page, Resolution};

async fn start() -> (RunningBackend, AppConfig) {
    let mut config = AppConfig::default();
    config.backend.bind_address = "127.0.0.1:0".to_string();
    config.retries.base_delay_ms = 10;
    let server = backend::spawn(&config.backend).await.unwrap();
    config.api.base_url = server.base_url();
    (server, config)
}

fn signup(email: &str, role: Role) -> SignupForm {
    SignupForm {
        email: email.to_string(),
        password: "password1".to_string(),
        confirm_password: "password1".to_string(),
        role: Some(role),
    }
}

fn login(email: &str, password: &str, role: Role) -> LoginForm {
    LoginForm {
        email: email.to_string(),
        password: password.to_string(),
        role: Some(role),
    }
}

#[tokio::test]
async fn test_register_login_edit_logout() {
    let (server, config) = start().await;
    let session = Session::in_memory();
    let client = TalentClient::new(&config, session.clone()).unwrap();

    let outcome = client.register(&signup("ada@club.com", Role::Player)).await.unwrap();
    assert!(!outcome.demo);
    assert_eq!(outcome.message, REGISTERED_MESSAGE);
    assert!(!session.is_authenticated(), "registering does not sign in");

    let err = client
        .register(&signup("ada@club.com", Role::Player))
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        ClientError::Status { status: 409, message } if message == "User already exists"
    ));

    let err = client
        .login(&login("ada@club.com", "wrong-pass", Role::Player))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(!session.is_authenticated());

    let user = client
        .login(&login("ada@club.com", "password1", Role::Player))
        .await
        .unwrap();
    assert_eq!(user.role, Role::Player);
    assert_eq!(user.email, "ada@club.com");
    assert!(!user.id.is_empty());
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::Player));

    let loaded = client.load_profile().await.unwrap();
    assert!(!loaded.is_cached());

    let mut form = ProfileForm::for_user(&user);
    form.apply_assignments(["fullName=Ada Striker", "position=forward", "height=171"])
        .unwrap();
    let updated = client.update_profile(&form).await.unwrap();
    assert_eq!(updated.field("fullName").as_deref(), Some("Ada Striker"));
    assert_eq!(updated.display_name(), "Ada Striker");

    let stored = server.state.account(&user.id).unwrap();
    assert_eq!(stored.profile["position"], "forward");

    let reloaded = client.load_profile().await.unwrap();
    assert_eq!(reloaded.user.field("height").as_deref(), Some("171"));

    client.logout().unwrap();
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_same_email_registers_per_role() {
    let (server, config) = start().await;
    let client = TalentClient::new(&config, Session::in_memory()).unwrap();

    client.register(&signup("multi@club.com", Role::Coach)).await.unwrap();
    client.register(&signup("multi@club.com", Role::Scout)).await.unwrap();
    assert_eq!(server.state.account_count(), 2);

    let err = client
        .login(&login("multi@club.com", "password1", Role::Player))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_profile_picture_upload_updates_session() {
    let (server, config) = start().await;
    let session = Session::in_memory();
    let client = TalentClient::new(&config, session.clone()).unwrap();

    client.register(&signup("coach@club.com", Role::Coach)).await.unwrap();
    client
        .login(&login("coach@club.com", "password1", Role::Coach))
        .await
        .unwrap();

    let image = ImageFile::new("me.png", vec![7u8; 300 * 1024]);
    let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let progress = seen.clone();
    let outcome = client
        .upload_profile_picture(&image, move |p| progress.lock().unwrap().push(p))
        .await
        .unwrap();

    assert!(!outcome.demo);
    assert!(outcome.url.starts_with("/uploads/"), "{}", outcome.url);
    assert_eq!(
        session.user().unwrap().profile_picture.as_deref(),
        Some(outcome.url.as_str())
    );
    let progress = seen.lock().unwrap().clone();
    assert_eq!(progress.last().copied(), Some(100));
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));

    let served = reqwest::get(format!("http://{}{}", server.addr, outcome.url))
        .await
        .unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.bytes().await.unwrap().len(), 300 * 1024);

    let err = client
        .upload_profile_picture(&ImageFile::new("cv.pdf", vec![1]), |_| {})
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Please select an image file (JPG, PNG, GIF, etc.)");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_pages_follow_session_state() {
    let (server, config) = start().await;
    let session = Session::in_memory();
    let client = TalentClient::new(&config, session.clone()).unwrap();

    assert_eq!(
        resolve("/dashboard/scout", &session),
        Resolution::Redirect(Route::Login)
    );

    client.register(&signup("eye@club.com", Role::Scout)).await.unwrap();
    client
        .login(&login("eye@club.com", "password1", Role::Scout))
        .await
        .unwrap();

    match resolve("/dashboard/scout", &session) {
        Resolution::Render(Page::Dashboard(dashboard)) => {
            assert_eq!(dashboard.role, Role::Scout);
            assert!(dashboard.render().contains("Scout dashboard"));
        }
        other => panic!("expected scout dashboard, got {other:?}"),
    }
    assert_eq!(
        resolve("/profile/coach", &session),
        Resolution::Redirect(Route::dashboard(Role::Scout))
    );

    client.logout().unwrap();
    assert_eq!(
        resolve("/profile/scout", &session),
        Resolution::Redirect(Route::Login)
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_file_session_survives_restart() {
    let (server, config) = start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let client = TalentClient::new(&config, Session::open_file(&path).unwrap()).unwrap();
        client.register(&signup("keep@club.com", Role::Coach)).await.unwrap();
        client
            .login(&login("keep@club.com", "password1", Role::Coach))
            .await
            .unwrap();
    }

    let reopened = Session::open_file(&path).unwrap();
    assert!(reopened.is_authenticated());
    assert_eq!(reopened.role(), Some(Role::Coach));
    assert_eq!(reopened.user().unwrap().email, "keep@club.com");

    let client = TalentClient::new(&config, reopened.clone()).unwrap();
    assert!(!client.load_profile().await.unwrap().is_cached());

    server.stop().await.unwrap();
}
