//! End-to-end walk through the client against an in-process backend.
//!
//! ```text
//! cargo run --example quickstart
//! ```

use talent_client::api::TalentClient;
use talent_client::auth::Role;
use talent_client::backend;
use talent_client::config::AppConfig;
use talent_client::forms::{LoginForm, ProfileForm, SignupForm};
use talent_client::session::Session;
use talent_client::upload::ImageFile;
use talent_client::views::{resolve, Resolution};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::default();
    config.backend.bind_address = "127.0.0.1:0".to_string();

    let server = backend::spawn(&config.backend).await?;
    config.api.base_url = server.base_url();
    println!("Backend listening on {}", server.addr);

    let session = Session::in_memory();
    let client = TalentClient::new(&config, session.clone())?;

    let outcome = client
        .register(&SignupForm {
            email: "keeper@club.com".into(),
            password: "safehands".into(),
            confirm_password: "safehands".into(),
            role: Some(Role::Player),
        })
        .await?;
    println!("{}", outcome.message);

    let user = client
        .login(&LoginForm {
            email: "keeper@club.com".into(),
            password: "safehands".into(),
            role: Some(Role::Player),
        })
        .await?;
    println!("Signed in as {} ({})", user.email, user.role);

    let mut form = ProfileForm::for_user(&user);
    form.apply_assignments(["fullName=Sam Keeper", "position=goalkeeper", "location=Accra"])?;
    client.update_profile(&form).await?;

    // 1x1 transparent PNG
    let png = ImageFile::new(
        "avatar.png",
        vec![
            0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00,
            0x00, 0x1f, 0x15, 0xc4, 0x89,
        ],
    );
    let picture = client.upload_profile_picture(&png, |_| {}).await?;
    println!("Picture stored at {}", picture.url);

    for path in ["/dashboard/player", "/profile/player", "/dashboard/coach"] {
        match resolve(path, &session) {
            Resolution::Render(page) => println!("{}", page.render()),
            Resolution::Redirect(to) => println!("{path} redirects to {to}"),
        }
    }

    client.logout()?;
    server.stop().await?;
    Ok(())
}
