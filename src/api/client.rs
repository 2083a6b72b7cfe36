//! Marketplace API client.
//!
//! # Responsibilities
//! - Register and log in against `{base}/{role}/{action}`
//! - Keep the session in step with the backend
//! - Read and update profiles through endpoint probing
//! - Upload profile pictures and hand out bulk uploaders

use serde_json::{Map, Value};

use crate::api::demo;
use crate::api::fetch::{ensure_success, read_json, HttpFetcher};
use crate::api::probe::{expand_templates, probe_json};
use crate::api::types::{
    profile_payload, LoadedProfile, LoginRequest, PictureOutcome, ProfileSource, RegisterOutcome,
    RegisterRequest, DEMO_REGISTERED_MESSAGE, REGISTERED_MESSAGE,
};
use crate::auth::Role;
use crate::config::{AppConfig, EndpointConfig, UploadConfig};
use crate::error::{ClientError, ErrorClass, Result};
use crate::forms::{LoginForm, ProfileForm, SignupForm};
use crate::observability::metrics;
use crate::session::{Session, User};
use crate::upload::{
    extract_url, validate_picture, BulkUpload, ImageFile, Uploader, PICTURE_URL_KEYS,
};

/// Client for the talent marketplace backend.
#[derive(Debug, Clone)]
pub struct TalentClient {
    base_url: String,
    fetcher: HttpFetcher,
    uploader: Uploader,
    session: Session,
    endpoints: EndpointConfig,
    upload: UploadConfig,
    demo_mode: bool,
}

impl TalentClient {
    pub fn new(config: &AppConfig, session: Session) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.retries)?;
        let uploader = Uploader::new(fetcher.client().clone(), &config.upload);
        Ok(Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            fetcher,
            uploader,
            session,
            endpoints: config.endpoints.clone(),
            upload: config.upload.clone(),
            demo_mode: config.demo_mode,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn demo_mode(&self) -> bool {
        self.demo_mode
    }

    /// `{base}/{role}/{action}`
    pub fn role_url(&self, role: Role, action: &str) -> String {
        format!("{}/{}/{}", self.base_url, role, action)
    }

    /// Create an account. Nothing is stored on success; the user logs in next.
    pub async fn register(&self, form: &SignupForm) -> Result<RegisterOutcome> {
        let role = form.validate()?;
        let email = form.email.trim();
        let url = self.role_url(role, "register");
        let request = self
            .fetcher
            .client()
            .post(&url)
            .json(&RegisterRequest {
                email,
                password: &form.password,
                role,
            })
            .build()
            .map_err(|e| ClientError::from_reqwest(&url, e))?;

        match self.fetcher.execute(request).await {
            Ok(response) => {
                ensure_success(&url, response, "Failed to create account").await?;
                tracing::info!(email = %email, role = %role, "Account created");
                Ok(RegisterOutcome {
                    message: REGISTERED_MESSAGE.to_string(),
                    demo: false,
                })
            }
            Err(e) if self.demo_mode && e.class() == ErrorClass::Network => {
                demo::store_demo_user(&self.session, email, role)?;
                Ok(RegisterOutcome {
                    message: DEMO_REGISTERED_MESSAGE.to_string(),
                    demo: true,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Sign in and persist the session. The stored role is the one selected
    /// in the form, whatever the backend reports.
    pub async fn login(&self, form: &LoginForm) -> Result<User> {
        let role = form.validate()?;
        let email = form.email.trim();
        let url = self.role_url(role, "login");
        let request = self
            .fetcher
            .client()
            .post(&url)
            .json(&LoginRequest {
                email,
                password: &form.password,
            })
            .build()
            .map_err(|e| ClientError::from_reqwest(&url, e))?;

        let response = self.fetcher.execute(request).await?;
        let reply = read_json(&url, response, "Failed to login").await?;

        let token = reply
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ClientError::Parse {
                url: url.clone(),
                reason: "login response has no token".to_string(),
            })?;

        let mut fields = match reply.get("user") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };
        fields.insert("role".to_string(), Value::String(role.as_str().to_string()));
        fields
            .entry("email")
            .or_insert_with(|| Value::String(email.to_string()));

        let user: User = serde_json::from_value(Value::Object(fields)).map_err(|e| {
            ClientError::Parse {
                url: url.clone(),
                reason: e.to_string(),
            }
        })?;
        self.session.login(&user, token)?;
        Ok(user)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }

    /// Fetch the signed-in user's profile.
    ///
    /// Falls back to the cached user, with the reason, when no candidate
    /// endpoint answers.
    pub async fn load_profile(&self) -> Result<LoadedProfile> {
        let user = self.session.user().ok_or(ClientError::NotAuthenticated)?;
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;

        if user.id.is_empty() {
            return Ok(LoadedProfile {
                user,
                source: ProfileSource::Cached {
                    reason: "no user id in session".to_string(),
                },
            });
        }

        let candidates = expand_templates(
            &self.endpoints.profile_read,
            &self.base_url,
            user.role,
            Some(&user.id),
        );
        let client = self.fetcher.client().clone();
        let probed = probe_json(
            &self.fetcher,
            "profile_read",
            &candidates,
            "Failed to load profile",
            |url| client.get(url).bearer_auth(&token),
        )
        .await;

        let failure = match probed {
            Ok((url, reply)) => match user.merged_with(&profile_payload(reply)) {
                Ok(merged) => {
                    return Ok(LoadedProfile {
                        user: merged,
                        source: ProfileSource::Remote { url },
                    })
                }
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };

        tracing::warn!(reason = %failure, "Profile fetch failed, showing cached data");
        Ok(LoadedProfile {
            user,
            source: ProfileSource::Cached { reason: failure },
        })
    }

    /// Submit a profile edit and merge the reply into the session.
    pub async fn update_profile(&self, form: &ProfileForm) -> Result<User> {
        let user = self.session.user().ok_or(ClientError::NotAuthenticated)?;
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        if form.role() != user.role {
            return Err(ClientError::Validation(format!(
                "Cannot edit a {} profile while signed in as {}",
                form.role(),
                user.role
            )));
        }
        form.validate()?;

        let candidates = expand_templates(
            &self.endpoints.profile_update,
            &self.base_url,
            user.role,
            Some(&user.id),
        );
        let body = form.to_json();
        let client = self.fetcher.client().clone();
        let (url, reply) = probe_json(
            &self.fetcher,
            "profile_update",
            &candidates,
            "Failed to update profile",
            |url| client.put(url).bearer_auth(&token).json(&body),
        )
        .await?;

        // the submitted fields win over a reply that omits them
        let mut update = body;
        if let (Value::Object(update), Value::Object(reply)) = (&mut update, profile_payload(reply)) {
            update.extend(reply);
        }
        let updated = self.session.update_user(&update)?;
        tracing::info!(url = %url, role = %updated.role, "Profile updated");
        Ok(updated)
    }

    /// Upload a new profile picture and store its URL in the session.
    pub async fn upload_profile_picture<P>(&self, file: &ImageFile, on_progress: P) -> Result<PictureOutcome>
    where
        P: Fn(u8) + Send + 'static,
    {
        let user = self.session.user().ok_or(ClientError::NotAuthenticated)?;
        let token = self.session.token().ok_or(ClientError::NotAuthenticated)?;
        validate_picture(file, self.upload.picture_max_size_mb)?;

        let endpoint = self.role_url(user.role, "upload-profile-picture");
        let uploaded = self
            .uploader
            .send(&endpoint, "profilePicture", file, Some(&token), on_progress)
            .await
            .and_then(|reply| {
                extract_url(&reply, PICTURE_URL_KEYS).ok_or_else(|| ClientError::Parse {
                    url: endpoint.clone(),
                    reason: "no picture URL in response".to_string(),
                })
            });

        match uploaded {
            Ok(url) => {
                metrics::record_upload("success");
                self.session.set_profile_picture(&url)?;
                tracing::info!(url = %url, "Profile picture updated");
                Ok(PictureOutcome { url, demo: false })
            }
            Err(e) if self.demo_mode => {
                metrics::record_upload("demo");
                tracing::warn!(error = %e, "Picture upload failed, storing inline copy");
                let url = file.data_url();
                self.session.set_profile_picture(&url)?;
                Ok(PictureOutcome { url, demo: true })
            }
            Err(e) => {
                metrics::record_upload("error");
                Err(e)
            }
        }
    }

    /// A bulk upload against `endpoint`, authenticated when signed in.
    pub fn bulk_upload(&self, endpoint: impl Into<String>) -> BulkUpload {
        let bulk = BulkUpload::new(self.uploader.clone(), endpoint, self.upload.clone());
        match self.session.token() {
            Some(token) => bulk.with_token(token),
            None => bulk,
        }
    }
}
