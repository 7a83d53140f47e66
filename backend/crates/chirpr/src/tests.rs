//! Scenario tests for the Chirpr crate
//! Provider and HTTP shell driven end to end over the in-memory services.

#[cfg(test)]
mod support {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::application::config::ChirprConfig;
    use crate::application::session_provider::{SessionProvider, SessionState};
    use crate::infra::memory::{InMemoryDocumentStore, InMemoryIdentityService};

    pub type MemoryProvider = SessionProvider<InMemoryIdentityService, InMemoryDocumentStore>;

    pub struct Harness {
        pub identity: Arc<InMemoryIdentityService>,
        pub store: Arc<InMemoryDocumentStore>,
        pub config: Arc<ChirprConfig>,
        pub provider: Arc<MemoryProvider>,
    }

    pub fn harness_with(identity: InMemoryIdentityService) -> Harness {
        let identity = Arc::new(identity);
        let store = Arc::new(InMemoryDocumentStore::new());
        let config = Arc::new(ChirprConfig::default());
        let provider = Arc::new(SessionProvider::start(
            Arc::clone(&identity),
            Arc::clone(&store),
            Arc::clone(&config),
        ));
        Harness {
            identity,
            store,
            config,
            provider,
        }
    }

    /// Provider over a service that reports "signed out" right away
    pub async fn loaded_harness() -> Harness {
        let harness = harness_with(InMemoryIdentityService::new());
        within(harness.provider.wait_until_loaded()).await;
        harness
    }

    /// Let the auth-state listener catch up
    pub async fn settle() {
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    pub async fn within<F: std::future::Future>(future: F) -> F::Output {
        tokio::time::timeout(Duration::from_secs(2), future)
            .await
            .expect("timed out")
    }

    pub async fn wait_for_state(
        provider: &MemoryProvider,
        predicate: impl FnMut(&SessionState) -> bool,
    ) -> SessionState {
        let mut rx = provider.subscribe_state();
        within(rx.wait_for(predicate)).await.unwrap().clone()
    }
}

#[cfg(test)]
mod register_tests {
    use super::support::*;
    use crate::application::config::DEFAULT_AVATAR_URL;
    use crate::domain::document::FieldValue;
    use crate::domain::entity::profile::fields;
    use crate::domain::service::StoreError;
    use crate::domain::value_object::uid::Uid;
    use crate::error::ChirprError;

    #[tokio::test]
    async fn test_register_writes_default_profile() {
        let h = loaded_harness().await;

        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap();

        let path = h.config.profile_path(&registration.identity.uid);
        let doc = h.store.document(&path).expect("profile written");
        assert_eq!(doc[fields::AMOUNT_OF_CHIRPS], FieldValue::Integer(0));
        assert_eq!(doc[fields::BLURB], FieldValue::from(""));
        assert_eq!(doc[fields::CHIRPS], FieldValue::Array(vec![]));
        assert_eq!(doc[fields::USERNAME], FieldValue::from("wren"));
        assert_eq!(doc[fields::CHIRP_HANDLE], FieldValue::from("wren"));
        assert_eq!(doc[fields::PIC], FieldValue::from(DEFAULT_AVATAR_URL));
        assert!(matches!(doc[fields::CREATED_AT], FieldValue::Timestamp(_)));
        assert_eq!(h.store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_register_adopts_profile_immediately() {
        let h = loaded_harness().await;
        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap();

        let user = h.provider.current_user().unwrap();
        assert_eq!(user.uid(), Some(&registration.identity.uid));
        assert_eq!(user.profile, Some(registration.profile));
    }

    #[tokio::test]
    async fn test_register_encodes_handle() {
        let h = loaded_harness().await;
        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |_| " Jenny Wren ".to_string())
            .await
            .unwrap();

        assert_eq!(registration.profile.handle.as_str(), "Jenny%20Wren");
        assert_eq!(registration.profile.username, "Jenny Wren");
    }

    #[tokio::test]
    async fn test_register_blank_handle_uses_email_local_part() {
        let h = loaded_harness().await;
        let registration = h
            .provider
            .register("sparrow@example.com", "hunter22", |_| "   ".to_string())
            .await
            .unwrap();
        assert_eq!(registration.profile.handle.as_str(), "sparrow");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let h = loaded_harness().await;
        h.identity.insert_account("wren@example.com", "hunter22").unwrap();

        let err = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap_err();
        assert_eq!(err.reason(), Some("email-already-in-use"));
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_register_rejected_input_never_reaches_store() {
        let h = loaded_harness().await;

        let weak = h
            .provider
            .register("wren@example.com", "12345", |_| "wren".to_string())
            .await
            .unwrap_err();
        assert_eq!(weak.reason(), Some("weak-password"));

        let bad_email = h
            .provider
            .register("not-an-email", "hunter22", |_| "wren".to_string())
            .await
            .unwrap_err();
        assert_eq!(bad_email.reason(), Some("invalid-email"));

        let missing = h
            .provider
            .register("wren@example.com", "", |_| "wren".to_string())
            .await
            .unwrap_err();
        assert_eq!(missing.reason(), Some("missing-password"));

        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_register_profile_write_failure_is_returned() {
        let h = loaded_harness().await;
        h.store
            .fail_writes_with(StoreError::PermissionDenied("rules".into()));

        let err = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ChirprError::Store(StoreError::PermissionDenied(_))));
        assert_eq!(err.reason(), None);
    }

    #[tokio::test]
    async fn test_register_passes_identity_to_handle_callback() {
        let h = loaded_harness().await;
        let mut seen: Option<Uid> = None;
        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |identity| {
                seen = Some(identity.uid.clone());
                "wren".to_string()
            })
            .await
            .unwrap();
        assert_eq!(seen, Some(registration.identity.uid));
    }
}

#[cfg(test)]
mod session_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::support::*;
    use crate::application::outcome::WriteOutcome;
    use crate::domain::document::DocumentConverter;
    use crate::domain::entity::profile::{Profile, ProfileConverter};
    use crate::domain::service::{AuthState, IdentityService, StoreError};
    use crate::domain::value_object::chirp_handle::ChirpHandle;
    use crate::infra::memory::InMemoryIdentityService;
    use chrono::Utc;

    #[tokio::test]
    async fn test_resolving_is_not_an_event() {
        let h = harness_with(InMemoryIdentityService::resolving());
        settle().await;
        assert!(h.provider.is_loading());
        assert_eq!(h.provider.current_user(), None);

        h.identity.resolve(AuthState::Resolving);
        settle().await;
        assert!(h.provider.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flips_once_when_signed_out() {
        let h = harness_with(InMemoryIdentityService::resolving());
        assert!(h.provider.is_loading());

        h.identity.resolve(AuthState::SignedOut);
        let state = within(h.provider.wait_until_loaded()).await;
        assert!(!state.is_loading);
        let user = state.current_user.unwrap();
        assert_eq!(user.identity, None);
        assert_eq!(user.profile, None);

        // Later events never bring the spinner back
        let identity = h.identity.insert_account("wren@example.com", "hunter22").unwrap();
        h.identity.resolve(AuthState::SignedIn(identity));
        let state = wait_for_state(&h.provider, |s| {
            s.current_user.as_ref().is_some_and(|u| u.identity.is_some())
        })
        .await;
        assert!(!state.is_loading);

        h.identity.resolve(AuthState::SignedOut);
        settle().await;
        assert!(!h.provider.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flips_after_profile_fetch_when_signed_in() {
        let h = harness_with(InMemoryIdentityService::resolving());
        let identity = h.identity.insert_account("wren@example.com", "hunter22").unwrap();
        let profile = Profile::registered(
            identity.uid.clone(),
            ChirpHandle::encode("wren").unwrap(),
            "https://img/wren.png".into(),
            Utc::now(),
        );
        h.store.insert_document(
            h.config.profile_path(&identity.uid),
            ProfileConverter.to_fields(&profile),
        );

        h.identity.resolve(AuthState::SignedIn(identity.clone()));
        let state = within(h.provider.wait_until_loaded()).await;

        let user = state.current_user.unwrap();
        assert_eq!(user.identity, Some(identity));
        assert_eq!(user.profile, Some(profile));
    }

    #[tokio::test]
    async fn test_profile_fetch_failure_leaves_profile_empty() {
        let h = harness_with(InMemoryIdentityService::resolving());
        let identity = h.identity.insert_account("wren@example.com", "hunter22").unwrap();
        h.store
            .fail_reads_with(StoreError::Unavailable("offline".into()));

        h.identity.resolve(AuthState::SignedIn(identity.clone()));
        let state = within(h.provider.wait_until_loaded()).await;

        let user = state.current_user.unwrap();
        assert_eq!(user.identity, Some(identity));
        assert_eq!(user.profile, None);
    }

    #[tokio::test]
    async fn test_login_populates_profile() {
        let h = loaded_harness().await;
        let identity = h.identity.insert_account("wren@example.com", "hunter22").unwrap();
        let profile = Profile::registered(
            identity.uid.clone(),
            ChirpHandle::encode("wren").unwrap(),
            "https://img/wren.png".into(),
            Utc::now(),
        );
        h.store.insert_document(
            h.config.profile_path(&identity.uid),
            ProfileConverter.to_fields(&profile),
        );

        let signed_in = h.provider.login("Wren@Example.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.uid, identity.uid);

        let state = wait_for_state(&h.provider, |s| {
            s.current_user
                .as_ref()
                .is_some_and(|u| u.profile.is_some())
        })
        .await;
        assert_eq!(state.current_user.unwrap().profile, Some(profile));
    }

    #[tokio::test]
    async fn test_login_wrong_password_reason() {
        let h = loaded_harness().await;
        h.identity.insert_account("wren@example.com", "hunter22").unwrap();

        let err = h
            .provider
            .login("wren@example.com", "hunter23")
            .await
            .unwrap_err();
        assert_eq!(err.reason(), Some("wrong-password"));
        assert_eq!(err.to_string(), "Identity service rejected the request: auth/wrong-password");
    }

    #[tokio::test]
    async fn test_login_unknown_user_reason() {
        let h = loaded_harness().await;
        let err = h
            .provider
            .login("nobody@example.com", "hunter22")
            .await
            .unwrap_err();
        assert_eq!(err.reason(), Some("user-not-found"));
    }

    #[tokio::test]
    async fn test_logout_clears_current_user() {
        let h = loaded_harness().await;
        h.provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap();
        settle().await;

        h.provider.logout().await.unwrap();
        let state = wait_for_state(&h.provider, |s| {
            s.current_user.as_ref().is_some_and(|u| u.identity.is_none())
        })
        .await;
        assert_eq!(state.current_user.unwrap().profile, None);
    }

    #[tokio::test]
    async fn test_logout_during_registration_stays_signed_out() {
        let h = loaded_harness().await;
        h.store.delay_writes(Duration::from_millis(100));

        let provider = Arc::clone(&h.provider);
        let registering = tokio::spawn(async move {
            provider
                .register("wren@example.com", "hunter22", |_| "wren".to_string())
                .await
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        h.provider.logout().await.unwrap();

        let registration = within(registering).await.unwrap().unwrap();
        settle().await;

        assert_eq!(*h.identity.subscribe().borrow(), AuthState::SignedOut);
        let user = h.provider.current_user().unwrap();
        assert_eq!(user.identity, None);
        assert_eq!(user.profile, None);

        let writes = h.store.write_count();
        let outcome = h.provider.send_chirp("still there?", vec![]).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(h.provider.send_blurb("hi").await.unwrap(), WriteOutcome::Skipped);
        assert_eq!(h.store.write_count(), writes);

        // The profile record itself was still written
        let path = h.config.profile_path(&registration.identity.uid);
        assert!(h.store.document(&path).is_some());
    }

    #[tokio::test]
    async fn test_known_profile_survives_failed_refetch() {
        let h = loaded_harness().await;
        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap();
        settle().await;

        h.store
            .fail_reads_with(StoreError::Unavailable("offline".into()));
        h.identity
            .resolve(AuthState::SignedIn(registration.identity.clone()));
        settle().await;

        let user = h.provider.current_user().unwrap();
        assert_eq!(user.profile, Some(registration.profile));
    }

    #[tokio::test]
    async fn test_refresh_profile_picks_up_external_change() {
        let h = loaded_harness().await;
        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap();
        settle().await;

        let path = h.config.profile_path(&registration.identity.uid);
        let mut doc = h.store.document(&path).unwrap();
        doc.insert("blurb".into(), "set elsewhere".into());
        h.store.insert_document(path, doc);

        let refreshed = h.provider.refresh_profile().await.unwrap().unwrap();
        assert_eq!(refreshed.blurb, "set elsewhere");
        assert_eq!(
            h.provider.current_user().unwrap().profile.unwrap().blurb,
            "set elsewhere"
        );
    }

    #[tokio::test]
    async fn test_refresh_profile_signed_out() {
        let h = loaded_harness().await;
        assert_eq!(h.provider.refresh_profile().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_shutdown_stops_listening() {
        let h = harness_with(InMemoryIdentityService::resolving());
        h.provider.shutdown();
        h.provider.shutdown();

        h.identity.resolve(AuthState::SignedOut);
        settle().await;
        assert!(h.provider.is_loading());
    }
}

#[cfg(test)]
mod write_tests {
    use super::support::*;
    use crate::application::outcome::WriteOutcome;
    use crate::domain::document::FieldValue;
    use crate::domain::entity::chirp::fields as chirp_fields;
    use crate::domain::entity::profile::fields;
    use crate::domain::service::{AuthState, StoreError};
    use crate::error::ChirprError;

    async fn registered() -> (Harness, crate::application::register::Registration) {
        let h = loaded_harness().await;
        let registration = h
            .provider
            .register("wren@example.com", "hunter22", |_| "wren".to_string())
            .await
            .unwrap();
        settle().await;
        (h, registration)
    }

    #[tokio::test]
    async fn test_send_chirp_without_session_is_skipped() {
        let h = loaded_harness().await;
        let outcome = h.provider.send_chirp("hello", vec![]).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_send_chirp_before_profile_resolves_is_skipped() {
        let h = loaded_harness().await;
        let identity = h.identity.insert_account("wren@example.com", "hunter22").unwrap();
        h.identity.resolve(AuthState::SignedIn(identity));
        wait_for_state(&h.provider, |s| {
            s.current_user.as_ref().is_some_and(|u| u.identity.is_some())
        })
        .await;

        let outcome = h.provider.send_chirp("hello", vec![]).await.unwrap();
        assert_eq!(outcome, WriteOutcome::Skipped);
        assert_eq!(h.provider.send_blurb("hi").await.unwrap(), WriteOutcome::Skipped);
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_send_chirp_writes_record() {
        let (h, registration) = registered().await;

        let outcome = h
            .provider
            .send_chirp("first chirp", vec!["img/a.png".into()])
            .await
            .unwrap();
        let id = outcome.into_written().expect("written");

        let chirps = h.store.documents_in(&h.config.chirps_collection);
        assert_eq!(chirps.len(), 1);
        let (stored_id, doc) = &chirps[0];
        assert_eq!(stored_id, id.as_str());
        assert_eq!(doc[chirp_fields::TEXT], FieldValue::from("first chirp"));
        assert_eq!(
            doc[chirp_fields::USER],
            FieldValue::from(registration.identity.uid.as_str())
        );
        assert_eq!(
            doc[chirp_fields::IMAGES],
            FieldValue::Array(vec![FieldValue::from("img/a.png")])
        );
        assert!(matches!(doc[chirp_fields::TIMESTAMP], FieldValue::Timestamp(_)));
    }

    #[tokio::test]
    async fn test_send_chirp_failure_is_returned() {
        let (h, _) = registered().await;
        h.store
            .fail_writes_with(StoreError::Unavailable("offline".into()));

        let err = h.provider.send_chirp("lost", vec![]).await.unwrap_err();
        assert!(matches!(err, ChirprError::Store(StoreError::Unavailable(_))));
        assert!(h.store.documents_in("chirps").is_empty());
    }

    #[tokio::test]
    async fn test_profile_updates_change_one_field() {
        let (h, registration) = registered().await;
        let path = h.config.profile_path(&registration.identity.uid);

        let updates: [(&str, &str); 3] = [
            (fields::BLURB, "hello there"),
            (fields::USERNAME, "Jenny"),
            (fields::PIC, "https://img/new.png"),
        ];
        for (field, value) in updates {
            let before = h.store.document(&path).unwrap();
            let outcome = match field {
                fields::BLURB => h.provider.send_blurb(value).await,
                fields::USERNAME => h.provider.send_username(value).await,
                _ => h.provider.send_profile_picture(value).await,
            }
            .unwrap();
            assert!(outcome.is_written());

            let after = h.store.document(&path).unwrap();
            for (name, old) in &before {
                if name == field {
                    assert_eq!(after[name], FieldValue::from(value), "{field}");
                } else {
                    assert_eq!(&after[name], old, "{name} changed by {field} update");
                }
            }
            assert_eq!(after.len(), before.len());
        }

        let cached = h.provider.current_user().unwrap().profile.unwrap();
        assert_eq!(cached.blurb, "hello there");
        assert_eq!(cached.username, "Jenny");
        assert_eq!(cached.pic, "https://img/new.png");
        assert_eq!(cached.handle, registration.profile.handle);
    }

    #[tokio::test]
    async fn test_profile_update_failure_keeps_cache() {
        let (h, registration) = registered().await;
        h.store
            .fail_writes_with(StoreError::PermissionDenied("rules".into()));

        assert!(h.provider.send_blurb("nope").await.is_err());
        let cached = h.provider.current_user().unwrap().profile.unwrap();
        assert_eq!(cached.blurb, registration.profile.blurb);
    }

    #[tokio::test]
    async fn test_writes_skip_after_logout() {
        let (h, _) = registered().await;
        h.provider.logout().await.unwrap();
        wait_for_state(&h.provider, |s| {
            s.current_user.as_ref().is_some_and(|u| u.identity.is_none())
        })
        .await;

        let writes = h.store.write_count();
        assert_eq!(
            h.provider.send_chirp("ghost", vec![]).await.unwrap(),
            WriteOutcome::Skipped
        );
        assert_eq!(
            h.provider.send_username("ghost").await.unwrap(),
            WriteOutcome::Skipped
        );
        assert_eq!(h.store.write_count(), writes);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::infra::memory::InMemoryIdentityService;
    use crate::presentation::router::shell_router;

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn app() -> (Harness, Router) {
        let h = loaded_harness().await;
        let router = shell_router(h.provider.clone());
        (h, router)
    }

    #[tokio::test]
    async fn test_spinner_while_loading() {
        let h = harness_with(InMemoryIdentityService::resolving());
        let app = shell_router(h.provider.clone());

        let (status, body) = call(&app, "GET", "/does-not-exist", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["view"], "spinner");
    }

    #[tokio::test]
    async fn test_pages_resolve() {
        let (_h, app) = app().await;

        let (status, body) = call(&app, "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "home");

        let (_, body) = call(&app, "GET", "/settings/", None).await;
        assert_eq!(body["route"], "settings");

        let (_, body) = call(&app, "GET", "/user/wren", None).await;
        assert_eq!(body["route"], "user");
        assert_eq!(body["subpath"], "wren");
    }

    #[tokio::test]
    async fn test_undefined_path_is_not_found() {
        let (_h, app) = app().await;
        let (status, body) = call(&app, "GET", "/nowhere/at/all", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["route"], "not-found");
        assert_eq!(body["title"], "Are you lost?");
    }

    #[tokio::test]
    async fn test_register_and_session() {
        let (_h, app) = app().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/register",
            Some(json!({ "email": "wren@example.com", "password": "hunter22", "handle": "jenny wren" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["handle"], "jenny%20wren");
        assert_eq!(body["username"], "jenny wren");
        let uid = body["uid"].as_str().unwrap().to_string();

        let (status, session) = call(&app, "GET", "/api/session", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["signedIn"], true);
        assert_eq!(session["user"]["uid"], uid.as_str());
        assert_eq!(session["profile"]["amountOfChirps"], 0);
        assert_eq!(session["profile"]["chirpHandle"], "jenny%20wren");
    }

    #[tokio::test]
    async fn test_wrong_password_problem_body() {
        let (h, app) = app().await;
        h.identity.insert_account("wren@example.com", "hunter22").unwrap();

        let (status, body) = call(
            &app,
            "POST",
            "/api/login",
            Some(json!({ "email": "wren@example.com", "password": "nope-nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["status"], 401);
        assert_eq!(body["reason"], "wrong-password");
    }

    #[tokio::test]
    async fn test_duplicate_register_conflict() {
        let (h, app) = app().await;
        h.identity.insert_account("wren@example.com", "hunter22").unwrap();

        let (status, body) = call(
            &app,
            "POST",
            "/api/register",
            Some(json!({ "email": "wren@example.com", "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["reason"], "email-already-in-use");
    }

    #[tokio::test]
    async fn test_chirp_without_session_is_no_content() {
        let (h, app) = app().await;
        let (status, _) = call(&app, "POST", "/api/chirps", Some(json!({ "text": "hi" }))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_signed_in_writes() {
        let (h, app) = app().await;
        call(
            &app,
            "POST",
            "/api/register",
            Some(json!({ "email": "wren@example.com", "password": "hunter22", "handle": "wren" })),
        )
        .await;
        settle().await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/chirps",
            Some(json!({ "text": "hi", "images": ["img/1.png"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"].as_str().unwrap().len(), 32);

        let (status, _) = call(
            &app,
            "PUT",
            "/api/profile/blurb",
            Some(json!({ "value": "tiny bird" })),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let profile = h.provider.current_user().unwrap().profile.unwrap();
        assert_eq!(profile.blurb, "tiny bird");

        let (status, _) = call(&app, "POST", "/api/logout", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
