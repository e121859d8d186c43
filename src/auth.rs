//! Sign-in via Google OAuth code exchange against the portal backend.
//!
//! The portal issues its own token in exchange for a Google authorization
//! code. A cached session is reused across runs; without one, a one-shot
//! code can be supplied via `ASTROSETU_GOOGLE_CODE`. Everything works in
//! guest mode without a session.

use anyhow::{Result, anyhow};

use crate::model::{AuthSession, PortalClient, SessionStore};

const GOOGLE_CODE_ENV: &str = "ASTROSETU_GOOGLE_CODE";

/// Restore the cached session, or exchange a freshly supplied Google code.
/// Returns `None` for guest mode.
pub async fn restore_or_login(
    client: &PortalClient,
    store: &SessionStore,
) -> Result<Option<AuthSession>> {
    if let Err(e) = store.load_from_disk().await {
        tracing::warn!(error = %e, "Could not read cached session, ignoring");
    }

    if let Some(session) = store.session().await {
        tracing::info!("Found cached session");
        return Ok(Some(session));
    }

    let Ok(code) = std::env::var(GOOGLE_CODE_ENV) else {
        tracing::info!("No cached session and no {GOOGLE_CODE_ENV}, continuing as guest");
        return Ok(None);
    };

    tracing::info!("Exchanging Google authorization code");
    let payload = client.exchange_google_code(code.trim()).await?;

    let token = payload
        .get("token")
        .or_else(|| payload.get("access_token"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("token missing from auth response"))?
        .to_string();
    let profile = payload
        .get("profile")
        .or_else(|| payload.get("user"))
        .cloned()
        .unwrap_or(serde_json::Value::Null);

    let session = AuthSession { token, profile };
    store.set_session(session.clone()).await;
    if let Err(e) = store.save_to_disk().await {
        tracing::warn!(error = %e, "Could not persist session");
    } else {
        tracing::debug!("Saved session to disk");
    }

    Ok(Some(session))
}
