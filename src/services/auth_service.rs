//! Refresh-token session management: login, rotation, revocation, reuse
//! detection and the per-user active-token cap. The HTTP layer deals with
//! cookies and status codes; this module only sees plain values.

use chrono::{DateTime, Duration, Utc};

use crate::{
    auth::{
        jwt::{make_token, new_access_claims},
        tokens::{new_refresh_secret, sha256_hex, REFRESH_TOKEN_TTL_DAYS},
    },
    errors::AppError,
    models::refresh_token::RefreshToken,
    password::{verify_password, VerifyOutcome},
    state::AppState,
    store::{refresh_tokens, users},
};

#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    /// Plaintext refresh secret, handed to the caller exactly once.
    pub refresh_token: String,
    pub refresh_expires: DateTime<Utc>,
}

pub async fn login(
    state: &AppState,
    username: &str,
    password: &str,
    remote_ip: Option<&str>,
) -> Result<IssuedTokens, AppError> {
    let user = users::find_by_username(&state.db, username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    match verify_password(password, &user.password_hash)? {
        VerifyOutcome::Rejected => return Err(AppError::Unauthorized),
        VerifyOutcome::Verified => {}
        VerifyOutcome::VerifiedAndUpgraded { new_hash } => {
            users::update_password_hash(&state.db, user.id, &new_hash).await?;
            tracing::info!(user_id = user.id, "upgraded legacy password hash");
        }
    }

    let now = Utc::now();

    // best-effort purge of this user's expired records; the sweeper will get
    // to them eventually either way
    if let Err(e) = refresh_tokens::delete_expired_for_user(&state.db, user.id, now).await {
        tracing::warn!(user_id = user.id, error = %e, "login-time token purge failed");
    }

    // keep the newest cap-1 actives so the record created below fits. The
    // trim and the insert are separate statements, not one transaction:
    // concurrent logins for the same user can briefly overshoot the cap, and
    // the next login's trim pulls the count back down. Only rotation needs
    // the all-or-nothing treatment.
    trim_active(state, user.id, now, remote_ip).await?;

    let secret = new_refresh_secret();
    let expires = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);
    refresh_tokens::insert(
        &state.db,
        &refresh_tokens::NewRefreshToken {
            user_id: user.id,
            token_hash: &sha256_hex(&secret),
            created: now,
            expires,
            created_by_ip: remote_ip,
        },
    )
    .await?;

    let access_token = make_token(&state.cfg, &new_access_claims(&state.cfg, &user))?;

    Ok(IssuedTokens {
        access_token,
        refresh_token: secret,
        refresh_expires: expires,
    })
}

pub async fn refresh(
    state: &AppState,
    refresh_token: &str,
    remote_ip: Option<&str>,
) -> Result<IssuedTokens, AppError> {
    let hash = sha256_hex(refresh_token);
    let existing = refresh_tokens::find_by_hash(&state.db, &hash)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let now = Utc::now();

    if !existing.is_active(now) {
        if existing.replaced_by_token_hash.is_some() {
            // a superseded token came back: someone holds a secret that was
            // already rotated away, so every session of this user is suspect
            tracing::warn!(
                user_id = existing.user_id,
                token_id = existing.id,
                remote_ip = remote_ip.unwrap_or("unknown"),
                "superseded refresh token presented, revoking all active sessions"
            );
            refresh_tokens::revoke_all_active_for_user(&state.db, existing.user_id, now, remote_ip)
                .await?;
        }
        // merely expired or manually revoked: fail without side effects
        return Err(AppError::Unauthorized);
    }

    let user = users::find_by_id(&state.db, existing.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let new_secret = new_refresh_secret();
    let Some(expires) = rotate(state, &existing, &new_secret, now, remote_ip).await? else {
        // a concurrent caller rotated this record between our lookup and the
        // in-transaction revoke; same treatment as a superseded token
        tracing::warn!(
            user_id = existing.user_id,
            token_id = existing.id,
            remote_ip = remote_ip.unwrap_or("unknown"),
            "refresh token rotated concurrently, revoking all active sessions"
        );
        refresh_tokens::revoke_all_active_for_user(&state.db, existing.user_id, now, remote_ip)
            .await?;
        return Err(AppError::Unauthorized);
    };

    let access_token = make_token(&state.cfg, &new_access_claims(&state.cfg, &user))?;

    Ok(IssuedTokens {
        access_token,
        refresh_token: new_secret,
        refresh_expires: expires,
    })
}

/// The rotation step: revoke the presented record and link it to its
/// successor, re-apply the cap, insert the new record. One transaction,
/// all-or-nothing; a failure partway leaves the store exactly as before.
///
/// The revoke is guarded on `revoked IS NULL`. When it matches no rows the
/// record was rotated by a concurrent caller after we loaded it; the
/// transaction is rolled back and `Ok(None)` tells the caller it lost the
/// race, so at most one rotation of a given record ever commits.
async fn rotate(
    state: &AppState,
    existing: &RefreshToken,
    new_secret: &str,
    now: DateTime<Utc>,
    remote_ip: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let new_hash = sha256_hex(new_secret);
    let expires = now + Duration::days(REFRESH_TOKEN_TTL_DAYS);

    let mut tx = state.db.begin().await?;

    let affected =
        refresh_tokens::revoke_replaced(&mut *tx, existing.id, now, remote_ip, &new_hash).await?;
    if affected == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    let keep = state.cfg.max_active_refresh_tokens.saturating_sub(1);
    let active = refresh_tokens::active_for_user(&mut *tx, existing.user_id, now).await?;
    for rec in active.iter().skip(keep) {
        refresh_tokens::revoke(&mut *tx, rec.id, now, remote_ip).await?;
    }

    refresh_tokens::insert(
        &mut *tx,
        &refresh_tokens::NewRefreshToken {
            user_id: existing.user_id,
            token_hash: &new_hash,
            created: now,
            expires,
            created_by_ip: remote_ip,
        },
    )
    .await?;

    tx.commit().await?;

    Ok(Some(expires))
}

pub async fn revoke(
    state: &AppState,
    refresh_token: &str,
    remote_ip: Option<&str>,
) -> Result<(), AppError> {
    let hash = sha256_hex(refresh_token);
    let existing = refresh_tokens::find_by_hash(&state.db, &hash)
        .await?
        .ok_or(AppError::NotFound)?;

    // idempotent: a second revoke is a no-op success
    refresh_tokens::revoke(&state.db, existing.id, Utc::now(), remote_ip).await?;

    Ok(())
}

/// Revoke everything past the newest `cap - 1` active records.
async fn trim_active(
    state: &AppState,
    user_id: i64,
    now: DateTime<Utc>,
    remote_ip: Option<&str>,
) -> Result<(), AppError> {
    let keep = state.cfg.max_active_refresh_tokens.saturating_sub(1);
    let active = refresh_tokens::active_for_user(&state.db, user_id, now).await?;
    for rec in active.iter().skip(keep) {
        refresh_tokens::revoke(&state.db, rec.id, now, remote_ip).await?;
    }
    Ok(())
}
