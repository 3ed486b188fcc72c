use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use uuid::Uuid;

use crate::error::{Result, YaquedoError};
use crate::gateway::{Filter, Gateway};
use crate::models::{Plan, UserProfile};
use crate::settings::{self, StoredSession};

/// Immutable snapshot of the authentication state. Readers only ever see
/// copies; the store owns the single mutable instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    SignedOut,
    SignedIn { user_id: Uuid, email: String },
}

pub type SubscriberId = u64;
type Listener = Box<dyn Fn(&AuthState) + Send>;

/// The one process-wide shared piece of state. Every other structure in the
/// crate is either derived read-only data or lives behind the gateway.
pub struct SessionStore {
    state: Mutex<AuthState>,
    listeners: Mutex<HashMap<SubscriberId, Listener>>,
    next_id: AtomicU64,
}

pub struct SignUpFields {
    pub nombre_completo: String,
    pub nombre_negocio: String,
    pub cedula: String,
    pub plan: Plan,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(AuthState::SignedOut),
            listeners: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Restore state from a session cached by a previous run.
    pub fn restore(cached: Option<&StoredSession>) -> Self {
        let store = Self::new();
        if let Some(s) = cached {
            *store.state.lock().expect("state lock") = AuthState::SignedIn {
                user_id: s.user_id,
                email: s.email.clone(),
            };
        }
        store
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.lock().expect("state lock").clone()
    }

    pub fn current_user_id(&self) -> Result<Uuid> {
        match self.snapshot() {
            AuthState::SignedIn { user_id, .. } => Ok(user_id),
            AuthState::SignedOut => Err(YaquedoError::NotSignedIn),
        }
    }

    pub fn subscribe(&self, listener: Listener) -> SubscriberId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().expect("listener lock").insert(id, listener);
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        self.listeners.lock().expect("listener lock").remove(&id);
    }

    fn transition(&self, next: AuthState) {
        *self.state.lock().expect("state lock") = next.clone();
        for listener in self.listeners.lock().expect("listener lock").values() {
            listener(&next);
        }
    }

    /// Sign in, load the profile, and enforce the activation gate. An
    /// inactive profile is signed straight back out and reported distinctly
    /// from ordinary load failures.
    pub async fn sign_in(
        &self,
        gateway: &Gateway,
        email: &str,
        password: &str,
    ) -> Result<UserProfile> {
        let session = gateway.sign_in(email, password).await?;
        let profile = match fetch_profile(gateway, session.user.id).await {
            Ok(p) => p,
            Err(e) => {
                gateway.sign_out().await.ok();
                return Err(e);
            }
        };
        if !profile.is_active {
            gateway.sign_out().await.ok();
            settings::store_session(None)?;
            self.transition(AuthState::SignedOut);
            return Err(YaquedoError::AccessDenied);
        }
        // Prefer the address the gateway has on record over what was typed.
        let email = session
            .user
            .email
            .clone()
            .unwrap_or_else(|| email.to_string());
        settings::store_session(Some(StoredSession {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
            user_id: session.user.id,
            email: email.clone(),
        }))?;
        self.transition(AuthState::SignedIn {
            user_id: session.user.id,
            email,
        });
        Ok(profile)
    }

    /// Create the auth user and its profile row. New profiles start inactive
    /// and wait for an external activation process.
    pub async fn sign_up(
        &self,
        gateway: &Gateway,
        email: &str,
        password: &str,
        fields: &SignUpFields,
    ) -> Result<()> {
        let session = gateway.sign_up(email, password).await?;
        let row = serde_json::json!({
            "id": session.user.id,
            "nombre_completo": fields.nombre_completo,
            "nombre_negocio": fields.nombre_negocio,
            "cedula": fields.cedula,
            "plan": fields.plan,
            "onboarding_completed": false,
            "is_active": false,
        });
        let _: UserProfile = gateway.insert("profiles", &row).await.map_err(|e| match e {
            YaquedoError::Gateway { message, .. } => {
                YaquedoError::Auth(crate::error::user_message(&message))
            }
            other => other,
        })?;
        // The account is not usable until activated, so no session is kept.
        gateway.sign_out().await.ok();
        Ok(())
    }

    pub async fn sign_out(&self, gateway: &Gateway) -> Result<()> {
        gateway.sign_out().await?;
        settings::store_session(None)?;
        self.transition(AuthState::SignedOut);
        Ok(())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn fetch_profile(gateway: &Gateway, user_id: Uuid) -> Result<UserProfile> {
    let rows: Vec<UserProfile> = gateway
        .select(
            "profiles",
            "*",
            &[Filter::Eq("id", user_id.to_string())],
            None,
        )
        .await?;
    rows.into_iter().next().ok_or_else(|| {
        YaquedoError::Other("No se encontró el perfil de esta cuenta.".to_string())
    })
}
