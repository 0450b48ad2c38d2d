//! Credential checks and the login gate for dashboard routes.
//!
//! The shipped verifier is a placeholder: a fixed account table sharing one password.
//! Swap in another [`CredentialVerifier`] for real authentication.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use subtle::ConstantTimeEq;
use tower_sessions::Session;

use crate::models::{Account, Role};
use crate::session::SessionContext;

/// Placeholder password shared by every account in the static table.
pub const SHARED_PASSWORD: &str = "password";

/// Verifies a username/password pair and looks up account display data.
pub trait CredentialVerifier: Send + Sync {
    /// Return the account if the credentials are accepted.
    fn verify(&self, username: &str, password: &str) -> Option<Account>;

    /// Look up an account without checking a password.
    fn account(&self, username: &str) -> Option<Account>;
}

const ACCOUNTS: &[Account] = &[
    Account {
        username: "admin",
        display_name: "Administrator",
        avatar: "🛡️",
        role: Role::Admin,
    },
    Account {
        username: "testuser",
        display_name: "Test User",
        avatar: "🧑‍💼",
        role: Role::Employee,
    },
    Account {
        username: "employee1",
        display_name: "Priya Sharma",
        avatar: "👩‍💻",
        role: Role::Employee,
    },
    Account {
        username: "employee2",
        display_name: "Arjun Mehta",
        avatar: "👨‍🔧",
        role: Role::Employee,
    },
];

/// In-process credential table. Not persisted and not mutable at runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCredentials;

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<Account> {
        let account = self.account(username)?;
        constant_time_compare(password, SHARED_PASSWORD).then_some(account)
    }

    fn account(&self, username: &str) -> Option<Account> {
        ACCOUNTS.iter().find(|a| a.username == username).cloned()
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    a_bytes.ct_eq(b_bytes).into()
}

/// Middleware that sends anonymous sessions back to the login page.
pub async fn require_login(session: Session, request: Request, next: Next) -> Response {
    let logged_in = match session.get::<SessionContext>(SessionContext::KEY).await {
        Ok(ctx) => ctx.is_some_and(|ctx| ctx.logged_in),
        Err(e) => {
            tracing::error!("Failed to read session: {}", e);
            false
        }
    };

    if logged_in {
        next.run(request).await
    } else {
        tracing::debug!("Rejecting anonymous request to {}", request.uri().path());
        Redirect::to("/").into_response()
    }
}
