//! Session boundary: login, registration, logout, the route guard and the
//! home page totals.

use corpografo_client::{EntityClient, SessionStore, UNEXPECTED_BEHAVIOR, failure_notification};
use corpografo_core::{EntityType, Notification, Route};
use serde_json::json;
use tracing::{info, warn};

/// Positive notification after a registration
pub const REGISTERED: &str = "User successfully registered";

/// Access level requested for self-registered users
pub const REGISTER_ACCESS_LEVEL: u8 = 2;

// ============================================================================
// Forms
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
}

impl RegisterForm {
    pub fn clear(&mut self) {
        self.name.clear();
        self.email.clear();
    }
}

// ============================================================================
// Flows
// ============================================================================

/// Log in; on 200 store the answer in the session and go back to where the
/// user wanted to go.
pub async fn login(client: &EntityClient, form: &LoginForm) -> bool {
    let body = json!({"email": form.email, "password": form.password});
    let Ok(response) = client.post("login", body).await else {
        return false;
    };

    match response.status {
        200 => match response.body_json() {
            Ok(answer) => {
                client.session().login(&form.email, &answer);
                let target = client
                    .session()
                    .take_referrer()
                    .and_then(|path| path.parse::<Route>().ok())
                    .filter(|route| *route != Route::Login)
                    .unwrap_or(Route::Home);
                info!(email = %form.email, "Logged in");
                client.navigate(target);
                true
            }
            Err(e) => {
                warn!(error = %e, "Undecodable login answer");
                client.notify(failure_notification(UNEXPECTED_BEHAVIOR));
                false
            }
        },
        status if (200..300).contains(&status) => {
            client.notify(failure_notification(UNEXPECTED_BEHAVIOR));
            false
        }
        // notified by the client
        _ => false,
    }
}

/// Register a user; on 201 notify and clear the form
pub async fn register(client: &EntityClient, form: &mut RegisterForm) -> bool {
    let body = json!({
        "name": form.name,
        "email": form.email,
        "access_level": REGISTER_ACCESS_LEVEL,
    });
    let Ok(response) = client.post("register", body).await else {
        return false;
    };

    match response.status {
        201 => {
            client.notify(Notification::success(REGISTERED));
            form.clear();
            true
        }
        status if (200..300).contains(&status) => {
            client.notify(failure_notification(UNEXPECTED_BEHAVIOR));
            false
        }
        _ => false,
    }
}

/// Log out. The local session is cleared whatever the server answers.
pub async fn logout(client: &EntityClient) -> bool {
    let result = client.post("logout", json!({})).await;
    client.session().clear();

    match result {
        Ok(response) if response.status == 200 => {
            client.navigate(Route::Login);
            true
        }
        Ok(response) if response.is_success() => {
            client.notify(failure_notification(UNEXPECTED_BEHAVIOR));
            false
        }
        _ => false,
    }
}

/// Where a navigation to `route` actually lands.
///
/// Without a session every page but the login page redirects to it, and
/// the requested page is remembered. With a session the login page
/// redirects home.
pub fn guard(route: &Route, session: &SessionStore) -> Route {
    let logged_in = session.is_logged_in();
    if route.requires_session() && !logged_in {
        session.set_referrer(route.to_string());
        return Route::Login;
    }
    if *route == Route::Login && logged_in {
        return Route::Home;
    }
    route.clone()
}

/// Header greeting
pub fn greeting(session: &SessionStore) -> String {
    format!("Hello, {}!", session.display_name().unwrap_or_default())
}

// ============================================================================
// Home
// ============================================================================

/// Totals shown on the home page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeTotals {
    pub corpora: usize,
    pub documents: usize,
}

impl HomeTotals {
    pub async fn load(client: &EntityClient) -> Option<Self> {
        let corpora = client.fetch_collection(EntityType::Corpus).await.ok()?;
        let documents = client.fetch_collection(EntityType::Document).await.ok()?;
        Some(Self {
            corpora: corpora.len(),
            documents: documents.len(),
        })
    }

    pub fn lines(&self) -> [String; 2] {
        [
            format!("Corpora: {} items", self.corpora),
            format!("Documents: {} items", self.documents),
        ]
    }
}

// ============================================================================
// Tests
// ============================================================================
