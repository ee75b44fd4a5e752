//! Member-area login.
//!
//! The request sequence is the site's contract, not ours: GET the login page
//! (collecting cookies), find the login form, submit its fields with the
//! credentials filled in, and look for a logged-in marker in the reply. Any
//! markup change on the site surfaces here as an [`AuthError`].

mod form;

pub use form::{find_login_form, has_login_form, LoginForm, LOGIN_FIELD, PASSWORD_FIELD};
pub(crate) use form::selector;

use url::Url;

use crate::config::Credentials;
use crate::error::AuthError;
use crate::http::HttpClient;

/// Lower-case markers that only appear on pages served to a logged-in member.
const LOGGED_IN_MARKERS: [&str; 2] = ["logout", "my account"];

/// An HTTP client that has completed the login flow.
///
/// Only [`authenticate`] constructs one, so holding a handle means the run
/// may proceed to category pages.
pub struct SessionHandle<C: HttpClient> {
    client: C,
}

impl<C: HttpClient> SessionHandle<C> {
    pub fn client(&mut self) -> &mut C {
        &mut self.client
    }

    pub fn into_inner(self) -> C {
        self.client
    }
}

/// Logs in through `client`. `site_root` resolves a relative form action.
pub fn authenticate<C: HttpClient>(
    mut client: C,
    login_url: &Url,
    site_root: &Url,
    credentials: &Credentials,
) -> Result<SessionHandle<C>, AuthError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(AuthError::EmptyCredentials);
    }

    tracing::info!(url = %login_url, "logging in");
    let page = client.get_text(login_url).map_err(AuthError::LoginPage)?;

    let mut form = find_login_form(&page).ok_or_else(|| AuthError::LoginFormMissing {
        url: login_url.to_string(),
    })?;

    let action = match form.action.as_deref() {
        Some(a) => site_root.join(a).map_err(|source| AuthError::FormAction {
            action: a.to_string(),
            source,
        })?,
        None => login_url.clone(),
    };

    form.set(LOGIN_FIELD, &credentials.username);
    form.set(PASSWORD_FIELD, &credentials.password);
    tracing::debug!(action = %action, fields = form.fields.len(), "submitting login form");

    let reply = client
        .post_form(&action, &form.fields)
        .map_err(AuthError::Submit)?;

    if is_logged_in(&reply) {
        tracing::info!("login successful");
        Ok(SessionHandle { client })
    } else {
        Err(AuthError::Rejected)
    }
}

fn is_logged_in(body: &str) -> bool {
    let lower = body.to_lowercase();
    LOGGED_IN_MARKERS.iter().any(|m| lower.contains(m))
}
