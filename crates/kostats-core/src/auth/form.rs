//! Locate the member login form and collect its fields.

use scraper::{ElementRef, Html, Selector};

/// Field names the member area expects for credentials.
pub const LOGIN_FIELD: &str = "amember_login";
pub const PASSWORD_FIELD: &str = "amember_pass";

/// A login form as served: target action (if any) and every named input with its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub action: Option<String>,
    pub fields: Vec<(String, String)>,
}

impl LoginForm {
    /// Sets `name` to `value`, replacing an existing field of the same name in place.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }
}

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static CSS selector")
}

/// Finds `form#am-login-form`, or else the first form whose action mentions `login`.
pub fn find_login_form(html: &str) -> Option<LoginForm> {
    let document = Html::parse_document(html);
    let by_id = selector("form#am-login-form");
    let any_form = selector("form");

    let form = document.select(&by_id).next().or_else(|| {
        document
            .select(&any_form)
            .find(|f| f.value().attr("action").is_some_and(|a| a.contains("login")))
    })?;

    Some(LoginForm {
        action: form
            .value()
            .attr("action")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string),
        fields: named_inputs(form),
    })
}

fn named_inputs(form: ElementRef<'_>) -> Vec<(String, String)> {
    let input = selector("input[name]");
    let mut fields: Vec<(String, String)> = Vec::new();
    for el in form.select(&input) {
        let Some(name) = el.value().attr("name") else {
            continue;
        };
        let value = el.value().attr("value").unwrap_or("").to_string();
        match fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => fields.push((name.to_string(), value)),
        }
    }
    fields
}

/// True if the page carries the member login form (used to spot a lost session).
pub fn has_login_form(document: &Html) -> bool {
    let by_id = selector("form#am-login-form");
    let pass = selector("input[name=\"amember_pass\"]");
    document.select(&by_id).next().is_some() || document.select(&pass).next().is_some()
}
