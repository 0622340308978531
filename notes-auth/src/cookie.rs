// Cookie header helpers.

use http::header::COOKIE;
use http::{HeaderMap, HeaderValue};

/// Find a cookie value by name across every `Cookie` header.
pub fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k.trim() == name).then(|| v.trim().trim_matches('"').to_string())
        })
        .find(|v| !v.is_empty())
}

#[derive(Debug, Clone)]
pub struct CookieSpec<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub max_age_secs: u64,
    pub secure: bool,
}

/// Render a `Set-Cookie` value. Session cookies are always HttpOnly + SameSite=Lax.
pub fn set_cookie_value(spec: &CookieSpec<'_>) -> anyhow::Result<HeaderValue> {
    let mut out = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        spec.name, spec.value, spec.max_age_secs
    );
    if spec.secure {
        out.push_str("; Secure");
    }
    Ok(HeaderValue::from_str(&out)?)
}
