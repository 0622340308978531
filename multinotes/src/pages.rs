//! Placeholder pages. They exist so the route gate has pages to guard.

use axum::response::Html;
use notes_axum::{CurrentUser, MaybeUser};

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!doctype html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title} · MultiNotes</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    ))
}

pub async fn index(MaybeUser(user): MaybeUser) -> Html<String> {
    let body = match user {
        Some(user) => format!(
            "<h1>MultiNotes</h1>\n<p>Welcome back, {}. <a href=\"/notes\">Open your notes</a>.</p>",
            escape(&user.email)
        ),
        None => "<h1>MultiNotes</h1>\n<p><a href=\"/auth/signin\">Sign in</a> or <a href=\"/auth/signup\">create a workspace</a>.</p>"
            .to_string(),
    };
    layout("Welcome", &body)
}

pub async fn signin() -> Html<String> {
    layout("Sign in", "<h1>Sign in</h1>\n<p>POST /api/auth/login with email and password.</p>")
}

pub async fn signup() -> Html<String> {
    layout(
        "Sign up",
        "<h1>Create a workspace</h1>\n<p>POST /api/auth/signup with email, password and tenantName.</p>",
    )
}

pub async fn notes(user: CurrentUser) -> Html<String> {
    let user = user.0;
    layout(
        "Notes",
        &format!(
            "<h1>Notes</h1>\n<p>Signed in as {} ({}) in {} on the {} plan.</p>",
            escape(&user.email),
            user.role,
            escape(&user.tenant_slug),
            user.plan
        ),
    )
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
