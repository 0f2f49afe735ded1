//! Browser-facing pages. These sit behind the route gate; everything under
//! `/dashboard` re-resolves its own session and scope rather than trusting
//! the gate's pass-through.

use axum::{extract::State, response::Html};
use tracing::instrument;

use dakbook_auth::scope;
use dakbook_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::mails::service::MailService;
use crate::state::AppState;

/// The identity string comes from token claims, so it gets escaped before
/// interpolation into markup.
fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Login form. Submission goes to `POST /api/auth/login`; the gate bounces
/// already-authenticated visitors to the dashboard before this renders.
pub async fn login_page() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Dakbook - Sign in</title>
</head>
<body>
    <h1>Dakbook</h1>
    <form id="login-form">
        <label>Username or email <input name="username" autocomplete="username" required></label>
        <label>Password <input name="password" type="password" autocomplete="current-password" required></label>
        <button type="submit">Sign in</button>
    </form>
    <p id="login-error" hidden></p>
    <script>
        document.getElementById('login-form').addEventListener('submit', async (e) => {
            e.preventDefault();
            const form = new FormData(e.target);
            const res = await fetch('/api/auth/login', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(Object.fromEntries(form)),
            });
            if (res.ok) {
                window.location = '/dashboard';
            } else {
                const err = document.getElementById('login-error');
                err.textContent = (await res.json()).error || 'Login failed';
                err.hidden = false;
            }
        });
    </script>
</body>
</html>"#,
    )
}

/// Dashboard landing page: per-direction mail counts inside the viewer's
/// scope.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard page"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Pages",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state))]
pub async fn dashboard_page(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Html<String>, AppError> {
    let filter = scope::team_filter(Some(&auth_user.0), None);
    let counts = MailService::direction_counts(&state.db, &filter).await?;

    let inward = counts
        .iter()
        .find(|c| c.direction == "inward")
        .map_or(0, |c| c.count);
    let outward = counts
        .iter()
        .find(|c| c.direction == "outward")
        .map_or(0, |c| c.count);

    Ok(Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Dakbook - Dashboard</title>
</head>
<body>
    <h1>Correspondence register</h1>
    <p>Signed in as {identity} ({role})</p>
    <ul>
        <li>Inward: {inward}</li>
        <li>Outward: {outward}</li>
    </ul>
    <form method="post" action="/api/auth/logout"><button type="submit">Sign out</button></form>
</body>
</html>"#,
        identity = escape_html(auth_user.identity()),
        role = auth_user.role(),
    )))
}
