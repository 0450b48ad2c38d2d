//! Login form.

/// Render the login card with an optional message block above the form.
pub fn render(flash_html: String) -> String {
    format!(
        r#"<div class="card login">
<h1>🕒 StaffDesk</h1>
<p>Sign in to record your attendance.</p>
{flash}
<form method="post" action="/login">
<label for="username">Username</label>
<input id="username" name="username" autocomplete="username" required>
<label for="password">Password</label>
<input id="password" name="password" type="password" autocomplete="current-password" required>
<button type="submit" class="primary">Log in</button>
</form>
</div>"#,
        flash = flash_html
    )
}
