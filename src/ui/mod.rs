//! Server-side HTML rendering for the dashboard.

mod login;
mod pages;
mod sidebar;

use pages::render_page;

use crate::auth::CredentialVerifier;
use crate::models::FlashMessage;
use crate::session::SessionContext;

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background: #f4f6fa; color: #1f2933; }
.shell { display: flex; min-height: 100vh; }
.sidebar { width: 240px; background: #1e293b; color: #e2e8f0; padding: 1.5rem 1rem; }
.profile { text-align: center; margin-bottom: 1.5rem; }
.profile .avatar { font-size: 2.5rem; }
.profile .role { font-size: 0.8rem; color: #94a3b8; text-transform: uppercase; }
.nav-item { display: block; width: 100%; text-align: left; padding: 0.6rem 0.8rem; margin: 0.2rem 0;
  border: 0; border-radius: 6px; background: transparent; color: inherit; font-size: 1rem; cursor: pointer; }
.nav-item.active { background: #3b82f6; color: #fff; }
.content { flex: 1; padding: 2rem 3rem; }
.flash { padding: 0.8rem 1rem; border-radius: 6px; margin-bottom: 1rem; }
.flash-success { background: #dcfce7; color: #166534; }
.flash-error { background: #fee2e2; color: #991b1b; }
.flash-warning { background: #fef3c7; color: #92400e; }
.flash-info { background: #dbeafe; color: #1e40af; }
.card { background: #fff; border-radius: 8px; padding: 1.5rem; max-width: 640px; box-shadow: 0 1px 3px rgba(0,0,0,.1); }
.login { max-width: 360px; margin: 10vh auto; }
label { display: block; margin-top: 0.8rem; font-weight: 600; }
input, textarea { width: 100%; box-sizing: border-box; padding: 0.5rem; margin-top: 0.3rem; }
button.primary { margin-top: 1rem; padding: 0.6rem 1.2rem; background: #3b82f6; color: #fff; border: 0; border-radius: 6px; }
table { border-collapse: collapse; margin-top: 1rem; width: 100%; }
th, td { text-align: left; padding: 0.4rem 0.6rem; border-bottom: 1px solid #e2e8f0; }
td img { max-height: 48px; }
"#;

/// Render the whole document for the current session state.
pub fn render(
    ctx: &SessionContext,
    flash: Option<&FlashMessage>,
    verifier: &dyn CredentialVerifier,
) -> String {
    let body = match (ctx.logged_in, ctx.role) {
        (true, Some(role)) => {
            let account = ctx.username.as_deref().and_then(|u| verifier.account(u));
            format!(
                "<div class=\"shell\">{}<main class=\"content\">{}{}</main></div>",
                sidebar::render(account.as_ref(), role, ctx.active_page),
                render_flash(flash),
                render_page(ctx.active_page, ctx),
            )
        }
        _ => login::render(render_flash(flash)),
    };

    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>StaffDesk</title><style>{}</style></head><body>{}</body></html>",
        STYLE, body
    )
}

fn render_flash(flash: Option<&FlashMessage>) -> String {
    flash.map(render_flash_one).unwrap_or_default()
}

fn render_flash_one(flash: &FlashMessage) -> String {
    format!(
        "<div class=\"flash flash-{}\" role=\"alert\">{}</div>",
        flash.severity.as_str(),
        escape(&flash.text)
    )
}

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
