//! Page dispatcher: one render function per [`Page`].

use super::escape;
use crate::models::Page;
use crate::session::SessionContext;

/// Rows shown under the upload form.
const RECENT_ACTIVITY_LIMIT: usize = 20;

/// Render the main content area for `page`.
pub fn render_page(page: Page, ctx: &SessionContext) -> String {
    match page {
        Page::Login => String::new(),
        Page::Attendance => attendance(ctx),
        Page::LeaveRequests => placeholder(page, "Leave balances and requests will appear here."),
        Page::Timesheets => placeholder(page, "Weekly timesheets are not available yet."),
        Page::TeamDirectory => placeholder(page, "The team directory is coming soon."),
        Page::Reports => placeholder(page, "Attendance reports are under construction."),
        Page::Settings => placeholder(page, "Account settings are not available yet."),
    }
}

fn placeholder(page: Page, text: &str) -> String {
    format!(
        "<h2>{}</h2><div class=\"card\"><p>🚧 {}</p></div>",
        escape(page.label()),
        escape(text)
    )
}

fn attendance(ctx: &SessionContext) -> String {
    let mut html = String::from(
        r#"<h2>Attendance</h2>
<div class="card">
<h3>Upload activity photo</h3>
<form method="post" action="/activity" enctype="multipart/form-data">
<label for="image">Photo</label>
<input id="image" name="image" type="file" accept="image/*" capture="environment">
<label for="description">Activity description</label>
<textarea id="description" name="description" rows="3" placeholder="What are you working on?"></textarea>
<button type="submit" class="primary">Submit activity</button>
</form>
</div>"#,
    );

    let rows = ctx.visible_activity(RECENT_ACTIVITY_LIMIT);
    html.push_str("<h3>Recent activity</h3>");
    if rows.is_empty() {
        html.push_str("<p>No activity recorded yet.</p>");
        return html;
    }

    html.push_str(
        "<table><thead><tr><th>Photo</th><th>User</th><th>Time (IST)</th><th>Description</th></tr></thead><tbody>",
    );
    for record in rows {
        html.push_str(&format!(
            "<tr><td><img src=\"/{src}\" alt=\"activity photo\"></td><td>{user}</td><td>{time}</td><td>{desc}</td></tr>",
            src = escape(&record.image_file),
            user = escape(&record.username),
            time = escape(&record.timestamp),
            desc = escape(&record.description),
        ));
    }
    html.push_str("</tbody></table>");
    html
}
