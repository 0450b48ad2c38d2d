//! Sidebar with the profile block, the menu, and logout.

use super::escape;
use crate::models::{menu_for, Account, Page, Role};

/// Render the sidebar. Exactly one menu entry is marked active when `active` is a menu page.
pub fn render(account: Option<&Account>, role: Role, active: Page) -> String {
    let mut html = String::from("<nav class=\"sidebar\">");

    if let Some(account) = account {
        html.push_str(&format!(
            "<div class=\"profile\"><div class=\"avatar\">{}</div><div class=\"name\">{}</div>\
             <div class=\"role\">{}</div></div>",
            escape(account.avatar),
            escape(account.display_name),
            role.as_str()
        ));
    }

    html.push_str("<form method=\"post\" action=\"/navigate\">");
    for item in menu_for(role) {
        let label = escape(item.page.label());
        if item.page == active {
            html.push_str(&format!(
                "<button type=\"submit\" name=\"page\" value=\"{label}\" class=\"nav-item active\" aria-current=\"page\">{} {label}</button>",
                item.icon
            ));
        } else {
            html.push_str(&format!(
                "<button type=\"submit\" name=\"page\" value=\"{label}\" class=\"nav-item\">{} {label}</button>",
                item.icon
            ));
        }
    }
    html.push_str("</form>");

    html.push_str(
        "<form method=\"post\" action=\"/logout\"><button type=\"submit\" class=\"nav-item\">🚪 Logout</button></form>",
    );
    html.push_str("</nav>");
    html
}
