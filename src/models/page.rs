//! Page identifiers and the sidebar menu.

use serde::{Deserialize, Serialize};

use super::Role;

/// Every page the dashboard can show.
///
/// Serialized as the menu label so the session keeps the same value the sidebar posts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    #[serde(rename = "login")]
    Login,
    #[serde(rename = "Attendance")]
    Attendance,
    #[serde(rename = "Leave Requests")]
    LeaveRequests,
    #[serde(rename = "Timesheets")]
    Timesheets,
    #[serde(rename = "Team Directory")]
    TeamDirectory,
    #[serde(rename = "Reports")]
    Reports,
    #[serde(rename = "Settings")]
    Settings,
}

impl Page {
    pub fn label(&self) -> &'static str {
        match self {
            Page::Login => "login",
            Page::Attendance => "Attendance",
            Page::LeaveRequests => "Leave Requests",
            Page::Timesheets => "Timesheets",
            Page::TeamDirectory => "Team Directory",
            Page::Reports => "Reports",
            Page::Settings => "Settings",
        }
    }

    /// Resolve a menu label posted by the sidebar. `login` is not navigable.
    pub fn from_label(label: &str) -> Option<Self> {
        MENU.iter().find(|item| item.page.label() == label).map(|item| item.page)
    }
}

/// One sidebar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub page: Page,
    pub icon: &'static str,
}

const MENU: &[MenuItem] = &[
    MenuItem {
        page: Page::Attendance,
        icon: "📸",
    },
    MenuItem {
        page: Page::LeaveRequests,
        icon: "🌴",
    },
    MenuItem {
        page: Page::Timesheets,
        icon: "🕒",
    },
    MenuItem {
        page: Page::TeamDirectory,
        icon: "👥",
    },
    MenuItem {
        page: Page::Reports,
        icon: "📊",
    },
    MenuItem {
        page: Page::Settings,
        icon: "⚙️",
    },
];

/// Sidebar entries for a role. Both roles currently see the same menu.
pub fn menu_for(_role: Role) -> &'static [MenuItem] {
    MENU
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_label_resolves() {
        for item in menu_for(Role::Employee) {
            assert_eq!(Page::from_label(item.page.label()), Some(item.page));
        }
    }

    #[test]
    fn test_login_and_unknown_labels_rejected() {
        assert_eq!(Page::from_label("login"), None);
        assert_eq!(Page::from_label("Payroll"), None);
        assert_eq!(Page::from_label("attendance"), None);
    }

    #[test]
    fn test_menu_same_for_both_roles() {
        assert_eq!(menu_for(Role::Admin), menu_for(Role::Employee));
        assert_eq!(menu_for(Role::Admin)[0].page, Page::Attendance);
    }

    #[test]
    fn test_default_page_is_login() {
        assert_eq!(Page::default(), Page::Login);
    }
}
