//! Activity gate: which page and tab are showing, and whether a view owns them.
//!
//! The host fires every handler subscribed to a changed input, visible or
//! not. A handler therefore evaluates [`is_active`] before anything else and
//! does nothing when it is false.
//!
//! ```
//! use foundry_session::gate::{Navigation, ViewScope};
//!
//! let scope = ViewScope::new("/research-hub", "universe-manager-tab");
//! let mut nav = Navigation::new("/research-hub", "universe-manager-tab");
//! assert!(scope.is_active(&nav));
//!
//! nav.select_tab("performance-tab");
//! assert!(!scope.is_active(&nav));
//! ```

use serde::{Deserialize, Serialize};

/// `true` iff the displayed route is `expected_route` and the selected tab is
/// `expected_tab`. Pure, with no memory of earlier values.
pub fn is_active(
    current_route: &str,
    expected_route: &str,
    current_tab: &str,
    expected_tab: &str,
) -> bool {
    current_route == expected_route && current_tab == expected_tab
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// The route and tab currently displayed.
///
/// The tab survives route changes: navigating away and back keeps the tab
/// the page had selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    route: String,
    tab: String,
}

impl Navigation {
    pub fn new(route: &str, tab: &str) -> Self {
        Self {
            route: route.to_owned(),
            tab: tab.to_owned(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    /// Display `route`. Returns `true` if the route changed.
    pub fn navigate(&mut self, route: &str) -> bool {
        if self.route == route {
            return false;
        }
        self.route = route.to_owned();
        true
    }

    /// Select `tab` on the current page. Returns `true` if the tab changed.
    pub fn select_tab(&mut self, tab: &str) -> bool {
        if self.tab == tab {
            return false;
        }
        self.tab = tab.to_owned();
        true
    }
}

// ---------------------------------------------------------------------------
// ViewScope
// ---------------------------------------------------------------------------

/// The page/tab pair a view belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewScope {
    route: String,
    tab: String,
}

impl ViewScope {
    pub fn new(route: &str, tab: &str) -> Self {
        Self {
            route: route.to_owned(),
            tab: tab.to_owned(),
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn tab(&self) -> &str {
        &self.tab
    }

    /// Evaluate the gate for this scope against the current navigation.
    pub fn is_active(&self, navigation: &Navigation) -> bool {
        is_active(&navigation.route, &self.route, &navigation.tab, &self.tab)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
