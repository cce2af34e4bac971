//! Access
//!
//! Role-based entry resolution. A session's role is parsed once into [`Role`], and each route
//! entry is resolved into either a view to render or a redirect.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors related to roles.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// The role string is not one of the known roles.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Storefront customer
    Customer,

    /// Administrator
    Admin,

    /// Sales manager
    Commercial,

    /// Stock manager
    StockManager,
}

impl Role {
    /// Session role string.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "client",
            Role::Admin => "admin",
            Role::Commercial => "commercial",
            Role::StockManager => "stock",
        }
    }

    /// The back-office dashboard for this role, if it has one.
    pub fn dashboard(self) -> Option<Area> {
        match self {
            Role::Customer => None,
            Role::Admin => Some(Area::AdminDashboard),
            Role::Commercial => Some(Area::CommercialDashboard),
            Role::StockManager => Some(Area::StockDashboard),
        }
    }

    /// Profile menu entries for this role, in display order.
    pub fn menu(self) -> Vec<Area> {
        let mut entries = vec![Area::ClientDashboard];
        entries.extend(self.dashboard());
        entries
    }
}

impl FromStr for Role {
    type Err = AccessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" | "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            "commercial" | "gest_commercial" => Ok(Role::Commercial),
            "stock" | "gest_stock" => Ok(Role::StockManager),
            _ => Err(AccessError::UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = AccessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Email address
    pub email: String,

    /// Display name
    pub name: String,

    /// Role
    pub role: Role,
}

/// Current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user, if any
    pub user: Option<User>,
}

impl Session {
    /// An anonymous session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for a signed-in user.
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Role of the signed-in user.
    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}

/// Routable area of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    /// Landing page
    Storefront,
    /// Product catalog
    Catalog,
    /// Cart
    Cart,
    /// Checkout
    Checkout,
    /// Customer dashboard and order history
    ClientDashboard,
    /// Administration dashboard
    AdminDashboard,
    /// Sales dashboard
    CommercialDashboard,
    /// Stock management dashboard
    StockDashboard,
    /// Sign-in form
    Login,
}

impl Area {
    /// Route path
    pub fn path(self) -> &'static str {
        match self {
            Area::Storefront => "/",
            Area::Catalog => "/catalog",
            Area::Cart => "/cart",
            Area::Checkout => "/checkout",
            Area::ClientDashboard => "/client",
            Area::AdminDashboard => "/admin",
            Area::CommercialDashboard => "/commercial",
            Area::StockDashboard => "/stock",
            Area::Login => "/login",
        }
    }

    fn requirement(self) -> Requirement {
        match self {
            Area::Storefront | Area::Catalog | Area::Cart | Area::Login => Requirement::Public,
            Area::Checkout | Area::ClientDashboard => Requirement::SignedIn,
            Area::AdminDashboard => Requirement::Role(Role::Admin),
            Area::CommercialDashboard => Requirement::Role(Role::Commercial),
            Area::StockDashboard => Requirement::Role(Role::StockManager),
        }
    }
}

enum Requirement {
    Public,
    SignedIn,
    Role(Role),
}

/// Outcome of entering an area
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Render the area
    Render(Area),

    /// Navigate to another path instead
    Redirect(String),
}

/// Resolve what happens when `session` enters `area`.
///
/// Denied entries redirect to the sign-in form with the requested path as the return target.
/// A signed-in user entering the sign-in form is sent to the customer dashboard.
pub fn resolve_entry(session: &Session, area: Area) -> Entry {
    let role = session.role();

    if area == Area::Login && role.is_some() {
        return Entry::Redirect(Area::ClientDashboard.path().to_string());
    }

    let allowed = match area.requirement() {
        Requirement::Public => true,
        Requirement::SignedIn => role.is_some(),
        Requirement::Role(required) => role == Some(required),
    };

    if allowed {
        Entry::Render(area)
    } else {
        warn!(
            area = area.path(),
            role = role.map(Role::as_str),
            "entry denied"
        );

        Entry::Redirect(format!("{}?redirect={}", Area::Login.path(), area.path()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn session(role: Role) -> Session {
        Session::signed_in(User {
            email: format!("{role}@example.com"),
            name: role.to_string(),
            role,
        })
    }

    #[test]
    fn role_parses_session_strings() -> TestResult {
        assert_eq!("client".parse::<Role>()?, Role::Customer);
        assert_eq!("admin".parse::<Role>()?, Role::Admin);
        assert_eq!("commercial".parse::<Role>()?, Role::Commercial);
        assert_eq!("stock".parse::<Role>()?, Role::StockManager);
        assert_eq!("GEST_STOCK".parse::<Role>()?, Role::StockManager);

        Ok(())
    }

    #[test]
    fn role_rejects_unknown_string() {
        assert_eq!(
            "owner".parse::<Role>(),
            Err(AccessError::UnknownRole("owner".to_string()))
        );
    }

    #[test]
    fn public_areas_render_for_anonymous_sessions() {
        let anonymous = Session::anonymous();

        for area in [Area::Storefront, Area::Catalog, Area::Cart, Area::Login] {
            assert_eq!(resolve_entry(&anonymous, area), Entry::Render(area));
        }
    }

    #[test]
    fn signed_in_areas_redirect_anonymous_to_login() {
        let anonymous = Session::anonymous();

        assert_eq!(
            resolve_entry(&anonymous, Area::Checkout),
            Entry::Redirect("/login?redirect=/checkout".to_string())
        );
        assert_eq!(
            resolve_entry(&anonymous, Area::ClientDashboard),
            Entry::Redirect("/login?redirect=/client".to_string())
        );
    }

    #[test]
    fn dashboards_require_matching_role() {
        let dashboards = [
            (Role::Admin, Area::AdminDashboard),
            (Role::Commercial, Area::CommercialDashboard),
            (Role::StockManager, Area::StockDashboard),
        ];

        for (role, area) in dashboards {
            assert_eq!(resolve_entry(&session(role), area), Entry::Render(area));

            assert_eq!(
                resolve_entry(&session(Role::Customer), area),
                Entry::Redirect(format!("/login?redirect={}", area.path()))
            );
        }

        assert_eq!(
            resolve_entry(&session(Role::Admin), Area::StockDashboard),
            Entry::Redirect("/login?redirect=/stock".to_string())
        );
    }

    #[test]
    fn every_role_reaches_client_dashboard_and_checkout() {
        for role in [
            Role::Customer,
            Role::Admin,
            Role::Commercial,
            Role::StockManager,
        ] {
            let session = session(role);

            assert_eq!(
                resolve_entry(&session, Area::ClientDashboard),
                Entry::Render(Area::ClientDashboard)
            );
            assert_eq!(
                resolve_entry(&session, Area::Checkout),
                Entry::Render(Area::Checkout)
            );
        }
    }

    #[test]
    fn signed_in_login_redirects_to_client_dashboard() {
        assert_eq!(
            resolve_entry(&session(Role::Commercial), Area::Login),
            Entry::Redirect("/client".to_string())
        );
    }

    #[test]
    fn menu_lists_client_dashboard_then_role_dashboard() {
        assert_eq!(Role::Customer.menu(), vec![Area::ClientDashboard]);
        assert_eq!(
            Role::StockManager.menu(),
            vec![Area::ClientDashboard, Area::StockDashboard]
        );
    }

    #[test]
    fn user_deserializes_role_string() -> TestResult {
        let user: User =
            serde_norway::from_str("email: a@b.c\nname: Awa\nrole: commercial\n")?;

        assert_eq!(user.role, Role::Commercial);

        Ok(())
    }
}
