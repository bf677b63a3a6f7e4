// ── Route table & guard ──

use std::fmt;

use crate::model::EntityId;
use crate::session::Session;

/// Every screen of the application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    AddQuery,
    ViewDetail(EntityId),
    MyQueries,
    MyRecommendations,
    RecommendationsForMe,
    Queries,
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::AddQuery
                | Self::ViewDetail(_)
                | Self::MyQueries
                | Self::MyRecommendations
                | Self::RecommendationsForMe
        )
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".into(),
            Self::Login => "/login".into(),
            Self::Register => "/register".into(),
            Self::AddQuery => "/addquery".into(),
            Self::ViewDetail(id) => format!("/viewdetail/{id}"),
            Self::MyQueries => "/myqueries".into(),
            Self::MyRecommendations => "/myrecommendations".into(),
            Self::RecommendationsForMe => "/recommendationsforme".into(),
            Self::Queries => "/queries".into(),
        }
    }

    /// Parse a path back into a route. Unknown paths yield `None`.
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/addquery" => Self::AddQuery,
            "/myqueries" => Self::MyQueries,
            "/myrecommendations" => Self::MyRecommendations,
            "/recommendationsforme" => Self::RecommendationsForMe,
            "/queries" => Self::Queries,
            other => {
                let id = other.strip_prefix("/viewdetail/")?;
                if id.is_empty() || id.contains('/') {
                    return None;
                }
                Self::ViewDetail(EntityId::from(id))
            }
        };
        Some(route)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of guarding a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow(Route),
    /// The login view should send the user back to `from` afterwards.
    RedirectToLogin { from: Route },
}

pub fn guard(route: Route, session: &Session) -> Navigation {
    if route.requires_auth() && !session.is_signed_in() {
        Navigation::RedirectToLogin { from: route }
    } else {
        Navigation::Allow(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionUser;

    #[test]
    fn protected_routes_redirect_when_signed_out() {
        let session = Session::anonymous();
        let detail = Route::ViewDetail(EntityId::from("q1"));
        assert_eq!(
            guard(detail.clone(), &session),
            Navigation::RedirectToLogin { from: detail }
        );
        assert_eq!(guard(Route::Queries, &session), Navigation::Allow(Route::Queries));
    }

    #[test]
    fn signed_in_user_passes_every_route() {
        let session = Session::signed_in(SessionUser::new("a@example.com"));
        assert_eq!(
            guard(Route::MyQueries, &session),
            Navigation::Allow(Route::MyQueries)
        );
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Home,
            Route::Login,
            Route::Register,
            Route::AddQuery,
            Route::ViewDetail(EntityId::from("665f")),
            Route::MyQueries,
            Route::MyRecommendations,
            Route::RecommendationsForMe,
            Route::Queries,
        ] {
            assert_eq!(Route::from_path(&route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/viewdetail/"), None);
        assert_eq!(Route::from_path("/nope"), None);
    }
}
