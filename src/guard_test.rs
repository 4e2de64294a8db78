use std::sync::Arc;

use super::*;
use crate::session::UserProfile;
use crate::storage::MemoryStorage;

fn guard_with_session(logged_in: bool) -> (RouteGuard, SessionStore) {
    let store = SessionStore::new(Arc::new(MemoryStorage::new()));
    if logged_in {
        store
            .save("tok1", &UserProfile { id: 1, name: "A".into(), email: "a@x.com".into() })
            .unwrap();
    }
    (RouteGuard::new(store.clone()), store)
}

fn protected_routes() -> Vec<Route> {
    vec![
        Route::Dashboard,
        Route::Course { course_id: 1 },
        Route::Assignment { assignment_id: 101 },
        Route::Draft { draft_id: 7 },
    ]
}

// =============================================================================
// Route::parse / Route::path
// =============================================================================

#[test]
fn parse_fixed_routes() {
    assert_eq!(Route::parse("/"), Route::Root);
    assert_eq!(Route::parse(""), Route::Root);
    assert_eq!(Route::parse("/login"), Route::Login);
    assert_eq!(Route::parse("/login/"), Route::Login);
    assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
    assert_eq!(Route::parse("/auth/google/callback"), Route::OAuthCallback);
}

#[test]
fn parse_ignores_query_and_fragment() {
    assert_eq!(Route::parse("/auth/google/callback?code=abc&state=xyz"), Route::OAuthCallback);
    assert_eq!(Route::parse("/dashboard#top"), Route::Dashboard);
}

#[test]
fn parse_id_routes() {
    assert_eq!(Route::parse("/courses/42"), Route::Course { course_id: 42 });
    assert_eq!(Route::parse("/assignments/101/"), Route::Assignment { assignment_id: 101 });
    assert_eq!(Route::parse("/drafts/7"), Route::Draft { draft_id: 7 });
}

#[test]
fn parse_bad_id_is_not_found() {
    assert_eq!(Route::parse("/courses/abc"), Route::NotFound("/courses/abc".into()));
}

#[test]
fn parse_unknown_is_not_found() {
    assert_eq!(Route::parse("/settings"), Route::NotFound("/settings".into()));
}

#[test]
fn path_parses_back_to_same_route() {
    let mut routes = protected_routes();
    routes.extend([Route::Root, Route::Login, Route::OAuthCallback]);
    for route in routes {
        assert_eq!(Route::parse(&route.path()), route, "path {route}");
    }
}

#[test]
fn only_data_views_are_protected() {
    for route in protected_routes() {
        assert!(route.is_protected(), "{route} should be protected");
    }
    assert!(!Route::Login.is_protected());
    assert!(!Route::OAuthCallback.is_protected());
    assert!(!Route::NotFound("/x".into()).is_protected());
}

// =============================================================================
// decide
// =============================================================================

#[test]
fn root_redirects_by_auth_state() {
    assert_eq!(decide(Route::Root, AuthState::Authenticated), Navigation::Redirect(Route::Dashboard));
    assert_eq!(decide(Route::Root, AuthState::Anonymous), Navigation::Redirect(Route::Login));
}

#[test]
fn public_routes_always_render() {
    for state in [AuthState::Authenticated, AuthState::Anonymous] {
        assert_eq!(decide(Route::Login, state), Navigation::Render(Route::Login));
        assert_eq!(decide(Route::OAuthCallback, state), Navigation::Render(Route::OAuthCallback));
    }
}

// =============================================================================
// RouteGuard
// =============================================================================

#[test]
fn authenticated_renders_every_protected_route() {
    let (guard, _) = guard_with_session(true);
    for route in protected_routes() {
        assert_eq!(guard.evaluate(route.clone()), Navigation::Render(route));
    }
}

#[test]
fn anonymous_redirects_every_protected_route_to_login() {
    let (guard, _) = guard_with_session(false);
    for route in protected_routes() {
        assert_eq!(guard.evaluate(route), Navigation::Redirect(Route::Login));
    }
}

#[test]
fn guard_reevaluates_after_clear() {
    let (guard, store) = guard_with_session(true);
    assert_eq!(guard.auth_state(), AuthState::Authenticated);
    store.clear().unwrap();
    assert_eq!(guard.auth_state(), AuthState::Anonymous);
    assert_eq!(guard.evaluate(Route::Dashboard), Navigation::Redirect(Route::Login));
}
