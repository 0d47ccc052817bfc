//! Route table module
//!
//! The table is built once at startup and shared read-only by every connection.

use super::matcher::PathRule;
use crate::config::RootPolicy;

/// Handler capability a route dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Ok,
    Forbidden,
    InternalServerError,
    Redirect,
    RedirectTarget,
    Timeout,
    Docs,
}

/// A single entry of the route table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub rule: PathRule,
    pub endpoint: Endpoint,
}

/// Outcome of resolving a request path
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution<'r, 'p> {
    /// A route matched, `remainder` is the path after a prefix pattern
    Matched { route: &'r Route, remainder: &'p str },
    /// The path names a subtree without its trailing slash
    AddTrailingSlash,
    NotFound,
}

/// Ordered route table
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Build the canned-endpoint table with the given root policy
    pub fn new(root_policy: RootPolicy) -> Self {
        let root_rule = match root_policy {
            RootPolicy::Strict => PathRule::Exact("/"),
            RootPolicy::CatchAll => PathRule::Prefix("/"),
        };

        let routes = vec![
            Route {
                name: "ok",
                rule: root_rule,
                endpoint: Endpoint::Ok,
            },
            Route {
                name: "error403",
                rule: PathRule::Exact("/error403"),
                endpoint: Endpoint::Forbidden,
            },
            Route {
                name: "error500",
                rule: PathRule::Exact("/error500"),
                endpoint: Endpoint::InternalServerError,
            },
            Route {
                name: "redirect",
                rule: PathRule::Exact("/redirect"),
                endpoint: Endpoint::Redirect,
            },
            Route {
                name: "redirecttwo",
                rule: PathRule::Exact("/redirecttwo"),
                endpoint: Endpoint::RedirectTarget,
            },
            Route {
                name: "redirect-two",
                rule: PathRule::Exact("/redirect-two"),
                endpoint: Endpoint::RedirectTarget,
            },
            Route {
                name: "timeout",
                rule: PathRule::Prefix("/timeout/"),
                endpoint: Endpoint::Timeout,
            },
            Route {
                name: "swagger",
                rule: PathRule::Prefix("/swagger/"),
                endpoint: Endpoint::Docs,
            },
        ];

        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a request path
    ///
    /// Exact rules win, then a bare subtree path is redirected to its
    /// slash form, then the longest matching prefix rule.
    pub fn resolve<'r, 'p>(&'r self, path: &'p str) -> Resolution<'r, 'p> {
        if let Some(route) = self
            .routes
            .iter()
            .find(|r| r.rule.is_exact() && r.rule.matches(path))
        {
            return Resolution::Matched {
                route,
                remainder: "",
            };
        }

        if self.routes.iter().any(|r| r.rule.is_bare_subtree(path)) {
            return Resolution::AddTrailingSlash;
        }

        self.routes
            .iter()
            .filter(|r| !r.rule.is_exact() && r.rule.matches(path))
            .max_by_key(|r| r.rule.specificity())
            .map_or(Resolution::NotFound, |route| Resolution::Matched {
                route,
                remainder: route.rule.remainder(path),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint_of(router: &Router, path: &str) -> Option<Endpoint> {
        match router.resolve(path) {
            Resolution::Matched { route, .. } => Some(route.endpoint),
            _ => None,
        }
    }

    #[test]
    fn test_fixed_paths() {
        let router = Router::new(RootPolicy::Strict);
        assert_eq!(endpoint_of(&router, "/"), Some(Endpoint::Ok));
        assert_eq!(endpoint_of(&router, "/error403"), Some(Endpoint::Forbidden));
        assert_eq!(
            endpoint_of(&router, "/error500"),
            Some(Endpoint::InternalServerError)
        );
        assert_eq!(endpoint_of(&router, "/redirect"), Some(Endpoint::Redirect));
        assert_eq!(
            endpoint_of(&router, "/redirecttwo"),
            Some(Endpoint::RedirectTarget)
        );
        assert_eq!(
            endpoint_of(&router, "/redirect-two"),
            Some(Endpoint::RedirectTarget)
        );
    }

    #[test]
    fn test_prefix_remainder() {
        let router = Router::new(RootPolicy::Strict);
        match router.resolve("/timeout/42") {
            Resolution::Matched { route, remainder } => {
                assert_eq!(route.endpoint, Endpoint::Timeout);
                assert_eq!(remainder, "42");
            }
            other => panic!("unexpected resolution: {other:?}"),
        }
        assert_eq!(
            endpoint_of(&router, "/swagger/openapi.json"),
            Some(Endpoint::Docs)
        );
        assert_eq!(endpoint_of(&router, "/swagger/"), Some(Endpoint::Docs));
    }

    #[test]
    fn test_strict_root() {
        let router = Router::new(RootPolicy::Strict);
        assert_eq!(router.resolve("/nonexistent"), Resolution::NotFound);
        assert_eq!(router.resolve("/error403/extra"), Resolution::NotFound);
    }

    #[test]
    fn test_catch_all_root() {
        let router = Router::new(RootPolicy::CatchAll);
        assert_eq!(endpoint_of(&router, "/nonexistent"), Some(Endpoint::Ok));
        assert_eq!(endpoint_of(&router, "/a/b/c"), Some(Endpoint::Ok));
        // More specific prefixes still win over the catch-all root
        assert_eq!(endpoint_of(&router, "/timeout/5"), Some(Endpoint::Timeout));
    }

    #[test]
    fn test_bare_subtree_redirect() {
        for policy in [RootPolicy::Strict, RootPolicy::CatchAll] {
            let router = Router::new(policy);
            assert_eq!(router.resolve("/timeout"), Resolution::AddTrailingSlash);
            assert_eq!(router.resolve("/swagger"), Resolution::AddTrailingSlash);
        }
    }

    #[test]
    fn test_route_table_is_complete() {
        let router = Router::new(RootPolicy::Strict);
        let names: Vec<_> = router.routes().iter().map(|r| r.name).collect();
        for expected in [
            "ok",
            "error403",
            "error500",
            "redirect",
            "redirecttwo",
            "timeout",
            "swagger",
        ] {
            assert!(names.contains(&expected), "missing route {expected}");
        }
    }
}
