//! Route registry
//!
//! Maps `(path, method)` to an [`Endpoint`]. A single reader/writer lock
//! guards the whole table; it is held only for the map access, never
//! across an endpoint invocation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::endpoint::Endpoint;

/// Concurrency-safe route table: path -> (method -> endpoint)
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: RwLock<HashMap<String, HashMap<String, Endpoint>>>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `endpoint` for `method` and `path`, replacing any endpoint
    /// already registered for that exact pair. Other methods on the same
    /// path are left alone.
    pub fn register(&self, method: impl AsRef<str>, path: impl Into<String>, endpoint: Endpoint) {
        let mut routes = self.routes.write().unwrap_or_else(PoisonError::into_inner);
        routes
            .entry(path.into())
            .or_default()
            .insert(method.as_ref().to_string(), endpoint);
    }

    /// Look up the endpoint for `method` and `path`.
    pub fn lookup(&self, method: &str, path: &str) -> Option<Endpoint> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.get(path).and_then(|methods| methods.get(method)).cloned()
    }

    /// All registered `(method, path)` pairs, sorted by path then method
    pub fn routes(&self) -> Vec<(String, String)> {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        let mut pairs: Vec<(String, String)> = routes
            .iter()
            .flat_map(|(path, methods)| {
                methods
                    .keys()
                    .map(move |method| (method.clone(), path.clone()))
            })
            .collect();
        pairs.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pairs
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        let routes = self.routes.read().unwrap_or_else(PoisonError::into_inner);
        routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::EndpointResult;
    use bytes::Bytes;
    use std::sync::Arc;

    fn fixed(body: &'static str) -> Endpoint {
        Endpoint::new(move |_ctx, _body| async move {
            EndpointResult::Ok(Bytes::from_static(body.as_bytes()))
        })
    }

    #[tokio::test]
    async fn test_methods_on_same_path_are_isolated() {
        let registry = RouteRegistry::new();
        registry.register("POST", "/a", fixed("post"));
        registry.register("GET", "/a", fixed("get"));

        let post = registry.lookup("POST", "/a").unwrap();
        let get = registry.lookup("GET", "/a").unwrap();

        assert_eq!(post.invoke(Bytes::new()).await.unwrap(), "post");
        assert_eq!(get.invoke(Bytes::new()).await.unwrap(), "get");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let registry = RouteRegistry::new();
        let first = fixed("first");
        let second = fixed("second");

        registry.register("POST", "/greet", first.clone());
        registry.register("POST", "/greet", second.clone());

        let found = registry.lookup("POST", "/greet").unwrap();
        assert!(found.ptr_eq(&second));
        assert!(!found.ptr_eq(&first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_unregistered() {
        let registry = RouteRegistry::new();
        assert!(registry.is_empty());

        registry.register("POST", "/greet", fixed("x"));
        assert!(registry.lookup("GET", "/greet").is_none());
        assert!(registry.lookup("POST", "/other").is_none());
    }

    #[test]
    fn test_accepts_arbitrary_strings() {
        let registry = RouteRegistry::new();
        registry.register("BREW", "no-leading-slash", fixed("coffee"));
        assert!(registry.lookup("BREW", "no-leading-slash").is_some());
    }

    #[test]
    fn test_routes_listing() {
        let registry = RouteRegistry::new();
        registry.register("POST", "/b", fixed("x"));
        registry.register(http::Method::GET, "/a", fixed("x"));
        registry.register("POST", "/a", fixed("x"));

        assert_eq!(
            registry.routes(),
            vec![
                ("GET".to_string(), "/a".to_string()),
                ("POST".to_string(), "/a".to_string()),
                ("POST".to_string(), "/b".to_string()),
            ]
        );
    }

    #[test]
    fn test_concurrent_register_and_lookup() {
        const WRITERS: usize = 8;
        const READERS: usize = 8;
        const PER_WRITER: usize = 50;

        let registry = Arc::new(RouteRegistry::new());
        registry.register("GET", "/health", fixed("ok"));

        std::thread::scope(|scope| {
            for w in 0..WRITERS {
                let registry = registry.clone();
                scope.spawn(move || {
                    for i in 0..PER_WRITER {
                        registry.register("POST", format!("/w{}/r{}", w, i), fixed("x"));
                    }
                });
            }
            for _ in 0..READERS {
                let registry = registry.clone();
                scope.spawn(move || {
                    for _ in 0..PER_WRITER {
                        assert!(registry.lookup("GET", "/health").is_some());
                    }
                });
            }
        });

        assert_eq!(registry.len(), WRITERS * PER_WRITER + 1);
        for w in 0..WRITERS {
            for i in 0..PER_WRITER {
                let path = format!("/w{}/r{}", w, i);
                assert!(registry.lookup("POST", &path).is_some(), "lost {}", path);
            }
        }
    }
}
