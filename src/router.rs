use crate::error::InsertError;
use crate::tree::Node;

use std::collections::HashMap;
use std::hash::Hash;

/// A set of routing trees, one per key.
///
/// Keys are usually request methods: every method gets its own tree, and a
/// route registered for one method never conflicts with a route registered
/// for another.
///
/// ```rust
/// use routetrie::Router;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut router = Router::new();
/// router.insert("GET", "/users/:id", "show user")?;
/// router.insert("POST", "/users/:id", "update user")?;
/// router.insert("GET", "/files/*filepath", "serve files")?;
///
/// assert_eq!(router.get(&"GET", "/users/:id"), Some(&"show user"));
/// assert!(router.insert("GET", "/users/new", "new user form").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Router<K: Eq + Hash, V> {
    trees: HashMap<K, Node<V>>,

    /// Rejects static segments that share a tree position with a named
    /// parameter, whichever of the two is registered first.
    ///
    /// For example `/user/:name` and `/user/list` can not both be registered
    /// under the same key while this is enabled. When disabled, the static
    /// route is kept in front of the parameter and is tried first by lookups.
    ///
    /// Enabled by default.
    pub strict_wildcards: bool,
}

impl<K: Eq + Hash, V> Router<K, V> {
    /// Creates a router with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route and its value under the given key.
    ///
    /// Routes must begin with `/`.
    pub fn insert(&mut self, key: K, route: impl Into<String>, value: V) -> Result<(), InsertError> {
        let route = route.into();

        if !route.starts_with('/') {
            debug!("rejected route '{}': missing leading slash", route);
            return Err(InsertError::MissingLeadingSlash { path: route });
        }

        let strict = self.strict_wildcards;
        self.trees
            .entry(key)
            .or_default()
            .insert_with(route, value, strict)
    }

    /// Returns the value registered under `key` for exactly this route pattern.
    pub fn get(&self, key: &K, route: &str) -> Option<&V> {
        self.trees.get(key)?.get(route)
    }

    /// Returns a mutable reference to the value registered under `key` for
    /// exactly this route pattern.
    pub fn get_mut(&mut self, key: &K, route: &str) -> Option<&mut V> {
        self.trees.get_mut(key)?.get_mut(route)
    }

    /// Returns the routing tree for a key, to be handed to a matcher.
    pub fn tree(&self, key: &K) -> Option<&Node<V>> {
        self.trees.get(key)
    }

    /// Returns the keys that have at least one registered route.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.trees.keys()
    }

    /// Registers every route of `other` into this router.
    ///
    /// Stops at the first route that can not be inserted; routes merged
    /// before it stay registered.
    ///
    /// ```rust
    /// use routetrie::Router;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut api = Router::new();
    /// api.insert("GET", "/api/users", 1)?;
    ///
    /// let mut root = Router::new();
    /// root.insert("GET", "/", 0)?;
    /// root.merge(api)?;
    ///
    /// assert_eq!(root.get(&"GET", "/api/users"), Some(&1));
    /// # Ok(())
    /// # }
    /// ```
    pub fn merge(&mut self, other: Self) -> Result<(), InsertError>
    where
        K: Clone,
    {
        for (key, tree) in other.trees {
            for (route, value) in tree.into_routes() {
                self.insert(key.clone(), route, value)?;
            }
        }

        Ok(())
    }
}

impl<K: Eq + Hash, V> Default for Router<K, V> {
    fn default() -> Self {
        Self {
            trees: HashMap::new(),
            strict_wildcards: true,
        }
    }
}
