use crate::error::{lossy, InsertError};

use std::mem;

/// The type of a node in the routing tree.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeType {
    /// The root of the tree.
    Root,
    /// A node holding literal path text.
    Static,
    /// A named parameter, `:name`.
    Param,
    /// A catch-all parameter, `*name`.
    ///
    /// Catch-alls are stored as two nodes: an intermediate node with an empty
    /// prefix, and its only child holding `/*name`.
    CatchAll,
}

/// A node in the routing tree.
///
/// Children are ordered by priority, the number of routes registered in
/// their subtree, so that busier branches are tried first. A wildcard child,
/// if any, is always the last child and is never listed in `indices`.
#[derive(Clone, Debug)]
pub struct Node<T> {
    pub(crate) priority: u32,
    pub(crate) wild_child: bool,
    // The first byte of each static child's prefix, in child order.
    pub(crate) indices: Vec<u8>,
    pub(crate) node_type: NodeType,
    pub(crate) prefix: Vec<u8>,
    pub(crate) full_path: String,
    pub(crate) value: Option<T>,
    pub(crate) children: Vec<Node<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node {
            priority: 0,
            wild_child: false,
            indices: Vec::new(),
            node_type: NodeType::Static,
            prefix: Vec::new(),
            full_path: String::new(),
            value: None,
            children: Vec::new(),
        }
    }
}

impl<T> Node<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a route into the tree, rejecting static segments that share a
    /// position with a named parameter, in either registration order.
    ///
    /// ```
    /// use routetrie::Node;
    ///
    /// let mut tree = Node::new();
    /// tree.insert("/users/:id", "user").unwrap();
    /// assert!(tree.insert("/users/new", "new user").is_err());
    /// assert_eq!(tree.get("/users/:id"), Some(&"user"));
    /// ```
    pub fn insert(&mut self, route: impl Into<String>, value: T) -> Result<(), InsertError> {
        self.insert_with(route, value, true)
    }

    /// Inserts a route into the tree.
    ///
    /// With `strict` unset, static children may be registered next to a
    /// named parameter; they are kept in front of it. Static siblings of a
    /// catch-all are accepted in both modes.
    ///
    /// The tree is left unchanged if the route is malformed. A route that
    /// conflicts with an existing one may still have split nodes and bumped
    /// priorities on the way to the conflict.
    pub fn insert_with(
        &mut self,
        route: impl Into<String>,
        value: T,
        strict: bool,
    ) -> Result<(), InsertError> {
        let route = route.into();
        let full_path = route.as_bytes();

        validate(full_path)?;

        // empty tree
        if self.prefix.is_empty() && self.children.is_empty() && self.value.is_none() {
            self.insert_child(full_path, full_path, value)?;
            self.node_type = NodeType::Root;
            self.priority += 1;
            debug!("registered route '{}'", route);
            return Ok(());
        }

        self.priority += 1;

        let mut current = self;
        let mut path = full_path;

        loop {
            let common = longest_common_prefix(path, &current.prefix);

            // the new route only shares part of this node's prefix
            if common < current.prefix.len() {
                let consumed = full_path.len() - path.len();
                current.split(common, &full_path[..consumed + common]);
            }

            // this node is the target
            if common == path.len() {
                if current.value.is_some() {
                    debug!("rejected duplicate route '{}'", route);
                    return Err(InsertError::Duplicate { path: route });
                }

                current.value = Some(value);
                current.full_path = route.clone();
                debug!("registered route '{}'", route);
                return Ok(());
            }

            path = &path[common..];
            let next = path[0];

            // a '/' after a param always leads to the param's only child
            if current.node_type == NodeType::Param
                && next == b'/'
                && current.children.len() == 1
            {
                current = &mut current.children[0];
                current.priority += 1;
                continue;
            }

            // an existing static child
            if let Some(i) = current.indices.iter().position(|&c| c == next) {
                let i = current.increment_child_priority(i);
                current = &mut current.children[i];
                continue;
            }

            // a new static child
            if next != b':' && next != b'*' && current.node_type != NodeType::CatchAll {
                if strict {
                    if let Some(param) = current.param_child() {
                        debug!("rejected route '{}': static segment next to a parameter", route);
                        return Err(InsertError::wildcard_conflict(full_path, path, param));
                    }
                }

                let mut child = Node {
                    full_path: route.clone(),
                    ..Node::default()
                };
                child.insert_child(path, full_path, value)?;

                current.indices.push(next);
                let i = current.add_child(child);
                current.increment_child_priority(i);
                debug!("registered route '{}'", route);
                return Ok(());
            }

            if current.wild_child {
                let last = current.children.len() - 1;
                current = &mut current.children[last];
                current.priority += 1;

                // the same wildcard, either exactly or followed by more segments
                let len = current.prefix.len();
                if path.starts_with(&current.prefix)
                    && current.node_type != NodeType::CatchAll
                    && (len == path.len() || path[len] == b'/')
                {
                    continue;
                }

                debug!("rejected route '{}': wildcard conflict", route);
                return Err(InsertError::wildcard_conflict(full_path, path, current));
            }

            if strict && next == b':' {
                if let Some(existing) = current.children.first() {
                    let wildcard = find_wildcard(path).map_or(path, |w| w.token);
                    debug!("rejected route '{}': parameter next to static routes", route);
                    return Err(InsertError::param_conflict(full_path, wildcard, existing));
                }
            }

            current.insert_child(path, full_path, value)?;
            debug!("registered route '{}'", route);
            return Ok(());
        }
    }

    // Splits this node at `at`, moving the tail of the prefix, along with all
    // children and the value, into a single new child.
    fn split(&mut self, at: usize, full_path: &[u8]) {
        trace!(
            "splitting node '{}' at {}",
            String::from_utf8_lossy(&self.prefix),
            at
        );

        let child = Node {
            priority: self.priority - 1,
            wild_child: mem::take(&mut self.wild_child),
            indices: mem::take(&mut self.indices),
            node_type: NodeType::Static,
            prefix: self.prefix.split_off(at),
            full_path: mem::take(&mut self.full_path),
            value: self.value.take(),
            children: mem::take(&mut self.children),
        };

        self.indices = vec![child.prefix[0]];
        self.children = vec![child];
        self.full_path = lossy(full_path);
    }

    // Inserts the remainder of a route below this node. The caller has
    // ensured that no existing child shares a prefix with `path`.
    fn insert_child(&mut self, path: &[u8], full_path: &[u8], value: T) -> Result<(), InsertError> {
        let route = || lossy(full_path);

        if let Some(wildcard) = find_wildcard(path) {
            if wildcard.token[0] == b'*' && self.prefix.last() == Some(&b'/') {
                return Err(InsertError::CatchAllConflict { path: route() });
            }
        }

        let mut current = self;
        let mut path = path;

        loop {
            let Some(wildcard) = find_wildcard(path) else {
                current.prefix = path.to_vec();
                current.value = Some(value);
                current.full_path = route();
                return Ok(());
            };

            let (token, start) = (wildcard.token, wildcard.start);

            if token[0] == b':' {
                // the literal text before the param stays in this node
                if start > 0 {
                    current.prefix = path[..start].to_vec();
                    path = &path[start..];
                }

                let child = Node {
                    node_type: NodeType::Param,
                    prefix: token.to_vec(),
                    full_path: route(),
                    ..Node::default()
                };

                let i = current.add_child(child);
                current.wild_child = true;
                current = &mut current.children[i];
                current.priority += 1;

                // more segments follow, starting with '/'
                if token.len() < path.len() {
                    path = &path[token.len()..];

                    let child = Node {
                        priority: 1,
                        full_path: route(),
                        ..Node::default()
                    };

                    let i = current.add_child(child);
                    current = &mut current.children[i];
                    continue;
                }

                current.value = Some(value);
                return Ok(());
            }

            // catch-all, including the '/' before it
            let Some(slash) = start.checked_sub(1) else {
                return Err(InsertError::MissingCatchAllSlash { path: route() });
            };

            current.prefix = path[..slash].to_vec();

            let child = Node {
                wild_child: true,
                node_type: NodeType::CatchAll,
                full_path: route(),
                ..Node::default()
            };

            let i = current.add_child(child);
            current.indices = vec![b'/'];
            current = &mut current.children[i];
            current.priority += 1;

            current.children = vec![Node {
                priority: 1,
                node_type: NodeType::CatchAll,
                prefix: path[slash..].to_vec(),
                full_path: route(),
                value: Some(value),
                ..Node::default()
            }];

            return Ok(());
        }
    }

    // Adds a child node, keeping the wildcard child at the end.
    fn add_child(&mut self, child: Node<T>) -> usize {
        let len = self.children.len();

        if self.wild_child && len > 0 {
            self.children.insert(len - 1, child);
            len - 1
        } else {
            self.children.push(child);
            len
        }
    }

    // Increments the priority of the given child, moving it in front of
    // siblings with a strictly lower priority, and returns its new position.
    fn increment_child_priority(&mut self, i: usize) -> usize {
        self.children[i].priority += 1;
        let priority = self.children[i].priority;

        let mut updated = i;
        while updated > 0 && self.children[updated - 1].priority < priority {
            self.children.swap(updated - 1, updated);
            updated -= 1;
        }

        if updated != i {
            self.indices[updated..=i].rotate_right(1);
        }

        updated
    }

    // The named parameter a new static segment would share a position with.
    // A catch-all leaf starts with '/', so it never overlaps a static sibling.
    fn param_child(&self) -> Option<&Node<T>> {
        if !self.wild_child {
            return None;
        }

        self.children.last().filter(|c| c.node_type == NodeType::Param)
    }

    /// Returns the value registered for exactly this route pattern.
    ///
    /// The route is compared literally, so wildcards must be spelled the way
    /// they were registered. This does not match request paths.
    pub fn get(&self, route: &str) -> Option<&T> {
        let mut current = self;
        let mut path = route.as_bytes();

        loop {
            path = path.strip_prefix(current.prefix.as_slice())?;

            let Some(&next) = path.first() else {
                return current.value.as_ref();
            };

            current = if let Some(i) = current.indices.iter().position(|&c| c == next) {
                &current.children[i]
            } else if current.wild_child || current.node_type == NodeType::Param {
                current.children.last()?
            } else {
                return None;
            };
        }
    }

    /// Returns a mutable reference to the value registered for exactly this
    /// route pattern.
    pub fn get_mut(&mut self, route: &str) -> Option<&mut T> {
        let mut current = self;
        let mut path = route.as_bytes();

        loop {
            path = path.strip_prefix(current.prefix.as_slice())?;

            let Some(&next) = path.first() else {
                return current.value.as_mut();
            };

            current = if let Some(i) = current.indices.iter().position(|&c| c == next) {
                &mut current.children[i]
            } else if current.wild_child || current.node_type == NodeType::Param {
                current.children.last_mut()?
            } else {
                return None;
            };
        }
    }

    /// Returns every registered route along with its value, in tree order.
    pub fn routes(&self) -> Vec<(&str, &T)> {
        let mut routes = Vec::new();
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            if let Some(value) = &node.value {
                routes.push((node.full_path.as_str(), value));
            }

            stack.extend(node.children.iter().rev());
        }

        routes
    }

    /// Consumes the tree, returning every registered route along with its value.
    pub fn into_routes(self) -> Vec<(String, T)> {
        let mut routes = Vec::new();
        let mut stack = vec![self];

        while let Some(mut node) = stack.pop() {
            if let Some(value) = node.value.take() {
                routes.push((mem::take(&mut node.full_path), value));
            }

            stack.extend(node.children.drain(..).rev());
        }

        routes
    }

    /// The literal text this node contributes to its routes.
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    /// The first byte of each static child's prefix, in child order.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Whether the last child is a parameter or catch-all node.
    pub fn wild_child(&self) -> bool {
        self.wild_child
    }

    /// The kind of this node.
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    /// The number of routes registered in this node's subtree.
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// Static children in `indices` order, followed by the wildcard child, if any.
    pub fn children(&self) -> &[Node<T>] {
        &self.children
    }

    /// The value registered for the route ending at this node.
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// The route this node represents, used for diagnostics.
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Checks that the priority of every node equals the number of values in
    /// its subtree, returning the first mismatch as `(got, expected)`.
    ///
    /// Only meaningful for trees where no insertion has failed.
    #[doc(hidden)]
    pub fn check_priorities(&self) -> Result<u32, (u32, u32)> {
        let mut priority: u32 = 0;
        for child in &self.children {
            priority += child.check_priorities()?;
        }

        if self.value.is_some() {
            priority += 1;
        }

        if self.priority != priority {
            return Err((self.priority, priority));
        }

        Ok(priority)
    }
}

/// A wildcard found in a route: a `:` or `*` marker and the name following it,
/// up to the next `/`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct Wildcard<'a> {
    pub(crate) token: &'a [u8],
    pub(crate) start: usize,
    // false if the segment contains a second marker
    pub(crate) valid: bool,
}

// Searches for the first wildcard segment in `path`.
pub(crate) fn find_wildcard(path: &[u8]) -> Option<Wildcard<'_>> {
    let start = path.iter().position(|&c| c == b':' || c == b'*')?;

    let mut valid = true;
    for (end, &c) in path[start + 1..].iter().enumerate() {
        match c {
            b'/' => {
                return Some(Wildcard {
                    token: &path[start..start + 1 + end],
                    start,
                    valid,
                })
            }
            b':' | b'*' => valid = false,
            _ => {}
        }
    }

    Some(Wildcard {
        token: &path[start..],
        start,
        valid,
    })
}

// Checks the syntax of every wildcard in a route.
fn validate(route: &[u8]) -> Result<(), InsertError> {
    let mut offset = 0;

    while let Some(wildcard) = find_wildcard(&route[offset..]) {
        let token = wildcard.token;
        let start = offset + wildcard.start;

        if !wildcard.valid {
            return Err(InsertError::TooManyWildcards {
                wildcard: lossy(token),
                path: lossy(route),
            });
        }

        if token.len() < 2 {
            return Err(InsertError::UnnamedWildcard { path: lossy(route) });
        }

        if token[0] == b'*' {
            if start + token.len() != route.len() {
                return Err(InsertError::CatchAllNotLast { path: lossy(route) });
            }

            if start == 0 || route[start - 1] != b'/' {
                return Err(InsertError::MissingCatchAllSlash { path: lossy(route) });
            }
        }

        offset = start + token.len();
    }

    Ok(())
}

pub(crate) fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(a, b)| a == b).count()
}
