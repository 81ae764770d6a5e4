use crate::tree::{Node, NodeType};

/// Represents errors that can occur when inserting a new route.
///
/// Every variant carries the full route that was being registered, so the
/// error can be reported without any further context.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, thiserror::Error)]
pub enum InsertError {
    /// Only one wildcard is allowed per path segment.
    #[error("only one wildcard per path segment is allowed, has: '{wildcard}' in path '{path}'")]
    TooManyWildcards {
        /// The offending segment, starting at the first wildcard marker.
        wildcard: String,
        /// The route being inserted.
        path: String,
    },
    /// Wildcards must be registered with a name.
    #[error("wildcards must be named with a non-empty name in path '{path}'")]
    UnnamedWildcard { path: String },
    /// Catch-all parameters are only allowed at the end of a route.
    #[error("catch-all routes are only allowed at the end of the path in path '{path}'")]
    CatchAllNotLast { path: String },
    /// A catch-all parameter must directly follow a `/`.
    #[error("no / before catch-all in path '{path}'")]
    MissingCatchAllSlash { path: String },
    /// The segment root a catch-all would hang from is already registered.
    #[error("catch-all conflicts with existing handle for the path segment root in path '{path}'")]
    CatchAllConflict { path: String },
    /// The route conflicts with a wildcard registered at the same position.
    #[error(
        "'{segment}' in new path '{path}' conflicts with existing wildcard '{wildcard}' in existing prefix '{prefix}'"
    )]
    WildcardConflict {
        /// The segment of the new route that conflicts.
        segment: String,
        /// The route being inserted.
        path: String,
        /// The wildcard that is already registered.
        wildcard: String,
        /// The registered prefix up to and including the existing wildcard.
        prefix: String,
    },
    /// A parameter was inserted where static routes are already registered.
    #[error("wildcard '{wildcard}' in new path '{path}' conflicts with existing route '{existing}'")]
    ParamConflict {
        /// The parameter of the new route.
        wildcard: String,
        /// The route being inserted.
        path: String,
        /// A route registered below the conflicting static segment.
        existing: String,
    },
    /// The exact route is already registered.
    #[error("handlers are already registered for path '{path}'")]
    Duplicate { path: String },
    /// Routes registered through a [`Router`](crate::Router) must start with `/`.
    #[error("path must begin with '/' in path '{path}'")]
    MissingLeadingSlash { path: String },
}

impl InsertError {
    /// Returns the route whose insertion failed.
    pub fn path(&self) -> &str {
        match self {
            Self::TooManyWildcards { path, .. }
            | Self::UnnamedWildcard { path }
            | Self::CatchAllNotLast { path }
            | Self::MissingCatchAllSlash { path }
            | Self::CatchAllConflict { path }
            | Self::WildcardConflict { path, .. }
            | Self::ParamConflict { path, .. }
            | Self::Duplicate { path }
            | Self::MissingLeadingSlash { path } => path,
        }
    }

    // `remaining` is the unconsumed tail of `route` at the point where the walk
    // descended into `wildcard`.
    pub(crate) fn wildcard_conflict<T>(route: &[u8], remaining: &[u8], wildcard: &Node<T>) -> Self {
        let segment = match wildcard.node_type {
            NodeType::CatchAll => remaining,
            _ => remaining.split(|&c| c == b'/').next().unwrap_or(remaining),
        };

        let mut prefix = route[..route.len() - remaining.len()].to_vec();
        prefix.extend_from_slice(&wildcard.prefix);

        InsertError::WildcardConflict {
            segment: lossy(segment),
            path: lossy(route),
            wildcard: lossy(&wildcard.prefix),
            prefix: lossy(&prefix),
        }
    }

    pub(crate) fn param_conflict<T>(route: &[u8], wildcard: &[u8], existing: &Node<T>) -> Self {
        // the first registered route below the static sibling
        let mut current = existing;
        while current.value.is_none() {
            match current.children.first() {
                Some(child) => current = child,
                None => break,
            }
        }

        InsertError::ParamConflict {
            wildcard: lossy(wildcard),
            path: lossy(route),
            existing: current.full_path.clone(),
        }
    }
}

pub(crate) fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
