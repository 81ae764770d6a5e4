use routetrie::{InsertError, Router};

#[test]
fn merge_ok() {
    let mut root = Router::new();
    assert!(root.insert("GET", "/foo", "foo").is_ok());
    assert!(root.insert("GET", "/bar/:id", "bar").is_ok());

    let mut child = Router::new();
    assert!(child.insert("GET", "/baz", "baz").is_ok());
    assert!(child.insert("GET", "/xyz/:id", "xyz").is_ok());

    assert!(root.merge(child).is_ok());

    assert_eq!(root.get(&"GET", "/foo"), Some(&"foo"));
    assert_eq!(root.get(&"GET", "/bar/:id"), Some(&"bar"));
    assert_eq!(root.get(&"GET", "/baz"), Some(&"baz"));
    assert_eq!(root.get(&"GET", "/xyz/:id"), Some(&"xyz"));
}

#[test]
fn merge_conflict() {
    let mut root = Router::new();
    assert!(root.insert("GET", "/foo", "foo").is_ok());

    let mut child = Router::new();
    assert!(child.insert("GET", "/foo", "foo").is_ok());

    assert_eq!(
        root.merge(child),
        Err(InsertError::Duplicate { path: "/foo".into() })
    );
}

#[test]
fn merge_keys() {
    let mut root = Router::new();
    assert!(root.insert("GET", "/users/:id", 1).is_ok());

    let mut child = Router::new();
    assert!(child.insert("POST", "/users/new", 2).is_ok());
    assert!(child.insert("DELETE", "/users/:name", 3).is_ok());

    assert!(root.merge(child).is_ok());

    assert_eq!(root.get(&"GET", "/users/:id"), Some(&1));
    assert_eq!(root.get(&"POST", "/users/new"), Some(&2));
    assert_eq!(root.get(&"DELETE", "/users/:name"), Some(&3));

    let mut keys: Vec<_> = root.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, ["DELETE", "GET", "POST"]);
}

#[test]
fn merge_wildcard_conflict() {
    let mut root = Router::new();
    assert!(root.insert("GET", "/users/:id", ()).is_ok());

    let mut child = Router::new();
    assert!(child.insert("GET", "/users/new", ()).is_ok());

    assert!(matches!(
        root.merge(child),
        Err(InsertError::WildcardConflict { segment, .. }) if segment == "new"
    ));
    assert_eq!(root.get(&"GET", "/users/:id"), Some(&()));
    assert_eq!(root.get(&"GET", "/users/new"), None);
}
