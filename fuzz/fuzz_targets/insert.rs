#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<String>, bool)| {
    let (routes, strict) = data;
    let mut tree = routetrie::Node::new();
    let mut registered = Vec::new();

    for route in routes {
        if tree.insert_with(route.clone(), registered.len(), strict).is_ok() {
            registered.push(route);
        }
    }

    for (i, route) in registered.iter().enumerate() {
        assert_eq!(tree.get(route), Some(&i));
    }
});
