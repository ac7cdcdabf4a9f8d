mod common;

use std::sync::Arc;
use std::thread;

use routeweave::contract::{FlattenedEntry, PathTemplate};
use routeweave::runtime_config::{RouterConfig, RoutingStrategy};
use routeweave::{DispatchError, ErrorCode, RouteMethod, Router};

fn zoo_router() -> Router<&'static str> {
    Router::from_declaration_with_config(
        &common::zoo_declaration(),
        common::zoo_implementation(),
        RouterConfig::default(),
    )
    .expect("zoo contract builds")
}

fn entries(templates: &[(RouteMethod, &str)]) -> Vec<FlattenedEntry<String>> {
    templates
        .iter()
        .map(|(method, path)| FlattenedEntry {
            full_path: path.to_string(),
            method: *method,
            template: PathTemplate::new(*method, *path),
            handler: format!("{method} {path}"),
        })
        .collect()
}

fn build(templates: &[(RouteMethod, &str)]) -> Router<String> {
    Router::build_with_config(entries(templates), RouterConfig::default()).expect("router builds")
}

fn assert_route_match(router: &Router<&'static str>, method: RouteMethod, path: &str, expected: &str) {
    match router.dispatch(method, path) {
        Ok(matched) => {
            println!("✅ {method} {path} → {}", matched.handler());
            assert_eq!(
                *matched.handler(),
                expected,
                "Handler mismatch for {method} {path}"
            );
        }
        Err(err) => {
            println!("❌ {method} {path} → {err}");
            assert_eq!(expected, "<none>", "Expected route to match for {method} {path}");
        }
    }
}

#[test]
fn test_router_zoo_every_method() {
    let router = zoo_router();
    assert_route_match(&router, RouteMethod::Get, "/zoo/animals", "get_animals");
    assert_route_match(&router, RouteMethod::Post, "/zoo/animals", "create_animal");
    assert_route_match(&router, RouteMethod::Get, "/zoo/animals/123", "get_animal");
    assert_route_match(&router, RouteMethod::Put, "/zoo/animals/123", "update_animal");
    assert_route_match(&router, RouteMethod::Patch, "/zoo/animals/123", "patch_animal");
    assert_route_match(&router, RouteMethod::Delete, "/zoo/animals/123", "delete_animal");
    assert_route_match(&router, RouteMethod::Get, "/zoo/health", "health_check");
}

#[test]
fn test_router_root_path() {
    let router = zoo_router();
    assert_route_match(&router, RouteMethod::Get, "/", "root_handler");
    assert_route_match(&router, RouteMethod::Get, "", "root_handler");
}

#[test]
fn test_router_trailing_and_repeated_slashes() {
    let router = zoo_router();
    assert_route_match(&router, RouteMethod::Get, "/zoo/animals/", "get_animals");
    assert_route_match(&router, RouteMethod::Get, "//zoo//health", "health_check");
}

#[test]
fn test_router_unknown_path() {
    let router = zoo_router();
    assert_route_match(&router, RouteMethod::Get, "/unknown", "<none>");
    assert_route_match(&router, RouteMethod::Delete, "/zoo/health", "<none>");
    assert_route_match(&router, RouteMethod::Get, "/zoo/animals/1/extra", "<none>");
}

#[test]
fn test_no_match_is_not_found_without_panicking() {
    let router = zoo_router();
    let err = router.dispatch(RouteMethod::Get, "/nonexistent").unwrap_err();
    assert!(matches!(err, DispatchError::NotFound { .. }));
    assert_eq!(err.status_code(), 404);

    let empty = build(&[]);
    assert!(matches!(
        empty.dispatch(RouteMethod::Get, "/nonexistent"),
        Err(DispatchError::NotFound { .. })
    ));
}

#[test]
fn test_static_over_dynamic() {
    let router = build(&[(RouteMethod::Get, "/{a}"), (RouteMethod::Get, "/a")]);
    let matched = router.dispatch(RouteMethod::Get, "/a").unwrap();
    assert_eq!(matched.template().path, "/a");
    assert!(matched.raw_params.is_empty());

    let matched = router.dispatch(RouteMethod::Get, "/b").unwrap();
    assert_eq!(matched.template().path, "/{a}");
    assert_eq!(matched.get_path_param("a"), Some("b"));
}

#[test]
fn test_leftmost_specificity_precedence() {
    let router = build(&[(RouteMethod::Get, "/{a}/{b}"), (RouteMethod::Get, "/a/{b}")]);
    let matched = router.dispatch(RouteMethod::Get, "/a/b").unwrap();
    assert_eq!(matched.template().path, "/a/{b}");
    assert_eq!(matched.raw_params.len(), 1);
    assert_eq!(matched.get_path_param("b"), Some("b"));
}

#[test]
fn test_literal_dead_end_falls_back_to_variable() {
    let router = build(&[(RouteMethod::Get, "/a/b"), (RouteMethod::Get, "/{x}/c")]);
    let matched = router.dispatch(RouteMethod::Get, "/a/c").unwrap();
    assert_eq!(matched.template().path, "/{x}/c");
    assert_eq!(matched.get_path_param("x"), Some("a"));
}

#[test]
fn test_duplicate_detection_at_build_time() {
    let err = Router::build_with_config(
        entries(&[(RouteMethod::Get, "/{a}"), (RouteMethod::Get, "/{a}")]),
        RouterConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code().as_str(), "init_duplicate_routes");
}

#[test]
fn test_overlap_detection_at_build_time() {
    let err = Router::build_with_config(
        entries(&[(RouteMethod::Get, "/{a}"), (RouteMethod::Get, "/{b}")]),
        RouterConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::OverlappingRoutes);
    assert_eq!(
        err.to_string(),
        "Overlapping routes: GET \"/{b}\" matches same path as \"/{a}\""
    );
    assert!(err.suggestion().contains("changing the path or the method"));

    let router = build(&[(RouteMethod::Get, "/{a}"), (RouteMethod::Post, "/{b}")]);
    assert_eq!(router.route_count(), 2);
    assert_eq!(
        router.dispatch(RouteMethod::Post, "/x").unwrap().get_path_param("b"),
        Some("x")
    );
}

#[test]
fn test_build_failure_is_deterministic() {
    let templates = [
        (RouteMethod::Get, "/users/{id}"),
        (RouteMethod::Get, "/users/{user_id}"),
    ];
    let first = Router::build_with_config(entries(&templates), RouterConfig::default()).unwrap_err();
    let second = Router::build_with_config(entries(&templates), RouterConfig::default()).unwrap_err();
    assert_eq!(first, second);
}

#[test]
fn test_round_trip_uniqueness() {
    let templates = [
        (RouteMethod::Get, "/"),
        (RouteMethod::Get, "/users"),
        (RouteMethod::Post, "/users"),
        (RouteMethod::Get, "/users/me"),
        (RouteMethod::Get, "/users/{id}"),
        (RouteMethod::Delete, "/users/{id}"),
        (RouteMethod::Get, "/users/{id}/posts"),
        (RouteMethod::Get, "/users/{id}/posts/{post_id}"),
        (RouteMethod::Get, "/{tenant}/settings"),
        (RouteMethod::Get, "/files/{a}/{b}/{c}"),
        (RouteMethod::Get, "/org/{org}/teams/{team}/members/{member}"),
        (RouteMethod::Put, "/org/{org}/teams/{team}"),
    ];
    let router = build(&templates);

    for (method, template) in templates {
        let mut expected = Vec::new();
        let path: Vec<String> = template
            .split('/')
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(i, segment)| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => {
                    let value = format!("value-{i}");
                    expected.push((name.to_string(), value.clone()));
                    value
                }
                None => segment.to_string(),
            })
            .collect();
        let path = format!("/{}", path.join("/"));

        let matched = router
            .dispatch(method, &path)
            .unwrap_or_else(|err| panic!("{method} {path} should match {template}: {err}"));
        assert_eq!(matched.template().path, template, "{method} {path}");
        assert_eq!(matched.template().method, method);
        assert_eq!(matched.raw_params.len(), expected.len());
        for (name, value) in expected {
            assert_eq!(matched.get_path_param(&name), Some(value.as_str()));
        }
    }
}

#[test]
fn test_specificity_strategy_matches_trie_on_zoo() {
    let router = Router::from_declaration_with_config(
        &common::zoo_declaration(),
        common::zoo_implementation(),
        RouterConfig {
            strategy: RoutingStrategy::Specificity,
            ..RouterConfig::default()
        },
    )
    .unwrap();
    assert_route_match(&router, RouteMethod::Get, "/zoo/animals", "get_animals");
    assert_route_match(&router, RouteMethod::Patch, "/zoo/animals/9", "patch_animal");
    assert_route_match(&router, RouteMethod::Get, "/", "root_handler");
    assert_route_match(&router, RouteMethod::Get, "/zoo/unknown/path", "<none>");
}

#[test]
fn test_concurrent_dispatch_on_shared_router() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Router<&'static str>>();

    let router = Arc::new(zoo_router());
    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let router = Arc::clone(&router);
            thread::spawn(move || {
                for i in 1..=200 {
                    let id = worker * 1000 + i;
                    let matched = router
                        .dispatch(RouteMethod::Get, &format!("/zoo/animals/{id}"))
                        .unwrap();
                    assert_eq!(*matched.handler(), "get_animal");
                    assert_eq!(matched.get_path_param("id"), Some(id.to_string().as_str()));
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }
}
