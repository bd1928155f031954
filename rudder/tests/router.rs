use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rudder::prelude::*;

fn counting_handler(
    counter: Arc<AtomicUsize>,
) -> impl Fn(std::collections::HashMap<String, String>) -> futures::future::BoxFuture<'static, HandlerResult>
{
    move |_params| {
        let counter = counter.clone();
        Box::pin(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

#[tokio::test]
async fn test_first_registered_match_wins() {
    let mut router = Router::in_memory();
    let by_id = Arc::new(AtomicUsize::new(0));
    let literal = Arc::new(AtomicUsize::new(0));

    router
        .add_route("/campaigns/:id", counting_handler(by_id.clone()))
        .unwrap();
    router
        .add_route("/campaigns/new", counting_handler(literal.clone()))
        .unwrap();

    router.navigate("/campaigns/new");
    router.settle().await;

    // Registration order decides, not specificity: "new" is captured as :id.
    assert_eq!(router.current_route(), Some("/campaigns/:id"));
    assert_eq!(router.nav().params.get("id").map(String::as_str), Some("new"));
    assert_eq!(by_id.load(Ordering::SeqCst), 1);
    assert_eq!(literal.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unmatched_path_redirects_to_default_route() {
    let mut router = Router::in_memory();
    let dashboard = Arc::new(AtomicUsize::new(0));
    router
        .add_route("/dashboard", counting_handler(dashboard.clone()))
        .unwrap();

    router.navigate("/nowhere");
    router.settle().await;

    assert_eq!(router.current_route(), Some("/dashboard"));
    assert_eq!(router.nav().current_path, "/dashboard");
    assert_eq!(dashboard.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unmatched_default_route_is_terminal() {
    // No routes registered at all: the corrective navigate to the default
    // route also fails, which must end in the terminal no-route screen
    // rather than recursing.
    let mut router = Router::in_memory();
    router.navigate("/nowhere");
    router.settle().await;

    assert_eq!(
        router.screen(),
        &Screen::NoRoute {
            path: "/dashboard".to_string()
        }
    );
}

#[tokio::test]
async fn test_handler_error_renders_nav_error_and_stays_navigable() {
    let mut router = Router::in_memory();
    let dashboard = Arc::new(AtomicUsize::new(0));
    router
        .add_route("/dashboard", counting_handler(dashboard.clone()))
        .unwrap();
    router
        .add_route("/broken", |_params| async { Err("backend exploded".into()) })
        .unwrap();

    router.navigate("/broken");
    router.settle().await;

    match router.screen() {
        Screen::NavError { route, message } => {
            assert_eq!(route, "/broken");
            assert!(message.contains("backend exploded"));
        }
        other => panic!("expected NavError, got {other:?}"),
    }

    // The error screen re-offers the default route, and taking it works.
    let fallback = router.fallback_route().to_string();
    router.navigate(&fallback);
    router.settle().await;
    assert_eq!(router.screen(), &Screen::View("/dashboard".to_string()));
    assert_eq!(dashboard.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_handler_panic_is_caught() {
    let mut router = Router::in_memory();
    router
        .add_route("/panics", |_params| async { panic!("view blew up") })
        .unwrap();

    router.navigate("/panics");
    router.settle().await;

    match router.screen() {
        Screen::NavError { message, .. } => assert!(message.contains("view blew up")),
        other => panic!("expected NavError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_navigating_to_current_path_reruns_handler() {
    let mut router = Router::in_memory();
    let count = Arc::new(AtomicUsize::new(0));
    router
        .add_route("/dashboard", counting_handler(count.clone()))
        .unwrap();

    router.navigate("/dashboard");
    router.navigate("/dashboard");
    router.settle().await;

    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_get_params_rematches_current_location() {
    let mut router = Router::in_memory();
    router
        .add_route("/import/:campaignId", |_params| async { Ok(()) })
        .unwrap();

    router.navigate("/import/7");
    router.settle().await;

    let params = router.get_params();
    assert_eq!(params.get("campaignId").map(String::as_str), Some("7"));
}

#[tokio::test]
async fn test_get_params_is_empty_when_nothing_matches() {
    let location = MemoryLocation::starting_at("/unknown");
    let router = Router::new(location);
    assert!(router.get_params().is_empty());
}

#[tokio::test]
async fn test_late_registration_takes_effect_on_next_resolution() {
    let mut router = Router::in_memory();
    let dashboard = Arc::new(AtomicUsize::new(0));
    router
        .add_route("/dashboard", counting_handler(dashboard.clone()))
        .unwrap();

    router.navigate("/reports");
    router.settle().await;
    assert_eq!(router.current_route(), Some("/dashboard"));

    let reports = Arc::new(AtomicUsize::new(0));
    router
        .add_route("/reports", counting_handler(reports.clone()))
        .unwrap();
    router.navigate("/reports");
    router.settle().await;

    assert_eq!(router.current_route(), Some("/reports"));
    assert_eq!(reports.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_router_returns_to_idle_without_waiting_for_handler() {
    let mut router = Router::in_memory();
    router
        .add_route("/slow", |_params| async {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            Ok(())
        })
        .unwrap();

    router.navigate("/slow");
    // The handler is still sleeping; the router has already returned.
    assert_eq!(router.phase(), RouterPhase::Idle);
    router.settle().await;
}

#[tokio::test]
async fn test_go_back_resolves_previous_location() {
    let mut router = Router::in_memory();
    router.add_route("/dashboard", |_p| async { Ok(()) }).unwrap();
    router.add_route("/campaigns", |_p| async { Ok(()) }).unwrap();

    router.navigate("/dashboard");
    router.navigate("/campaigns");
    router.go_back();
    router.settle().await;

    assert_eq!(router.current_route(), Some("/dashboard"));
}

#[tokio::test]
async fn test_is_current_route_matches_exact_and_children() {
    let mut router = Router::in_memory();
    router
        .add_route("/campaigns/:id", |_p| async { Ok(()) })
        .unwrap();

    router.navigate("/campaigns/42");
    router.settle().await;

    assert!(router.is_current_route("/campaigns"));
    assert!(router.is_current_route("/campaigns/42"));
    assert!(!router.is_current_route("/camp"));
}
