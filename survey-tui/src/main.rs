mod api;
mod views;

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rudder::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};

use api::MockBackend;
use views::{
    CampaignDetailView, CampaignsView, DashboardView, SharedScreen, TemplatesView, ViewScreen,
};

#[tokio::main]
async fn main() {
    let log_file = File::create("survey-tui.log").expect("failed to create log file");
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("failed to initialize logger");

    let backend: Arc<MockBackend> = Arc::new(MockBackend::new(Duration::from_millis(10)));
    let screen: SharedScreen = Arc::new(Mutex::new(None));

    let mut router = Router::new(MemoryLocation::default()).default_route("/dashboard");
    register_routes(&mut router, &backend, &screen);

    // A scripted session standing in for user interaction.
    router.navigate("/dashboard");
    router.settle().await;

    router.navigate("/campaigns");
    router.settle().await;

    if let Some(ViewScreen::Campaigns(view)) = screen.lock().unwrap().as_mut() {
        let table = view.table_mut();
        table.sort("stats.sent", Some(SortDirection::Desc));
        table.toggle_select_all_on_page();
        table.go_to_page(2);
        print_lines(&view.render());

        let table = view.table_mut();
        table.search("re");
        print_lines(&view.render());
    }

    router.navigate("/campaigns/42");
    router.settle().await;

    if let Some(ViewScreen::CampaignDetail(view)) = screen.lock().unwrap().as_mut() {
        view.contacts_mut().sort("name", None);
        print_lines(&view.render());
    }

    router.navigate("/templates");
    router.settle().await;

    // Unknown campaign: the mount fails and the router shows its error
    // panel instead of crashing.
    router.navigate("/campaigns/999");
    router.settle().await;
    print_router_panel(&router);

    let fallback = router.fallback_route().to_string();
    router.navigate(&fallback);
    router.settle().await;

    // Unmatched locations redirect to the default route once.
    router.navigate("/definitely/not/a/route");
    router.settle().await;
    println!("landed on {}", router.nav().current_path);

    router.go_back();
    router.settle().await;
}

fn register_routes(router: &mut Router, backend: &Arc<MockBackend>, screen: &SharedScreen) {
    {
        let backend = backend.clone();
        let screen = screen.clone();
        router
            .add_route("/dashboard", move |_params| {
                let backend = backend.clone();
                let screen = screen.clone();
                async move {
                    let view = DashboardView::mount(backend.as_ref()).await?;
                    print_lines(&view.render());
                    *screen.lock().unwrap() = Some(ViewScreen::Dashboard(view));
                    Ok(())
                }
            })
            .expect("route: /dashboard");
    }

    {
        let backend = backend.clone();
        let screen = screen.clone();
        router
            .add_route("/campaigns", move |_params| {
                let backend = backend.clone();
                let screen = screen.clone();
                async move {
                    let mut view = CampaignsView::new();
                    view.load(backend.as_ref()).await;
                    print_lines(&view.render());
                    *screen.lock().unwrap() = Some(ViewScreen::Campaigns(view));
                    Ok(())
                }
            })
            .expect("route: /campaigns");
    }

    {
        let backend = backend.clone();
        let screen = screen.clone();
        router
            .add_route("/campaigns/:id", move |params| {
                let backend = backend.clone();
                let screen = screen.clone();
                async move {
                    let id = params.get("id").cloned().unwrap_or_default();
                    let view = CampaignDetailView::mount(backend.as_ref(), &id).await?;
                    print_lines(&view.render());
                    *screen.lock().unwrap() = Some(ViewScreen::CampaignDetail(view));
                    Ok(())
                }
            })
            .expect("route: /campaigns/:id");
    }

    {
        let backend = backend.clone();
        let screen = screen.clone();
        router
            .add_route("/templates", move |_params| {
                let backend = backend.clone();
                let screen = screen.clone();
                async move {
                    let view = TemplatesView::mount(backend.as_ref()).await?;
                    print_lines(&view.render());
                    *screen.lock().unwrap() = Some(ViewScreen::Templates(view));
                    Ok(())
                }
            })
            .expect("route: /templates");
    }

    router
        .add_route("/settings", |_params| async {
            print_lines(&["Settings".to_string(), "  nothing to configure in the demo".to_string()]);
            Ok(())
        })
        .expect("route: /settings");

    router
        .add_route("/profile", |_params| async {
            print_lines(&["Profile".to_string(), "  demo user".to_string()]);
            Ok(())
        })
        .expect("route: /profile");

    router
        .add_route("/import/:campaignId", |params| async move {
            let id = params.get("campaignId").cloned().unwrap_or_default();
            print_lines(&[format!("Import contacts into campaign {id}")]);
            Ok(())
        })
        .expect("route: /import/:campaignId");
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
    println!();
}

fn print_router_panel(router: &Router) {
    match router.screen() {
        Screen::NavError { route, message } => {
            print_lines(&[
                "Page error".to_string(),
                format!("  failed to load {route}: {message}"),
                format!("  [ go to {} ]", router.fallback_route()),
            ]);
        }
        Screen::NoRoute { path } => {
            print_lines(&[format!("No route for {path}; nowhere left to go")]);
        }
        _ => {}
    }
}
