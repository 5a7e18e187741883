use dioxus::prelude::*;
use dioxus_router::{Link, use_navigator};

use services::ProgressOverview;

use crate::context::{AppContext, Session};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{StatusVm, format_hours};

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    display_name: String,
    overview: ProgressOverview,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let navigator = use_navigator();

    let Some(username) = session.current_user() else {
        return rsx! {
            div { class: "page",
                p { "You are signed out." }
                Link { to: Route::Auth {}, "Go to login" }
            }
        };
    };

    let auth = ctx.auth();
    let progress = ctx.progress();
    let username_for_resource = username.clone();
    let resource = use_resource(move || {
        let auth = auth.clone();
        let progress = progress.clone();
        let username = username_for_resource.clone();
        async move {
            let overview = progress
                .overview(&username)
                .await
                .map_err(|_| ViewError::Unknown)?;
            let display_name = auth
                .display_name(&username)
                .await
                .map_err(|_| ViewError::Unknown)?
                .unwrap_or_else(|| username.clone());
            Ok(DashboardData {
                display_name,
                overview,
            })
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page dashboard-page",
            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(err) => rsx! {
                    p { "{err.message()}" }
                },
                ViewState::Ready(data) => {
                    let stats = data.overview.stats;
                    let percent = (stats.completion_ratio() * 100.0).round();
                    let display_name = data.display_name;
                    let sections = data.overview.sections;
                    rsx! {
                        header { class: "view-header",
                            h1 { "Welcome, {display_name}!" }
                            button {
                                class: "btn btn-secondary",
                                r#type: "button",
                                onclick: move |_| {
                                    let mut session = session;
                                    session.user.set(None);
                                    navigator.push(Route::Auth {});
                                },
                                "Logout"
                            }
                        }

                        div { class: "metrics",
                            div { class: "metric",
                                span { class: "metric-label", "Total Algorithms" }
                                span { class: "metric-value", "{stats.total}" }
                            }
                            div { class: "metric",
                                span { class: "metric-label", "In Progress" }
                                span { class: "metric-value", "{stats.in_progress()}" }
                            }
                            div { class: "metric",
                                span { class: "metric-label", "Completed" }
                                span { class: "metric-value", "{stats.completed}" }
                            }
                        }
                        div { class: "progress-track",
                            div { class: "progress-fill", style: "width: {percent}%;" }
                        }

                        for section in sections {
                            h2 { "{section.category}" }
                            div { class: "card-grid",
                                for card in section.cards {
                                    AlgorithmCardView {
                                        name: card.name.clone(),
                                        status: StatusVm::from(card.status),
                                        estimated_hours: card.entry.estimated_hours,
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn AlgorithmCardView(name: String, status: StatusVm, estimated_hours: f64) -> Element {
    let est = format_hours(estimated_hours);
    rsx! {
        div { class: "algorithm-card {status.css_class}",
            h3 { "{name}" }
            p {
                strong { "Status: " }
                "{status.label}"
            }
            p {
                strong { "Est. Time: " }
                "{est} hours"
            }
            Link { class: "btn btn-small", to: Route::Detail { name: name.clone() }, "Details" }
        }
    }
}
