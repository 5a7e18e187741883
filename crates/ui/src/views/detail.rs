use dioxus::prelude::*;
use dioxus_router::Link;

use services::{AlgorithmDetail, ImplementationFile};

use crate::context::{AppContext, Session};
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{StatusVm, format_hours, hours_spent};

#[derive(Clone, Debug, PartialEq)]
struct DetailData {
    detail: AlgorithmDetail,
    implementation: ImplementationFile,
}

#[component]
pub fn DetailView(name: String) -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();

    let mut show_upload = use_signal(|| false);
    let mut picked_file = use_signal(|| None::<(String, Vec<u8>)>);

    let Some(username) = session.current_user() else {
        return rsx! {
            div { class: "page",
                p { "You are signed out." }
                Link { to: Route::Auth {}, "Go to login" }
            }
        };
    };

    let progress_for_resource = ctx.progress();
    let username_for_resource = username.clone();
    let name_for_resource = name.clone();
    let resource = use_resource(move || {
        let progress = progress_for_resource.clone();
        let username = username_for_resource.clone();
        let name = name_for_resource.clone();
        async move {
            let Some(detail) = progress
                .detail(&username, &name)
                .await
                .map_err(|_| ViewError::Unknown)?
            else {
                return Err(ViewError::Unknown);
            };
            let implementation = progress
                .implementation_source(&username, &detail.entry)
                .await
                .map_err(|_| ViewError::Unknown)?;
            Ok(DetailData {
                detail,
                implementation,
            })
        }
    });

    let state = view_state_from_resource(resource);

    let progress_for_start = ctx.progress();
    let username_for_start = username.clone();
    let name_for_start = name.clone();
    let on_start = move |_| {
        let progress = progress_for_start.clone();
        let username = username_for_start.clone();
        let name = name_for_start.clone();
        let mut resource = resource;
        spawn(async move {
            if progress.start(&username, &name).await.unwrap_or(false) {
                resource.restart();
            }
        });
    };

    let on_pick_file = move |_| {
        spawn(async move {
            let dialog = rfd::AsyncFileDialog::new().add_filter("Python source", &["py"]);
            if let Some(handle) = dialog.pick_file().await {
                let bytes = handle.read().await;
                picked_file.set(Some((handle.file_name(), bytes)));
            }
        });
    };

    let progress_for_complete = ctx.progress();
    let username_for_complete = username.clone();
    let name_for_complete = name.clone();
    let on_complete = move |_| {
        let progress = progress_for_complete.clone();
        let username = username_for_complete.clone();
        let name = name_for_complete.clone();
        let file = picked_file();
        let mut resource = resource;
        spawn(async move {
            let bytes = file.as_ref().map(|(_, bytes)| bytes.as_slice());
            if progress
                .complete(&username, &name, bytes)
                .await
                .unwrap_or(false)
            {
                show_upload.set(false);
                picked_file.set(None);
                resource.restart();
            }
        });
    };

    let progress_for_estimate = ctx.progress();
    let username_for_estimate = username.clone();
    let name_for_estimate = name.clone();
    let on_estimate_change = move |evt: FormEvent| {
        let Ok(hours) = evt.value().parse::<f64>() else {
            return;
        };
        let progress = progress_for_estimate.clone();
        let username = username_for_estimate.clone();
        let name = name_for_estimate.clone();
        let mut resource = resource;
        spawn(async move {
            if progress
                .update_estimated_hours(&username, &name, hours)
                .await
                .unwrap_or(false)
            {
                resource.restart();
            }
        });
    };

    let progress_for_notes = ctx.progress();
    let username_for_notes = username.clone();
    let name_for_notes = name.clone();
    let on_notes_change = move |evt: FormEvent| {
        let progress = progress_for_notes.clone();
        let username = username_for_notes.clone();
        let name = name_for_notes.clone();
        let notes = evt.value();
        let mut resource = resource;
        spawn(async move {
            if progress
                .update_notes(&username, &name, &notes)
                .await
                .unwrap_or(false)
            {
                resource.restart();
            }
        });
    };

    rsx! {
        div { class: "page detail-page",
            Link { class: "btn btn-secondary", to: Route::Dashboard {}, "Back to Dashboard" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Error(_) => rsx! {
                    p { class: "error", "Algorithm '{name}' not found" }
                },
                ViewState::Ready(data) => {
                    let entry = &data.detail.entry;
                    let status_vm = StatusVm::from(data.detail.status);
                    let spent = hours_spent(data.detail.status);
                    let est = format_hours(entry.estimated_hours);
                    let description = if data.detail.description.is_empty() {
                        "No description available".to_string()
                    } else {
                        data.detail.description.clone()
                    };
                    rsx! {
                        h1 { "{data.detail.name}" }

                        div { class: "card",
                            p {
                                strong { "Category: " }
                                "{entry.category}"
                            }
                            p {
                                strong { "Description: " }
                                "{description}"
                            }
                            p {
                                strong { "Status: " }
                                span { class: "status {status_vm.css_class}", "{status_vm.detail}" }
                            }
                        }

                        div { class: "columns",
                            div { class: "column",
                                label { "Estimated Hours" }
                                input {
                                    r#type: "number",
                                    min: "1",
                                    step: "1",
                                    value: "{est}",
                                    onchange: on_estimate_change,
                                }
                            }
                            div { class: "column",
                                if let Some(spent) = spent {
                                    div { class: "metric",
                                        span { class: "metric-label", "Hours Spent" }
                                        span { class: "metric-value", "{spent}" }
                                    }
                                }
                            }
                        }

                        div { class: "actions",
                            if !entry.started {
                                button { class: "btn", r#type: "button", onclick: on_start,
                                    "Start Algorithm"
                                }
                            }
                            if entry.started && !entry.completed {
                                button {
                                    class: "btn",
                                    r#type: "button",
                                    onclick: move |_| show_upload.set(true),
                                    "Mark as Completed"
                                }
                            }
                        }

                        if show_upload() {
                            div { class: "card upload-panel",
                                h3 { "Upload Implementation" }
                                button {
                                    class: "btn btn-secondary",
                                    r#type: "button",
                                    onclick: on_pick_file,
                                    "Choose your .py implementation"
                                }
                                if let Some((filename, _)) = picked_file() {
                                    p { "Selected: {filename}" }
                                }
                                button { class: "btn", r#type: "button", onclick: on_complete,
                                    "Submit Implementation"
                                }
                            }
                        }

                        match &data.implementation {
                            ImplementationFile::Absent => rsx! {},
                            ImplementationFile::Missing { filename } => rsx! {
                                p { class: "warning",
                                    "Implementation file {filename} not found. It may have been moved or deleted."
                                }
                            },
                            ImplementationFile::Present { source, .. } => rsx! {
                                h3 { "Your Implementation" }
                                pre { class: "code-block", code { "{source}" } }
                            },
                        }

                        if !data.detail.resources.is_empty() {
                            h3 { "Resources" }
                            ul { class: "resources",
                                for resource_link in &data.detail.resources {
                                    li {
                                        a { href: "{resource_link.url}", "{resource_link.title}" }
                                    }
                                }
                            }
                        }

                        h3 { "Notes" }
                        textarea {
                            class: "notes",
                            rows: "6",
                            value: "{entry.notes}",
                            onchange: on_notes_change,
                        }
                    }
                }
            }
        }
    }
}
