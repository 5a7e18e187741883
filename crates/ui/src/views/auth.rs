use dioxus::prelude::*;
use dioxus_router::use_navigator;

use services::AuthError;
use tracker_core::model::RegistrationDraft;

use crate::context::{AppContext, Session};
use crate::routes::Route;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AuthTab {
    Login,
    Register,
}

#[component]
pub fn AuthView() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Session>();
    let navigator = use_navigator();

    let mut active_tab = use_signal(|| AuthTab::Login);

    let mut login_username = use_signal(String::new);
    let mut login_password = use_signal(String::new);
    let mut login_error = use_signal(|| None::<String>);

    let mut reg_username = use_signal(String::new);
    let mut reg_password = use_signal(String::new);
    let mut reg_confirm = use_signal(String::new);
    let mut reg_name = use_signal(String::new);
    let mut reg_error = use_signal(|| None::<String>);
    let mut reg_success = use_signal(|| false);

    let auth_for_login = ctx.auth();
    let on_login = move |_| {
        let auth = auth_for_login.clone();
        let username = login_username();
        let password = login_password();
        let mut session = session;
        spawn(async move {
            match auth.login(&username, &password).await {
                Ok(true) => {
                    session.user.set(Some(username));
                    navigator.push(Route::Dashboard {});
                }
                Ok(false) => {
                    login_error.set(Some("Invalid username or password".to_string()));
                }
                Err(_) => {
                    login_error.set(Some("Something went wrong. Please try again.".to_string()));
                }
            }
        });
    };

    let auth_for_register = ctx.auth();
    let on_register = move |_| {
        let auth = auth_for_register.clone();
        let draft = RegistrationDraft {
            username: reg_username(),
            password: reg_password(),
            confirm_password: reg_confirm(),
            name: reg_name(),
        };
        spawn(async move {
            match auth.register(draft).await {
                Ok(()) => {
                    reg_error.set(None);
                    reg_success.set(true);
                }
                Err(err @ (AuthError::Validation(_) | AuthError::UsernameTaken)) => {
                    reg_success.set(false);
                    reg_error.set(Some(err.to_string()));
                }
                Err(_) => {
                    reg_success.set(false);
                    reg_error.set(Some("Something went wrong. Please try again.".to_string()));
                }
            }
        });
    };

    rsx! {
        div { class: "page auth-page",
            h1 { "ML Algorithm Tracker" }
            p { class: "subtitle",
                "Track your progress implementing machine learning algorithms from scratch"
            }

            div { class: "card auth-card",
                div { class: "tabs",
                    button {
                        class: if active_tab() == AuthTab::Login { "tab active" } else { "tab" },
                        r#type: "button",
                        onclick: move |_| active_tab.set(AuthTab::Login),
                        "Login"
                    }
                    button {
                        class: if active_tab() == AuthTab::Register { "tab active" } else { "tab" },
                        r#type: "button",
                        onclick: move |_| active_tab.set(AuthTab::Register),
                        "Register"
                    }
                }

                match active_tab() {
                    AuthTab::Login => rsx! {
                        div { class: "form",
                            label { "Username" }
                            input {
                                r#type: "text",
                                value: "{login_username()}",
                                oninput: move |evt| login_username.set(evt.value()),
                            }
                            label { "Password" }
                            input {
                                r#type: "password",
                                value: "{login_password()}",
                                oninput: move |evt| login_password.set(evt.value()),
                            }
                            button { class: "btn", r#type: "button", onclick: on_login, "Login" }
                            if let Some(message) = login_error() {
                                p { class: "error", "{message}" }
                            }
                        }
                    },
                    AuthTab::Register => rsx! {
                        div { class: "form",
                            label { "Username" }
                            input {
                                r#type: "text",
                                value: "{reg_username()}",
                                oninput: move |evt| reg_username.set(evt.value()),
                            }
                            label { "Password" }
                            input {
                                r#type: "password",
                                value: "{reg_password()}",
                                oninput: move |evt| reg_password.set(evt.value()),
                            }
                            label { "Confirm Password" }
                            input {
                                r#type: "password",
                                value: "{reg_confirm()}",
                                oninput: move |evt| reg_confirm.set(evt.value()),
                            }
                            label { "Your Name" }
                            input {
                                r#type: "text",
                                value: "{reg_name()}",
                                oninput: move |evt| reg_name.set(evt.value()),
                            }
                            button { class: "btn", r#type: "button", onclick: on_register, "Register" }
                            if let Some(message) = reg_error() {
                                p { class: "error", "{message}" }
                            }
                            if reg_success() {
                                p { class: "success", "Registration successful! You can now login." }
                            }
                        }
                    },
                }
            }
        }
    }
}
