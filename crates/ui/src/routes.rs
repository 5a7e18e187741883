use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable};

use crate::views::{AuthView, DashboardView, DetailView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", AuthView)] Auth {},
        #[route("/dashboard", DashboardView)] Dashboard {},
        #[route("/algorithm/:name", DetailView)] Detail { name: String },
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}
