use dioxus::prelude::*;
use dioxus_router::Router;

use crate::context::Session;
use crate::routes::Route;

#[component]
pub fn App() -> Element {
    use_context_provider(|| Session {
        user: Signal::new(None),
    });

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        // Stable OS/window title. Screens render their own headings.
        document::Title { "ML Algorithm Tracker" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}
