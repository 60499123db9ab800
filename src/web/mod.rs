//! Browser host: a Leptos login form over `fetch`, `localStorage` and
//! `window.location`. Only compiled for `wasm32`.

mod api;
mod components;
mod login;
mod navigate;
mod storage;

pub use api::FetchTransport;
pub use login::LoginForm;
pub use navigate::LocationNavigator;
pub use storage::LocalStorage;

use leptos::prelude::*;

#[component]
fn LoginPage() -> impl IntoView {
    view! {
        <main class="min-h-full flex items-center justify-center py-12 px-4">
            <div class="max-w-md w-full space-y-8">
                <h2 class="mt-6 text-center text-3xl font-extrabold">"Sign in to your account"</h2>
                <LoginForm />
            </div>
        </main>
    }
}

/// Mounts the login page into `<body>`.
pub fn mount() {
    mount_to_body(LoginPage);
}
