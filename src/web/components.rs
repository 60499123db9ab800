//! Small presentational pieces for the login form. Messages rendered here must
//! never include passwords or tokens.

use crate::form::FieldDescriptor;
use leptos::prelude::*;

/// Renders an error banner.
#[component]
pub fn ErrorAlert(message: String) -> impl IntoView {
    view! {
        <div
            class="rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-700"
            role="alert"
        >
            {message}
        </div>
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div
            class="inline-block h-7 w-7 animate-spin rounded-full border-4 border-blue-200 border-t-blue-600"
            role="status"
            aria-live="polite"
            aria-label="Signing in"
        ></div>
    }
}

/// One labelled input driven by a field descriptor. The value is controlled by
/// the caller; every keystroke is reported through `on_change`.
#[component]
pub fn FieldInput(
    descriptor: FieldDescriptor,
    #[prop(into)] value: Signal<String>,
    on_change: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <div class="my-5">
            <label for=descriptor.id.clone() class="sr-only">
                {descriptor.label.clone()}
            </label>
            <input
                id=descriptor.id.clone()
                name=descriptor.input_name.clone()
                type=descriptor.input_type.as_str()
                placeholder=descriptor.placeholder.clone()
                required=descriptor.required
                class="rounded-md appearance-none relative block w-full px-3 py-2 border-2 sm:text-sm"
                prop:value=move || value.get()
                on:input=move |event| on_change(event_target_value(&event))
            />
        </div>
    }
}
