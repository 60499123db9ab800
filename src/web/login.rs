//! Browser login form. Every input change goes into a `FieldStore` held in a
//! signal; submitting prevents the default page reload and hands the snapshot
//! to the `Submitter`, which stores the tokens and redirects on success.

use super::{
    api::FetchTransport,
    components::{ErrorAlert, FieldInput, Spinner},
    navigate::LocationNavigator,
    storage::LocalStorage,
};
use crate::{
    config::AppConfig,
    form::{FieldDescriptor, FieldStateSnapshot, FieldStore, login_fields},
    session::Submitter,
};
use leptos::{ev::SubmitEvent, prelude::*};
use std::rc::Rc;
use tracing::warn;

type BrowserSubmitter = Submitter<FetchTransport, LocalStorage, LocationNavigator>;

#[component]
pub fn LoginForm(
    #[prop(optional)] fields: Option<Vec<FieldDescriptor>>,
    #[prop(optional)] button_text: Option<&'static str>,
) -> impl IntoView {
    let store = match FieldStore::new(fields.unwrap_or_else(login_fields)) {
        Ok(store) => RwSignal::new(store),
        Err(err) => return view! { <ErrorAlert message=err.to_string() /> }.into_any(),
    };

    let config = AppConfig::load();
    let submitter: Rc<BrowserSubmitter> = Rc::new(Submitter::new(
        &config,
        FetchTransport::new(config.timeout),
        LocalStorage,
        LocationNavigator,
    ));
    let (error, set_error) = signal::<Option<String>>(None);

    let submit_action = Action::new_local(move |snapshot: &FieldStateSnapshot| {
        let submitter = Rc::clone(&submitter);
        let snapshot = snapshot.clone();
        async move {
            submitter
                .submit(&snapshot)
                .await
                .map(|_| ())
                .map_err(|err| err.to_string())
        }
    });

    Effect::new(move |_| {
        if let Some(Err(message)) = submit_action.value().get() {
            set_error.set(Some(message));
        }
    });

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if submit_action.pending().get_untracked() {
            return;
        }
        set_error.set(None);
        submit_action.dispatch(store.with_untracked(FieldStore::snapshot));
    };

    let inputs = store
        .with_untracked(|store| store.descriptors().to_vec())
        .into_iter()
        .map(|descriptor| {
            let read_id = descriptor.id.clone();
            let write_id = descriptor.id.clone();
            let value = Signal::derive(move || {
                store.with(|store| store.get_value(&read_id).unwrap_or_default().to_string())
            });
            let on_change = move |new_value: String| {
                store.update(|store| {
                    if let Err(err) = store.set_value(&write_id, new_value) {
                        warn!(error = %err, "ignored change for unknown field");
                    }
                });
            };
            view! { <FieldInput descriptor=descriptor value=value on_change=on_change /> }
        })
        .collect_view();

    view! {
        <form class="mt-8 space-y-6" on:submit=on_submit>
            <div class="-space-y-px">{inputs}</div>
            <button
                type="submit"
                class="group relative w-full flex justify-center py-2 px-4 rounded-md text-sm font-medium text-white"
                disabled=move || submit_action.pending().get()
            >
                {button_text.unwrap_or("Sign in")}
            </button>
            {move || {
                submit_action
                    .pending()
                    .get()
                    .then_some(view! { <div class="mt-4"><Spinner /></div> })
            }}
            {move || {
                error
                    .get()
                    .map(|message| view! { <div class="mt-4"><ErrorAlert message=message /></div> })
            }}
        </form>
    }
    .into_any()
}
