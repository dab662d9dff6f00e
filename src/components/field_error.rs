use leptos::prelude::*;

use crate::validation::FieldErrors;

/// Inline message under a form field, shown while `field` has an error
#[component]
pub fn FieldError(#[prop(into)] errors: Signal<FieldErrors>, field: &'static str) -> impl IntoView {
    move || {
        errors.with(|e| {
            e.get(field)
                .map(|message| view! { <p class="field-error">{message.to_string()}</p> })
        })
    }
}
