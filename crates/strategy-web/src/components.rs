//! UI Components

use std::future::Future;

use leptos::prelude::*;

use crate::api::{self, ApiFailure, StepView, WizardView};

/// Signals shared by every part of the builder page
#[derive(Clone, Copy)]
pub struct WizardHandle {
    pub id: RwSignal<Option<String>>,
    pub view: RwSignal<Option<WizardView>>,
    pub error: RwSignal<Option<String>>,
    /// A request is in flight
    pub pending: RwSignal<bool>,
}

impl Default for WizardHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardHandle {
    pub fn new() -> Self {
        Self {
            id: RwSignal::new(None),
            view: RwSignal::new(None),
            error: RwSignal::new(None),
            pending: RwSignal::new(false),
        }
    }

    /// Busy on the server or waiting on a request
    pub fn busy(&self) -> bool {
        self.pending.get() || self.view.with(|v| v.as_ref().is_some_and(|v| v.busy))
    }

    pub fn record(&self, result: Result<WizardView, ApiFailure>) {
        match result {
            Ok(view) => {
                self.view.set(Some(view));
                self.error.set(None);
            }
            Err(failure) => {
                if let Some(view) = failure.wizard {
                    self.view.set(Some(view));
                }
                self.error.set(Some(failure.message));
            }
        }
    }

    /// Run a wizard call for the current session and store its outcome
    pub fn dispatch<F, Fut>(self, call: F)
    where
        F: FnOnce(String) -> Fut + 'static,
        Fut: Future<Output = Result<WizardView, ApiFailure>> + 'static,
    {
        let Some(id) = self.id.get_untracked() else {
            return;
        };
        self.pending.set(true);
        leptos::task::spawn_local(async move {
            let result = call(id).await;
            self.record(result);
            self.pending.set(false);
        });
    }
}

/// Progress list; skipped steps are struck through
#[component]
pub fn StepIndicator(
    steps: Vec<StepView>,
    active: usize,
    /// Translated labels, one per step
    labels: Option<Vec<String>>,
) -> impl IntoView {
    let labels = labels.filter(|l| l.len() == steps.len());
    view! {
        <ol class="steps">
            {steps
                .into_iter()
                .map(|step| {
                    let label = labels
                        .as_ref()
                        .and_then(|l| l.get(step.index).cloned())
                        .unwrap_or(step.label);
                    let mut class = String::from("step");
                    if step.index == active {
                        class.push_str(" active");
                    } else if step.index < active {
                        class.push_str(" done");
                    }
                    if step.skipped {
                        class.push_str(" skipped");
                    }
                    view! {
                        <li class=class>
                            <span class="number">{step.index + 1}</span>
                            <span class="label">{label}</span>
                        </li>
                    }
                })
                .collect_view()}
        </ol>
    }
}

/// Last error, from the server or the transport
#[component]
pub fn ErrorBanner(handle: WizardHandle) -> impl IntoView {
    let message = move || {
        handle.error.get().or_else(|| {
            handle
                .view
                .with(|v| v.as_ref().and_then(|v| v.last_error.as_ref().map(|e| e.message.clone())))
        })
    };

    view! {
        <Show when=move || message().is_some()>
            <div class="error-banner">{move || message().unwrap_or_default()}</div>
        </Show>
    }
}

/// Back / Skip / Unskip / Next / Generate / Reset
#[component]
pub fn WizardControls(handle: WizardHandle) -> impl IntoView {
    let current = move || handle.view.with(|v| v.as_ref().and_then(|v| v.current().cloned()));
    let can_back = move || !handle.busy() && handle.view.with(|v| v.as_ref().is_some_and(|v| v.can_go_back));
    let can_next = move || !handle.busy() && handle.view.with(|v| v.as_ref().is_some_and(|v| v.can_go_next));
    let skippable = move || current().is_some_and(|s| s.skippable && !s.skipped);
    let unskippable = move || current().is_some_and(|s| s.skipped);
    let on_review = move || current().is_some_and(|s| s.kind == "review");

    view! {
        <div class="controls">
            <button
                class="btn"
                disabled=move || !can_back()
                on:click=move |_| handle.dispatch(|id| async move { api::action(&id, "back").await })
            >
                "Back"
            </button>

            <Show when=skippable>
                <button
                    class="btn"
                    disabled=move || handle.busy()
                    on:click=move |_| {
                        let index = current().map(|s| s.index).unwrap_or_default();
                        handle.dispatch(move |id| async move { api::skip(&id, index).await });
                    }
                >
                    "Skip"
                </button>
            </Show>

            <Show when=unskippable>
                <button
                    class="btn"
                    on:click=move |_| {
                        let index = current().map(|s| s.index).unwrap_or_default();
                        handle.dispatch(move |id| async move { api::unskip(&id, index).await });
                    }
                >
                    "Include this step"
                </button>
            </Show>

            <Show
                when=on_review
                fallback=move || view! {
                    <button
                        class="btn btn-primary"
                        disabled=move || !can_next()
                        on:click=move |_| handle.dispatch(|id| async move { api::action(&id, "next").await })
                    >
                        "Next"
                    </button>
                }
            >
                <button
                    class="btn btn-primary"
                    disabled=move || handle.busy()
                    on:click=move |_| handle.dispatch(|id| async move { api::action(&id, "generate").await })
                >
                    {move || if handle.busy() { "Generating..." } else { "Generate Strategy" }}
                </button>
            </Show>

            <button
                class="btn btn-link"
                on:click=move |_| handle.dispatch(|id| async move { api::action(&id, "reset").await })
            >
                "Reset"
            </button>
        </div>
    }
}

/// Labelled `<select>` over fixed `(value, label)` options
#[component]
pub fn SelectField(
    label: &'static str,
    options: &'static [(&'static str, &'static str)],
    #[prop(into)] value: Signal<String>,
    on_change: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <div class="field">
            <label>{label}</label>
            <select on:change=move |ev| on_change(event_target_value(&ev))>
                {options
                    .iter()
                    .map(|&(v, text)| {
                        view! {
                            <option value=v prop:selected=move || value.get() == v>
                                {text}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>
        </div>
    }
}

/// Labelled numeric input holding a decimal string
#[component]
pub fn PercentField(
    label: &'static str,
    #[prop(into)] value: Signal<String>,
    on_change: impl Fn(String) + 'static,
) -> impl IntoView {
    view! {
        <div class="field">
            <label>{label}</label>
            <input
                type="number"
                step="0.1"
                prop:value=move || value.get()
                on:change=move |ev| on_change(event_target_value(&ev))
            />
        </div>
    }
}
