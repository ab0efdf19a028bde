//! Strategy Builder Page
//!
//! One panel per wizard step. All state lives on the server; the page only
//! renders the latest `WizardView` and submits step data.

use leptos::prelude::*;

use crate::api::{
    self, flag_value, parse_flag, CoreParameters, FoundationalSummary, InstantSwap, PresetSummary,
    RiskManagement, StepPayload, StrategyParameters, TokenInfo,
};
use crate::components::{
    ErrorBanner, PercentField, SelectField, StepIndicator, WizardControls, WizardHandle,
};

const STRATEGY_TYPES: &[(&str, &str)] = &[
    ("breakout", "Breakout"),
    ("trend", "Trend Following"),
    ("mean_reversion", "Mean Reversion"),
    ("momentum", "Momentum"),
];

const BREAKOUT_CONDITIONS: &[(&str, &str)] = &[
    ("price_increase", "Price Increase"),
    ("volume_spike", "Volume Spike"),
    ("pattern_breakout", "Pattern Breakout"),
];

const TIMEFRAMES: &[(&str, &str)] = &[
    ("5m", "5 minutes"),
    ("15m", "15 minutes"),
    ("1h", "1 hour"),
    ("4h", "4 hours"),
    ("1d", "1 day"),
];

const VOLUME_CONDITIONS: &[(&str, &str)] = &[
    ("above_average", "Above Average"),
    ("double_average", "2x Average"),
    ("triple_average", "3x Average"),
];

const STABLECOINS: &[(&str, &str)] = &[("USDC", "USDC"), ("USDT", "USDT"), ("DAI", "DAI")];

const ENABLED: &[(&str, &str)] = &[("true", "Enabled"), ("false", "Disabled")];

const YES_NO: &[(&str, &str)] = &[("true", "Yes"), ("false", "No")];

const MODEL_TARGETS: &[(&str, &str)] = &[("gemini", "Gemini"), ("gpt", "GPT"), ("claude", "Claude")];

const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
    ("zh", "中文"),
];

/// Read one field of the current parameters
fn param(handle: WizardHandle, read: fn(&StrategyParameters) -> String) -> Signal<String> {
    Signal::derive(move || {
        handle
            .view
            .with(|v| v.as_ref().map(|v| read(&v.parameters)).unwrap_or_default())
    })
}

fn current_parameters(handle: WizardHandle) -> Option<StrategyParameters> {
    handle
        .view
        .with_untracked(|v| v.as_ref().map(|v| v.parameters.clone()))
}

fn update_core(handle: WizardHandle, edit: impl FnOnce(&mut CoreParameters)) {
    let Some(mut core) = current_parameters(handle).map(|p| p.core()) else {
        return;
    };
    edit(&mut core);
    let payload = StepPayload::CoreParameters(core);
    handle.dispatch(move |id| async move { api::apply(&id, &payload).await });
}

fn update_risk(handle: WizardHandle, edit: impl FnOnce(&mut RiskManagement)) {
    let Some(mut risk) = current_parameters(handle).map(|p| p.risk_management) else {
        return;
    };
    edit(&mut risk);
    let payload = StepPayload::RiskSettings(risk);
    handle.dispatch(move |id| async move { api::apply(&id, &payload).await });
}

fn update_swap(handle: WizardHandle, edit: impl FnOnce(&mut InstantSwap)) {
    let Some(mut swap) = current_parameters(handle).map(|p| p.instant_swap) else {
        return;
    };
    edit(&mut swap);
    let payload = StepPayload::SwapSettings(swap);
    handle.dispatch(move |id| async move { api::apply(&id, &payload).await });
}

#[component]
pub fn BuilderPage() -> impl IntoView {
    let handle = WizardHandle::new();
    let tokens = RwSignal::new(Vec::<TokenInfo>::new());
    let presets = RwSignal::new(Vec::<PresetSummary>::new());
    let strategies = RwSignal::new(Vec::<FoundationalSummary>::new());
    let labels = RwSignal::new(None::<Vec<String>>);
    let language = RwSignal::new("en".to_string());

    leptos::task::spawn_local(async move {
        match api::create_wizard().await {
            Ok(created) => {
                handle.id.set(Some(created.id));
                handle.view.set(Some(created.wizard));
            }
            Err(e) => handle.error.set(Some(e.message)),
        }
        if let Ok(list) = api::tokens().await {
            tokens.set(list);
        }
        if let Ok(list) = api::presets().await {
            presets.set(list);
        }
        if let Ok(list) = api::foundational().await {
            strategies.set(list);
        }
    });

    let translate = move |lang: String| {
        language.set(lang.clone());
        if lang == "en" {
            labels.set(None);
            return;
        }
        let texts: Vec<String> = handle.view.with_untracked(|v| {
            v.as_ref()
                .map(|v| v.steps.iter().map(|s| s.label.clone()).collect())
                .unwrap_or_default()
        });
        leptos::task::spawn_local(async move {
            match api::translate(texts, &lang).await {
                Ok(translated) => labels.set(Some(translated.into_iter().map(|t| t.text).collect())),
                Err(e) => handle.error.set(Some(e.message)),
            }
        });
    };

    let kind = Memo::new(move |_| {
        handle
            .view
            .with(|v| v.as_ref().and_then(|v| v.current().map(|s| s.kind.clone())))
    });

    let panel = move || match kind.get().as_deref() {
        Some("token") => view! { <TokenStep handle=handle tokens=tokens /> }.into_any(),
        Some("foundational") => view! { <FoundationalStep handle=handle strategies=strategies /> }.into_any(),
        Some("sentiment") => view! { <SentimentStep handle=handle /> }.into_any(),
        Some("research") => view! { <ResearchStep handle=handle /> }.into_any(),
        Some("parameters") => view! { <ParametersStep handle=handle presets=presets /> }.into_any(),
        Some("risk_management") => view! { <RiskStep handle=handle /> }.into_any(),
        Some("instant_swap") => view! { <SwapStep handle=handle /> }.into_any(),
        Some("review") => view! { <ReviewStep handle=handle /> }.into_any(),
        Some("generated") => view! { <GeneratedStep handle=handle /> }.into_any(),
        _ => view! { <p class="loading">"Loading wizard..."</p> }.into_any(),
    };

    view! {
        <div class="builder">
            <header class="builder-header">
                <h1>"Strategy Builder"</h1>
                <SelectField
                    label="Language"
                    options=LANGUAGES
                    value=language
                    on_change=translate
                />
            </header>

            {move || {
                handle.view.with(|v| {
                    v.as_ref().map(|v| {
                        view! {
                            <StepIndicator
                                steps=v.steps.clone()
                                active=v.active_step
                                labels=labels.get()
                            />
                        }
                    })
                })
            }}

            <ErrorBanner handle=handle />

            <section class="panel">{panel}</section>

            <WizardControls handle=handle />
        </div>
    }
}

#[component]
fn TokenStep(handle: WizardHandle, tokens: RwSignal<Vec<TokenInfo>>) -> impl IntoView {
    let selected = move || {
        handle.view.with(|v| {
            v.as_ref()
                .and_then(|v| v.auxiliary.token.as_ref().map(|t| t.symbol.clone()))
        })
    };

    view! {
        <h2>"Select Token"</h2>
        <ul class="token-list">
            {move || {
                tokens
                    .get()
                    .into_iter()
                    .map(|token| {
                        let symbol = token.symbol.clone();
                        let price = token
                            .price
                            .clone()
                            .map_or_else(|| "N/A".to_string(), |p| format!("${}", p));
                        let summary = format!("{} · {}", token.name, token.category);
                        let label = token.symbol.clone();
                        view! {
                            <li
                                class="token"
                                class:selected=move || selected().as_deref() == Some(symbol.as_str())
                                on:click=move |_| {
                                    let payload = StepPayload::TokenSelection(token.clone());
                                    handle.dispatch(move |id| async move { api::apply(&id, &payload).await });
                                }
                            >
                                <strong>{label}</strong>
                                <span>{summary}</span>
                                <span class="price">{price}</span>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

#[component]
fn FoundationalStep(
    handle: WizardHandle,
    strategies: RwSignal<Vec<FoundationalSummary>>,
) -> impl IntoView {
    let selected = move || {
        handle.view.with(|v| {
            v.as_ref()
                .and_then(|v| v.auxiliary.foundational.as_ref().map(|f| f.id.clone()))
        })
    };

    view! {
        <h2>"Foundational Strategy"</h2>
        <p class="hint">"Optional: start from a traditional-finance strategy."</p>
        <ul class="strategy-list">
            {move || {
                strategies
                    .get()
                    .into_iter()
                    .map(|strategy| {
                        let id = strategy.id.clone();
                        let choose = strategy.id.clone();
                        view! {
                            <li
                                class="strategy"
                                class:selected=move || selected().as_deref() == Some(id.as_str())
                                on:click=move |_| {
                                    let choose = choose.clone();
                                    handle.dispatch(move |wizard| async move {
                                        api::select_foundational(&wizard, &choose).await
                                    });
                                }
                            >
                                <strong>{strategy.name}</strong>
                                <span class="tag">{strategy.category}</span>
                                <span class="tag">{strategy.complexity}</span>
                                <p>{strategy.crypto_adaptation}</p>
                            </li>
                        }
                    })
                    .collect_view()
            }}
        </ul>
    }
}

#[component]
fn SentimentStep(handle: WizardHandle) -> impl IntoView {
    let report = move || handle.view.with(|v| v.as_ref().and_then(|v| v.auxiliary.sentiment.clone()));

    view! {
        <h2>"Market Sentiment"</h2>
        <button
            class="btn"
            disabled=move || handle.busy()
            on:click=move |_| handle.dispatch(|id| async move { api::action(&id, "sentiment").await })
        >
            "Analyze Sentiment"
        </button>
        {move || {
            report()
                .map(|r| {
                    view! {
                        <div class="sentiment">
                            <p>{format!("Overall: {}", r.overall_sentiment)}</p>
                            <p>{format!("Score: {:.1}%", r.sentiment_score * 100.0)}</p>
                            <p>{format!("Confidence: {:.1}%", r.confidence * 100.0)}</p>
                            <p>{format!("Trending: {}", r.trending_keywords.join(", "))}</p>
                        </div>
                    }
                })
        }}
    }
}

#[component]
fn ResearchStep(handle: WizardHandle) -> impl IntoView {
    let title = RwSignal::new(String::new());
    let text = RwSignal::new(String::new());
    let summary = move || handle.view.with(|v| v.as_ref().and_then(|v| v.auxiliary.research.clone()));

    let submit = move |_| {
        let (title, text) = (title.get_untracked(), text.get_untracked());
        if text.trim().is_empty() {
            return;
        }
        handle.dispatch(move |id| async move { api::load_research(&id, &title, &text).await });
    };

    view! {
        <h2>"Research Integration"</h2>
        <div class="field">
            <label>"Document title"</label>
            <input
                type="text"
                prop:value=move || title.get()
                on:input=move |ev| title.set(event_target_value(&ev))
            />
        </div>
        <div class="field">
            <label>"Document text"</label>
            <textarea
                rows="8"
                prop:value=move || text.get()
                on:input=move |ev| text.set(event_target_value(&ev))
            />
        </div>
        <button class="btn" disabled=move || handle.busy() on:click=submit>
            "Summarize"
        </button>
        {move || {
            summary()
                .map(|s| {
                    view! {
                        <div class="research-summary">
                            <h3>{s.source}</h3>
                            <p>{s.summary}</p>
                        </div>
                    }
                })
        }}
    }
}

#[component]
fn ParametersStep(handle: WizardHandle, presets: RwSignal<Vec<PresetSummary>>) -> impl IntoView {
    let selected = move || handle.view.with(|v| v.as_ref().and_then(|v| v.selected_preset.clone()));
    let asset = param(handle, |p| p.asset.clone());

    view! {
        <h2>"Define Parameters"</h2>
        <div class="presets">
            {move || {
                presets
                    .get()
                    .into_iter()
                    .map(|preset| {
                        let id = preset.id.clone();
                        let choose = preset.id.clone();
                        view! {
                            <button
                                class="preset"
                                class:selected=move || selected().as_deref() == Some(id.as_str())
                                title=preset.description
                                on:click=move |_| {
                                    let choose = choose.clone();
                                    handle.dispatch(move |wizard| async move {
                                        api::select_preset(&wizard, &choose).await
                                    });
                                }
                            >
                                {preset.name}
                            </button>
                        }
                    })
                    .collect_view()
            }}
        </div>

        <div class="field">
            <label>"Asset"</label>
            <input
                type="text"
                prop:value=move || asset.get()
                on:change=move |ev| {
                    let asset = event_target_value(&ev);
                    update_core(handle, |c| c.asset = asset);
                }
            />
        </div>
        <SelectField
            label="Strategy Type"
            options=STRATEGY_TYPES
            value=param(handle, |p| p.strategy_type.clone())
            on_change=move |v| update_core(handle, |c| c.strategy_type = v)
        />
        <SelectField
            label="Breakout Condition"
            options=BREAKOUT_CONDITIONS
            value=param(handle, |p| p.breakout_condition.clone())
            on_change=move |v| update_core(handle, |c| c.breakout_condition = v)
        />
        <PercentField
            label="Percentage Increase (%)"
            value=param(handle, |p| p.percentage_increase.clone())
            on_change=move |v| update_core(handle, |c| c.percentage_increase = v)
        />
        <SelectField
            label="Timeframe"
            options=TIMEFRAMES
            value=param(handle, |p| p.timeframe.clone())
            on_change=move |v| update_core(handle, |c| c.timeframe = v)
        />
        <SelectField
            label="Volume Condition"
            options=VOLUME_CONDITIONS
            value=param(handle, |p| p.volume_condition.clone())
            on_change=move |v| update_core(handle, |c| c.volume_condition = v)
        />
    }
}

#[component]
fn RiskStep(handle: WizardHandle) -> impl IntoView {
    view! {
        <h2>"Risk Management"</h2>
        <PercentField
            label="Stop Loss (%)"
            value=param(handle, |p| p.risk_management.stop_loss.clone())
            on_change=move |v| update_risk(handle, |r| r.stop_loss = v)
        />
        <PercentField
            label="Take Profit (%)"
            value=param(handle, |p| p.risk_management.take_profit.clone())
            on_change=move |v| update_risk(handle, |r| r.take_profit = v)
        />
        <PercentField
            label="Position Size (%)"
            value=param(handle, |p| p.risk_management.position_size.clone())
            on_change=move |v| update_risk(handle, |r| r.position_size = v)
        />
    }
}

#[component]
fn SwapStep(handle: WizardHandle) -> impl IntoView {
    let enabled = move || {
        handle
            .view
            .with(|v| v.as_ref().is_some_and(|v| v.parameters.instant_swap.enabled))
    };

    view! {
        <h2>"Swap for Profit"</h2>
        <SelectField
            label="Instant Swap"
            options=ENABLED
            value=param(handle, |p| flag_value(p.instant_swap.enabled).to_string())
            on_change=move |v| update_swap(handle, |s| s.enabled = parse_flag(&v))
        />
        {move || {
            enabled()
                .then(|| {
                    view! {
                        <SelectField
                            label="Stablecoin"
                            options=STABLECOINS
                            value=param(handle, |p| p.instant_swap.stablecoin.clone())
                            on_change=move |v| update_swap(handle, |s| s.stablecoin = v)
                        />
                        <PercentField
                            label="Minimum Profit Threshold (%)"
                            value=param(handle, |p| p.instant_swap.min_profit_threshold.clone())
                            on_change=move |v| update_swap(handle, |s| s.min_profit_threshold = v)
                        />
                        <SelectField
                            label="Auto-compound"
                            options=YES_NO
                            value=param(handle, |p| flag_value(p.instant_swap.auto_compound).to_string())
                            on_change=move |v| update_swap(handle, |s| s.auto_compound = parse_flag(&v))
                        />
                    }
                })
        }}
    }
}

#[component]
fn ReviewStep(handle: WizardHandle) -> impl IntoView {
    let prompt = move || handle.view.with(|v| v.as_ref().map(|v| v.prompt.clone()).unwrap_or_default());
    let target = Signal::derive(move || {
        handle
            .view
            .with(|v| v.as_ref().map(|v| v.model_target.clone()).unwrap_or_default())
    });
    let custom = move || {
        handle.view.with(|v| {
            v.as_ref()
                .map(|v| v.auxiliary.custom_modifications.clone())
                .unwrap_or_default()
        })
    };

    view! {
        <h2>"Strategy String"</h2>
        <SelectField
            label="Target Model"
            options=MODEL_TARGETS
            value=target
            on_change=move |v| handle.dispatch(move |id| async move { api::set_model(&id, &v).await })
        />
        <div class="field">
            <label>"Custom modifications"</label>
            <textarea
                rows="4"
                prop:value=custom
                on:change=move |ev| {
                    let payload = StepPayload::FreeText(event_target_value(&ev));
                    handle.dispatch(move |id| async move { api::apply(&id, &payload).await });
                }
            />
        </div>
        <pre class="prompt">{prompt}</pre>
    }
}

#[component]
fn GeneratedStep(handle: WizardHandle) -> impl IntoView {
    let handoff = RwSignal::new(None::<String>);
    let result = move || handle.view.with(|v| v.as_ref().and_then(|v| v.generation_result.clone()));
    let can_proceed = move || {
        !handle.busy() && handle.view.with(|v| v.as_ref().is_some_and(|v| v.can_proceed))
    };

    let start_backtesting = move |_| {
        let Some(id) = handle.id.get_untracked() else {
            return;
        };
        leptos::task::spawn_local(async move {
            match api::proceed(&id).await {
                Ok(strategy) => handoff.set(Some(format!(
                    "Strategy {} sent to backtesting ({}).",
                    strategy.id, strategy.model_target
                ))),
                Err(e) => handle.error.set(Some(e.message)),
            }
        });
    };

    view! {
        <h2>"Generated Strategy"</h2>
        {move || {
            result()
                .map(|r| {
                    view! {
                        <p class="meta">
                            {format!("{} · {}", r.model_target, r.generated_at.format("%Y-%m-%d %H:%M UTC"))}
                        </p>
                        <pre class="strategy-output">{r.content}</pre>
                    }
                })
        }}
        <button class="btn btn-primary" disabled=move || !can_proceed() on:click=start_backtesting>
            "Start Backtesting"
        </button>
        {move || handoff.get().map(|msg| view! { <p class="notice">{msg}</p> })}
    }
}
