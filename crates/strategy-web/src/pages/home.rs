//! Home Page

use leptos::prelude::*;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="home">
            <header class="hero">
                <h1>"Strategy Builder"</h1>
                <p class="tagline">"Turn your trading ideas into an AI-ready strategy for Solana tokens"</p>
                <div class="cta">
                    <a href="/builder" class="btn btn-primary">"Build a Strategy"</a>
                </div>
            </header>

            <section class="features">
                <div class="feature">
                    <h3>"🧭 Guided"</h3>
                    <p>"Pick a token, a proven preset or a classic strategy, then tune entry, risk and swap settings step by step."</p>
                </div>
                <div class="feature">
                    <h3>"📊 Informed"</h3>
                    <p>"Fold market sentiment and your own research into the prompt. Both steps are optional."</p>
                </div>
                <div class="feature">
                    <h3>"🤖 Model-aware"</h3>
                    <p>"Prompts are phrased for Gemini, GPT or Claude and reviewed before anything is generated."</p>
                </div>
            </section>
        </div>
    }
}
