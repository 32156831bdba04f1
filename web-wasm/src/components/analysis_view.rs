//! 解析結果カード
//!
//! 識別不能（Unknown）の場合は地図と安全アドバイスを出さない

use leptos::prelude::*;
use track_scout_common::TrackAnalysis;

#[component]
pub fn AnalysisView<F>(
    result: TrackAnalysis,
    image_preview: Option<String>,
    on_reset: F,
) -> impl IntoView
where
    F: Fn(()) + 'static + Clone,
{
    let headline = result.headline();
    let confidence_class = format!(
        "confidence confidence-{}",
        result.confidence.as_str().to_lowercase()
    );

    let unknown_note = result.is_unknown().then(|| {
        view! { <p class="unknown-note">"We couldn't confidently identify this track."</p> }
    });

    let image = image_preview.map(|src| {
        view! { <img src=src alt="Uploaded track" class="track-image" /> }
    });

    let characteristics = result
        .characteristics
        .iter()
        .cloned()
        .map(|item| view! { <span class="tag">{item}</span> })
        .collect_view();

    let map = result.map_embed_url().map(|url| {
        let region = result.habitat_region.clone();
        let title = format!("Map of {}", region);
        view! {
            <div class="map">
                <span class="map-label">{region}</span>
                <iframe class="map-frame" src=url title=title></iframe>
            </div>
        }
    });

    let safety = result.show_safety_tip().then(|| {
        let tip = result.safety_tip.clone();
        view! {
            <div class="safety">
                <h4>"Safety Advisory"</h4>
                <p>{tip}</p>
            </div>
        }
    });

    let TrackAnalysis {
        animal_name,
        scientific_name,
        confidence,
        habitat,
        behavior_note,
        ..
    } = result;

    view! {
        <div class="analysis-card">
            <div class="analysis-image">
                {image}
                <span class="badge">{headline}</span>
                {unknown_note}
            </div>

            <div class="analysis-body">
                <div class="analysis-header">
                    <div>
                        <h2>{animal_name}</h2>
                        <p class="scientific-name">{scientific_name}</p>
                    </div>
                    <div class=confidence_class>
                        <span class="label">"Confidence"</span>
                        <span class="value">{confidence.as_str()}</span>
                    </div>
                </div>

                <section>
                    <h3>"Visual Identifiers"</h3>
                    <div class="tags">{characteristics}</div>
                </section>

                <div class="analysis-grid">
                    <section>
                        <h3>"Habitat & Range"</h3>
                        <p>{habitat}</p>
                        {map}
                    </section>
                    <section>
                        <h3>"Behavior Patterns"</h3>
                        <p>{behavior_note}</p>
                    </section>
                </div>

                {safety}

                <div class="analysis-actions">
                    <button class="btn btn-primary" on:click=move |_| on_reset(())>
                        "🐾 Analyze Another Track"
                    </button>
                </div>
            </div>
        </div>
    }
}
