use leptos::prelude::*;
use log::warn;

use crate::components::cognitive_map::{CognitiveMapCanvas, LayoutVariant};
use crate::store::MapStore;

/// Decomposition result used to pre-fill the wizard. Endpoints are explicit.
const SAMPLE_DECOMPOSITION: &str = r#"{
  "nodes": [
    {"id": "calculus", "name": "Calculus", "description": "Rates of change and accumulation"},
    {"id": "limits", "name": "Limits", "description": "Behaviour of functions near a point"},
    {"id": "derivatives", "name": "Derivatives", "description": "Instantaneous rate of change"},
    {"id": "integrals", "name": "Integrals", "description": "Area under a curve"},
    {"id": "algebra", "name": "Algebra", "description": "Manipulating expressions and equations"},
    {"id": "ftc", "name": "Fundamental theorem of calculus"}
  ],
  "edges": [
    {"id": "e0", "source": "calculus", "target": "limits", "relationship_type": "subordinate"},
    {"id": "e1", "source": "calculus", "target": "derivatives", "relationship_type": "subordinate"},
    {"id": "e2", "source": "calculus", "target": "integrals", "relationship_type": "subordinate"},
    {"id": "e3", "source": "derivatives", "target": "integrals", "relationship_type": "coordinate"},
    {"id": "e4", "source": "algebra", "target": "calculus", "relationship_type": "related", "custom_name": "prerequisite"},
    {"id": "e5", "source": "ftc", "target": "integrals", "relationship_type": "related", "custom_name": "connects"},
    {"id": "e6", "source": "ftc", "target": "derivatives", "relationship_type": "related", "custom_name": "connects"}
  ]
}"#;

/// Task decomposition step: map panel on the left, wizard panel on the right.
#[component]
pub fn Home(store: MapStore) -> impl IntoView {
	let (variant, set_variant) = signal(LayoutVariant::Force);
	let payload = RwSignal::new(SAMPLE_DECOMPOSITION.to_string());
	let error = RwSignal::new(None::<String>);
	let (selected, nodes, edges) = (store.selected_edge(), store.node_count(), store.edge_count());

	let load = move |_| match store.load_json(&payload.get_untracked()) {
		Ok(()) => error.set(None),
		Err(e) => {
			warn!("{}", e);
			error.set(Some(e.to_string()));
		}
	};
	let clear = move |_| store.replace_graph(None);
	let toggle_layout = move |_| {
		set_variant.update(|v| {
			*v = match v {
				LayoutVariant::Force => LayoutVariant::Circular,
				LayoutVariant::Circular => LayoutVariant::Force,
			}
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="wizard-layout">
				<section class="map-panel" style="position: relative;">
					<CognitiveMapCanvas
						graph=store.graph()
						selection=store.selection()
						variant=variant
					/>
					<Show when=move || selected.with(Option::is_some)>
						<div class="selection-badge">
							"Selected edge: " {move || selected.get().unwrap_or_default()}
						</div>
					</Show>
					<div class="map-hint">"Click an edge to select · hover a node for details"</div>
				</section>

				<section class="wizard-panel">
					<h1>"Task decomposition"</h1>
					<p class="subtitle">
						"Paste a decomposition result, load it into the cognitive map, then pick the relationship to work on."
					</p>
					<textarea
						rows="14"
						prop:value=move || payload.get()
						on:input=move |ev| payload.set(event_target_value(&ev))
					/>
					<div class="wizard-actions">
						<button on:click=load>"Load map"</button>
						<button on:click=clear>"Clear"</button>
						<button on:click=toggle_layout>
							{move || match variant.get() {
								LayoutVariant::Force => "Static layout",
								LayoutVariant::Circular => "Force layout",
							}}
						</button>
					</div>
					{move || error.get().map(|e| view! { <p class="error">{e}</p> })}
					<p class="counts">
						{move || format!("{} nodes, {} relationships", nodes.get(), edges.get())}
					</p>
					<p class="next-step">
						{move || match selected.get() {
							Some(id) => format!("Importance selection will use relationship {}", id),
							None => "Select a relationship in the map to continue".to_string(),
						}}
					</p>
				</section>
			</div>
		</ErrorBoundary>
	}
}
