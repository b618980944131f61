use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::warn;

use crate::components::network::NetworkCanvas;
use crate::components::network::config::{CanvasConfig, Justification};

/// Canvas settings from the query string, e.g. `?justify=center`.
fn config_from_query(justify: Option<String>) -> CanvasConfig {
	let justification = match justify.map(|j| j.parse::<Justification>()) {
		Some(Ok(justification)) => justification,
		Some(Err(err)) => {
			warn!("Ignoring query parameter: {err}");
			Justification::default()
		}
		None => Justification::default(),
	};
	CanvasConfig {
		justification,
		..Default::default()
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let config = config_from_query(query.with_untracked(|q| q.get("justify")));

	view! {
		<div class="fullscreen-graph">
			<NetworkCanvas config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Network"</h1>
				<p class="subtitle">"Every fifteen seconds a packet takes the shortest route."</p>
			</div>
		</div>
	}
}
