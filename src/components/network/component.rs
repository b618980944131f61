use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::ev;
use leptos::prelude::*;
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::browser::{BrowserClock, BrowserSpawner};
use super::config::CanvasConfig;
use super::error::CanvasError;
use super::primitives::{CanvasAnimator, Clock};
use super::queue::AnimationQueue;
use super::render;
use super::sequencer::{CanvasPathRunner, PathSequencer};
use super::state::{CanvasState, SharedState};
use super::tasks::BackgroundTasks;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|w| w.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|h| h.as_f64())
			.unwrap_or(600.0),
	)
}

/// Animated network of nodes with ambient lines, overclock bursts and
/// periodic shortest-path animations.
#[component]
pub fn NetworkCanvas(
	#[prop(optional)] config: CanvasConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let running = Arc::new(AtomicBool::new(true));
	let mount = Mount {
		fullscreen,
		width,
		height,
		running: Arc::clone(&running),
		animate: Rc::new(RefCell::new(None)),
	};

	on_cleanup(move || running.store(false, Ordering::Relaxed));

	Effect::new(move |_| {
		if mount.animate.borrow().is_some() {
			return;
		}
		let canvas = canvas_ref.get().map(HtmlCanvasElement::from);
		match mount.start(canvas, config.clone()) {
			Ok(Some(resize)) => on_cleanup(move || resize.remove()),
			Ok(None) => {}
			Err(err) => error!("Network canvas failed to start: {err}"),
		}
	});

	view! { <canvas node_ref=canvas_ref class="network-canvas" style="display: block;" /> }
}

/// Everything needed to bring the canvas to life once its element exists.
struct Mount {
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
	running: Arc<AtomicBool>,
	animate: FrameCallback,
}

impl Mount {
	fn size(&self, window: &Window, canvas: &HtmlCanvasElement) -> (f64, f64) {
		if self.fullscreen {
			return window_size(window);
		}
		let parent = canvas.parent_element();
		(
			self.width.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_width() as f64)
					.unwrap_or(800.0)
			}),
			self.height.unwrap_or_else(|| {
				parent
					.as_ref()
					.map(|p| p.client_height() as f64)
					.unwrap_or(600.0)
			}),
		)
	}

	/// Start drawing on `canvas`. Returns the window resize listener, if one
	/// was added, for removal on cleanup.
	fn start(
		&self,
		canvas: Option<HtmlCanvasElement>,
		config: CanvasConfig,
	) -> Result<Option<WindowListenerHandle>, CanvasError> {
		config.validate()?;
		let canvas = canvas.ok_or(CanvasError::CanvasNotFound)?;
		let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
		let (w, h) = self.size(&window, &canvas);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|err| CanvasError::Context(format!("{err:?}")))?
			.ok_or_else(|| CanvasError::Context("not supported".into()))?
			.dyn_into()
			.map_err(|_| CanvasError::Context("not a 2d context".into()))?;

		let timing = config.timing.clone();
		let node_count = config.node_count;
		let state: SharedState = Rc::new(RefCell::new(CanvasState::new(
			config,
			w,
			h,
			StdRng::from_os_rng(),
		)?));

		let animator = Rc::new(CanvasAnimator::new(Rc::clone(&state), BrowserClock));
		let runner = CanvasPathRunner::new(
			Rc::clone(&state),
			PathSequencer::new(Rc::clone(&animator), timing),
		);
		let queue = Rc::new(AnimationQueue::new(runner, BrowserSpawner));
		let tasks = Rc::new(BackgroundTasks::new(
			Rc::clone(&state),
			animator,
			BrowserSpawner,
			Arc::clone(&self.running),
		));
		tasks.start(queue)?;

		let resize = self.fullscreen.then(|| {
			let (state_resize, canvas_resize) = (Rc::clone(&state), canvas.clone());
			window_event_listener(ev::resize, move |_| {
				let Some(win) = web_sys::window() else {
					return;
				};
				let (nw, nh) = window_size(&win);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				state_resize.borrow_mut().resize(nw, nh);
			})
		});

		let (animate_inner, running) = (Rc::clone(&self.animate), Arc::clone(&self.running));
		*self.animate.borrow_mut() = Some(Closure::new(move || {
			if !running.load(Ordering::Relaxed) {
				return;
			}
			let now = BrowserClock.now();
			{
				let mut s = state.borrow_mut();
				s.prune_lines(now);
				render::render(&s, now, &ctx);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *self.animate.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}

		info!("Network canvas mounted: {node_count} nodes on {w}x{h}");
		Ok(resize)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network::error::ConfigError;

	fn mount() -> Mount {
		Mount {
			fullscreen: true,
			width: None,
			height: None,
			running: Arc::new(AtomicBool::new(true)),
			animate: Rc::new(RefCell::new(None)),
		}
	}

	#[test]
	fn missing_canvas_is_reported() {
		let result = mount().start(None, CanvasConfig::default());
		assert!(matches!(result, Err(CanvasError::CanvasNotFound)));
	}

	#[test]
	fn invalid_config_fails_before_touching_the_page() {
		let config = CanvasConfig {
			node_count: 0,
			..Default::default()
		};
		let result = mount().start(None, config);
		assert!(matches!(result, Err(CanvasError::Config(ConfigError::NoNodes))));
	}
}
