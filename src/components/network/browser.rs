use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

use super::error::AnimationError;
use super::primitives::Clock;

/// Clock backed by `performance.now()` and `setTimeout`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
	fn now(&self) -> f64 {
		web_sys::window()
			.and_then(|w| w.performance())
			.map(|p| p.now())
			.unwrap_or_else(js_sys::Date::now)
	}

	async fn sleep(&self, ms: u32) -> Result<(), AnimationError> {
		let window = web_sys::window().ok_or_else(|| AnimationError::Timer("no window".into()))?;
		let mut scheduled = Ok(0);
		let promise = js_sys::Promise::new(&mut |resolve, _reject| {
			scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
				&resolve,
				ms.min(i32::MAX as u32) as i32,
			);
		});
		scheduled.map_err(timer_error)?;
		JsFuture::from(promise).await.map_err(timer_error)?;
		Ok(())
	}
}

fn timer_error(err: JsValue) -> AnimationError {
	AnimationError::Timer(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// Spawns onto the browser's microtask queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
	fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
		wasm_bindgen_futures::spawn_local(future);
		Ok(())
	}
}
