use std::time::Duration;

use animefan_core::Page;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::utils::window;

/// The live document.
pub struct BrowserPage;

impl Page for BrowserPage {
    fn schedule_reload(&self, delay: Duration) {
        let millis = delay.as_millis().min(u32::MAX as u128) as u32;
        spawn_local(async move {
            TimeoutFuture::new(millis).await;
            if let Err(e) = window().location().reload() {
                error!("failed to reload page: {:?}", e);
            }
        });
    }
}
