#[macro_use]
extern crate log;

mod bindings;
mod events;
mod page;
mod rating;
mod theme;
mod toast;
mod transport;
mod utils;

use std::rc::Rc;

use animefan_core::{ApiClient, Config, CsrfToken, Dispatcher, Notifier};
use wasm_bindgen::prelude::*;

use page::BrowserPage;
use transport::FetchTransport;
use utils::{document, MetaTags};

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    #[cfg(debug_assertions)]
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());

    if document().ready_state() == "loading" {
        events::listen(&document(), |_: events::DomContentLoaded| start());
    } else {
        start();
    }

    Ok(())
}

fn start() {
    let config = Config::from_meta(&MetaTags);
    let notifier = Rc::new(Notifier::new());

    dominator::append_dom(
        &dominator::body(),
        toast::render(notifier.clone(), config.toast_duration),
    );

    theme::init(&config, notifier.clone());

    let csrf = CsrfToken::from_meta(&MetaTags);
    info!("CSRF: {}", if csrf.is_some() { "found" } else { "NOT FOUND" });

    let client = ApiClient::new(FetchTransport::new(utils::origin()), config.api_base.as_str())
        .with_csrf(csrf);
    let actions = Rc::new(Dispatcher::new(
        client,
        notifier,
        BrowserPage,
        config.reload_delay,
    ));

    let bound = bindings::init(actions);
    rating::init();

    info!("AnimeFan loaded, {} controls bound", bound);
}
