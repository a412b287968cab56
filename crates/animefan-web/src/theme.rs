use std::rc::Rc;

use animefan_core::{Config, Notifier, Theme, ThemeController, ThemeStore, ToastKind};
use anyhow::anyhow;
use dominator::clone;
use futures_signals::signal::SignalExt;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement};

use crate::{
    events,
    utils::{body, document, local_storage, prefers_dark, window, DARK_SCHEME_QUERY},
};

pub struct LocalThemeStore {
    key: String,
}

impl LocalThemeStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl ThemeStore for LocalThemeStore {
    fn load(&self) -> Option<String> {
        local_storage()?.get_item(&self.key).ok().flatten()
    }

    fn save(&self, value: &str) {
        let Some(storage) = local_storage() else {
            warn!("local storage unavailable, theme not saved");
            return;
        };
        if let Err(e) = storage.set_item(&self.key, value) {
            error!("failed to save theme: {:?}", e);
        }
    }
}

pub type Themes = ThemeController<LocalThemeStore>;

/// Applies the initial theme and wires the toggle button, the Ctrl+Shift+T
/// shortcut and the system color-scheme listener.
pub fn init(config: &Config, notifier: Rc<Notifier>) -> Rc<Themes> {
    let themes = Rc::new(ThemeController::new(
        LocalThemeStore::new(config.theme_key.as_str()),
        prefers_dark(),
    ));

    spawn_local(themes.signal().for_each(|theme| {
        if let Err(e) = apply(theme) {
            error!("failed to apply theme: {}", e);
        }

        async {}
    }));

    if let Some(toggle) = document().get_element_by_id("themeToggle") {
        events::listen(&toggle, clone!(themes, notifier => move |e: events::Click| {
            e.prevent_default();
            toggle_theme(&themes, &notifier);
        }));
    }

    events::listen(&document(), clone!(themes, notifier => move |e: events::KeyDown| {
        if e.ctrl_key() && e.shift_key() && e.key().eq_ignore_ascii_case("t") {
            e.prevent_default();
            toggle_theme(&themes, &notifier);
        }
    }));

    if let Ok(Some(media_query_list)) = window().match_media(DARK_SCHEME_QUERY) {
        events::listen(&media_query_list, clone!(themes => move |e: events::ColorSchemeChange| {
            if let Some(theme) = themes.system_changed(e.matches()) {
                debug!("following system theme: {}", theme);
            }
        }));
    }

    themes
}

fn toggle_theme(themes: &Themes, notifier: &Notifier) {
    if let Some(body) = body() {
        if let Err(e) = body
            .style()
            .set_property("transition", "background-color 0.4s ease, color 0.4s ease")
        {
            error!("error set transition: {:?}", e);
        }
    }

    let theme = themes.toggle();
    info!("theme switched to {}", theme);
    notifier.show_with_icon(ToastKind::Info, theme.enabled_message(), Some(theme.icon()));
}

fn apply(theme: Theme) -> Result<(), anyhow::Error> {
    document()
        .document_element()
        .ok_or_else(|| anyhow!("no document element"))?
        .set_attribute("data-theme", theme.as_str())
        .map_err(|e| anyhow!("error set data-theme: {:?}", e))?;

    let Some(toggle) = document().get_element_by_id("themeToggle") else {
        return Ok(());
    };

    let dark = theme == Theme::Dark;
    set_display(&toggle, ".bi-sun", dark)?;
    set_display(&toggle, ".bi-moon", !dark)?;

    if let Some(text) = toggle
        .query_selector(".theme-text")
        .map_err(|e| anyhow!("error query theme text: {:?}", e))?
    {
        text.set_text_content(Some(theme.toggle_label()));
    }

    Ok(())
}

fn set_display(parent: &Element, selector: &str, visible: bool) -> Result<(), anyhow::Error> {
    let Some(icon) = parent
        .query_selector(selector)
        .map_err(|e| anyhow!("error query {}: {:?}", selector, e))?
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    else {
        return Ok(());
    };

    icon.style()
        .set_property("display", if visible { "inline-block" } else { "none" })
        .map_err(|e| anyhow!("error set display: {:?}", e))
}
