use animefan_core::FieldSource;
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Document, Element, FormData, HtmlElement, Storage, Window};

thread_local! {
    static WINDOW: Window = web_sys::window().unwrap_throw();
    static DOCUMENT: Document = WINDOW.with(|w| w.document().unwrap_throw());
    static LOCAL_STORAGE: Option<Storage> = WINDOW.with(|w| w.local_storage().ok().flatten());
}

pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";

pub fn window() -> Window {
    WINDOW.with(|s| s.clone())
}

pub fn document() -> Document {
    DOCUMENT.with(|d| d.clone())
}

pub fn body() -> Option<HtmlElement> {
    document().body()
}

/// `None` when storage is disabled, e.g. in some private browsing modes.
pub fn local_storage() -> Option<Storage> {
    LOCAL_STORAGE.with(|s| s.clone())
}

pub fn origin() -> String {
    window().location().origin().unwrap_or_default()
}

pub fn prefers_dark() -> bool {
    window()
        .match_media(DARK_SCHEME_QUERY)
        .ok()
        .flatten()
        .map(|m| m.matches())
        .unwrap_or(false)
}

pub fn confirm(message: &str) -> bool {
    window().confirm_with_message(message).unwrap_or(false)
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Ok(nodes) = document().query_selector_all(selector) else {
        error!("invalid selector {}", selector);
        return vec![];
    };

    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn html_element_by_id(id: &str) -> Option<HtmlElement> {
    document()
        .get_element_by_id(id)
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

/// `<meta name="..." content="...">` tags of the page.
pub struct MetaTags;

impl FieldSource for MetaTags {
    fn field(&self, name: &str) -> Option<String> {
        document()
            .query_selector(&format!("meta[name=\"{}\"]", name))
            .ok()
            .flatten()
            .and_then(|meta| meta.get_attribute("content"))
    }
}

/// `data-*` attributes of an element.
pub struct DataAttributes(pub Element);

impl FieldSource for DataAttributes {
    fn field(&self, name: &str) -> Option<String> {
        self.0.get_attribute(&format!("data-{}", name))
    }
}

/// Values of a submitted form.
pub struct FormFields(pub FormData);

impl FieldSource for FormFields {
    fn field(&self, name: &str) -> Option<String> {
        self.0.get(name).as_string()
    }
}
