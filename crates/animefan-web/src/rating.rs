use animefan_core::rating::{parse_rating, RatingLabel};
use anyhow::anyhow;
use dominator::clone;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

use crate::{events, utils::{document, html_element_by_id}};

pub fn init() {
    let Some(input) = document()
        .get_element_by_id("ratingInput")
        .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
    else {
        return;
    };

    update(&input.value());
    events::listen(&input, clone!(input => move |_: events::Input| update(&input.value())));

    debug!("rating slider initialized");
}

fn update(raw: &str) {
    let Some(label) = parse_rating(raw) else {
        warn!("no rating label for {:?}", raw);
        return;
    };

    if let Err(e) = render(label) {
        error!("failed to update rating: {}", e);
    }
}

fn render(label: &RatingLabel) -> Result<(), anyhow::Error> {
    if let Some(value) = html_element_by_id("ratingValue") {
        value.set_text_content(Some(&label.value.to_string()));
        value
            .style()
            .set_property("background-color", label.color)
            .map_err(|e| anyhow!("error set background: {:?}", e))?;
    }

    if let Some(caption) = html_element_by_id("ratingLabel") {
        caption.set_text_content(Some(&label.caption()));
        caption
            .style()
            .set_property("color", label.color)
            .map_err(|e| anyhow!("error set color: {:?}", e))?;
    }

    Ok(())
}
