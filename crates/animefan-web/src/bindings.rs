use std::{cell::RefCell, rc::Rc};

use animefan_core::{Action, Dispatcher, FieldSource, PayloadError, action::confirmation};
use dominator::clone;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{FormData, HtmlFormElement, HtmlSelectElement};

use crate::{
    events,
    page::BrowserPage,
    transport::FetchTransport,
    utils::{confirm, document, query_all, DataAttributes, FormFields},
};

pub type Actions = Dispatcher<FetchTransport, BrowserPage>;

type Builder = fn(&DataAttributes) -> Result<Action, PayloadError>;

const CLICK_ACTIONS: [(&str, bool, Builder); 5] = [
    (".add-to-list", true, Action::add_to_list),
    (".toggle-favorite", false, Action::toggle_favorite),
    (".remove-from-list", false, Action::remove_from_list),
    (".review-helpful", false, Action::mark_helpful),
    (".review-unhelpful", false, Action::mark_unhelpful),
];

const STATUS_SELECT: &str = ".change-status";
const REVIEW_FORM: &str = "reviewForm";

/// Binds every action control on the page. Returns how many were bound.
pub fn init(actions: Rc<Actions>) -> usize {
    let mut bound = 0;

    for (selector, stop_propagation, build) in CLICK_ACTIONS {
        let elements = query_all(selector);
        debug!("{} {} controls", elements.len(), selector);
        bound += elements.len();

        for element in elements {
            let fields = DataAttributes(element.clone());
            events::listen(&element, clone!(actions => move |e: events::Click| {
                e.prevent_default();
                if stop_propagation {
                    e.stop_propagation();
                }
                if confirmed(&fields) {
                    dispatch(&actions, build(&fields));
                }
            }));
        }
    }

    bound += bind_status_selects(&actions);
    bound += bind_review_form(&actions);
    bind_confirmations();

    bound
}

fn dispatch(actions: &Rc<Actions>, action: Result<Action, PayloadError>) {
    spawn_local(clone!(actions => async move {
        actions.dispatch(action).await;
    }));
}

/// Honors `data-confirm` on an action control.
fn confirmed(fields: &impl FieldSource) -> bool {
    confirmation(fields).is_none_or(|message| confirm(&message))
}

fn bind_status_selects(actions: &Rc<Actions>) -> usize {
    let selects: Vec<HtmlSelectElement> = query_all(STATUS_SELECT)
        .into_iter()
        .filter_map(|e| e.dyn_into::<HtmlSelectElement>().ok())
        .collect();

    for select in &selects {
        let fields = DataAttributes(select.clone().into());
        let previous = RefCell::new(select.value());
        events::listen(select, clone!(actions, select => move |_: events::Change| {
            let selected = select.value();
            if confirmed(&fields) {
                dispatch(&actions, Action::change_status(&fields, &selected));
                previous.replace(selected);
            } else {
                select.set_value(&previous.borrow());
            }
        }));
    }

    selects.len()
}

fn bind_review_form(actions: &Rc<Actions>) -> usize {
    let Some(form) = document()
        .get_element_by_id(REVIEW_FORM)
        .and_then(|e| e.dyn_into::<HtmlFormElement>().ok())
    else {
        return 0;
    };

    let attributes = DataAttributes(form.clone().into());
    events::listen(&form, clone!(actions, form => move |e: events::Submit| {
        e.prevent_default();

        let action = match FormData::new_with_form(&form) {
            Ok(data) => Action::submit_review(&attributes, &FormFields(data)),
            Err(e) => {
                error!("failed to read review form: {:?}", e);
                return;
            }
        };
        debug!("submitting review for {:?}", attributes.field("anime-id"));
        dispatch(&actions, action);
    }));

    1
}

/// Plain links and buttons that only ask before proceeding.
fn bind_confirmations() {
    let action_selectors = CLICK_ACTIONS
        .iter()
        .map(|(selector, _, _)| *selector)
        .chain([STATUS_SELECT])
        .collect::<Vec<_>>()
        .join(", ");

    for element in query_all("[data-confirm]") {
        if element.matches(&action_selectors).unwrap_or(false) {
            continue;
        }

        let fields = DataAttributes(element.clone());
        events::listen(&element, move |e: events::Click| {
            if !confirmed(&fields) {
                e.prevent_default();
            }
        });
    }
}
