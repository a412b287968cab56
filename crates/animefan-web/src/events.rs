use dominator::traits::StaticEvent;
use wasm_bindgen::{JsCast, prelude::*};

macro_rules! make_event {
    ($name:ident, $type:literal => $event:path) => {
        pub struct $name {
            event: $event,
        }

        impl StaticEvent for $name {
            const EVENT_TYPE: &'static str = $type;

            #[inline]
            fn unchecked_from_event(event: web_sys::Event) -> Self {
                Self {
                    event: event.unchecked_into(),
                }
            }
        }

        impl $name {
            #[allow(dead_code)]
            #[inline]
            pub fn prevent_default(&self) { self.event.prevent_default(); }

            #[allow(dead_code)]
            #[inline]
            pub fn stop_propagation(&self) { self.event.stop_propagation(); }

            #[allow(dead_code)]
            #[inline]
            pub fn target(&self) -> Option<web_sys::EventTarget> { self.event.target() }

            #[allow(dead_code)]
            #[inline]
            pub fn dyn_target<A>(&self) -> Option<A> where A: JsCast {
                self.target()?.dyn_into().ok()
            }
        }
    };
}

make_event!(Click, "click" => web_sys::MouseEvent);
make_event!(KeyDown, "keydown" => web_sys::KeyboardEvent);
make_event!(Input, "input" => web_sys::Event);
make_event!(Change, "change" => web_sys::Event);
make_event!(Submit, "submit" => web_sys::Event);
make_event!(DomContentLoaded, "DOMContentLoaded" => web_sys::Event);
make_event!(ColorSchemeChange, "change" => web_sys::MediaQueryListEvent);

impl KeyDown {
    #[inline]
    pub fn key(&self) -> String { self.event.key() }

    #[inline]
    pub fn ctrl_key(&self) -> bool { self.event.ctrl_key() }

    #[inline]
    pub fn shift_key(&self) -> bool { self.event.shift_key() }
}

impl ColorSchemeChange {
    /// True when the system now prefers a dark color scheme.
    #[inline]
    pub fn matches(&self) -> bool { self.event.matches() }
}

/// Attaches a listener to an element rendered by the server. The listener
/// lives as long as the page.
pub fn listen<E, F>(target: &web_sys::EventTarget, mut handler: F)
where
    E: StaticEvent,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(move |e: web_sys::Event| {
        handler(E::unchecked_from_event(e));
    }) as Box<dyn FnMut(_)>);

    if let Err(e) = target.add_event_listener_with_callback(E::EVENT_TYPE, closure.as_ref().unchecked_ref()) {
        error!("failed to listen for {}: {:?}", E::EVENT_TYPE, e);
    }

    closure.forget();
}
