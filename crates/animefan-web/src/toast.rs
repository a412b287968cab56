use std::{rc::Rc, time::Duration};

use animefan_core::{Notifier, Toast};
use dominator::{clone, html, Dom};
use futures_signals::signal::SignalExt;
use gloo_timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;

use crate::events;

/// Bottom-right banner showing the notifier's current toast. Rendered once
/// and appended to `<body>`.
pub fn render(notifier: Rc<Notifier>, duration: Duration) -> Dom {
    let millis = duration.as_millis().min(u32::MAX as u128) as u32;

    html!("div", {
        .class("toast-container-custom")
        .class("position-fixed")
        .class("bottom-0")
        .class("end-0")
        .class("p-3")
        .style("z-index", "9999")
        .visible_signal(notifier.signal().map(|toast| toast.is_some()))
        .future(notifier.signal().for_each(clone!(notifier => move |toast| {
            if let Some(toast) = toast {
                spawn_local(clone!(notifier => async move {
                    TimeoutFuture::new(millis).await;
                    notifier.dismiss(toast.id);
                }));
            }

            async {}
        })))
        .child_signal(notifier.signal().map(clone!(notifier => move |toast| {
            toast.map(|toast| render_toast(notifier.clone(), toast))
        })))
    })
}

fn render_toast(notifier: Rc<Notifier>, toast: Toast) -> Dom {
    let id = toast.id;

    html!("div", {
        .class("toast")
        .class("show")
        .class("align-items-center")
        .class("text-white")
        .class("border-0")
        .class(toast.kind.class())
        .attribute("role", "alert")
        .children(&mut [
            html!("div", {
                .class("d-flex")
                .children(&mut [
                    html!("div", {
                        .class("toast-body")
                        .children(toast.icon.map(|icon| html!("i", {
                            .class("bi")
                            .class(icon)
                            .class("me-2")
                        })))
                        .text(&toast.message)
                    }),
                    html!("button", {
                        .attribute("type", "button")
                        .attribute("aria-label", "Закрыть")
                        .class("btn-close")
                        .class("btn-close-white")
                        .class("me-2")
                        .class("m-auto")
                        .event(clone!(notifier => move |_: events::Click| notifier.dismiss(id)))
                    }),
                ])
            })
        ])
    })
}
