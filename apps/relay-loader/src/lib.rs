#![cfg_attr(test, allow(clippy::expect_used))]

#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;

    use async_trait::async_trait;
    use gloo_net::http::Request;
    use relay_widget_core::{
        DomainConfigClient, DomainConfigTransport, DomainFetchError, LoaderOptions,
        OutboundMessage, Position, WidgetConfig, WidgetController, WidgetHost,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{
        Document, HtmlButtonElement, HtmlElement, HtmlIFrameElement, HtmlScriptElement,
        MessageEvent, Window,
    };

    use crate::wasm_constants::*;

    mod dom;
    mod lifecycle;
    mod logging;
    mod network;
    mod routing;

    use dom::*;
    use lifecycle::*;
    use network::*;
    use routing::*;

    thread_local! {
        static WIDGET: RefCell<Option<WidgetController<DomHost>>> = const { RefCell::new(None) };
        static LOADER_OPTIONS: RefCell<LoaderOptions> = RefCell::new(LoaderOptions::default());
        static MESSAGE_HANDLER: RefCell<Option<Closure<dyn FnMut(MessageEvent)>>> = const { RefCell::new(None) };
        static POPSTATE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static NAVIGATION_API_HANDLER: RefCell<Option<(web_sys::EventTarget, Closure<dyn FnMut(web_sys::Event)>)>> = const { RefCell::new(None) };
        static RESIZE_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static LOAD_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static BUTTON_CLICK_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static BEFORE_UNLOAD_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
        static DOM_CONTENT_LOADED_HANDLER: RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        logging::install();
        // The loader script is only discoverable while it is executing.
        let options = LoaderOptions::from_script_src(loader_script_src().as_deref());
        LOADER_OPTIONS.with(|slot| *slot.borrow_mut() = options);
        boot_when_dom_ready();
    }

    /// Collapses the widget, as if the user clicked the open button.
    #[wasm_bindgen]
    pub fn relay_minimize() {
        with_widget(|widget| widget.minimize());
    }

    #[wasm_bindgen]
    pub fn relay_unminimize() {
        with_widget(|widget| widget.unminimize());
    }

    /// Sets the display name shown in the embedded app. Returns false (and
    /// logs) when the widget is not ready or the name is empty.
    #[wasm_bindgen]
    pub fn relay_set_username(username: String) -> bool {
        match with_widget(|widget| widget.set_username(&username)) {
            Some(Ok(())) => true,
            Some(Err(error)) => {
                tracing::error!(%error);
                false
            }
            None => {
                tracing::error!("tried to set a Relay username before Relay was loaded");
                false
            }
        }
    }

    /// Navigation observer for host routers: call after every
    /// `history.pushState`/`history.replaceState`.
    #[wasm_bindgen]
    pub fn relay_notify_navigation() {
        with_widget(|widget| widget.on_navigation());
    }

    #[wasm_bindgen]
    pub fn relay_state_json() -> String {
        WIDGET
            .with(|slot| {
                slot.try_borrow().ok().and_then(|widget| {
                    widget
                        .as_ref()
                        .and_then(|widget| serde_json::to_string(&widget.snapshot()).ok())
                })
            })
            .unwrap_or_else(|| "null".to_string())
    }

    #[wasm_bindgen]
    pub fn is_hex_color(value: JsValue) -> bool {
        value
            .as_string()
            .is_some_and(|value| relay_widget_core::is_hex_color(&value))
    }

    /// Runs `f` against the live controller. Returns `None` before boot and
    /// when called re-entrantly from inside another widget handler.
    fn with_widget<T>(f: impl FnOnce(&mut WidgetController<DomHost>) -> T) -> Option<T> {
        WIDGET.with(|slot| {
            let Ok(mut widget) = slot.try_borrow_mut() else {
                tracing::debug!("widget busy, skipping re-entrant call");
                return None;
            };
            widget.as_mut().map(f)
        })
    }
}
