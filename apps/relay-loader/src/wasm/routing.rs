use super::*;

pub(super) fn install_window_listeners(window: &Window) {
    MESSAGE_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(MessageEvent)>::wrap(Box::new(move |event: MessageEvent| {
            let origin = event.origin();
            let data = message_data_to_json(&event.data());
            with_widget(|widget| widget.handle_message(&origin, &data));
        }));
        let _ = window.add_event_listener_with_callback("message", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });

    // `currententrychange` also fires for back/forward traversals, so
    // popstate is only needed without the Navigation API.
    if !install_navigation_api_observer(window) {
        install_event_slot(&POPSTATE_HANDLER, window, "popstate", || {
            with_widget(|widget| widget.on_navigation());
        });
    }
    install_event_slot(&RESIZE_HANDLER, window, "resize", set_inner_height_variable);
    install_event_slot(&LOAD_HANDLER, window, "load", set_scrollbar_width_variable);
    install_event_slot(&BEFORE_UNLOAD_HANDLER, window, "beforeunload", remove_listeners);
}

pub(super) fn install_button_listener(button: &HtmlButtonElement) {
    install_event_slot(&BUTTON_CLICK_HANDLER, button, "click", || {
        with_widget(|widget| widget.toggle());
    });
}

/// Browsers with the Navigation API report `pushState`/`replaceState` from
/// page code through `currententrychange`, so host routers need not call
/// `relay_notify_navigation` there. Mutations made by the widget itself
/// arrive while the widget is borrowed and are skipped by `with_widget`.
/// Returns whether the observer is installed.
fn install_navigation_api_observer(window: &Window) -> bool {
    let Ok(navigation) = js_sys::Reflect::get(window, &JsValue::from_str("navigation")) else {
        return false;
    };
    let Ok(navigation) = navigation.dyn_into::<web_sys::EventTarget>() else {
        return false;
    };
    NAVIGATION_API_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return true;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            with_widget(|widget| widget.on_navigation());
        }));
        if navigation
            .add_event_listener_with_callback("currententrychange", callback.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::warn!("failed to observe navigation API, falling back to popstate");
            return false;
        }
        *slot.borrow_mut() = Some((navigation, callback));
        true
    })
}

type EventSlot = std::thread::LocalKey<RefCell<Option<Closure<dyn FnMut(web_sys::Event)>>>>;

fn install_event_slot(
    slot: &'static EventSlot,
    target: &web_sys::EventTarget,
    event_name: &'static str,
    handler: impl Fn() + 'static,
) {
    slot.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| handler()));
        if target
            .add_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref())
            .is_err()
        {
            tracing::error!(event_name, "failed to install relay listener");
            return;
        }
        *slot.borrow_mut() = Some(callback);
    });
}

fn remove_event_slot(slot: &'static EventSlot, target: &web_sys::EventTarget, event_name: &str) {
    slot.with(|slot| {
        if let Some(callback) = slot.borrow_mut().take() {
            let _ = target
                .remove_event_listener_with_callback(event_name, callback.as_ref().unchecked_ref());
        }
    });
}

/// Drops every listener the loader installed. Runs on `beforeunload`.
pub(super) fn remove_listeners() {
    let Some(window) = web_sys::window() else {
        return;
    };
    MESSAGE_HANDLER.with(|slot| {
        if let Some(callback) = slot.borrow_mut().take() {
            let _ = window
                .remove_event_listener_with_callback("message", callback.as_ref().unchecked_ref());
        }
    });
    NAVIGATION_API_HANDLER.with(|slot| {
        if let Some((navigation, callback)) = slot.borrow_mut().take() {
            let _ = navigation.remove_event_listener_with_callback(
                "currententrychange",
                callback.as_ref().unchecked_ref(),
            );
        }
    });
    remove_event_slot(&POPSTATE_HANDLER, &window, "popstate");
    remove_event_slot(&RESIZE_HANDLER, &window, "resize");
    remove_event_slot(&LOAD_HANDLER, &window, "load");

    let button = WIDGET.with(|slot| {
        slot.try_borrow()
            .ok()
            .and_then(|widget| widget.as_ref().map(|widget| widget.host().button().clone()))
    });
    if let Some(button) = button {
        remove_event_slot(&BUTTON_CLICK_HANDLER, &button, "click");
    }
    // Dropping a closure while it runs invalidates it, so the unload
    // listener itself is only detached, never freed.
    BEFORE_UNLOAD_HANDLER.with(|slot| {
        if let Some(callback) = slot.borrow().as_ref() {
            let _ = window.remove_event_listener_with_callback(
                "beforeunload",
                callback.as_ref().unchecked_ref(),
            );
        }
    });
}

fn message_data_to_json(data: &JsValue) -> serde_json::Value {
    js_sys::JSON::stringify(data)
        .ok()
        .and_then(|text| text.as_string())
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or(serde_json::Value::Null)
}
