use super::*;

pub(super) fn loader_script_src() -> Option<String> {
    let document = web_sys::window()?.document()?;
    let script = document
        .current_script()
        .or_else(|| document.query_selector(LOADER_SCRIPT_SELECTOR).ok().flatten())?;
    let script = script.dyn_into::<HtmlScriptElement>().ok()?;
    let src = script.src();
    if src.is_empty() { None } else { Some(src) }
}

pub(super) fn boot_when_dom_ready() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        tracing::error!("document is unavailable, relay not started");
        return;
    };
    if document.ready_state() != "loading" {
        run_boot();
        return;
    }
    DOM_CONTENT_LOADED_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::once(move |_event: web_sys::Event| {
            run_boot();
        });
        let _ = document
            .add_event_listener_with_callback("DOMContentLoaded", callback.as_ref().unchecked_ref());
        *slot.borrow_mut() = Some(callback);
    });
}

fn run_boot() {
    if let Err(error) = boot() {
        tracing::error!(%error, "relay failed to start");
    }
}

fn boot() -> Result<(), String> {
    if WIDGET.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;

    let (config, sources) = WidgetConfig::resolve();
    tracing::debug!(
        iframe_origin = %config.iframe_origin,
        api_base_url = %config.api_base_url,
        iframe_origin_source = sources[0],
        api_base_url_source = sources[1],
        "starting relay"
    );
    let options = LOADER_OPTIONS.with(|slot| slot.borrow().clone());

    set_inner_height_variable();
    install_window_listeners(&window);

    let host = DomHost::create(&config)?;
    install_button_listener(host.button());
    let api_base_url = config.api_base_url.clone();
    let widget = WidgetController::new(config, options, host);
    WIDGET.with(|slot| *slot.borrow_mut() = Some(widget));

    spawn_domain_config_fetch(api_base_url);
    Ok(())
}
