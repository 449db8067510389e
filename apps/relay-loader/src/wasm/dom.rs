use super::*;

/// `WidgetHost` over the live page: owns the iframe and button elements.
pub(super) struct DomHost {
    window: Window,
    document: Document,
    iframe: HtmlIFrameElement,
    button: HtmlButtonElement,
}

impl DomHost {
    pub(super) fn create(config: &WidgetConfig) -> Result<Self, String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        let document = window
            .document()
            .ok_or_else(|| "document is unavailable".to_string())?;

        let iframe = document
            .create_element("iframe")
            .map_err(|_| "failed to create relay iframe".to_string())?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| "relay iframe is not HtmlIFrameElement".to_string())?;
        iframe.set_src(&config.iframe_origin);
        iframe.set_id(IFRAME_ID);

        let button = document
            .create_element("button")
            .map_err(|_| "failed to create relay button".to_string())?
            .dyn_into::<HtmlButtonElement>()
            .map_err(|_| "relay button is not HtmlButtonElement".to_string())?;
        button.set_id(BUTTON_ID);
        button.set_type("button");
        button
            .set_attribute("aria-label", BUTTON_LABEL)
            .map_err(|_| "failed to label relay button".to_string())?;

        Ok(Self {
            window,
            document,
            iframe,
            button,
        })
    }

    pub(super) fn button(&self) -> &HtmlButtonElement {
        &self.button
    }

    fn attach(&self, element: &web_sys::Node) {
        let Some(body) = self.document.body() else {
            tracing::warn!("document body is unavailable, cannot attach relay element");
            return;
        };
        if body.contains(Some(element)) {
            return;
        }
        if body.append_child(element).is_err() {
            tracing::error!("failed to attach relay element");
        }
    }

    fn detach(&self, element: &web_sys::Node) {
        let Some(body) = self.document.body() else {
            return;
        };
        if body.contains(Some(element)) && body.remove_child(element).is_err() {
            tracing::error!("failed to detach relay element");
        }
    }

    fn set_class(&self, class: &str, enabled: bool) {
        for classes in [self.iframe.class_list(), self.button.class_list()] {
            let result = if enabled {
                classes.add_1(class)
            } else {
                classes.remove_1(class)
            };
            if result.is_err() {
                tracing::error!(class, "failed to update relay element class");
            }
        }
    }
}

impl WidgetHost for DomHost {
    fn current_href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn post_message(&mut self, message: &OutboundMessage, target_origin: &str) {
        let Some(frame) = self.iframe.content_window() else {
            tracing::debug!("relay iframe has no window yet, dropping message");
            return;
        };
        let Ok(encoded) = js_sys::JSON::parse(&message.to_json().to_string()) else {
            tracing::error!("failed to encode relay message");
            return;
        };
        if frame.post_message(&encoded, target_origin).is_err() {
            tracing::error!("failed to post message to relay iframe");
        }
    }

    fn attach_iframe(&mut self) {
        self.attach(&self.iframe);
    }

    fn detach_iframe(&mut self) {
        self.detach(&self.iframe);
    }

    fn attach_button(&mut self) {
        self.attach(&self.button);
    }

    fn detach_button(&mut self) {
        self.detach(&self.button);
    }

    fn set_open(&mut self, open: bool) {
        self.set_class(OPEN_CLASS, open);
    }

    fn set_position(&mut self, position: Position) {
        self.set_class(LEFT_CLASS, position == Position::Left);
    }

    fn set_button_bottom(&mut self, bottom: &str) {
        if self.button.style().set_property("bottom", bottom).is_err() {
            tracing::warn!(bottom, "failed to set relay button offset");
        }
    }

    fn set_button_background(&mut self, color: &str) {
        if self.button.style().set_property("background", color).is_err() {
            tracing::warn!(color, "failed to set relay button background");
        }
    }

    fn navigate(&mut self, href: &str) {
        if self.window.location().set_href(href).is_err() {
            tracing::error!(href, "failed to navigate");
        }
    }

    fn open_new_tab(&mut self, href: &str) {
        if self
            .window
            .open_with_url_and_target(href, "_blank")
            .is_err()
        {
            tracing::error!(href, "failed to open new tab");
        }
    }

    fn push_url(&mut self, url: &str) {
        let Ok(history) = self.window.history() else {
            return;
        };
        let state = js_sys::Object::new();
        let _ = js_sys::Reflect::set(&state, &JsValue::from_str("path"), &JsValue::from_str(url));
        if history.push_state_with_url(&state, "", Some(url)).is_err() {
            tracing::error!(url, "failed to push relay url");
        }
    }

    fn announce_initialized(&mut self) {
        let window = self.window.clone();
        // Page listeners run synchronously inside dispatchEvent and may call
        // back into the widget, so dispatch outside the current borrow.
        spawn_local(async move {
            match web_sys::Event::new(INITIALIZED_EVENT) {
                Ok(event) => {
                    let _ = window.dispatch_event(&event);
                }
                Err(_) => tracing::error!("failed to create {INITIALIZED_EVENT} event"),
            }
        });
    }
}

pub(super) fn set_inner_height_variable() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let inner_height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    set_root_variable(&window, INNER_HEIGHT_VARIABLE, &format!("{inner_height}px"));
}

pub(super) fn set_scrollbar_width_variable() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let inner_width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);
    let client_width = window
        .document()
        .and_then(|document| document.document_element())
        .map_or(0, |element| element.client_width());
    let scrollbar_width = inner_width - f64::from(client_width);
    set_root_variable(&window, SCROLLBAR_WIDTH_VARIABLE, &format!("{scrollbar_width}px"));
}

fn set_root_variable(window: &Window, name: &str, value: &str) {
    let Some(root) = window
        .document()
        .and_then(|document| document.document_element())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    let _ = root.style().set_property(name, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn body() -> web_sys::HtmlElement {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.body())
            .expect("document body")
    }

    #[wasm_bindgen_test]
    fn attach_and_detach_are_idempotent() {
        let mut host = DomHost::create(&WidgetConfig::default()).expect("dom host");
        let iframe: &web_sys::Node = &host.iframe;
        let iframe = iframe.clone();
        host.attach_iframe();
        host.attach_iframe();
        assert!(body().contains(Some(&iframe)));
        assert!(host.iframe.src().starts_with(&WidgetConfig::default().iframe_origin));

        host.detach_iframe();
        host.detach_iframe();
        assert!(!body().contains(Some(&iframe)));
    }

    #[wasm_bindgen_test]
    fn open_class_applies_to_both_elements() {
        let mut host = DomHost::create(&WidgetConfig::default()).expect("dom host");
        host.set_open(true);
        assert!(host.iframe.class_list().contains(OPEN_CLASS));
        assert!(host.button.class_list().contains(OPEN_CLASS));
        host.set_open(false);
        assert!(!host.button.class_list().contains(OPEN_CLASS));
    }

    #[wasm_bindgen_test]
    fn button_styles_follow_options() {
        let mut host = DomHost::create(&WidgetConfig::default()).expect("dom host");
        host.set_position(Position::Left);
        host.set_button_bottom("32px");
        assert!(host.button.class_list().contains(LEFT_CLASS));
        assert_eq!(
            host.button.style().get_property_value("bottom").ok().as_deref(),
            Some("32px")
        );
    }

    #[wasm_bindgen_test]
    fn is_hex_color_export_rejects_non_strings() {
        assert!(crate::wasm::is_hex_color(JsValue::from_str("#fff")));
        assert!(!crate::wasm::is_hex_color(JsValue::from_f64(4095.0)));
        assert!(!crate::wasm::is_hex_color(JsValue::NULL));
    }
}
