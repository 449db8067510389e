use super::*;

/// Domain config transport over the browser `fetch` API.
pub(super) struct FetchTransport;

#[async_trait(?Send)]
impl DomainConfigTransport for FetchTransport {
    async fn get_text(&self, url: &str) -> Result<String, DomainFetchError> {
        let response = Request::get(url)
            .send()
            .await
            .map_err(|error| DomainFetchError::Network(error.to_string()))?;
        let status = response.status();
        if !(200..=299).contains(&status) {
            return Err(DomainFetchError::Status(status));
        }
        response
            .text()
            .await
            .map_err(|error| DomainFetchError::Network(error.to_string()))
    }
}

/// Fetches the config for the page's hostname and hands it to the widget.
/// The result is dropped if the widget is gone by the time it settles.
pub(super) fn spawn_domain_config_fetch(api_base_url: String) {
    let hostname = web_sys::window()
        .and_then(|window| window.location().hostname().ok())
        .unwrap_or_default();
    spawn_local(async move {
        let client = DomainConfigClient::new(api_base_url, FetchTransport);
        let domain_config = client.fetch(&hostname).await;
        if with_widget(|widget| widget.apply_domain_config(domain_config)).is_none() {
            tracing::debug!("widget unavailable when domain config settled");
        }
    });
}
