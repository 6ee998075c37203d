use lambda_http::{run, service_fn, Error, Request};
mod error;
mod handler;
mod youtube;
use handler::{Config, ProxyHandler};
use youtube::YouTubeClient;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // required to enable CloudWatch error logging by the runtime
    lambda_http::tracing::init_default_subscriber();

    // Config and HTTP client are built once per Lambda container
    let config = Config::from_env();
    tracing::info!(
        api_base_url = %config.api_base_url,
        api_key_configured = config.api_key.is_some(),
        "youtube proxy starting"
    );
    let client = YouTubeClient::new(config.api_base_url.clone());
    let proxy = ProxyHandler::new(config, client);
    let proxy = &proxy;

    run(service_fn(|request: Request| async move {
        Ok::<_, Error>(proxy.handle(request).await)
    }))
    .await
}
