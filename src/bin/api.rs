use doubao_relay::api::ApiHandler;

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    doubao_relay::setup_logging();

    let handler = ApiHandler::from_env();
    let handler = &handler;
    lambda_runtime::run(lambda_runtime::service_fn(move |event| async move {
        handler.handle(event).await
    }))
    .await
}
