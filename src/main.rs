#[tokio::main]
async fn main() {
    custom_data_server::run().await;
}
