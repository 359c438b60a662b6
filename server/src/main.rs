#[tokio::main]
async fn main() {
    kakomon::start_server().await;
}
