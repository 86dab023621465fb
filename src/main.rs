#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    black_swan_booking::run().await
}
