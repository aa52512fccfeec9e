#[tokio::main]
async fn main() -> anyhow::Result<()> {
    docforge_server::start().await
}
