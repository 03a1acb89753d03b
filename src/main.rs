#[tokio::main]
async fn main() -> anyhow::Result<()> {
    switchyard::app::run().await?;
    Ok(())
}
