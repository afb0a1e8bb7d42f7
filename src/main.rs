#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    portfolio_view::backend::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    portfolio_view::frontend::run();
}
