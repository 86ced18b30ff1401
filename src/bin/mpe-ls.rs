use anyhow::Result;
use markdown_preview_ls::lsp::server::serve;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    serve().await
}
