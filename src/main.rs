use unity_build_tools::config::ServerConfig;
use unity_build_tools::mcp::service::BuildService;
use unity_build_tools::observability;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    observability::init_tracing();

    let config = ServerConfig::load();
    let svc = BuildService::new(config);
    svc.serve_stdio().await
}
