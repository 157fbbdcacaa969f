#[tokio::main]
async fn main() {
    aegis_triage::init_tracing();

    if let Err(e) = aegis_triage::run().await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
