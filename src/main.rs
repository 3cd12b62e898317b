#[tokio::main]
async fn main() {
    let code = reposcout::app::startup::startup().await;
    std::process::exit(code);
}
