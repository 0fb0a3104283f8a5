use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    mining_deployer::start(std::env::args()).await
}
