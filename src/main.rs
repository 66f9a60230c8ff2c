mod app;
mod cli;

fn main() {
    tracing_subscriber::fmt::init();
    app::run(cli::parse());
}
