use garden::AppConfig;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let result = AppConfig::from_env().and_then(garden::run);
    if let Err(err) = result {
        log::error!("garden exited with an error: {err}");
        std::process::exit(1);
    }
}
