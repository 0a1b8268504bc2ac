use backend_api::{run_server, AppState};
use std::sync::Arc;
use std::{env, path::PathBuf};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let output_dir = env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir().join("revaluation-reports"));
    let settings_path = env::var("SETTINGS_PATH").ok().map(PathBuf::from);

    println!("Fixed Asset Revaluation Server");
    println!("==============================");
    println!("Output dir: {}", output_dir.display());
    match &settings_path {
        Some(path) => println!("Settings: {}", path.display()),
        None => println!("Settings: built-in chart of accounts"),
    }
    println!("Listening on: {}:{}", host, port);
    println!();

    let state = AppState::from_settings(settings_path.as_ref(), output_dir)?;
    run_server(Arc::new(state), &host, port).await?;

    Ok(())
}
