use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(business_dashboard_lib::SETTINGS_ENV).map(PathBuf::from));
    business_dashboard_lib::run(settings_path).await?;
    Ok(())
}
