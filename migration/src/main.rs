use std::env;

use complaints_common::database;

use crate::settings::Settings;

mod schema;
mod seed;
mod settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;
    println!("Configuration loaded");

    let database = database::connect(&settings.database).await?;
    println!("Connected to DB");

    schema::migrate(database).await?;
    println!("Schema migrated");

    if env::args().any(|arg| arg == "--seed") {
        seed::seed(database).await?;
        println!("Database seeded");
    }

    Ok(())
}
