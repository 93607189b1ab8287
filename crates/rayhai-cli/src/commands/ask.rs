use crate::GlobalOptions;
use crate::bootstrap::build_engine;
use anyhow::Result;

/// Answers one question and exits. The session is not persisted.
pub async fn run(options: &GlobalOptions, message: &str) -> Result<()> {
    let engine = build_engine(options).await?;
    let reply = engine.ask(message).await;
    println!("{}", reply);
    Ok(())
}
