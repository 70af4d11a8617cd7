use anyhow::Result;
use clap::Args;
use kwatch_lib::validation;
use kwatch_lib::Settings;

#[derive(Args)]
pub struct RemoveArgs {
    /// 5-6 digit KRX code
    pub code: String,
}

pub fn run(args: &RemoveArgs, settings: &Settings) -> Result<()> {
    let code = validation::validate_code(&args.code)?;
    let db = super::open_db(settings)?;

    if db.remove_item(&code)? {
        eprintln!("Removed {} from the watchlist", code);
    } else {
        eprintln!("{} is not on the watchlist", code);
    }
    Ok(())
}
