use anyhow::Result;
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};
use human_repr::HumanDuration;

use chainbow_engine::crack_hash;

use crate::Crack;

pub fn crack(args: Crack) -> Result<()> {
    let config = args.table.config()?;

    // already validated by the hex value parser
    let digest = hex::decode(&args.digest).unwrap();

    let result = crack_hash(config, &digest)?;

    let mut report = Table::new();
    report.load_preset(UTF8_BORDERS_ONLY);

    match &result.cracked {
        Some(cracked) => {
            report.set_header(vec!["Password found", ""]);
            report.add_row(vec!["Password".to_owned(), cracked.password.to_string()]);
            report.add_row(vec!["Chain".to_owned(), cracked.chain_index.to_string()]);
            report.add_row(vec![
                "Step in chain".to_owned(),
                cracked.step_in_chain.to_string(),
            ]);
        }
        None => {
            report.set_header(vec!["No password found for the given digest", ""]);
        }
    }

    report.add_row(vec![
        "Chains searched".to_owned(),
        result.chains_searched.to_string(),
    ]);
    report.add_row(vec![
        "Total chains".to_owned(),
        result.total_chains.to_string(),
    ]);
    report.add_row(vec![
        "Lookup time".to_owned(),
        result.lookup_time.as_secs_f64().human_duration().to_string(),
    ]);
    report.add_row(vec![
        "Total time".to_owned(),
        result.total_time.as_secs_f64().human_duration().to_string(),
    ]);
    println!("{report}");

    Ok(())
}
