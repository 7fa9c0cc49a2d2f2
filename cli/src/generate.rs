use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};
use human_repr::HumanDuration;
use tracing::info;

use chainbow_engine::{Event, RainbowTable};

use crate::Generate;

pub fn generate(args: Generate) -> Result<()> {
    let config = args.table.config()?;

    let handle = RainbowTable::new_nonblocking(config);
    while let Some(event) = handle.recv() {
        match event {
            Event::Batch {
                batch_number,
                batch_count,
            } => info!("building chain batch {batch_number}/{batch_count}"),
            Event::Progress(percent) => info!("{percent:.0}% of the table generated"),
        }
    }

    let table = handle.join().context("the table generation failed")?;
    let summary = table.summary();

    let mut stats = Table::new();
    stats.load_preset(UTF8_BORDERS_ONLY);
    stats.set_header(vec!["Table", ""]);
    stats.add_row(vec!["Hash type".to_owned(), config.hash_type.to_string()]);
    stats.add_row(vec![
        "Keyspace size".to_owned(),
        summary.total_keyspace.to_string(),
    ]);
    stats.add_row(vec![
        "Stored chains".to_owned(),
        summary.table_size.to_string(),
    ]);
    stats.add_row(vec![
        "Estimated coverage".to_owned(),
        format!("{:.2}%", summary.estimated_coverage),
    ]);
    stats.add_row(vec![
        "Generation time".to_owned(),
        summary
            .generation_time
            .as_secs_f64()
            .human_duration()
            .to_string(),
    ]);
    println!("{stats}");

    let mut chains = Table::new();
    chains.load_preset(UTF8_BORDERS_ONLY);
    chains.set_header(vec!["Sample start", "Sample end"]);
    for (start, end) in &summary.sample_chains {
        chains.add_row(vec![start.to_string(), end.to_string()]);
    }
    println!("{chains}");

    Ok(())
}
