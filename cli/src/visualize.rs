use anyhow::{bail, Result};
use comfy_table::{presets::UTF8_BORDERS_ONLY, Table};

use chainbow_commons::{Password, MAX_PASSWORD_LENGTH_ALLOWED};
use chainbow_engine::{trace_chain, ChainStep};

use crate::Visualize;

pub fn visualize(args: Visualize) -> Result<()> {
    let config = args.table.config()?;

    if !args.start_password.is_ascii() {
        bail!("The start password can only contain ASCII characters");
    }
    if args.start_password.len() > MAX_PASSWORD_LENGTH_ALLOWED {
        bail!("The start password can be at most {MAX_PASSWORD_LENGTH_ALLOWED} characters long");
    }

    let start = Password::new(args.start_password.as_bytes());
    let steps = trace_chain(start, &config)?;

    let mut trace = Table::new();
    trace.load_preset(UTF8_BORDERS_ONLY);
    trace.set_header(vec!["Step", "Type", "Value", "Reduction"]);

    for (i, step) in steps.iter().enumerate() {
        let row = match step {
            ChainStep::Start { password } => {
                vec![i.to_string(), "start".to_owned(), password.to_string(), String::new()]
            }
            ChainStep::Hash { digest } => {
                vec![
                    i.to_string(),
                    "hash".to_owned(),
                    hex::encode(digest.as_slice()),
                    String::new(),
                ]
            }
            ChainStep::Reduce {
                password,
                reduction_index,
            } => {
                vec![
                    i.to_string(),
                    "reduce".to_owned(),
                    password.to_string(),
                    reduction_index.to_string(),
                ]
            }
        };
        trace.add_row(row);
    }
    println!("{trace}");

    Ok(())
}
