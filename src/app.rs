use crate::cli::{Cli, Commands};
use std::path::Path;
use std::process;
use streamvariant::config::{self, StreamOutputVariant};

pub fn run(cli: Cli) {
    match cli.command {
        Commands::Check { file } => handle_check(&file),
        Commands::Resolve { file, pretty } => handle_resolve(&file, pretty),
    }
}

fn handle_check(file: &Path) {
    match config::variants_from_file(file) {
        Ok(variants) => {
            for (index, variant) in variants.iter().enumerate() {
                warn_on_unmapped_preset(index, variant);
            }
            println!("{}: {} variant(s) OK", file.display(), variants.len());
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

fn handle_resolve(file: &Path, pretty: bool) {
    let variants = match config::variants_from_file(file) {
        Ok(variants) => variants,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    };

    for (index, variant) in variants.iter().enumerate() {
        warn_on_unmapped_preset(index, variant);
    }

    let rendered = if pretty {
        serde_json::to_string_pretty(&variants)
    } else {
        serde_json::to_string(&variants)
    };

    match rendered {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("Error: failed to serialize variants: {}", err);
            process::exit(1);
        }
    }
}

/// A preset outside the mapping table resolves to CPU usage level 0, which
/// the pipeline treats as unspecified.
fn warn_on_unmapped_preset(index: usize, variant: &StreamOutputVariant) {
    if !variant.video_passthrough && variant.effective_cpu_usage_level() == 0 {
        tracing::warn!(
            index,
            preset = variant.effective_encoder_preset(),
            "encoder preset has no CPU usage level mapping"
        );
    }
}
