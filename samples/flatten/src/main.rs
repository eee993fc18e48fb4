use std::process::ExitCode;

use clap::Parser;

mod cli;
mod extract;

use cli::Cli;
use extract::{flatten, Flattened};

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::initialize_tracing(&cli.log_filter, cli.log_format);

    let precisions = cli.precisions();
    let parallel = cli.parallel;
    tracing::debug!(?precisions, parallel, "configured");

    let results = crossbeam::scope(|s| {
        let handles: Vec<_> = cli
            .files
            .iter()
            .map(|path| {
                let handle = s
                    .builder()
                    .name(path.display().to_string())
                    .spawn(move |_| flatten(path, precisions, parallel));
                (path, handle)
            })
            .collect();

        handles
            .into_iter()
            .map(|(path, handle)| match handle {
                Ok(handle) => (path, handle.join().ok()),
                Err(e) => {
                    tracing::error!(?path, "couldn't spawn worker: {e}");
                    (path, None)
                }
            })
            .collect::<Vec<_>>()
    });

    let results = match results {
        Ok(results) => results,
        Err(_) => {
            tracing::error!("worker scope panicked");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    for (path, result) in results {
        match result {
            Some(Ok(Flattened {
                store,
                summary,
                dropped,
            })) => {
                for report in &summary.reports {
                    tracing::info!(
                        ?path,
                        kind = %report.kind,
                        before = report.before,
                        after = report.after,
                        "welded"
                    );
                }
                tracing::info!(
                    ?path,
                    triangles = store.triangle_count(),
                    merged = summary.merged(),
                    dropped,
                    "flattened"
                );
            }
            Some(Err(e)) => {
                tracing::error!(?path, "{e}");
                failed = true;
            }
            None => {
                tracing::error!(?path, "worker panicked");
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
