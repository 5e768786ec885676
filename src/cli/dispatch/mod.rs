use crate::auth::HasherConfig;
use crate::cli::{
    actions::{server::Args, Action},
    commands,
};
use anyhow::{Context, Result};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);

    let dsn = matches
        .get_one::<String>(commands::ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;

    let defaults = HasherConfig::new();

    let hasher = defaults
        .with_memory_kib(
            matches
                .get_one::<u32>(commands::ARG_ARGON2_MEMORY_KIB)
                .copied()
                .unwrap_or(defaults.memory_kib()),
        )
        .with_iterations(
            matches
                .get_one::<u32>(commands::ARG_ARGON2_ITERATIONS)
                .copied()
                .unwrap_or(defaults.iterations()),
        )
        .with_parallelism(
            matches
                .get_one::<u32>(commands::ARG_ARGON2_PARALLELISM)
                .copied()
                .unwrap_or(defaults.parallelism()),
        );

    Ok(Action::Server(Args { port, dsn, hasher }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_server_action() -> Result<()> {
        let matches = commands::new().try_get_matches_from(vec![
            "tessera",
            "--port",
            "9000",
            "--dsn",
            "memory://",
            "--argon2-memory-kib",
            "4096",
            "--argon2-iterations",
            "3",
            "--argon2-parallelism",
            "2",
        ])?;

        let Action::Server(args) = handler(&matches)?;

        assert_eq!(args.port, 9000);
        assert_eq!(args.dsn, "memory://");
        assert_eq!(
            args.hasher,
            HasherConfig::new()
                .with_memory_kib(4096)
                .with_iterations(3)
                .with_parallelism(2)
        );
        Ok(())
    }
}
