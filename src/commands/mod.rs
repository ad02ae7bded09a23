pub mod export;
pub mod init;

use clap::ArgMatches;

use crate::cli_context::{CliContext, CliContextBuilder};
use crate::error::AacResult;

pub use export::handle_export;
pub use init::{handle_init, init_organization};

/// Build the context from the global `--config` and `--endpoint` flags.
pub fn context_from(matches: &ArgMatches) -> AacResult<CliContext> {
    let mut builder = CliContextBuilder::new();
    if let Some(path) = matches.get_one::<String>("config") {
        builder = builder.with_config_path(path);
    }
    if let Some(endpoint) = matches.get_one::<String>("endpoint") {
        builder = builder.with_endpoint(endpoint.clone());
    }
    builder.build()
}
