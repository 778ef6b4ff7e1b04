//! Module for the `templates` subcommand.

use armor_render::Template;
use async_trait::async_trait;
use clap::Args;
use std::error::Error;

/// Arguments for the `templates` subcommand.
#[derive(Args, Debug)]
pub struct TemplatesArgs {}

/// Lists the built-in templates and the flavor each one renders.
#[async_trait]
impl super::Command for TemplatesArgs {
    async fn execute(self) -> Result<(), Box<dyn Error>> {
        for (name, flavor) in Template::builtins() {
            println!("{name}\t{flavor}");
        }
        Ok(())
    }
}
