//! `gemlibs show` command.

use crate::cli::args::ShowArgs;
use crate::error::Result;
use crate::record::PackageIdentity;
use crate::ui::UserInterface;

use super::{Command, CommandContext, CommandResult};

/// Prints a stored record as JSON.
pub struct ShowCommand {
    context: CommandContext,
    args: ShowArgs,
}

impl ShowCommand {
    pub fn new(context: CommandContext, args: ShowArgs) -> Self {
        Self { context, args }
    }
}

impl Command for ShowCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let package = PackageIdentity::new(&self.args.gem, &self.args.version);
        let store = self.context.record_store();

        match store.load(&package)? {
            Some(doc) => {
                ui.message(&serde_json::to_string_pretty(&doc)?);
                Ok(CommandResult::success())
            }
            None => {
                ui.error(&format!(
                    "No record for {} in {}",
                    package,
                    store.root().display()
                ));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
