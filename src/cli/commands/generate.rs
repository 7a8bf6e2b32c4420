//! `gemlibs generate` command.

use crate::cli::args::GenerateArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::report::{report_summary, report_version};
use super::{Command, CommandContext, CommandResult};

/// Generates records for the selected versions of one gem.
pub struct GenerateCommand {
    context: CommandContext,
    args: GenerateArgs,
}

impl GenerateCommand {
    pub fn new(context: CommandContext, args: GenerateArgs) -> Self {
        Self { context, args }
    }
}

impl Command for GenerateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let orchestrator = self.context.orchestrator()?;
        let options = self.args.run_options();

        ui.show_header(&self.args.gem);
        let summary = orchestrator.process_package(&self.args.gem, &options);

        for report in &summary.reports {
            report_version(ui, report);
        }
        report_summary(ui, &summary);

        Ok(CommandResult::from_failures(!summary.is_success()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::SelectionArgs;
    use crate::config::Settings;
    use crate::fetch::archive::tests::gem_bytes;
    use crate::record::{PackageIdentity, RecordStore};
    use crate::ui::MockUI;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn context(server: &MockServer, temp: &TempDir) -> CommandContext {
        CommandContext::from_settings(Settings {
            api_url: server.base_url(),
            download_url: server.base_url(),
            cache_dir: temp.path().join("cache"),
            output_dir: temp.path().join("gems"),
            rules_path: temp.path().join("rules.yml"),
            max_retries: 0,
            backoff_ms: 1,
            timeout_secs: 5,
        })
    }

    fn args(gem: &str, version: Option<&str>) -> GenerateArgs {
        GenerateArgs {
            gem: gem.to_string(),
            version: version.map(str::to_string),
            selection: SelectionArgs::default(),
        }
    }

    #[test]
    fn generates_latest_version() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/versions/pg.json");
            then.status(200)
                .body(r#"[{"number": "1.5.4"}, {"number": "1.5.3"}]"#);
        });
        server.mock(|when, then| {
            when.method(GET).path("/gems/pg-1.5.4.gem");
            then.status(200).body(gem_bytes(
                "--- {}\n",
                &[("ext/pg/extconf.rb", b"have_library('pq')\n".as_slice())],
            ));
        });

        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = GenerateCommand::new(context(&server, &temp), args("pg", None))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        assert_eq!(ui.successes(), ["pg 1.5.4: postgresql (low)"]);

        let store = RecordStore::new(temp.path().join("gems"));
        let doc = store
            .load(&PackageIdentity::new("pg", "1.5.4"))
            .unwrap()
            .unwrap();
        assert_eq!(doc.dependencies, vec!["postgresql"]);
    }

    #[test]
    fn unknown_gem_fails_with_exit_code_one() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/api/v1/versions/nope.json");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let mut ui = MockUI::new();
        let result = GenerateCommand::new(context(&server, &temp), args("nope", None))
            .execute(&mut ui)
            .unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.errors()[0].contains("gem 'nope'"));
    }
}
