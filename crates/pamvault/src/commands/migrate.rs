//! HashiCorp Vault KV v2 migration

use anyhow::{anyhow, Result};
use pamvault_secrets::{MigrationReport, Migrator, VaultConfig, VaultKvSource};

use super::{client_from_env, login_with_key};
use crate::cli::MigrateArgs;
use crate::output;

pub async fn run(args: MigrateArgs) -> Result<()> {
    let client = client_from_env()?;
    let vault_config = VaultConfig::from_env()?;

    output::header("Migrating from HashiCorp Vault");
    output::kv("Source", &vault_config.address);
    output::kv("Engines", &args.engines.join(", "));
    output::kv("Parent folder", &client.config().parent_folder_id);

    let source = VaultKvSource::new(vault_config);
    let spinner = output::spinner("Checking Vault health...");
    let healthy = source.check_health().await;
    spinner.finish_and_clear();
    match healthy {
        Ok(true) => {}
        Ok(false) => output::warning("Vault health check did not report healthy, continuing"),
        Err(e) => return Err(anyhow!("Vault is unreachable: {:#}", e)),
    }

    let migrator = Migrator::new(&client, &source).with_description(args.description);

    let report = if args.dry_run {
        output::info("Dry run, nothing will be written");
        migrator.plan(&args.engines).await?
    } else {
        let (token, key) = login_with_key(&client).await?;
        let spinner = output::spinner("Migrating secrets...");
        let report = migrator.migrate(&token, &key, &args.engines).await;
        spinner.finish_and_clear();
        report?
    };

    print_report(&report, args.dry_run);
    Ok(())
}

fn print_report(report: &MigrationReport, dry_run: bool) {
    for engine in &report.engines {
        output::header(&format!("Engine {}", engine.engine));
        if let Some(folder_id) = &engine.folder_id {
            output::kv("Folder", folder_id);
        }
        for secret in &engine.secrets {
            output::kv(&secret.name, secret.id.as_deref().unwrap_or("(not written)"));
        }
        for dir in &engine.skipped {
            output::warning(&format!("Skipped sub-directory {}{}", engine.engine, dir));
        }
    }

    let verb = if dry_run { "Would migrate" } else { "Migrated" };
    output::success(&format!(
        "{} {} secrets from {} engine(s), {} skipped",
        verb,
        report.secret_count(),
        report.engines.len(),
        report.skipped_count()
    ));
}
