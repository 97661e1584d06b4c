//! Inspect or initialize the persisted option set.

use anyhow::{Context, Result};
use clap::Subcommand;
use parry_core::{AttackKind, ParryConfig};
use parry_runtime::RuntimeConfig;

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the effective settings (clamped, with derived frame counts)
    Show,

    /// Write default settings to the settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

impl SettingsCommand {
    pub fn execute(self, config: &RuntimeConfig) -> Result<()> {
        let store = config.settings_store();

        match self {
            Self::Show => {
                let settings = store.load_or_default();
                println!("Settings file: {}", store.path().display());
                print_settings(&settings);
            }
            Self::Init { force } => {
                if store.path().exists() && !force {
                    println!(
                        "Settings already exist at {} (use --force to overwrite)",
                        store.path().display()
                    );
                    return Ok(());
                }
                store
                    .save(&ParryConfig::default())
                    .context("writing default settings")?;
                println!("Wrote default settings to {}", store.path().display());
            }
        }
        Ok(())
    }
}

fn print_settings(settings: &ParryConfig) {
    println!("  enabled                {}", settings.enabled);
    println!("  timing_mode            {}", settings.timing_mode);
    println!(
        "  window_seconds         {:.2}",
        settings.fixed_window_seconds()
    );
    println!(
        "  resolve_window_seconds {:.2}",
        settings.resolve_window_seconds()
    );
    println!(
        "  lead (physical/magic)  {} / {} frames",
        settings.lead_frames(AttackKind::Physical),
        settings.lead_frames(AttackKind::Magic)
    );
    println!("  window frames          {}", settings.window_frames());
    println!("  indicator              {}", settings.indicator);
    println!("  audio                  {}", settings.audio);
    println!("  reward_boost           {}", settings.reward_boost);
    println!("  negate_damage          {}", settings.negate_damage);
    println!("  logging                {}", settings.logging);
}
