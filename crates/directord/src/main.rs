//! directord: director operator binary.
//!
//! Validates a director configuration and inspects the VM records the
//! director has persisted.
//!
//! # Usage
//!
//! ```text
//! directord check-config --config /var/vcap/jobs/director/config/director.toml
//! directord vms --config director.toml --deployment cf
//! directord vms --config director.toml --agent-id 5f1c0e2a
//! directord deployments --config director.toml
//! ```

mod logging;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use director_core::DirectorConfig;
use director_state::{StateStore, VmRecord};

#[derive(Parser)]
#[command(name = "directord", about = "Deployment director")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and validate a configuration file.
    CheckConfig {
        /// Path to director.toml.
        #[arg(long, short)]
        config: PathBuf,
    },
    /// List persisted VM records.
    Vms {
        /// Path to director.toml.
        #[arg(long, short)]
        config: PathBuf,

        /// Only show VMs of this deployment.
        #[arg(long, short)]
        deployment: Option<String>,

        /// Only show the VM running this agent.
        #[arg(long)]
        agent_id: Option<String>,

        /// Print records as JSON lines.
        #[arg(long)]
        json: bool,
    },
    /// List persisted deployments with their VM counts.
    Deployments {
        /// Path to director.toml.
        #[arg(long, short)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::CheckConfig { config } => {
            let config = load_config(&config)?;
            check_config(&config)
        }
        Command::Vms {
            config,
            deployment,
            agent_id,
            json,
        } => {
            let config = load_config(&config)?;
            list_vms(&config, deployment.as_deref(), agent_id.as_deref(), json)
        }
        Command::Deployments { config } => {
            let config = load_config(&config)?;
            let state = open_state(&config)?;
            for line in describe_deployments(&state)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

/// Read the config and install logging from its `[logging]` section.
fn load_config(path: &Path) -> anyhow::Result<DirectorConfig> {
    let config = DirectorConfig::from_file(path)?;
    logging::init(config.log_level(), config.log_format())?;
    debug!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn check_config(config: &DirectorConfig) -> anyhow::Result<()> {
    let certs = config.load_trusted_certs()?;
    info!(director = %config.name, "configuration is valid");

    println!("name:               {}", config.name);
    println!("state path:         {}", config.state_path.display());
    println!("max threads:        {}", config.max_threads());
    println!("trusted certs sha1: {}", certs.sha1());
    Ok(())
}

fn list_vms(
    config: &DirectorConfig,
    deployment: Option<&str>,
    agent_id: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let state = open_state(config)?;
    let vms = select_vms(&state, deployment, agent_id)?;

    for vm in &vms {
        if json {
            println!("{}", serde_json::to_string(vm)?);
        } else {
            println!("{}", describe_vm(vm));
        }
    }
    debug!(count = vms.len(), "listed vms");
    Ok(())
}

fn open_state(config: &DirectorConfig) -> anyhow::Result<StateStore> {
    let state = StateStore::open(&config.state_path).with_context(|| {
        format!("failed to open state store {}", config.state_path.display())
    })?;
    info!(path = %config.state_path.display(), "state store opened");
    Ok(state)
}

/// `name<TAB>vm count` for every stored deployment.
fn describe_deployments(state: &StateStore) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();
    for deployment in state.list_deployments()? {
        let vms = state.list_vms_for_deployment(&deployment.name)?;
        lines.push(format!("{}\t{}", deployment.name, vms.len()));
    }
    Ok(lines)
}

/// VM records matching the filters. A named deployment must exist.
fn select_vms(
    state: &StateStore,
    deployment: Option<&str>,
    agent_id: Option<&str>,
) -> anyhow::Result<Vec<VmRecord>> {
    if let Some(name) = deployment {
        if state.get_deployment(name)?.is_none() {
            bail!("deployment {name} not found");
        }
    }

    let vms = match (agent_id, deployment) {
        (Some(agent_id), _) => state
            .find_vm_by_agent_id(agent_id)?
            .into_iter()
            .filter(|vm| deployment.is_none_or(|name| vm.deployment == name))
            .collect(),
        (None, Some(name)) => state.list_vms_for_deployment(name)?,
        (None, None) => state.list_vms()?,
    };
    Ok(vms)
}

/// One tab-separated line: cid, agent id, deployment, certs fingerprint,
/// and whether an apply spec has been recorded.
fn describe_vm(vm: &VmRecord) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        vm.cid,
        vm.agent_id,
        vm.deployment,
        vm.trusted_certs_sha1.as_deref().unwrap_or("-"),
        if vm.apply_spec.is_some() { "applied" } else { "pending" }
    )
}
