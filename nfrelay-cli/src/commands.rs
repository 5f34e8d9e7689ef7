use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use nfrelay_config::{ConfigOverrides, RelayConfig};
use nfrelay_engine::Relay;
use nfrelay_telemetry::{EventLogger, MetricsRecorder};

#[derive(Parser, Debug)]
#[command(name = "nfrelay", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Receive NetFlow v5 and relay decoded records until stopped
    Run(ConfigArgs),
    /// Print the effective configuration as YAML and exit
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address and port to listen for NetFlow packets on
    #[arg(long = "in", value_name = "ADDR")]
    pub listen: Option<String>,

    /// Output method: stdout, udp
    #[arg(long, value_name = "METHOD")]
    pub method: Option<String>,

    /// Address and port of the InfluxDB UDP listener
    #[arg(long = "out", value_name = "ADDR")]
    pub destination: Option<String>,

    /// SO_RCVBUF for the listening socket, in bytes or with a unit (256KiB)
    #[arg(long = "buffer", value_name = "BYTES")]
    pub receive_buffer: Option<String>,
}

impl ConfigArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            listen: self.listen.clone(),
            method: self.method.clone(),
            destination: self.destination.clone(),
            receive_buffer: self.receive_buffer.clone(),
        }
    }

    pub fn load(&self) -> Result<RelayConfig, nfrelay_config::ConfigError> {
        RelayConfig::load(self.config.as_deref(), &self.overrides())
    }
}

pub async fn run(args: ConfigArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = args.load()?;
    EventLogger::init(&config.telemetry.log_filter)?;
    let metrics = MetricsRecorder::new()?;

    info!(
        "starting nfrelay: listen={} method={}",
        config.listener.listen, config.output.method
    );
    Relay::new(config, metrics).run().await?;
    Ok(())
}

pub fn print_config(args: ConfigArgs) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = args.load()?;
    print!("{}", serde_yaml::to_string(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_legacy_flags() {
        let cli = Cli::try_parse_from([
            "nfrelay",
            "run",
            "--in",
            "0.0.0.0:9995",
            "--method",
            "udp",
            "--out",
            "influx.example.net:8089",
            "--buffer",
            "425984",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        let overrides = args.overrides();
        assert_eq!(overrides.listen.as_deref(), Some("0.0.0.0:9995"));
        assert_eq!(overrides.method.as_deref(), Some("udp"));
        assert_eq!(overrides.destination.as_deref(), Some("influx.example.net:8089"));
        assert_eq!(overrides.receive_buffer.as_deref(), Some("425984"));
    }

    #[test]
    fn config_subcommand_takes_a_file() {
        let cli = Cli::try_parse_from(["nfrelay", "config", "--config", "relay.yaml"]).unwrap();
        let Commands::Config(args) = cli.command else {
            panic!("expected config");
        };
        assert_eq!(args.config, Some(PathBuf::from("relay.yaml")));
        assert!(args.listen.is_none());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["nfrelay"]).is_err());
    }
}
