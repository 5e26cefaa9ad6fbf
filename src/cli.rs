use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bucketbill")]
#[command(version, about = "Estimate the monthly S3 storage bill of every bucket")]
pub struct Cli {
    /// AWS shared credentials profile name [default: default]
    #[arg(short = 'p', long = "profile", value_name = "NAME")]
    pub profile: Option<String>,

    /// Show cost per storage class
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Region for bucket discovery and buckets with unknown region [default: ap-northeast-1]
    #[arg(short = 'r', long = "region", value_name = "REGION")]
    pub region: Option<String>,

    /// Number of buckets collected at once [default: 20]
    #[arg(short = 'j', long = "concurrency", value_name = "N")]
    pub concurrency: Option<usize>,

    /// Print the report as JSON
    #[arg(long = "json")]
    pub json: bool,

    /// Read configuration from this file instead of ~/.bucketbill/config.toml
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,

    /// Print current configuration
    #[arg(long = "print")]
    pub print: bool,

    /// Initialize config file
    #[arg(long = "init")]
    pub init: bool,

    /// Check configuration
    #[arg(long = "check")]
    pub check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
