use clap::builder::BoolishValueParser;

use super::*;

#[derive(Debug, clap::Parser)]
#[command(name = "flannel-fixer")]
#[command(about = "Keeps flannel public-ip annotations in sync with node external addresses")]
#[command(version)]
pub(crate) struct Config {
    /// Use a kubeconfig file instead of the in-cluster service account
    #[arg(long, env = "FFIXER_USE_KUBECONFIG", value_parser = BoolishValueParser::new())]
    pub(crate) use_kubeconfig: bool,

    /// Path to the kubeconfig file [default: $HOME/.kube/config]
    #[arg(long, env = "FFIXER_KUBECONFIG", value_name = "FILE")]
    pub(crate) kubeconfig: Option<PathBuf>,

    /// Log debug messages, including annotation changes of updated nodes
    #[arg(long, env = "FFIXER_DEBUG", value_parser = BoolishValueParser::new())]
    pub(crate) debug: bool,

    /// Address of the metrics and health endpoint
    #[arg(long, env = "FFIXER_METRICS_ADDR", default_value = "0.0.0.0:2112")]
    pub(crate) metrics_addr: SocketAddr,

    /// Node events buffered between the watch and the reconciler
    #[arg(
        long,
        env = "FFIXER_QUEUE_CAPACITY",
        default_value_t = 64,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub(crate) queue_capacity: u16,
}

impl Config {
    pub(crate) fn cluster_config(&self) -> ClusterConfig {
        if self.use_kubeconfig {
            let path = self.kubeconfig.clone().unwrap_or_else(default_kubeconfig);
            ClusterConfig::Kubeconfig(path)
        } else {
            ClusterConfig::InCluster
        }
    }

    /// `RUST_LOG` when set, otherwise `debug` or `info` depending on `--debug`.
    pub(crate) fn env_filter(&self) -> EnvFilter {
        let level = if self.debug { "debug" } else { "info" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn default_kubeconfig() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".kube")
        .join("config")
}
