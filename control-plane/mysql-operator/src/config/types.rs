use std::time::Duration;

use envconfig::Envconfig;

#[derive(Envconfig, Clone, Debug)]
pub struct OperatorConfig {
    /// Restrict the controller to one namespace; all namespaces when unset.
    /// Env: MYSQL_OPERATOR_WATCH_NAMESPACE
    #[envconfig(from = "MYSQL_OPERATOR_WATCH_NAMESPACE")]
    pub watch_namespace: Option<String>,

    /// Periodic resync after a successful pass; 0 waits for changes only.
    /// Env: MYSQL_OPERATOR_RESYNC_SECS
    #[envconfig(from = "MYSQL_OPERATOR_RESYNC_SECS", default = "300")]
    pub resync_secs: u64,

    /// Delay before retrying a failed or partially failed pass.
    /// Env: MYSQL_OPERATOR_ERROR_REQUEUE_SECS
    #[envconfig(from = "MYSQL_OPERATOR_ERROR_REQUEUE_SECS", default = "60")]
    pub error_requeue_secs: u64,

    /// Field manager and event reporter name.
    #[envconfig(from = "MYSQL_OPERATOR_REPORTER", default = "mysql-operator")]
    pub reporter: String,

    /// Publish Kubernetes Events for workload creation results.
    #[envconfig(from = "MYSQL_OPERATOR_EVENTS", default = "true")]
    pub events: bool,

    #[envconfig(from = "HTTP_PORT", default = "8088")]
    pub http_port: u16,
}

impl OperatorConfig {
    pub fn resync_interval(&self) -> Option<Duration> {
        match self.resync_secs {
            0 => None,
            s => Some(Duration::from_secs(s)),
        }
    }

    pub fn error_requeue(&self) -> Duration {
        Duration::from_secs(self.error_requeue_secs.max(1))
    }
}
