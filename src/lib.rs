pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod remote;
pub mod sync;
pub mod view;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::AppConfig;
use crate::sync::DashboardHandle;

#[derive(Clone)]
pub struct AppState {
    pub engine: DashboardHandle,
    pub config: AppConfig,
    pub metrics_handle: PrometheusHandle,
}
