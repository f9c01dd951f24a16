use metrics_exporter_prometheus::PrometheusHandle;
use postpartum_care::journal::ClassifierStrategy;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_strategy(raw: &str) -> Result<ClassifierStrategy, String> {
    ClassifierStrategy::parse(raw)
        .ok_or_else(|| format!("unknown strategy '{raw}'; expected polarity or keyword"))
}
