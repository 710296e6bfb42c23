mod recorder;

pub use recorder::PrometheusMetricsRecorder;
