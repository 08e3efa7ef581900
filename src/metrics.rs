use std::time::Duration;

use crate::generation::GenerationStatus;

// The exporter is installed by the server binary; without it these calls are no-ops.

pub fn record_generation_request() {
    ::metrics::counter!("videogen_generation_requests_total").increment(1);
}

pub fn record_rejection(reason: &'static str) {
    ::metrics::counter!("videogen_generation_rejected_total", "reason" => reason).increment(1);
}

pub fn record_generation(status: GenerationStatus, elapsed: Duration) {
    ::metrics::counter!("videogen_generations_total", "status" => status.as_str()).increment(1);
    ::metrics::histogram!("videogen_generation_duration_seconds", "status" => status.as_str())
        .record(elapsed.as_secs_f64());
}

pub fn set_registry_size(len: usize) {
    ::metrics::gauge!("videogen_registry_videos").set(len as f64);
}

pub fn record_evictions(count: usize) {
    ::metrics::counter!("videogen_registry_evicted_total").increment(count as u64);
}
