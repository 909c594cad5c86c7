//! KQL query builders for capacity analysis over the `Perf` table.
//!
//! These produce the percentile-summary queries the orchestrator fans out
//! per resource-id chunk. The query text is opaque to the rest of the crate;
//! callers can just as well supply their own builder closures.

use crate::kql::KqlLiteral;

/// One performance counter to summarize, addressed the way the backend
/// stores it: object name, counter name, optional instance filter, and an
/// optional KQL expression applied to the raw value before aggregation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerfCounterSpec {
    pub object: String,
    pub counter: String,
    pub instance: Option<String>,
    pub value_transform: Option<String>,
}

impl PerfCounterSpec {
    pub fn new(object: impl Into<String>, counter: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            counter: counter.into(),
            instance: None,
            value_transform: None,
        }
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn with_value_transform(mut self, transform: impl Into<String>) -> Self {
        self.value_transform = Some(transform.into());
        self
    }
}

/// Percentile summary (p50/p80/p90/p95/p99, max, sample count) of one
/// counter, per resource, averaged into one-minute bins first.
pub fn perf_counter_percentile_query<S: AsRef<str>>(
    resource_ids: &[S],
    spec: &PerfCounterSpec,
) -> String {
    let mut where_clause = format!(
        "where ObjectName == {} and CounterName == {}",
        spec.object.to_kql(),
        spec.counter.to_kql()
    );
    if let Some(instance) = &spec.instance {
        where_clause.push_str(&format!(" and InstanceName == {}", instance.to_kql()));
    }
    let transform_pipe = match &spec.value_transform {
        Some(transform) => format!("\n| extend value = {transform}"),
        None => String::new(),
    };

    format!(
        "let vm_ids = {ids};\n\
         Perf\n\
         | where _ResourceId in (vm_ids)\n\
         | {where_clause}\n\
         | project TimeGenerated, _ResourceId, value=CounterValue\n\
         | summarize value=avg(value) by _ResourceId, bin(TimeGenerated, 1m){transform_pipe}\n\
         | summarize percentiles(value, 50, 80, 90, 95, 99), max(value), samples=count() by _ResourceId\n\
         | project resource_id = _ResourceId, percentile_50th = percentile_value_50, percentile_80th = percentile_value_80, percentile_90th = percentile_value_90, percentile_95th = percentile_value_95, percentile_99th = percentile_value_99, max = max_value, samples",
        ids = resource_ids.to_kql(),
    )
}

/// Percentile summary of logical-disk throughput counters, per resource,
/// counter, and drive instance, keeping only well-sampled series.
pub fn disk_percentile_query<S: AsRef<str>>(resource_ids: &[S]) -> String {
    format!(
        "let vm_ids = {ids};\n\
         Perf\n\
         | where _ResourceId in (vm_ids)\n\
         | where ObjectName == 'LogicalDisk' and CounterName in ('Disk Transfers/sec', 'Disk Bytes/sec') and InstanceName contains ':'\n\
         | project TimeGenerated, _ResourceId, CounterName, InstanceName, value=CounterValue\n\
         | summarize value=avg(value) by _ResourceId, CounterName, InstanceName, bin(TimeGenerated, 1m)\n\
         | summarize percentiles(value, 50, 80, 90, 95, 99), max(value), samples=count() by _ResourceId, CounterName, InstanceName\n\
         | where samples > 1000\n\
         | project resource_id = _ResourceId, counter_name = CounterName, instance_name = InstanceName, percentile_50th = percentile_value_50, percentile_80th = percentile_value_80, percentile_90th = percentile_value_90, percentile_95th = percentile_value_95, percentile_99th = percentile_value_99, max = max_value, samples",
        ids = resource_ids.to_kql(),
    )
}
