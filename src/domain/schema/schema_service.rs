use serde::Serialize;

use crate::core::client::mackerel_api_trait::MackerelApi;
use crate::domain::query::query_translator::METRIC_NAME_MARKER;
use crate::errors::DiscoveryError;

/// One browsable metric source and the query lines it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaEntry {
    pub name: String,
    pub columns: Vec<String>,
}

/// Walk services (and hosts when enabled) and list every metric path.
/// The first failing call aborts the whole discovery.
pub async fn discover<C>(client: &C, discover_hosts: bool) -> Result<Vec<SchemaEntry>, DiscoveryError>
where
    C: MackerelApi + ?Sized,
{
    let mut catalog = Vec::new();

    for service in client.list_services().await? {
        let names = client.service_metric_names(&service.name).await?;
        let segment = urlencoding::encode(&service.name).into_owned();
        catalog.push(SchemaEntry {
            columns: names
                .iter()
                .map(|metric| format!("/services/{}/{}{}", segment, METRIC_NAME_MARKER, metric))
                .collect(),
            name: service.name,
        });
    }

    if discover_hosts {
        for host in client.list_hosts().await? {
            let names = client.host_metric_names(&host.id).await?;
            let segment = urlencoding::encode(&host.id);
            catalog.push(SchemaEntry {
                name: host.display_name().to_string(),
                columns: names
                    .iter()
                    .map(|metric| format!("/hosts/{}/{}{}", segment, METRIC_NAME_MARKER, metric))
                    .collect(),
            });
        }
    }

    Ok(catalog)
}
