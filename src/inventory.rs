use anyhow::Result;
use aws_sdk_ec2::types::Filter;
use aws_sdk_ec2::Client as Ec2Client;
use std::collections::HashMap;

/// Display name for instances without a Name tag.
pub const UNNAMED: &str = "Unnamed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub id: String,
    pub name: String,
}

/// Builds the display catalog from raw (id, optional name) records.
///
/// Duplicate ids collapse to the last record seen. The result is sorted
/// by name, ties broken by id, so the menu order is deterministic.
pub fn build_catalog<I>(records: I) -> Vec<Instance>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let mut by_id: HashMap<String, String> = HashMap::new();
    for (id, name) in records {
        by_id.insert(id, name.unwrap_or_else(|| UNNAMED.to_string()));
    }

    let mut catalog: Vec<Instance> = by_id
        .into_iter()
        .map(|(id, name)| Instance { id, name })
        .collect();
    catalog.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    catalog
}

/// Lists running instances in the client's region with their Name tag.
pub async fn list_running_instances(ec2_client: &Ec2Client) -> Result<Vec<Instance>> {
    let state_filter = Filter::builder()
        .name("instance-state-name")
        .values("running")
        .build();

    let response = ec2_client
        .describe_instances()
        .filters(state_filter)
        .send()
        .await?;

    let mut records = Vec::new();
    for reservation in response.reservations() {
        for instance in reservation.instances() {
            let Some(id) = instance.instance_id() else {
                continue;
            };
            let name = instance
                .tags()
                .iter()
                .find(|tag| tag.key() == Some("Name"))
                .and_then(|tag| tag.value())
                .map(str::to_string);
            records.push((id.to_string(), name));
        }
    }

    Ok(build_catalog(records))
}
