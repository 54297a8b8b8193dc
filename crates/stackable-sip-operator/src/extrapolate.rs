//! Component D: fills in the network and BMC details a claimed host's services need.
//!
//! Grounded on `MachineList.ExtrapolateServiceAddresses`/`ExtrapolateBMCAuth` in the original
//! scheduler: both read a `Secret` referenced from the host, parse it, and on any failure demote
//! the host to [`ScheduleState::UnableToSchedule`] instead of failing the whole reconcile,
//! aggregating every failure seen along the way into one reported error.

use std::collections::BTreeSet;

use k8s_openapi::api::core::v1::Secret;
use kube::ResourceExt;
use serde::Deserialize;
use snafu::{OptionExt, ResultExt, Snafu};

use stackable_operator::client::Client;

use crate::machine::{MachineList, Role, ScheduleState};

#[derive(Debug, Snafu)]
pub enum HostError {
    #[snafu(display("BareMetalHost {host:?} has no networkData secret reference"))]
    MissingNetworkDataRef { host: String },

    #[snafu(display("failed to fetch network-data Secret {secret:?} for BareMetalHost {host:?}"))]
    FetchNetworkData {
        source: stackable_operator::client::Error,
        host: String,
        secret: String,
    },

    #[snafu(display("network-data Secret {secret:?} for BareMetalHost {host:?} has no networkData key"))]
    MissingNetworkDataKey { host: String, secret: String },

    #[snafu(display("network-data Secret {secret:?} for BareMetalHost {host:?} is neither valid JSON nor YAML"))]
    MalformedNetworkData { host: String, secret: String },

    #[snafu(display("BareMetalHost {host:?}'s network-data has no address for interface {interface:?}"))]
    MissingInterfaceAddress { host: String, interface: String },

    #[snafu(display("failed to fetch BMC credentials Secret {secret:?} for BareMetalHost {host:?}"))]
    FetchBmcCredentials {
        source: stackable_operator::client::Error,
        host: String,
        secret: String,
    },

    #[snafu(display("BMC credentials Secret {secret:?} for BareMetalHost {host:?} is missing the {key:?} key"))]
    MalformedBmcCredentials { host: String, secret: String, key: &'static str },
}

#[derive(Debug, Snafu)]
#[snafu(display("failed to extrapolate data for {} BareMetalHost(s)", errors.len()))]
pub struct Error {
    errors: Vec<HostError>,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Cloud-init style network configuration, as stored under a network-data `Secret`'s
/// `networkData` key. Only the `networks` entries this operator cares about are modeled.
#[derive(Debug, Deserialize)]
struct NetworkData {
    #[serde(default)]
    networks: Vec<NetworkEntry>,
}

#[derive(Debug, Deserialize)]
struct NetworkEntry {
    id: String,
    ip_address: Option<String>,
}

fn parse_network_data(bytes: &[u8]) -> Option<NetworkData> {
    serde_json::from_slice(bytes).ok().or_else(|| {
        let text = std::str::from_utf8(bytes).ok()?;
        serde_yaml::from_str(text).ok()
    })
}

/// Fetches and parses each machine's network-data secret, recording the address found for every
/// interface id in `required_interfaces`. A machine that already has an address on file from a
/// prior pass is left alone. Machines whose network-data can't be read or parsed, or that are
/// missing an address for a required interface, are demoted to [`ScheduleState::UnableToSchedule`]
/// and excluded from the rest of this reconcile.
pub async fn extrapolate_service_addresses(
    client: &Client,
    machines: &mut MachineList,
    required_interfaces: &BTreeSet<&str>,
) -> Result<()> {
    let mut errors = Vec::new();
    let mut failed = Vec::new();

    for machine in machines.iter_mut() {
        if machine.schedule_state == ScheduleState::UnableToSchedule {
            continue;
        }
        if !machine.data.ip_on_interface.is_empty() {
            continue;
        }
        if let Err(error) = extrapolate_one_host(client, machine, required_interfaces).await {
            errors.push(error);
            failed.push(machine.name());
        }
    }

    for host_name in failed {
        machines.mark_unable_to_schedule(&host_name);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error { errors })
    }
}

async fn extrapolate_one_host(
    client: &Client,
    machine: &mut crate::machine::Machine,
    required_interfaces: &BTreeSet<&str>,
) -> std::result::Result<(), HostError> {
    let host_name = machine.name();
    let secret_ref = machine
        .host
        .spec
        .network_data
        .as_ref()
        .context(MissingNetworkDataRefSnafu { host: host_name.clone() })?;
    let secret_namespace = secret_ref
        .namespace
        .clone()
        .or_else(|| machine.host.namespace())
        .unwrap_or_default();
    let secret_name = secret_ref.name.clone().unwrap_or_default();

    let secret: Secret = client
        .get(&secret_name, &secret_namespace)
        .await
        .context(FetchNetworkDataSnafu {
            host: host_name.clone(),
            secret: secret_name.clone(),
        })?;

    apply_network_data(machine, &secret, &secret_name, required_interfaces)
}

/// Parses `secret`'s `networkData` key and records the address for every interface id in
/// `required_interfaces` onto `machine`. Split out from [`extrapolate_one_host`] so the
/// demote-worthy parsing/lookup logic can be exercised directly against an in-memory `Secret`
/// fixture, without a `Client` to fetch one from.
fn apply_network_data(
    machine: &mut crate::machine::Machine,
    secret: &Secret,
    secret_name: &str,
    required_interfaces: &BTreeSet<&str>,
) -> std::result::Result<(), HostError> {
    let host_name = machine.name();

    let raw = secret
        .data
        .as_ref()
        .and_then(|data| data.get("networkData"))
        .context(MissingNetworkDataKeySnafu {
            host: host_name.clone(),
            secret: secret_name.to_string(),
        })?;

    let network_data = parse_network_data(&raw.0).context(MalformedNetworkDataSnafu {
        host: host_name.clone(),
        secret: secret_name.to_string(),
    })?;

    for interface in required_interfaces {
        let address = network_data
            .networks
            .iter()
            .filter(|net| &net.id == interface)
            .last()
            .and_then(|net| net.ip_address.clone())
            .context(MissingInterfaceAddressSnafu {
                host: host_name.clone(),
                interface: interface.to_string(),
            })?;
        machine.data.ip_on_interface.insert(interface.to_string(), address);
    }

    Ok(())
}

/// Fetches and parses each machine's BMC credentials secret. Machines whose credentials secret
/// can't be read or is missing a required key are demoted to [`ScheduleState::UnableToSchedule`].
pub async fn extrapolate_bmc_auth(client: &Client, machines: &mut MachineList) -> Result<()> {
    let mut errors = Vec::new();
    let mut failed = Vec::new();

    for machine in machines.iter_mut() {
        if machine.schedule_state == ScheduleState::UnableToSchedule {
            continue;
        }
        if let Err(error) = extrapolate_one_bmc(client, machine).await {
            errors.push(error);
            failed.push(machine.name());
        }
    }

    for host_name in failed {
        machines.mark_unable_to_schedule(&host_name);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error { errors })
    }
}

async fn extrapolate_one_bmc(
    client: &Client,
    machine: &mut crate::machine::Machine,
) -> std::result::Result<(), HostError> {
    let host_name = machine.name();
    let namespace = machine.host.namespace().unwrap_or_default();
    let secret_name = machine.host.spec.bmc.credentials_name.clone();

    let secret: Secret = client
        .get(&secret_name, &namespace)
        .await
        .context(FetchBmcCredentialsSnafu {
            host: host_name.clone(),
            secret: secret_name.clone(),
        })?;

    apply_bmc_auth(machine, &secret, &secret_name)
}

/// Reads the `username`/`password` keys off `secret` and records them onto `machine`. Split out
/// from [`extrapolate_one_bmc`] for the same reason as [`apply_network_data`]: testable against an
/// in-memory `Secret` fixture with no `Client` involved.
fn apply_bmc_auth(machine: &mut crate::machine::Machine, secret: &Secret, secret_name: &str) -> std::result::Result<(), HostError> {
    let host_name = machine.name();

    let username = secret_string(secret, "username").context(MalformedBmcCredentialsSnafu {
        host: host_name.clone(),
        secret: secret_name.to_string(),
        key: "username",
    })?;
    let password = secret_string(secret, "password").context(MalformedBmcCredentialsSnafu {
        host: host_name.clone(),
        secret: secret_name.to_string(),
        key: "password",
    })?;

    machine.data.bmc_username = Some(username);
    machine.data.bmc_password = Some(password.into());

    Ok(())
}

fn secret_string(secret: &Secret, key: &str) -> Option<String> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .and_then(|value| String::from_utf8(value.0.clone()).ok())
}

/// A deficit of ready machines in `role` caused by demoted machines, useful for status reporting.
pub fn missing_for_role(machines: &MachineList, role: Role, required: u16) -> u16 {
    required.saturating_sub(machines.ready_for_schedule_count(role))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::machine::Machine;

    #[test]
    fn parses_json_network_data() {
        let json = br#"{"networks":[{"id":"oam-ipv4","ip_address":"10.0.0.5"}]}"#;
        let parsed = parse_network_data(json).unwrap();
        assert_eq!(parsed.networks[0].id, "oam-ipv4");
        assert_eq!(parsed.networks[0].ip_address.as_deref(), Some("10.0.0.5"));
    }

    #[test]
    fn falls_back_to_yaml_network_data() {
        let yaml = b"networks:\n  - id: oam-ipv4\n    ip_address: 10.0.0.5\n";
        let parsed = parse_network_data(yaml).unwrap();
        assert_eq!(parsed.networks[0].id, "oam-ipv4");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_network_data(b"not valid json or yaml: [").is_none());
    }

    fn host(name: &str) -> crate::bmh::BareMetalHost {
        crate::bmh::BareMetalHost {
            metadata: kube::core::ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("default".to_string()),
                ..Default::default()
            },
            spec: crate::bmh::BareMetalHostSpec {
                bmc: crate::bmh::Bmc {
                    address: "redfish://bmc".to_string(),
                    credentials_name: "bmc-creds".to_string(),
                },
                network_data: Some(k8s_openapi::api::core::v1::SecretReference {
                    name: Some(format!("{name}-net-data")),
                    namespace: Some("default".to_string()),
                }),
            },
        }
    }

    fn network_data_secret(json: &[u8]) -> Secret {
        Secret {
            data: Some(BTreeMap::from([(
                "networkData".to_string(),
                k8s_openapi::ByteString(json.to_vec()),
            )])),
            ..Default::default()
        }
    }

    #[test]
    fn apply_network_data_populates_every_required_interface() {
        let mut machine = Machine::new(host("cp-0"), Role::ControlPlane, ScheduleState::ToBeScheduled).unwrap();
        let secret = network_data_secret(br#"{"networks":[{"id":"oam-ipv4","ip_address":"10.0.0.5"}]}"#);
        let required = BTreeSet::from(["oam-ipv4"]);

        apply_network_data(&mut machine, &secret, "cp-0-net-data", &required).unwrap();

        assert_eq!(machine.data.ip_on_interface.get("oam-ipv4"), Some(&"10.0.0.5".to_string()));
    }

    #[test]
    fn apply_network_data_rejects_a_secret_with_the_wrong_key() {
        let mut machine = Machine::new(host("cp-0"), Role::ControlPlane, ScheduleState::ToBeScheduled).unwrap();
        let secret = Secret {
            data: Some(BTreeMap::from([(
                "foo".to_string(),
                k8s_openapi::ByteString(b"irrelevant".to_vec()),
            )])),
            ..Default::default()
        };
        let required = BTreeSet::from(["oam-ipv4"]);

        let err = apply_network_data(&mut machine, &secret, "cp-0-net-data", &required).unwrap_err();
        assert!(matches!(err, HostError::MissingNetworkDataKey { .. }));
    }

    #[test]
    fn apply_bmc_auth_rejects_a_secret_missing_the_password_key() {
        let mut machine = Machine::new(host("cp-0"), Role::ControlPlane, ScheduleState::ToBeScheduled).unwrap();
        let secret = Secret {
            data: Some(BTreeMap::from([(
                "username".to_string(),
                k8s_openapi::ByteString(b"admin".to_vec()),
            )])),
            ..Default::default()
        };

        let err = apply_bmc_auth(&mut machine, &secret, "bmc-creds").unwrap_err();
        assert!(matches!(err, HostError::MalformedBmcCredentials { key: "password", .. }));
    }

    /// Scenario 4: a pool of 5 hosts, one with malformed network-data. The scheduler initially
    /// picks it among the first 3 (name order); extrapolation flags it `UnableToSchedule`; a
    /// second scheduling pass replaces it from the remaining pool, so the final claim set is 3
    /// good hosts and the bad one never gets labeled.
    #[test]
    fn replacement_on_bad_network_data() {
        use crate::{
            crd::v1alpha1::{NodeCount, NodeSet, Nodes},
            scheduler,
        };

        let candidates = vec![host("cp-0"), host("cp-1"), host("cp-2"), host("cp-3"), host("cp-4")];
        let nodes = Nodes {
            control_plane: NodeSet {
                selector: Default::default(),
                topology_key: None,
                count: NodeCount { active: 3, standby: 0 },
            },
            worker: NodeSet {
                selector: Default::default(),
                topology_key: None,
                count: NodeCount { active: 0, standby: 0 },
            },
        };
        let required = BTreeSet::from(["oam-ipv4"]);

        let good_secret = network_data_secret(br#"{"networks":[{"id":"oam-ipv4","ip_address":"10.0.0.1"}]}"#);
        let bad_secret = Secret {
            data: Some(BTreeMap::from([(
                "foo".to_string(),
                k8s_openapi::ByteString(b"not networkData".to_vec()),
            )])),
            ..Default::default()
        };

        let mut machines = MachineList::new();
        scheduler::schedule(&mut machines, &nodes, &candidates).unwrap();
        assert_eq!(machines.by_role(Role::ControlPlane).count(), 3);

        // First pass: cp-0, cp-1, cp-2 were picked; cp-2's secret is malformed.
        let mut failed = Vec::new();
        for machine in machines.iter_mut() {
            let secret = if machine.name() == "cp-2" { &bad_secret } else { &good_secret };
            if apply_network_data(machine, secret, "net-data", &required).is_err() {
                failed.push(machine.name());
            }
        }
        for name in &failed {
            machines.mark_unable_to_schedule(name);
        }
        assert_eq!(failed, vec!["cp-2".to_string()]);

        // Second pass: the scheduler fills cp's deficit of 1 from the still-unclaimed pool.
        scheduler::schedule(&mut machines, &nodes, &candidates).unwrap();

        let claimed: Vec<_> = machines.schedulable().map(|m| m.name()).collect();
        assert_eq!(claimed, vec!["cp-0".to_string(), "cp-1".to_string(), "cp-3".to_string()]);
        assert!(!claimed.contains(&"cp-2".to_string()));
    }
}
