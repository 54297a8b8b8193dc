//! In-memory scheduling state for a single [`BareMetalHost`], and the list of hosts a
//! `SipCluster` reconcile is currently working with.
//!
//! This is the Rust counterpart of the scheduler's `Machine`/`MachineList` pair: a `Machine`
//! wraps a host together with the role it has been (or is about to be) scheduled as, and
//! whatever network/BMC data has been extrapolated for it so far.

use std::{collections::BTreeMap, fmt};

use kube::ResourceExt;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use zeroize::Zeroizing;

use crate::bmh::BareMetalHost;

/// A BMC password, zeroized on drop so it doesn't linger in memory longer than needed.
pub type SecretString = Zeroizing<String>;

/// Which role in a `SipCluster` a [`Machine`] has been scheduled for.
///
/// Fixed to the two roles every `SipCluster` has, rather than keyed by an open-ended map, since
/// every sub-cluster this operator schedules has exactly a control-plane and a worker node set.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Role {
    ControlPlane,
    Worker,
}

impl Role {
    /// All roles a `SipCluster` schedules, in a stable order.
    pub const ALL: [Role; 2] = [Role::ControlPlane, Role::Worker];

    /// The value stored in a claimed host's [`crate::NODE_TYPE_LABEL`].
    pub fn label_value(&self) -> &'static str {
        match self {
            Role::ControlPlane => "control-plane",
            Role::Worker => "worker",
        }
    }

    /// Parses a [`Role::label_value`] back into a [`Role`].
    pub fn from_label_value(value: &str) -> Option<Role> {
        match value {
            "control-plane" => Some(Role::ControlPlane),
            "worker" => Some(Role::Worker),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_value())
    }
}

/// Where a [`Machine`] stands in the scheduling process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScheduleState {
    /// Newly selected by the scheduler this reconcile; not yet labeled.
    ToBeScheduled,
    /// Already carries this cluster's claim labels from a previous reconcile.
    Scheduled,
    /// Extrapolation failed for this host; it is excluded from this reconcile's commit.
    UnableToSchedule,
}

/// Network and BMC details extrapolated for a claimed host.
#[derive(Clone, Debug, Default)]
pub struct MachineData {
    /// IP address found on each service's configured network interface id.
    pub ip_on_interface: BTreeMap<String, String>,
    pub bmc_username: Option<String>,
    pub bmc_password: Option<SecretString>,
}

/// A `BareMetalHost` together with the role and schedule state this reconcile assigned it.
#[derive(Debug)]
pub struct Machine {
    pub host: BareMetalHost,
    pub role: Role,
    pub schedule_state: ScheduleState,
    pub data: MachineData,
}

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("BareMetalHost {host:?} has no networkData reference"))]
    MissingNetworkData { host: String },
}

impl Machine {
    /// Builds a [`Machine`], rejecting hosts that can never be extrapolated because they carry
    /// no `networkData` reference at all.
    pub fn new(host: BareMetalHost, role: Role, schedule_state: ScheduleState) -> Result<Self, Error> {
        if host.spec.network_data.is_none() {
            return MissingNetworkDataSnafu {
                host: host.name_any(),
            }
            .fail();
        }
        Ok(Self {
            host,
            role,
            schedule_state,
            data: MachineData::default(),
        })
    }

    pub fn name(&self) -> String {
        self.host.name_any()
    }
}

/// The set of machines a single reconcile is scheduling, keyed by host name.
#[derive(Debug, Default)]
pub struct MachineList {
    machines: BTreeMap<String, Machine>,
    /// How many machines have been accepted per role so far, including those already
    /// [`ScheduleState::Scheduled`] from a previous reconcile.
    ready_for_schedule_count: BTreeMap<Role, u16>,
}

impl MachineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, host_name: &str) -> bool {
        self.machines.contains_key(host_name)
    }

    pub fn get(&self, host_name: &str) -> Option<&Machine> {
        self.machines.get(host_name)
    }

    /// Inserts `machine`, incrementing its role's ready count.
    pub fn insert(&mut self, machine: Machine) {
        *self.ready_for_schedule_count.entry(machine.role).or_default() += 1;
        self.machines.insert(machine.name(), machine);
    }

    /// Marks `host_name` as [`ScheduleState::UnableToSchedule`], decrementing its role's ready
    /// count the same way a failed extrapolation does in the original scheduler.
    pub fn mark_unable_to_schedule(&mut self, host_name: &str) {
        if let Some(machine) = self.machines.get_mut(host_name) {
            if machine.schedule_state != ScheduleState::UnableToSchedule {
                machine.schedule_state = ScheduleState::UnableToSchedule;
                *self.ready_for_schedule_count.entry(machine.role).or_default() -= 1;
            }
        }
    }

    pub fn ready_for_schedule_count(&self, role: Role) -> u16 {
        self.ready_for_schedule_count.get(&role).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Machine> {
        self.machines.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Machine> {
        self.machines.values_mut()
    }

    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &Machine> {
        self.machines.values().filter(move |m| m.role == role)
    }

    /// Machines still carrying their claim labels at the end of this reconcile: every machine
    /// except those demoted to [`ScheduleState::UnableToSchedule`] during extrapolation.
    pub fn schedulable(&self) -> impl Iterator<Item = &Machine> {
        self.machines
            .values()
            .filter(|m| m.schedule_state != ScheduleState::UnableToSchedule)
    }

    pub fn into_values(self) -> impl Iterator<Item = Machine> {
        self.machines.into_values()
    }
}
