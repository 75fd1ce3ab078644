//! Constants used throughout repl-topology.
//!
//! Centralizes resource names, export names, and the default policy values
//! that `[policy]` in the config file can override.

/// Configuration file name (topology.toml).
pub const CONFIG_FILE: &str = "topology.toml";

/// Environment variable that overrides the stack name.
pub const STACK_ENV: &str = "REPL_TOPOLOGY_STACK";

/// Toggle key for the database topology.
pub const CLUSTERS_TOGGLE: &str = "clusters.enabled";

/// Toggle key for the compute client.
pub const COMPUTE_TOGGLE: &str = "compute.enabled";

/// Logical name of the first replication cluster.
pub const CLUSTER_ONE: &str = "iup-replication-experiment-one";

/// Logical name of the second replication cluster.
pub const CLUSTER_TWO: &str = "iup-replication-experiment-two";

/// Logical name of the shared cluster parameter group.
pub const PARAMETER_GROUP: &str = "iup-replication-experiment";

/// Description attached to the parameter group.
pub const PARAMETER_GROUP_DESCRIPTION: &str = "Parameter group for IUP replication experiment";

/// Logical name of the compute client (key pair and instance).
pub const COMPUTE_CLIENT: &str = "iup-replication-client";

/// Cluster engine mode. Always a regular provisioned cluster, never serverless.
pub const ENGINE_MODE: &str = "provisioned";

/// Replacement for characters a provider rejects in resource names.
pub const SAFE_REPLACEMENT: char = '-';

/// Marker printed in place of secret values.
pub const REDACTED: &str = "[secret]";

/// Upper bounds for numeric policy values.
pub mod limits {
    /// Aurora allows at most 15 replicas per cluster.
    pub const MAX_REPLICAS_PER_CLUSTER: usize = 15;
    /// Longest master password the engine accepts.
    pub const MAX_SECRET_LENGTH: usize = 128;
}

/// Default policy values.
pub mod defaults {
    pub const FAMILY: &str = "aurora-postgresql12";
    pub const ENGINE: &str = "aurora-postgresql";
    pub const ENGINE_VERSION: &str = "12.12";
    pub const INSTANCE_CLASS: &str = "db.t3.medium";
    pub const MASTER_USERNAME: &str = "IupTestAdmin";
    pub const REPLICAS_PER_CLUSTER: usize = 2;
    pub const SECRET_LENGTH: usize = 32;
    pub const SECRET_SPECIAL: bool = false;
    pub const AMI: &str = "ami-0c1bc246476a5572b";
    pub const INSTANCE_TYPE: &str = "t3.micro";

    /// Engine parameters required for pglogical replication, in apply order.
    ///
    /// `max_replication_slots` must exceed the expected subscription count,
    /// `max_worker_processes` tracks the cpu count, and `max_wal_senders`
    /// must be at least `1 + 2 * subscribers`.
    pub const REPLICATION_PARAMETERS: &[(&str, &str)] = &[
        ("pglogical.conflict_log_level", "error"),
        ("shared_preload_libraries", "pglogical"),
        ("rds.logical_replication", "1"),
        ("max_replication_slots", "10"),
        ("max_worker_processes", "8"),
        ("max_wal_senders", "10"),
    ];
}

/// Names of exported outputs consumed by test harnesses.
pub mod outputs {
    pub const CLUSTER_ONE: &str = "cluster_one";
    pub const CLUSTER_TWO: &str = "cluster_two";
    pub const INSTANCES_ONE: &str = "instances_one";
    pub const INSTANCES_TWO: &str = "instances_two";
    pub const CLUSTER_PARAMETER_GROUP: &str = "cluster_parameter_group";
    pub const MASTER_PASSWORD: &str = "master_password";
    pub const COMPUTE_KEY_PAIR: &str = "compute_key_pair";
    pub const COMPUTE_INSTANCE: &str = "compute_instance";

    /// Every output the database topology must export.
    pub const TOPOLOGY: &[&str] = &[
        CLUSTER_ONE,
        CLUSTER_TWO,
        INSTANCES_ONE,
        INSTANCES_TWO,
        CLUSTER_PARAMETER_GROUP,
        MASTER_PASSWORD,
    ];

    /// Every output the compute client must export.
    pub const COMPUTE: &[&str] = &[COMPUTE_KEY_PAIR, COMPUTE_INSTANCE];
}
