//! Container-backed deployment fixtures.
//!
//! Fixtures start real MongoDB containers and yield a
//! [`ConnectionDescriptor`] for them. A fixture owns its containers for its
//! whole lifetime; dropping it (normally at the end of the test suite)
//! tears the deployment down.
//!
//! Readiness never relies on container log waits (they vary across image
//! versions); every fixture runs explicit post-start checks instead: TCP
//! reachability per node, then a server command loop (`isMaster` until the
//! set elects a primary, or `ping` for a standalone node), each bounded by
//! the configured readiness timeout.

use std::time::{Duration, Instant};

use mongodb::Client;
use mongodb::bson::doc;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use tokio::net::TcpStream;
use tokio::time::sleep;
use uuid::Uuid;

use crate::config::{ReplicaSetConfig, StandaloneConfig};
use crate::descriptor::ConnectionDescriptor;
use crate::error::ProvisionError;
use crate::target::{DeploymentTarget, NodeAddress};

const MONGO_PORT: u16 = 27017;
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A provisioned replica set.
///
/// Holds the member containers alive for as long as the fixture exists.
pub struct ReplicaSetFixture {
    target: DeploymentTarget,
    descriptor: ConnectionDescriptor,
    /// Kept alive for the fixture lifetime; dropped with the fixture.
    _nodes: Vec<ContainerAsync<GenericImage>>,
}

impl ReplicaSetFixture {
    /// Provisions a replica set per `config`.
    ///
    /// Starts the member containers on a dedicated network, initiates the
    /// set through the first member, and waits until the set reports a
    /// primary. The wait is bounded by `config.readiness_timeout_secs`;
    /// expiry is fatal.
    pub async fn provision(config: &ReplicaSetConfig) -> Result<Self, ProvisionError> {
        if config.members == 0 {
            return Err(ProvisionError::InvalidConfig {
                message: "a replica set needs at least one member".to_string(),
            });
        }

        let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
        let suffix = short_suffix();
        let network = format!("mongotx-{suffix}");
        let readiness = Duration::from_secs(config.readiness_timeout_secs);

        // Container names double as DNS names on the dedicated network, so
        // they also serve as the member hosts in the set configuration.
        let mut nodes = Vec::with_capacity(config.members as usize);
        let mut member_names = Vec::with_capacity(config.members as usize);
        for ordinal in 1..=config.members {
            let name = format!("mongotx-{suffix}-n{ordinal}");
            tracing::info!("starting replica set member '{}'", name);

            let image = GenericImage::new(config.image.clone(), config.tag.clone())
                .with_exposed_port(MONGO_PORT.tcp())
                // Explicit readiness checks run after start; log waits are
                // unreliable across image versions.
                .with_wait_for(WaitFor::seconds(1))
                .with_cmd(vec![
                    "--replSet".to_string(),
                    config.set_name.clone(),
                    "--bind_ip_all".to_string(),
                ])
                .with_network(&network)
                .with_container_name(&name)
                .with_label("github.run_id", &run_id)
                .with_startup_timeout(Duration::from_secs(config.startup_timeout_secs));

            let container =
                image
                    .start()
                    .await
                    .map_err(|source| ProvisionError::ContainerStart {
                        name: name.clone(),
                        source,
                    })?;

            nodes.push(container);
            member_names.push(name);
        }

        let mut addresses = Vec::with_capacity(nodes.len());
        for (container, name) in nodes.iter().zip(&member_names) {
            let port = container
                .get_host_port_ipv4(MONGO_PORT)
                .await
                .map_err(|source| ProvisionError::PortMapping {
                    name: name.clone(),
                    source,
                })?;
            let address = NodeAddress::new("127.0.0.1", port);
            wait_for_endpoint(&address, readiness).await?;
            addresses.push(address);
        }

        initiate_replica_set(&addresses[0], &member_names, &config.set_name).await?;
        wait_for_primary(&addresses[0], &config.set_name, readiness).await?;

        let target = DeploymentTarget::ReplicaSet {
            set_name: config.set_name.clone(),
            nodes: addresses,
        };
        let descriptor = target.descriptor(&config.database);
        tracing::debug!("url: {}", descriptor.url());

        Ok(Self {
            target,
            descriptor,
            _nodes: nodes,
        })
    }

    /// The provisioned deployment target.
    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    /// The connection descriptor for this deployment.
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }
}

/// A provisioned standalone node.
pub struct StandaloneFixture {
    target: DeploymentTarget,
    descriptor: ConnectionDescriptor,
    /// Kept alive for the fixture lifetime; dropped with the fixture.
    _node: ContainerAsync<GenericImage>,
}

impl StandaloneFixture {
    /// Provisions a single replication-free node per `config`.
    ///
    /// No initiation step is required; readiness is TCP reachability plus a
    /// successful `ping`, bounded by `config.readiness_timeout_secs`.
    pub async fn provision(config: &StandaloneConfig) -> Result<Self, ProvisionError> {
        let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_default();
        let name = format!("mongotx-{}-standalone", short_suffix());
        let readiness = Duration::from_secs(config.readiness_timeout_secs);
        tracing::info!("starting standalone node '{}'", name);

        let image = GenericImage::new(config.image.clone(), config.tag.clone())
            .with_exposed_port(MONGO_PORT.tcp())
            .with_wait_for(WaitFor::seconds(1))
            .with_container_name(&name)
            .with_label("github.run_id", &run_id)
            .with_startup_timeout(Duration::from_secs(config.startup_timeout_secs));

        let container = image
            .start()
            .await
            .map_err(|source| ProvisionError::ContainerStart {
                name: name.clone(),
                source,
            })?;

        let port = container
            .get_host_port_ipv4(MONGO_PORT)
            .await
            .map_err(|source| ProvisionError::PortMapping { name, source })?;

        let address = NodeAddress::new("localhost", port);
        wait_for_endpoint(&address, readiness).await?;
        wait_for_ping(&address, readiness).await?;

        let target = DeploymentTarget::Standalone { node: address };
        let descriptor = target.descriptor(&config.database);
        tracing::debug!("url: {}", descriptor.url());

        Ok(Self {
            target,
            descriptor,
            _node: container,
        })
    }

    /// The provisioned deployment target.
    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    /// The connection descriptor for this deployment.
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }
}

/// Opens a direct (single-node) client against one address.
///
/// Short selection/connect timeouts keep the readiness polls snappy.
async fn direct_client(address: &NodeAddress) -> Result<Client, ProvisionError> {
    let url = format!(
        "mongodb://{address}/?directConnection=true&serverSelectionTimeoutMS=2000&connectTimeoutMS=2000"
    );
    Client::with_uri_str(&url)
        .await
        .map_err(|source| ProvisionError::Client {
            address: address.to_string(),
            source,
        })
}

/// Issues `replSetInitiate` through the first member.
async fn initiate_replica_set(
    seed: &NodeAddress,
    member_names: &[String],
    set_name: &str,
) -> Result<(), ProvisionError> {
    let members: Vec<_> = member_names
        .iter()
        .enumerate()
        .map(|(idx, name)| doc! { "_id": idx as i32, "host": format!("{}:{}", name, MONGO_PORT) })
        .collect();

    tracing::info!("initiating replica set '{}' via {}", set_name, seed);
    let client = direct_client(seed).await?;
    client
        .database("admin")
        .run_command(doc! { "replSetInitiate": { "_id": set_name, "members": members } })
        .await
        .map_err(ProvisionError::Initiate)?;

    Ok(())
}

/// Polls `isMaster` against one member until the set reports a primary.
async fn wait_for_primary(
    seed: &NodeAddress,
    set_name: &str,
    timeout: Duration,
) -> Result<(), ProvisionError> {
    let client = direct_client(seed).await?;
    let admin = client.database("admin");
    let deadline = Instant::now() + timeout;

    loop {
        match admin.run_command(doc! { "isMaster": 1 }).await {
            Ok(reply) if reply.get_bool("ismaster").unwrap_or(false) => {
                tracing::info!("replica set '{}' elected a primary at {}", set_name, seed);
                return Ok(());
            }
            _ if Instant::now() < deadline => sleep(POLL_INTERVAL).await,
            _ => {
                return Err(ProvisionError::PrimaryTimeout {
                    set_name: set_name.to_string(),
                    timeout,
                });
            }
        }
    }
}

/// Polls `ping` against one node until it answers.
async fn wait_for_ping(address: &NodeAddress, timeout: Duration) -> Result<(), ProvisionError> {
    let client = direct_client(address).await?;
    let admin = client.database("admin");
    let deadline = Instant::now() + timeout;

    loop {
        match admin.run_command(doc! { "ping": 1 }).await {
            Ok(_) => return Ok(()),
            Err(_) if Instant::now() < deadline => sleep(POLL_INTERVAL).await,
            Err(_) => {
                return Err(ProvisionError::Unreachable {
                    address: address.to_string(),
                    timeout,
                });
            }
        }
    }
}

/// Waits until a node's mapped host port accepts TCP connections.
async fn wait_for_endpoint(address: &NodeAddress, timeout: Duration) -> Result<(), ProvisionError> {
    let deadline = Instant::now() + timeout;

    loop {
        match TcpStream::connect((address.host.as_str(), address.port)).await {
            Ok(_) => return Ok(()),
            Err(_) if Instant::now() < deadline => sleep(POLL_INTERVAL).await,
            Err(_) => {
                return Err(ProvisionError::Unreachable {
                    address: address.to_string(),
                    timeout,
                });
            }
        }
    }
}

fn short_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}
