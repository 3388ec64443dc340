//! Netz-Builder-Orakel: berechnet Verbindungen, Ampelprogramme und Cluster-Daten.
//!
//! Der Editor kennt nur den Vertrag [`NetBuilder`]. [`DefaultNetBuilder`] ist
//! eine deterministische Referenz-Implementierung für Tests und Headless-Betrieb.

use glam::Vec2;

use crate::core::{
    Connection, Edge, ElementHandle, JunctionType, Lane, NetError, NetResult, Network,
    TlsProgram,
};

/// Anfrage an den Builder.
pub struct ComputeRequest<'a> {
    pub network: &'a Network,
    /// Junctions, deren Logik berechnet werden soll
    pub junctions: Vec<ElementHandle>,
    /// Topologie komplett neu aufbauen
    pub volatile: bool,
}

/// Junction-Daten einer neu aufgebauten Topologie.
#[derive(Debug, Clone, PartialEq)]
pub struct JunctionRecord {
    pub id: String,
    pub position: Vec2,
    pub junction_type: JunctionType,
}

/// Kanten-Daten einer neu aufgebauten Topologie; Endpunkte per ID.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRecord {
    pub id: String,
    pub from: String,
    pub to: String,
    pub inner_shape: Vec<Vec2>,
    pub speed: f32,
    pub priority: i32,
    pub edge_type: String,
    pub was_split: bool,
    pub lanes: Vec<Lane>,
}

/// Vom Builder gelieferte Topologie (nur bei volatiler Neuberechnung).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkTopology {
    pub junctions: Vec<JunctionRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl NetworkTopology {
    /// Exportiert Junctions und Kanten des Netzes in ID-Reihenfolge.
    pub fn from_network(net: &Network) -> NetResult<Self> {
        let junctions = net
            .junctions()
            .into_iter()
            .map(|h| {
                let j = net.junction(h)?;
                Ok(JunctionRecord {
                    id: j.id.clone(),
                    position: j.position,
                    junction_type: j.junction_type,
                })
            })
            .collect::<NetResult<Vec<_>>>()?;

        let edges = net
            .edges()
            .into_iter()
            .map(|h| {
                let e: &Edge = net.edge(h)?;
                let lanes = net
                    .lanes_of(h)
                    .into_iter()
                    .map(|l| net.lane(l).cloned())
                    .collect::<NetResult<Vec<_>>>()?;
                Ok(EdgeRecord {
                    id: e.id.clone(),
                    from: net.junction(e.from)?.id.clone(),
                    to: net.junction(e.to)?.id.clone(),
                    inner_shape: e.inner_shape.clone(),
                    speed: e.speed,
                    priority: e.priority,
                    edge_type: e.edge_type.clone(),
                    was_split: e.was_split,
                    lanes,
                })
            })
            .collect::<NetResult<Vec<_>>>()?;

        Ok(Self { junctions, edges })
    }
}

/// Ergebnis einer Berechnung.
#[derive(Debug, Clone, Default)]
pub struct ComputeOutput {
    /// Neue Verbindungen pro eingehender Kante
    pub connections: Vec<(ElementHandle, Vec<Connection>)>,
    pub tls_programs: Vec<TlsProgram>,
    pub topology: Option<NetworkTopology>,
}

/// Analyse-Ergebnis für eine Gruppe zusammenzuführender Junctions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterInfo {
    pub id: String,
    pub position: Vec2,
    pub has_tls: bool,
    pub junction_type: JunctionType,
}

/// Vertrag des externen Netz-Builders.
pub trait NetBuilder {
    /// Berechnet Verbindungen und Ampelprogramme für die angefragten Junctions.
    fn compute(&mut self, request: &ComputeRequest<'_>) -> anyhow::Result<ComputeOutput>;

    /// Bestimmt ID, Position und Typ eines Junction-Clusters.
    fn analyze_cluster(&self, net: &Network, junctions: &[ElementHandle]) -> NetResult<ClusterInfo>;
}

/// Deterministischer Builder: Spur i wird mit Spur min(i, n-1) jeder
/// ausgehenden Kante verbunden, Wendefahrten werden ausgelassen.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNetBuilder;

impl DefaultNetBuilder {
    fn connections_at(
        net: &Network,
        junction: ElementHandle,
    ) -> anyhow::Result<Vec<(ElementHandle, Vec<Connection>)>> {
        let outgoing = net.outgoing_edges(junction);
        let mut result = Vec::new();
        for incoming in net.incoming_edges(junction) {
            let source = net.edge(incoming)?.from;
            let lane_count = net.lanes_of(incoming).len();
            let mut connections = Vec::new();
            for &out in &outgoing {
                if net.edge(out)?.to == source {
                    continue;
                }
                let out_lanes = net.lanes_of(out).len();
                if out_lanes == 0 {
                    continue;
                }
                for from_lane in 0..lane_count {
                    connections.push(Connection {
                        from_lane,
                        to_edge: out,
                        to_lane: from_lane.min(out_lanes - 1),
                    });
                }
            }
            result.push((incoming, connections));
        }
        Ok(result)
    }
}

impl NetBuilder for DefaultNetBuilder {
    fn compute(&mut self, request: &ComputeRequest<'_>) -> anyhow::Result<ComputeOutput> {
        let net = request.network;
        let mut output = ComputeOutput::default();

        for &junction in &request.junctions {
            let connections = Self::connections_at(net, junction)?;
            let j = net.junction(junction)?;
            if j.junction_type.has_tls() {
                output.tls_programs.push(TlsProgram {
                    junction: j.id.clone(),
                    program_id: "0".to_string(),
                    link_count: connections.iter().map(|(_, c)| c.len()).sum(),
                });
            }
            output.connections.extend(connections);
        }

        if request.volatile {
            output.topology = Some(NetworkTopology::from_network(net)?);
        }
        Ok(output)
    }

    fn analyze_cluster(&self, net: &Network, junctions: &[ElementHandle]) -> NetResult<ClusterInfo> {
        if junctions.is_empty() {
            return Err(NetError::invalid("Leerer Junction-Cluster"));
        }
        let mut ids = Vec::with_capacity(junctions.len());
        let mut sum = Vec2::ZERO;
        let mut has_tls = false;
        for &h in junctions {
            let j = net.junction(h)?;
            ids.push(j.id.clone());
            sum += j.position;
            has_tls |= j.junction_type.has_tls();
        }
        ids.sort();

        Ok(ClusterInfo {
            id: format!("cluster_{}", ids.join("_")),
            position: sum / junctions.len() as f32,
            has_tls,
            junction_type: if has_tls {
                JunctionType::TrafficLight
            } else {
                JunctionType::Priority
            },
        })
    }
}
