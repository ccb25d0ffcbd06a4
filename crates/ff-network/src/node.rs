//! Airflow node state and the name-interning node store.

use crate::error::{NetworkError, NetworkResult};
use ff_core::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// State record for one air node.
///
/// Scalar air properties plus the flow-request bookkeeping fields the loop
/// components negotiate through. Plain SI f64 fields with unit suffixes;
/// temperatures are dry-bulb in °C.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirNode {
    pub name: String,
    /// Current mass flow through the node [kg/s]
    pub mass_flow_kg_s: f64,
    /// Dry-bulb temperature [°C]
    pub t_c: f64,
    /// Humidity ratio [kg water / kg dry air]
    pub hum_rat: f64,
    /// Specific enthalpy [J/kg]
    pub h_j_per_kg: f64,
    /// Vapor quality (pass-through scalar, unused by dry components)
    pub quality: f64,
    /// Static pressure [Pa] (pass-through scalar)
    pub p_pa: f64,
    /// Hard design maximum mass flow [kg/s]
    pub mass_flow_max_kg_s: f64,
    /// Hard design minimum mass flow [kg/s]
    pub mass_flow_min_kg_s: f64,
    /// Step-wise available maximum mass flow [kg/s]
    pub mass_flow_max_avail_kg_s: f64,
    /// Step-wise available minimum mass flow [kg/s]
    pub mass_flow_min_avail_kg_s: f64,
    /// CO₂ concentration [ppm], if tracked upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_ppm: Option<f64>,
    /// Generic contaminant concentration, if tracked upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_contam: Option<f64>,
}

impl AirNode {
    fn new(name: String) -> Self {
        Self {
            name,
            mass_flow_kg_s: 0.0,
            t_c: 20.0,
            hum_rat: 0.0,
            h_j_per_kg: 0.0,
            quality: 0.0,
            p_pa: 101_325.0,
            mass_flow_max_kg_s: 0.0,
            mass_flow_min_kg_s: 0.0,
            mass_flow_max_avail_kg_s: 0.0,
            mass_flow_min_avail_kg_s: 0.0,
            co2_ppm: None,
            generic_contam: None,
        }
    }
}

/// Store of air nodes, interned by name.
///
/// Configuration references nodes by name; the first reference creates the
/// node, later references resolve to the same id.
#[derive(Debug, Default)]
pub struct NodeStore {
    nodes: Vec<AirNode>,
    by_name: HashMap<String, NodeId>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a node name to its id, creating the node on first use.
    pub fn intern(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(AirNode::new(name.to_string()));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up an existing node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Read access to a node.
    pub fn node(&self, id: NodeId) -> NetworkResult<&AirNode> {
        let index = id.index() as usize;
        self.nodes.get(index).ok_or(NetworkError::UnknownNode {
            index,
            len: self.nodes.len(),
        })
    }

    /// Write access to a node.
    pub fn node_mut(&mut self, id: NodeId) -> NetworkResult<&mut AirNode> {
        let index = id.index() as usize;
        let len = self.nodes.len();
        self.nodes
            .get_mut(index)
            .ok_or(NetworkError::UnknownNode { index, len })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
