use serde::{Deserialize, Serialize};

/// Cluster colour reported by `GET /_cluster/health`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterStatus {
    Green,
    Yellow,
    Red,
}

impl ClusterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterStatus::Green => "green",
            ClusterStatus::Yellow => "yellow",
            ClusterStatus::Red => "red",
        }
    }

    /// A red cluster has unassigned primary shards and cannot be trusted with writes.
    pub fn is_serving(&self) -> bool {
        !matches!(self, ClusterStatus::Red)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterHealth {
    pub status: ClusterStatus,
    #[serde(default)]
    pub cluster_name: Option<String>,
    #[serde(default)]
    pub number_of_nodes: Option<u32>,
    #[serde(default)]
    pub active_shards: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cluster_health_payload() {
        let payload = serde_json::json!({
            "cluster_name": "docs",
            "status": "yellow",
            "timed_out": false,
            "number_of_nodes": 1,
            "active_shards": 4,
            "relocating_shards": 0
        });

        let health: ClusterHealth = serde_json::from_value(payload).unwrap();
        assert_eq!(health.status, ClusterStatus::Yellow);
        assert_eq!(health.number_of_nodes, Some(1));
        assert_eq!(health.active_shards, Some(4));
        assert!(health.status.is_serving());
    }

    #[test]
    fn red_cluster_is_not_serving() {
        assert!(!ClusterStatus::Red.is_serving());
        assert_eq!(ClusterStatus::Red.as_str(), "red");
    }
}
