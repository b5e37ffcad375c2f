//! Placement constraint translation

use crate::compose::config::PlacementConfig;
use crate::model::Placement;

/// Node selector key for `node.hostname`
pub const HOSTNAME_KEY: &str = "kubernetes.io/hostname";
/// Node selector key for `engine.labels.operatingsystem`
pub const OS_KEY: &str = "beta.kubernetes.io/os";

const NODE_LABEL_PREFIX: &str = "node.labels.";

const UNSUPPORTED: &str = "constraint in placement is not supported, only 'node.hostname', \
     'engine.labels.operatingsystem' and 'node.labels.xxx' (ex: node.labels.something == anything) \
     are supported";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Equal,
    NotEqual,
}

impl Operator {
    fn as_str(self) -> &'static str {
        match self {
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
        }
    }
}

/// Translate swarm placement constraints into node selector constraints
///
/// Unrecognized or malformed expressions are skipped with a warning.
pub fn translate_placement(placement: &PlacementConfig) -> Placement {
    let mut result = Placement::default();

    for expression in &placement.constraints {
        let operator = if expression.contains(Operator::NotEqual.as_str()) {
            Operator::NotEqual
        } else {
            Operator::Equal
        };

        let Some((lhs, rhs)) = expression.split_once(operator.as_str()) else {
            tracing::warn!("{:?}: {}", expression.trim(), UNSUPPORTED);
            continue;
        };

        let Some(key) = node_selector_key(lhs.trim()) else {
            tracing::warn!("{:?}: {}", lhs.trim(), UNSUPPORTED);
            continue;
        };

        let value = rhs.trim().to_string();
        match operator {
            Operator::Equal => result.positive_constraints.insert(key, value),
            Operator::NotEqual => result.negative_constraints.insert(key, value),
        };
    }

    result
}

fn node_selector_key(lhs: &str) -> Option<String> {
    match lhs {
        "node.hostname" => Some(HOSTNAME_KEY.to_string()),
        "engine.labels.operatingsystem" => Some(OS_KEY.to_string()),
        _ => lhs.strip_prefix(NODE_LABEL_PREFIX).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(constraints: &[&str]) -> PlacementConfig {
        PlacementConfig {
            constraints: constraints.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[test]
    fn test_recognized_keys() {
        let result = translate_placement(&placement(&[
            "node.hostname == worker-1",
            "engine.labels.operatingsystem == ubuntu 22.04",
            "node.labels.zone != us-east-1a",
        ]));

        assert_eq!(result.positive_constraints.len(), 2);
        assert_eq!(result.positive_constraints[HOSTNAME_KEY], "worker-1");
        assert_eq!(result.positive_constraints[OS_KEY], "ubuntu 22.04");
        assert_eq!(result.negative_constraints.len(), 1);
        assert_eq!(result.negative_constraints["zone"], "us-east-1a");
    }

    #[test]
    fn test_unrecognized_keys_are_dropped() {
        let result = translate_placement(&placement(&[
            "node.role == manager",
            "node.id != abc",
            "node.labels.ssd",
            "garbage",
        ]));

        assert!(result.positive_constraints.is_empty());
        assert!(result.negative_constraints.is_empty());
    }

    #[test]
    fn test_without_spaces() {
        let result = translate_placement(&placement(&["node.labels.disk==ssd"]));
        assert_eq!(result.positive_constraints["disk"], "ssd");
    }

    #[test]
    fn test_empty_placement() {
        let result = translate_placement(&PlacementConfig::default());
        assert_eq!(result, Placement::default());
    }
}
