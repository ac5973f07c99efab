use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Descriptive fields of a compute instance, used for the identity columns.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstanceDetails {
    #[serde(default)]
    pub name: Option<String>,
    pub instance_id: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub hypervisor: String,
    #[serde(default)]
    pub virtualization_type: String,
    #[serde(default)]
    pub architecture: String,
    #[serde(default)]
    pub ebs_optimized: bool,
}

/// A transit gateway attachment together with its parent gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentDetails {
    #[serde(default)]
    pub name: Option<String>,
    pub attachment_id: String,
    pub transit_gateway_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(default)]
    pub resource_id: String,
}

/// One listed resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resource {
    /// Compute instance with its descriptive columns
    Instance(InstanceDetails),

    /// Attachment linked to a parent gateway
    Attachment(AttachmentDetails),

    /// Any resource identified by a single string
    Named { id: String },
}

/// The identifier used to build dimension filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceId {
    Single(String),
    Linked { primary: String, parent: String },
}

impl Resource {
    pub fn named(id: impl Into<String>) -> Self {
        Self::Named { id: id.into() }
    }

    pub fn attachment(attachment_id: impl Into<String>, gateway_id: impl Into<String>) -> Self {
        Self::Attachment(AttachmentDetails {
            attachment_id: attachment_id.into(),
            transit_gateway_id: gateway_id.into(),
            ..Default::default()
        })
    }

    pub fn id(&self) -> ResourceId {
        match self {
            Resource::Instance(details) => ResourceId::Single(details.instance_id.clone()),
            Resource::Attachment(details) => ResourceId::Linked {
                primary: details.attachment_id.clone(),
                parent: details.transit_gateway_id.clone(),
            },
            Resource::Named { id } => ResourceId::Single(id.clone()),
        }
    }
}

impl ResourceId {
    pub fn primary(&self) -> &str {
        match self {
            ResourceId::Single(id) => id,
            ResourceId::Linked { primary, .. } => primary,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Single(id) => f.write_str(id),
            ResourceId::Linked { primary, parent } => write!(f, "{} ({})", primary, parent),
        }
    }
}

/// Returns the part of `arn` following `marker`, e.g. `loadbalancer/` or
/// `transit-gateway/`.
pub fn id_from_arn(arn: &str, marker: &str) -> Result<String> {
    arn.split_once(marker)
        .map(|(_, id)| id.to_string())
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ReportError::Transport(format!("ARN '{}' does not contain '{}'", arn, marker))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ids() {
        assert_eq!(Resource::named("fn-a").id(), ResourceId::Single("fn-a".into()));

        let linked = Resource::attachment("A1", "TGW1").id();
        assert_eq!(linked.primary(), "A1");
        assert_eq!(linked.to_string(), "A1 (TGW1)");
    }

    #[test]
    fn test_id_from_arn() {
        let arn = "arn:aws:elasticloadbalancing:ap-southeast-1:123456789012:loadbalancer/app/web/50dc6c495c0c9188";
        assert_eq!(
            id_from_arn(arn, "loadbalancer/").unwrap(),
            "app/web/50dc6c495c0c9188"
        );

        let tgw = "arn:aws:ec2:ap-southeast-1:123456789012:transit-gateway/tgw-0123";
        assert_eq!(id_from_arn(tgw, "transit-gateway/").unwrap(), "tgw-0123");

        assert!(id_from_arn("arn:aws:ec2:::vpc/vpc-1", "transit-gateway/").is_err());
    }

    #[test]
    fn test_resource_deserializes_from_tagged_json() {
        let json = r#"{"kind": "instance", "instance_id": "i-1", "instance_type": "t3.micro"}"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        match resource {
            Resource::Instance(details) => {
                assert_eq!(details.instance_id, "i-1");
                assert_eq!(details.name, None);
                assert!(!details.ebs_optimized);
            }
            other => panic!("unexpected resource {:?}", other),
        }
    }
}
