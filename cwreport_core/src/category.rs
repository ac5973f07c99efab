use crate::error::ReportError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A resource kind the report can be generated for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Running compute instances
    Ec2,
    /// Database instances
    Rds,
    /// Serverless functions
    Lambda,
    /// Application load balancers
    Alb,
    /// Network load balancers
    Nlb,
    /// REST API gateways
    #[serde(rename = "apigateway")]
    ApiGateway,
    /// Available transit gateways
    Tgw,
    /// Available transit gateway attachments
    #[serde(rename = "tgwattachment")]
    TgwAttachment,
}

/// How the identity columns of a row are laid out for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutKind {
    Instance,
    Attachment,
    Generic,
}

impl LayoutKind {
    /// Column headers of the identity prefix, before the metric columns.
    pub fn identity_headers(&self) -> &'static [&'static str] {
        match self {
            LayoutKind::Instance => &[
                "Name",
                "Instance",
                "Type",
                "Hypervisor",
                "Virtualization Type",
                "Architecture",
                "EBS Optimized",
            ],
            LayoutKind::Attachment => &[
                "Attachment ID",
                "TransitGateway ID",
                "Resource Type",
                "Resource ID",
            ],
            LayoutKind::Generic => &["Resource Identifier"],
        }
    }

    pub fn is_bespoke(&self) -> bool {
        !matches!(self, LayoutKind::Generic)
    }
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Lambda,
        Category::Ec2,
        Category::Rds,
        Category::Alb,
        Category::Nlb,
        Category::ApiGateway,
        Category::Tgw,
        Category::TgwAttachment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Ec2 => "ec2",
            Category::Rds => "rds",
            Category::Lambda => "lambda",
            Category::Alb => "alb",
            Category::Nlb => "nlb",
            Category::ApiGateway => "apigateway",
            Category::Tgw => "tgw",
            Category::TgwAttachment => "tgwattachment",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Category::Ec2 => "Running EC2 instances",
            Category::Rds => "RDS database instances",
            Category::Lambda => "Lambda functions",
            Category::Alb => "Application load balancers",
            Category::Nlb => "Network load balancers",
            Category::ApiGateway => "API Gateway REST APIs",
            Category::Tgw => "Available transit gateways",
            Category::TgwAttachment => "Available transit gateway attachments",
        }
    }

    pub fn layout_kind(&self) -> LayoutKind {
        match self {
            Category::Ec2 => LayoutKind::Instance,
            Category::TgwAttachment => LayoutKind::Attachment,
            _ => LayoutKind::Generic,
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|c| c.as_str()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.to_ascii_lowercase())
            .ok_or_else(|| ReportError::UnknownCategory(s.to_string()))
    }
}
