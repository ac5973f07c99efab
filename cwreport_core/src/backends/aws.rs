use crate::{
    backends::{Backend, BackendOptions, MetricSource, ResourceLister},
    category::Category,
    error::{ReportError, Result},
    query::{Datapoint, MetricQuery},
    resource::{id_from_arn, AttachmentDetails, InstanceDetails, Resource},
    statistic::Statistic,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudwatch::primitives::DateTime as AwsDateTime;
use aws_sdk_cloudwatch::types::{Dimension, StandardUnit, Statistic as AwsStatistic};
use aws_sdk_ec2::types::{
    Filter, Reservation, TransitGatewayAttachmentState, TransitGatewayState,
};
use aws_sdk_elasticloadbalancingv2::types::LoadBalancerTypeEnum;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Backend talking to CloudWatch and the per-service listing APIs.
pub struct AwsBackend {
    cloudwatch: aws_sdk_cloudwatch::Client,
    ec2: aws_sdk_ec2::Client,
    rds: aws_sdk_rds::Client,
    lambda: aws_sdk_lambda::Client,
    elbv2: aws_sdk_elasticloadbalancingv2::Client,
    apigateway: aws_sdk_apigateway::Client,
}

fn transport<E: std::fmt::Display>(context: &str) -> impl FnOnce(E) -> ReportError + '_ {
    move |e| ReportError::Transport(format!("{}: {}", context, e))
}

fn name_tag<'a>(tags: impl IntoIterator<Item = (Option<&'a str>, Option<&'a str>)>) -> Option<String> {
    tags.into_iter()
        .find(|(key, _)| *key == Some("Name"))
        .and_then(|(_, value)| value.map(str::to_string))
}

impl AwsBackend {
    pub async fn connect(options: &BackendOptions) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(options.region().to_string()));
        if let Some(profile) = &options.profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        info!(
            "Using AWS region {} with {} credentials",
            options.region(),
            options.profile.as_deref().unwrap_or("default")
        );

        Self {
            cloudwatch: aws_sdk_cloudwatch::Client::new(&config),
            ec2: aws_sdk_ec2::Client::new(&config),
            rds: aws_sdk_rds::Client::new(&config),
            lambda: aws_sdk_lambda::Client::new(&config),
            elbv2: aws_sdk_elasticloadbalancingv2::Client::new(&config),
            apigateway: aws_sdk_apigateway::Client::new(&config),
        }
    }

    /// Follows `NextToken` until every page of running instances is read.
    async fn list_instances(&self) -> Result<Vec<Resource>> {
        let mut pages = self
            .ec2
            .describe_instances()
            .filters(
                Filter::builder()
                    .name("instance-state-name")
                    .values("running")
                    .build(),
            )
            .into_paginator()
            .send();

        let mut resources = Vec::new();
        let mut page_count = 0;
        while let Some(page) = pages.next().await {
            let page = page.map_err(transport("DescribeInstances"))?;
            resources.extend(instances_from_reservations(page.reservations()));
            page_count += 1;
        }
        debug!("DescribeInstances returned {} page(s)", page_count);
        Ok(resources)
    }

    async fn list_databases(&self) -> Result<Vec<Resource>> {
        let output = self
            .rds
            .describe_db_instances()
            .send()
            .await
            .map_err(transport("DescribeDBInstances"))?;

        Ok(output
            .db_instances()
            .iter()
            .filter_map(|db| db.db_instance_identifier())
            .map(Resource::named)
            .collect())
    }

    async fn list_functions(&self) -> Result<Vec<Resource>> {
        let output = self
            .lambda
            .list_functions()
            .send()
            .await
            .map_err(transport("ListFunctions"))?;

        Ok(output
            .functions()
            .iter()
            .filter_map(|f| f.function_name())
            .map(Resource::named)
            .collect())
    }

    async fn list_load_balancers(&self, wanted: LoadBalancerTypeEnum) -> Result<Vec<Resource>> {
        let output = self
            .elbv2
            .describe_load_balancers()
            .send()
            .await
            .map_err(transport("DescribeLoadBalancers"))?;

        output
            .load_balancers()
            .iter()
            .filter(|lb| lb.r#type() == Some(&wanted))
            .filter_map(|lb| lb.load_balancer_arn())
            .map(|arn| id_from_arn(arn, "loadbalancer/").map(Resource::named))
            .collect()
    }

    async fn list_rest_apis(&self) -> Result<Vec<Resource>> {
        let output = self
            .apigateway
            .get_rest_apis()
            .send()
            .await
            .map_err(transport("GetRestApis"))?;

        Ok(output
            .items()
            .iter()
            .filter_map(|api| api.name())
            .map(Resource::named)
            .collect())
    }

    async fn list_transit_gateways(&self) -> Result<Vec<Resource>> {
        let output = self
            .ec2
            .describe_transit_gateways()
            .send()
            .await
            .map_err(transport("DescribeTransitGateways"))?;

        output
            .transit_gateways()
            .iter()
            .filter(|gw| gw.state() == Some(&TransitGatewayState::Available))
            .filter_map(|gw| gw.transit_gateway_arn())
            .map(|arn| id_from_arn(arn, "transit-gateway/").map(Resource::named))
            .collect()
    }

    async fn list_attachments(&self) -> Result<Vec<Resource>> {
        let output = self
            .ec2
            .describe_transit_gateway_attachments()
            .send()
            .await
            .map_err(transport("DescribeTransitGatewayAttachments"))?;

        let attachments = output
            .transit_gateway_attachments()
            .iter()
            .filter(|a| a.state() == Some(&TransitGatewayAttachmentState::Available))
            .filter_map(|a| {
                Some(Resource::Attachment(AttachmentDetails {
                    name: name_tag(a.tags().iter().map(|t| (t.key(), t.value()))),
                    attachment_id: a.transit_gateway_attachment_id()?.to_string(),
                    transit_gateway_id: a.transit_gateway_id()?.to_string(),
                    resource_type: a
                        .resource_type()
                        .map(|t| t.as_str().to_string())
                        .unwrap_or_default(),
                    resource_id: a.resource_id().unwrap_or_default().to_string(),
                }))
            })
            .collect();
        Ok(attachments)
    }
}

fn instances_from_reservations(reservations: &[Reservation]) -> Vec<Resource> {
    reservations
        .iter()
        .flat_map(|reservation| reservation.instances())
        .filter_map(|instance| {
            let instance_id = instance.instance_id()?;
            Some(Resource::Instance(InstanceDetails {
                name: name_tag(instance.tags().iter().map(|t| (t.key(), t.value()))),
                instance_id: instance_id.to_string(),
                instance_type: instance
                    .instance_type()
                    .map(|t| t.as_str().to_string())
                    .unwrap_or_default(),
                hypervisor: instance
                    .hypervisor()
                    .map(|h| h.as_str().to_string())
                    .unwrap_or_default(),
                virtualization_type: instance
                    .virtualization_type()
                    .map(|v| v.as_str().to_string())
                    .unwrap_or_default(),
                architecture: instance
                    .architecture()
                    .map(|a| a.as_str().to_string())
                    .unwrap_or_default(),
                ebs_optimized: instance.ebs_optimized().unwrap_or(false),
            }))
        })
        .collect()
}

fn to_aws_time(time: DateTime<Utc>) -> AwsDateTime {
    AwsDateTime::from_secs(time.timestamp())
}

fn from_aws_time(time: &AwsDateTime) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(time.secs(), time.subsec_nanos()).single()
}

fn datapoint_from_aws(dp: &aws_sdk_cloudwatch::types::Datapoint) -> Datapoint {
    let mut values = BTreeMap::new();
    let fields = [
        (Statistic::Average.as_str(), dp.average()),
        (Statistic::Sum.as_str(), dp.sum()),
        (Statistic::Minimum.as_str(), dp.minimum()),
        (Statistic::Maximum.as_str(), dp.maximum()),
        ("SampleCount", dp.sample_count()),
    ];
    for (name, value) in fields {
        if let Some(value) = value {
            values.insert(name.to_string(), value);
        }
    }
    Datapoint {
        timestamp: dp.timestamp().and_then(from_aws_time),
        values,
    }
}

#[async_trait]
impl ResourceLister for AwsBackend {
    async fn list_resources(&self, category: Category) -> Result<Vec<Resource>> {
        match category {
            Category::Ec2 => self.list_instances().await,
            Category::Rds => self.list_databases().await,
            Category::Lambda => self.list_functions().await,
            Category::Alb => {
                self.list_load_balancers(LoadBalancerTypeEnum::Application)
                    .await
            }
            Category::Nlb => self.list_load_balancers(LoadBalancerTypeEnum::Network).await,
            Category::ApiGateway => self.list_rest_apis().await,
            Category::Tgw => self.list_transit_gateways().await,
            Category::TgwAttachment => self.list_attachments().await,
        }
    }
}

#[async_trait]
impl MetricSource for AwsBackend {
    async fn get_metric_statistics(&self, query: &MetricQuery) -> Result<Vec<Datapoint>> {
        let dimensions = query
            .dimensions
            .iter()
            .map(|d| Dimension::builder().name(&d.name).value(&d.value).build())
            .collect::<Vec<_>>();

        debug!(
            "GetMetricStatistics {}/{} {:?}",
            query.namespace, query.metric_name, query.dimensions
        );

        let output = self
            .cloudwatch
            .get_metric_statistics()
            .namespace(&query.namespace)
            .metric_name(&query.metric_name)
            .set_dimensions(Some(dimensions))
            .unit(StandardUnit::from(query.unit.as_str()))
            .period(query.period_seconds as i32)
            .start_time(to_aws_time(query.start))
            .end_time(to_aws_time(query.end))
            .statistics(AwsStatistic::from(query.statistic.as_str()))
            .send()
            .await
            .map_err(transport("GetMetricStatistics"))?;

        Ok(output.datapoints().iter().map(datapoint_from_aws).collect())
    }
}

impl Backend for AwsBackend {
    fn name(&self) -> &str {
        "aws"
    }

    fn as_lister(&self) -> &dyn ResourceLister {
        self
    }

    fn as_source(&self) -> &dyn MetricSource {
        self
    }
}
