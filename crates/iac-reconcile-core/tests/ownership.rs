//! Ownership inference over snapshot-only inputs.

use iac_load::{Snapshot, StateSet, TerraformState};
use iac_reconcile_core::{
    aws, reconcile, reconcile_with, DiagnosticKind, OwnershipEngine, Reconciliation, TypeMap,
};
use serde_json::{json, Value};

fn snapshot(items: Value) -> Snapshot {
    serde_json::from_value(json!({
        "fileVersion": "1.0",
        "configSnapshotId": "test",
        "configurationItems": items,
    }))
    .expect("valid snapshot fixture")
}

fn run(items: Value) -> Reconciliation {
    let types = TypeMap::builtin().unwrap();
    reconcile(&snapshot(items), &StateSet::new(), &types)
}

/// `(type, key)` of the parent of `(resource_type, key)`.
fn parent(result: &Reconciliation, resource_type: &str, key: &str) -> Option<(String, String)> {
    let record = result
        .get(resource_type, key)
        .unwrap_or_else(|| panic!("no record {resource_type} {key}"));
    result
        .parent_of(record)
        .map(|p| (p.resource_type.clone(), p.key().to_string()))
}

fn owned_by(resource_type: &str, key: &str) -> Option<(String, String)> {
    Some((resource_type.to_string(), key.to_string()))
}

// ── Route tables ────────────────────────────────────────────────────────

#[test]
fn route_table_associations_are_synthesized() {
    let result = run(json!([{
        "resourceType": "AWS::EC2::RouteTable",
        "resourceId": "rtb-1",
        "configuration": {
            "associations": [
                {"routeTableAssociationId": "rtbassoc-1", "subnetId": "subnet-1", "main": false},
                {"routeTableAssociationId": "rtbassoc-2", "subnetId": "subnet-2", "main": false}
            ]
        }
    }]));

    for key in ["rtbassoc-1", "rtbassoc-2"] {
        let assoc = result.get(aws::ROUTE_TABLE_ASSOCIATION, key).unwrap();
        assert!(assoc.in_inventory());
        assert!(assoc.type_is_mapped());
        assert!(!assoc.in_declarative_state());
        assert!(assoc.owned());
        assert_eq!(
            parent(&result, aws::ROUTE_TABLE_ASSOCIATION, key),
            owned_by(aws::ROUTE_TABLE, "rtb-1")
        );
    }
    assert_eq!(result.records().len(), 3);
}

// ── Network interfaces ──────────────────────────────────────────────────

#[test]
fn elb_interface_prefers_classic_load_balancer() {
    let result = run(json!([
        {
            "resourceType": "AWS::ElasticLoadBalancing::LoadBalancer",
            "resourceId": "my-lb",
            "resourceName": "my-lb"
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-1",
            "awsRegion": "us-east-1",
            "awsAccountId": "123456789012",
            "configuration": {
                "description": "ELB my-lb",
                "attachment": {"instanceOwnerId": "amazon-elb"}
            }
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-1"),
        owned_by(aws::ELB, "my-lb")
    );
}

#[test]
fn elb_interface_owned_through_ip_association() {
    let result = run(json!([
        {
            "resourceType": "AWS::ElasticLoadBalancing::LoadBalancer",
            "resourceId": "public-lb",
            "resourceName": "public-lb"
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-4",
            "configuration": {
                "description": "ELB public-lb",
                "association": {"ipOwnerId": "amazon-elb"}
            }
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-4"),
        owned_by(aws::ELB, "public-lb")
    );
}

#[test]
fn elb_interface_falls_back_to_v2_arn() {
    let arn = "arn:aws:elasticloadbalancing:us-east-1:123456789012:loadbalancer/net/my-nlb/50dc6c495c0c9188";
    let result = run(json!([
        {
            "resourceType": "AWS::ElasticLoadBalancingV2::LoadBalancer",
            "resourceId": arn,
            "resourceName": "my-nlb",
            "ARN": arn
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-2",
            "awsRegion": "us-east-1",
            "awsAccountId": "123456789012",
            "configuration": {
                "description": "ELB net/my-nlb/50dc6c495c0c9188",
                "interfaceType": "network_load_balancer"
            }
        }
    ]));
    assert_eq!(parent(&result, aws::ENI, "eni-2"), owned_by(aws::ELB_V2, arn));
}

#[test]
fn elb_interface_needs_elb_owner() {
    let result = run(json!([
        {"resourceType": "AWS::ElasticLoadBalancing::LoadBalancer", "resourceId": "my-lb"},
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-1",
            "configuration": {"description": "ELB my-lb"}
        }
    ]));
    assert_eq!(parent(&result, aws::ENI, "eni-1"), None);
}

#[test]
fn lambda_interface_strips_uuid_suffix() {
    let result = run(json!([
        {"resourceType": "AWS::Lambda::Function", "resourceId": "my-func"},
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-3",
            "configuration": {
                "interfaceType": "lambda",
                "description": "AWS Lambda VPC ENI-my-func-0b3c2b5e-9d1a-4c1e-8f4e-1b2c3d4e5f60"
            }
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-3"),
        owned_by(aws::LAMBDA, "my-func")
    );
}

#[test]
fn eks_interface_needs_both_tags() {
    let result = run(json!([
        {"resourceType": "AWS::EKS::Cluster", "resourceId": "prod"},
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-managed",
            "tags": {
                "kubernetes.io/cluster/prod": "owned",
                "eks:eni:owner": "eks-vpc-resource-controller"
            }
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-tagged-only",
            "tags": {"kubernetes.io/cluster/prod": "owned"}
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-managed"),
        owned_by(aws::EKS_CLUSTER, "prod")
    );
    assert_eq!(parent(&result, aws::ENI, "eni-tagged-only"), None);
}

#[test]
fn node_interface_belongs_to_tagged_instance() {
    let result = run(json!([
        {"resourceType": "AWS::EC2::Instance", "resourceId": "i-1"},
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-4",
            "tags": {"node.k8s.amazonaws.com/instance_id": "i-1"}
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-4"),
        owned_by(aws::EC2_INSTANCE, "i-1")
    );
}

#[test]
fn rds_interfaces_share_one_placeholder() {
    let result = run(json!([
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-a",
            "configuration": {"description": "RDSNetworkInterface"}
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-b",
            "configuration": {"description": "RDSNetworkInterface"}
        }
    ]));
    let expected = owned_by(aws::RDS_INSTANCE, "RDSNetworkInterface");
    assert_eq!(parent(&result, aws::ENI, "eni-a"), expected);
    assert_eq!(parent(&result, aws::ENI, "eni-b"), expected);
    assert!(result
        .get(aws::RDS_INSTANCE, "RDSNetworkInterface")
        .unwrap()
        .ephemeral());
}

#[test]
fn description_prefixed_interfaces() {
    let result = run(json!([
        {"resourceType": "AWS::EC2::NatGateway", "resourceId": "nat-1"},
        {"resourceType": "AWS::ElastiCache::CacheCluster", "resourceId": "cache-1"},
        {"resourceType": "AWS::EC2::TransitGatewayAttachment", "resourceId": "tgw-attach-1"},
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-nat",
            "configuration": {
                "interfaceType": "nat_gateway",
                "description": "Interface for NAT Gateway nat-1"
            }
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-cache",
            "configuration": {"interfaceType": "interface", "description": "ElastiCache cache-1"}
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-tgw",
            "configuration": {
                "interfaceType": "transit_gateway",
                "description": "Network Interface for Transit Gateway Attachment tgw-attach-1"
            }
        },
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-wrong-type",
            "configuration": {
                "interfaceType": "interface",
                "description": "Interface for NAT Gateway nat-1"
            }
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-nat"),
        owned_by(aws::NAT_GATEWAY, "nat-1")
    );
    assert_eq!(
        parent(&result, aws::ENI, "eni-cache"),
        owned_by(aws::ELASTICACHE_CLUSTER, "cache-1")
    );
    assert_eq!(
        parent(&result, aws::ENI, "eni-tgw"),
        owned_by(aws::TRANSIT_GATEWAY_ATTACHMENT, "tgw-attach-1")
    );
    assert_eq!(parent(&result, aws::ENI, "eni-wrong-type"), None);
}

#[test]
fn instance_and_endpoint_interfaces() {
    let result = run(json!([
        {"resourceType": "AWS::EC2::NetworkInterface", "resourceId": "eni-primary"},
        {"resourceType": "AWS::EC2::NetworkInterface", "resourceId": "eni-endpoint"},
        {
            "resourceType": "AWS::EC2::Instance",
            "resourceId": "i-1",
            "relationships": [
                {"resourceType": "AWS::EC2::NetworkInterface", "resourceId": "eni-primary", "name": "Contains NetworkInterface"}
            ]
        },
        {
            "resourceType": "AWS::EC2::VPCEndpoint",
            "resourceId": "vpce-1",
            "configuration": {"networkInterfaceIds": ["eni-endpoint", "eni-gone"]}
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-primary"),
        owned_by(aws::EC2_INSTANCE, "i-1")
    );
    assert_eq!(
        parent(&result, aws::ENI, "eni-endpoint"),
        owned_by(aws::VPC_ENDPOINT, "vpce-1")
    );
    assert!(result
        .diagnostics()
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnknownReference && d.message.contains("eni-gone")));
    assert!(result.get(aws::ENI, "eni-gone").is_none());
}

// ── Stacks ──────────────────────────────────────────────────────────────

#[test]
fn stack_owns_contained_and_unsupported_resources() {
    let result = run(json!([
        {"resourceType": "AWS::S3::Bucket", "resourceId": "assets", "resourceName": "assets"},
        {
            "resourceType": "AWS::CloudFormation::Stack",
            "resourceId": "arn:aws:cloudformation:us-east-1:1:stack/app/abc",
            "relationships": [
                {"resourceType": "AWS::S3::Bucket", "resourceName": "assets", "name": "Contains "},
                {"resourceType": "AWS::SQS::Queue", "resourceId": "jobs", "name": "Contains"},
                {"resourceType": "AWS::EC2::VPC", "resourceId": "vpc-1", "name": "Is associated with"}
            ],
            "supplementaryConfiguration": {
                "unsupportedResources": [
                    {"resourceType": "AWS::Route53::RecordSet", "resourceId": "www.example.com"}
                ]
            }
        }
    ]));
    let stack = owned_by(
        aws::STACK,
        "arn:aws:cloudformation:us-east-1:1:stack/app/abc",
    );
    assert_eq!(parent(&result, "AWS::S3::Bucket", "assets"), stack);
    assert_eq!(parent(&result, "AWS::SQS::Queue", "jobs"), stack);
    assert_eq!(parent(&result, aws::ROUTE53_RECORD_SET, "www.example.com"), stack);
    assert!(result.get("AWS::EC2::VPC", "vpc-1").is_none());

    // placeholders are owned but ephemeral until a source reports them
    let queue = result.get("AWS::SQS::Queue", "jobs").unwrap();
    assert!(queue.owned());
    assert!(queue.ephemeral());
}

#[test]
fn name_only_contained_resource_correlates_by_name() {
    let snapshot = snapshot(json!([{
        "resourceType": "AWS::CloudFormation::Stack",
        "resourceId": "stack-1",
        "relationships": [
            {"resourceType": "AWS::SQS::Queue", "resourceName": "jobs", "name": "Contains"}
        ]
    }]));
    let state: TerraformState = serde_json::from_value(json!({
        "version": 4,
        "resources": [{
            "mode": "managed", "type": "aws_sqs_queue", "name": "jobs", "provider": "provider.aws",
            "instances": [{"attributes": {
                "id": "https://sqs.us-east-1.amazonaws.com/123456789012/jobs",
                "name": "jobs"
            }}]
        }]
    }))
    .unwrap();
    let mut states = StateSet::new();
    states.insert("queues.tfstate".to_string(), state);
    let result = reconcile(&snapshot, &states, &TypeMap::builtin().unwrap());

    let queues: Vec<_> = result
        .records()
        .iter()
        .filter(|r| r.resource_type == "AWS::SQS::Queue")
        .collect();
    assert_eq!(queues.len(), 1);
    let queue = queues[0];
    assert_eq!(queue.resource_name, "jobs");
    assert!(queue.in_declarative_state());
    assert!(!queue.ephemeral());
    assert_eq!(
        result.parent_of(queue).map(|p| p.key().to_string()),
        Some("stack-1".to_string())
    );
}

#[test]
fn stack_containment_takes_precedence_over_heuristics() {
    let result = run(json!([
        {
            "resourceType": "AWS::EC2::Instance",
            "resourceId": "i-1",
            "relationships": [
                {"resourceType": "AWS::EC2::NetworkInterface", "resourceId": "eni-1", "name": "Contains NetworkInterface"}
            ]
        },
        {"resourceType": "AWS::EC2::NetworkInterface", "resourceId": "eni-1"},
        {
            "resourceType": "AWS::CloudFormation::Stack",
            "resourceId": "stack-1",
            "relationships": [
                {"resourceType": "AWS::EC2::NetworkInterface", "resourceId": "eni-1", "name": "Contains"}
            ]
        }
    ]));
    assert_eq!(
        parent(&result, aws::ENI, "eni-1"),
        owned_by(aws::STACK, "stack-1")
    );
}

#[test]
fn contained_relationship_without_type_is_reported() {
    let result = run(json!([{
        "resourceType": "AWS::CloudFormation::Stack",
        "resourceId": "stack-1",
        "relationships": [{"resourceId": "x", "name": "Contains"}]
    }]));
    assert_eq!(result.records().len(), 1);
    assert_eq!(result.diagnostics()[0].kind, DiagnosticKind::EmptyResourceType);
}

// ── Compute and storage ─────────────────────────────────────────────────

#[test]
fn volume_cluster_tag_beats_attachment() {
    let result = run(json!([
        {"resourceType": "AWS::EKS::Cluster", "resourceId": "prod"},
        {"resourceType": "AWS::EC2::Instance", "resourceId": "i-1"},
        {
            "resourceType": "AWS::EC2::Volume",
            "resourceId": "vol-attached",
            "relationships": [
                {"resourceType": "AWS::EC2::Instance", "resourceId": "i-1", "name": "Is attached to Instance"}
            ]
        },
        {
            "resourceType": "AWS::EC2::Volume",
            "resourceId": "vol-pvc",
            "tags": {"kubernetes.io/cluster/prod": "owned"},
            "relationships": [
                {"resourceType": "AWS::EC2::Instance", "resourceId": "i-1", "name": "Is attached to Instance"}
            ]
        }
    ]));
    assert_eq!(
        parent(&result, aws::EBS_VOLUME, "vol-attached"),
        owned_by(aws::EC2_INSTANCE, "i-1")
    );
    assert_eq!(
        parent(&result, aws::EBS_VOLUME, "vol-pvc"),
        owned_by(aws::EKS_CLUSTER, "prod")
    );
}

#[test]
fn asg_owns_its_instances() {
    let result = run(json!([
        {"resourceType": "AWS::EC2::Instance", "resourceId": "i-1"},
        {"resourceType": "AWS::EC2::Instance", "resourceId": "i-2"},
        {
            "resourceType": "AWS::AutoScaling::AutoScalingGroup",
            "resourceId": "arn:aws:autoscaling:us-east-1:1:autoScalingGroup:abc:autoScalingGroupName/web",
            "resourceName": "web",
            "configuration": {"instances": [{"instanceId": "i-1"}, {"instanceId": "i-9"}]}
        }
    ]));
    assert_eq!(
        parent(&result, aws::EC2_INSTANCE, "i-1").map(|(t, _)| t),
        Some(aws::ASG.to_string())
    );
    assert_eq!(parent(&result, aws::EC2_INSTANCE, "i-2"), None);
    assert!(result
        .diagnostics()
        .iter()
        .any(|d| d.kind == DiagnosticKind::UnknownReference && d.message.contains("i-9")));
}

#[test]
fn alarm_fleet_and_snapshot_owners() {
    let result = run(json!([
        {"resourceType": "AWS::ElasticLoadBalancing::LoadBalancer", "resourceId": "web-lb"},
        {"resourceType": "AWS::EC2::LaunchTemplate", "resourceId": "lt-1"},
        {"resourceType": "AWS::RDS::DBCluster", "resourceId": "cluster-abc", "resourceName": "orders"},
        {
            "resourceType": "AWS::CloudWatch::Alarm",
            "resourceId": "alarm-1",
            "configuration": {
                "namespace": "AWS/ELB",
                "dimensions": [{"name": "LoadBalancerName", "value": "web-lb"}]
            }
        },
        {
            "resourceType": "AWS::CloudWatch::Alarm",
            "resourceId": "alarm-2",
            "configuration": {
                "namespace": "AWS/EC2",
                "dimensions": [{"name": "LoadBalancerName", "value": "web-lb"}]
            }
        },
        {
            "resourceType": "AWS::EC2::EC2Fleet",
            "resourceId": "fleet-1",
            "configuration": {
                "launchTemplateConfigs": [{"launchTemplateSpecification": {"launchTemplateId": "lt-1"}}]
            }
        },
        {
            "resourceType": "AWS::RDS::DBClusterSnapshot",
            "resourceId": "snap-1",
            "configuration": {"dBClusterIdentifier": "orders"}
        }
    ]));
    assert_eq!(
        parent(&result, aws::ALARM, "alarm-1"),
        owned_by(aws::ELB, "web-lb")
    );
    assert_eq!(parent(&result, aws::ALARM, "alarm-2"), None);
    assert_eq!(
        parent(&result, aws::EC2_FLEET, "fleet-1"),
        owned_by(aws::LAUNCH_TEMPLATE, "lt-1")
    );
    assert_eq!(
        parent(&result, aws::RDS_CLUSTER_SNAPSHOT, "snap-1"),
        owned_by(aws::RDS_CLUSTER, "cluster-abc")
    );
}

// ── Clusters ────────────────────────────────────────────────────────────

#[test]
fn cluster_tagged_security_groups_and_load_balancers() {
    let result = run(json!([
        {"resourceType": "AWS::EKS::Cluster", "resourceId": "prod"},
        {
            "resourceType": "AWS::EC2::SecurityGroup",
            "resourceId": "sg-1",
            "tags": {"kubernetes.io/cluster/prod": "owned"}
        },
        {
            "resourceType": "AWS::ElasticLoadBalancing::LoadBalancer",
            "resourceId": "k8s-lb",
            "tags": {"kubernetes.io/cluster/prod": "owned"}
        },
        {
            "resourceType": "AWS::ElasticLoadBalancingV2::LoadBalancer",
            "resourceId": "arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/k8s/1",
            "tags": {"elbv2.k8s.aws/cluster": "prod"}
        },
        {
            "resourceType": "AWS::EC2::SecurityGroup",
            "resourceId": "sg-shared",
            "tags": {"kubernetes.io/cluster/prod": "shared"}
        }
    ]));
    let cluster = owned_by(aws::EKS_CLUSTER, "prod");
    assert_eq!(parent(&result, aws::SECURITY_GROUP, "sg-1"), cluster);
    assert_eq!(parent(&result, aws::ELB, "k8s-lb"), cluster);
    assert_eq!(
        parent(
            &result,
            aws::ELB_V2,
            "arn:aws:elasticloadbalancing:us-east-1:1:loadbalancer/app/k8s/1"
        ),
        cluster
    );
    assert_eq!(parent(&result, aws::SECURITY_GROUP, "sg-shared"), None);
}

// ── IAM ─────────────────────────────────────────────────────────────────

#[test]
fn service_linked_roles_share_synthetic_parent() {
    let result = run(json!([
        {
            "resourceType": "AWS::IAM::Role",
            "resourceId": "AROA1",
            "resourceName": "AWSServiceRoleForElasticBeanstalk",
            "configuration": {"path": "/aws-service-role/elasticbeanstalk.amazonaws.com/"}
        },
        {
            "resourceType": "AWS::IAM::Role",
            "resourceId": "AROA2",
            "resourceName": "AWSServiceRoleForElasticBeanstalkManagedUpdates",
            "configuration": {"path": "/aws-service-role/elasticbeanstalk.amazonaws.com/"}
        },
        {
            "resourceType": "AWS::IAM::Role",
            "resourceId": "AROA3",
            "configuration": {"path": "/"}
        }
    ]));
    let service = owned_by(aws::SERVICE, "elasticbeanstalk.amazonaws.com");
    assert_eq!(parent(&result, aws::IAM_ROLE, "AROA1"), service);
    assert_eq!(parent(&result, aws::IAM_ROLE, "AROA2"), service);
    assert_eq!(parent(&result, aws::IAM_ROLE, "AROA3"), None);

    let services: Vec<_> = result
        .records()
        .iter()
        .filter(|r| r.resource_type == aws::SERVICE)
        .collect();
    assert_eq!(services.len(), 1);
    assert!(services[0].ephemeral());
    assert!(!services[0].type_is_mapped());
}

// ── Engine ──────────────────────────────────────────────────────────────

#[test]
fn empty_rule_set_assigns_nothing() {
    let types = TypeMap::builtin().unwrap();
    let snap = snapshot(json!([
        {"resourceType": "AWS::EC2::Instance", "resourceId": "i-1"},
        {
            "resourceType": "AWS::EC2::NetworkInterface",
            "resourceId": "eni-1",
            "tags": {"node.k8s.amazonaws.com/instance_id": "i-1"}
        }
    ]));
    let result = reconcile_with(&snap, &StateSet::new(), &types, &OwnershipEngine::empty());
    assert!(result.records().iter().all(|r| r.parent().is_none()));
}

#[test]
fn snapshot_defects_are_diagnostics() {
    let result = run(json!([
        {"resourceType": "", "resourceId": "x"},
        {"resourceType": "AWS::S3::Bucket", "resourceName": "nameless"},
        {"resourceType": "AWS::Config::ResourceCompliance", "resourceId": "c-1"},
        {"resourceType": "AWS::S3::Bucket", "resourceId": "ok"}
    ]));
    assert_eq!(result.records().len(), 1);
    let kinds: Vec<_> = result.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(
        kinds,
        vec![DiagnosticKind::EmptyResourceType, DiagnosticKind::MissingIdentity]
    );
}
