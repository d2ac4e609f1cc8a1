//! AWS Config resource types and the fixed strings AWS stamps on
//! implicitly-created resources.

// AWS Config resource types
pub const CONFIG_COMPLIANCE: &str = "AWS::Config::ResourceCompliance";
pub const ALARM: &str = "AWS::CloudWatch::Alarm";
pub const ASG: &str = "AWS::AutoScaling::AutoScalingGroup";
pub const EBS_VOLUME: &str = "AWS::EC2::Volume";
pub const EC2_FLEET: &str = "AWS::EC2::EC2Fleet";
pub const EC2_INSTANCE: &str = "AWS::EC2::Instance";
pub const EKS_CLUSTER: &str = "AWS::EKS::Cluster";
pub const ELASTIC_BEANSTALK_APPLICATION: &str = "AWS::ElasticBeanstalk::Application";
pub const ELASTICACHE_CLUSTER: &str = "AWS::ElastiCache::CacheCluster";
pub const ELB: &str = "AWS::ElasticLoadBalancing::LoadBalancer";
pub const ELB_V2: &str = "AWS::ElasticLoadBalancingV2::LoadBalancer";
pub const ENI: &str = "AWS::EC2::NetworkInterface";
pub const IAM_POLICY: &str = "AWS::IAM::Policy";
pub const IAM_ROLE: &str = "AWS::IAM::Role";
pub const LAMBDA: &str = "AWS::Lambda::Function";
pub const LAUNCH_TEMPLATE: &str = "AWS::EC2::LaunchTemplate";
pub const NAT_GATEWAY: &str = "AWS::EC2::NatGateway";
pub const NETWORK_ACL: &str = "AWS::EC2::NetworkAcl";
pub const NETWORK_ACL_ENTRY: &str = "AWS::EC2::NetworkAclEntry";
pub const RDS_CLUSTER: &str = "AWS::RDS::DBCluster";
pub const RDS_CLUSTER_SNAPSHOT: &str = "AWS::RDS::DBClusterSnapshot";
pub const RDS_INSTANCE: &str = "AWS::RDS::DBInstance";
pub const ROUTE: &str = "AWS::EC2::Route";
pub const ROUTE53_RECORD_SET: &str = "AWS::Route53::RecordSet";
pub const ROUTE_TABLE: &str = "AWS::EC2::RouteTable";
pub const ROUTE_TABLE_ASSOCIATION: &str = "AWS::EC2::SubnetRouteTableAssociation";
pub const SECURITY_GROUP: &str = "AWS::EC2::SecurityGroup";
pub const STACK: &str = "AWS::CloudFormation::Stack";
pub const TRANSIT_GATEWAY_ATTACHMENT: &str = "AWS::EC2::TransitGatewayAttachment";
pub const VPC_ENDPOINT: &str = "AWS::EC2::VPCEndpoint";

/// Synthetic type for the AWS service behind a service-linked role. Never
/// appears in either source.
pub const SERVICE: &str = "AWS::Service";

// Terraform types with no AWS Config counterpart
pub const TF_ASG_ATTACHMENT: &str = "aws_autoscaling_attachment";
pub const TF_NETWORK_ACL_RULE: &str = "aws_network_acl_rule";
pub const TF_ROLE_POLICY_ATTACHMENT: &str = "aws_iam_role_policy_attachment";
pub const TF_ROUTE: &str = "aws_route";
pub const TF_ROUTE53_RECORD: &str = "aws_route53_record";
pub const TF_SECURITY_GROUP_RULE: &str = "aws_security_group_rule";

// Terraform provider addresses
pub const TF_PROVIDER_LEGACY: &str = "provider.aws";
pub const TF_PROVIDER_REGISTRY: &str = "provider[\"registry.terraform.io/hashicorp/aws\"]";

// Relationship names
pub const REL_CONTAINS: &str = "Contains";
pub const REL_ATTACHED_TO_INSTANCE: &str = "Is attached to Instance";
pub const REL_ATTACHED_TO_ROLE: &str = "Is attached to Role";

// Tags
pub const EKS_CLUSTER_OWNER_TAG_PREFIX: &str = "kubernetes.io/cluster/";
pub const OWNED: &str = "owned";
pub const EKS_ENI_OWNER_TAG: &str = "eks:eni:owner";
pub const EKS_ENI_OWNER_VALUE: &str = "eks-vpc-resource-controller";
pub const K8S_INSTANCE_TAG: &str = "node.k8s.amazonaws.com/instance_id";
pub const ELBV2_CLUSTER_TAG: &str = "elbv2.k8s.aws/cluster";

// Network interface descriptions and types
pub const RDS_ENI_DESCRIPTION: &str = "RDSNetworkInterface";
pub const ELB_PREFIX: &str = "ELB ";
pub const ELB_OWNER: &str = "amazon-elb";
pub const ELB_ARN_PREFIX: &str = "arn:aws:elasticloadbalancing";
pub const NLB_INTERFACE_TYPE: &str = "network_load_balancer";
pub const LAMBDA_PREFIX: &str = "AWS Lambda VPC ENI-";
pub const LAMBDA_INTERFACE_TYPE: &str = "lambda";
pub const NAT_GATEWAY_PREFIX: &str = "Interface for NAT Gateway ";
pub const NAT_GATEWAY_INTERFACE_TYPE: &str = "nat_gateway";
pub const ELASTICACHE_PREFIX: &str = "ElastiCache ";
pub const TRANSIT_GATEWAY_PREFIX: &str = "Network Interface for Transit Gateway Attachment ";
pub const TRANSIT_GATEWAY_INTERFACE_TYPE: &str = "transit_gateway";

// IAM
pub const SERVICE_LINKED_ROLE_PATH_PREFIX: &str = "/aws-service-role/";

// CloudWatch
pub const CLOUDWATCH_NAMESPACE_ELB: &str = "AWS/ELB";
pub const DIMENSION_LOAD_BALANCER_NAME: &str = "LoadBalancerName";
