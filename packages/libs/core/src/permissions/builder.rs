//! 정책 생성기
//!
//! `ScopeRequest`를 IAM 정책 문서로 변환합니다.
//!
//! 1. global action이 있으면 리소스 `*`에 대한 Allow statement 하나
//! 2. 버킷마다 Allow statement 하나: 리소스는 버킷 ARN + 객체 ARN(prefix별 또는 `bucket/*`)
//!
//! 버킷 ARN과 객체 ARN을 한 statement에 함께 넣어, 목록 조회(버킷 단위)와
//! 객체 읽기/쓰기(객체 단위)를 호출자가 따로 나열하지 않아도 되게 합니다.

use serde_json::json;

use super::arn::{bucket_arn, object_prefix_arn, ALL_RESOURCES, DEFAULT_NAMESPACE};
use super::policy::{ConditionBlock, PolicyDocument, Statement};
use super::scope::{ScopeConditions, ScopeRequest};
use crate::error::Result;

/// IP 허용 목록 조건 연산자
pub const CONDITION_IP_ADDRESS: &str = "IpAddress";

/// 숫자 상한 조건 연산자
pub const CONDITION_NUMERIC_LTE: &str = "NumericLessThanEquals";

/// 객체 크기 조건 키
pub const CONTENT_LENGTH_KEY: &str = "s3:content-length";

/// 정책 생성기
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyBuilder {
    namespace: String,
}

impl Default for PolicyBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

impl PolicyBuilder {
    /// ARN 네임스페이스를 지정해 생성
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    /// ARN 네임스페이스
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 스코프 요청으로 정책 문서 생성
    pub fn build(&self, req: &ScopeRequest) -> Result<PolicyDocument> {
        req.validate()?;

        let condition = req
            .conditions
            .as_ref()
            .map(|conditions| self.build_conditions(conditions));

        let mut policy = PolicyDocument::new();

        if !req.global_actions.is_empty() {
            policy.push(
                Statement::allow(req.global_actions.clone(), ALL_RESOURCES)
                    .with_condition(condition.clone()),
            );
        }

        for bucket in &req.buckets {
            let mut resources = vec![bucket_arn(&self.namespace, &bucket.bucket_id)];

            if bucket.prefixes.is_empty() {
                resources.push(object_prefix_arn(&self.namespace, &bucket.bucket_id, ""));
            } else {
                resources.extend(
                    bucket
                        .prefixes
                        .iter()
                        .map(|prefix| object_prefix_arn(&self.namespace, &bucket.bucket_id, prefix)),
                );
            }

            policy.push(
                Statement::allow(bucket.actions.clone(), resources).with_condition(condition.clone()),
            );
        }

        tracing::debug!(
            org_id = %req.org_id,
            statements = policy.statements.len(),
            "built scoped policy"
        );

        Ok(policy)
    }

    /// 조건 블록 생성
    ///
    /// 인식하는 조건만 옮기고, 값이 비어 있는 조건은 생략합니다.
    fn build_conditions(&self, conditions: &ScopeConditions) -> ConditionBlock {
        let mut block = ConditionBlock::new();

        if !conditions.ip_allowlist.is_empty() {
            block.insert(
                CONDITION_IP_ADDRESS.to_string(),
                json!({ format!("{}:SourceIp", self.namespace): conditions.ip_allowlist }),
            );
        }

        if let Some(max) = conditions.max_object_size.filter(|max| *max > 0) {
            block.insert(
                CONDITION_NUMERIC_LTE.to_string(),
                json!({ CONTENT_LENGTH_KEY: max }),
            );
        }

        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::policy::{Effect, OneOrMany};
    use crate::permissions::scope::BucketScope;

    fn bucket(id: &str, actions: &[&str], prefixes: &[&str]) -> BucketScope {
        BucketScope {
            bucket_id: id.to_string(),
            actions: actions.iter().map(|s| s.to_string()).collect(),
            prefixes: prefixes.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_global_and_bucket_scopes() {
        let mut req = ScopeRequest::new("org_1");
        req.global_actions = vec!["s3:ListAllMyBuckets".to_string()];
        req.buckets = vec![bucket("b1", &["s3:GetObject"], &["docs/"])];

        let policy = PolicyBuilder::default().build(&req).unwrap();
        assert_eq!(policy.statements.len(), 2);

        let global = &policy.statements[0];
        assert_eq!(global.effect, Effect::Allow);
        assert_eq!(global.action.as_slice(), ["s3:ListAllMyBuckets".to_string()]);
        assert_eq!(global.resource, OneOrMany::Single("*".to_string()));

        let scoped = &policy.statements[1];
        assert_eq!(scoped.effect, Effect::Allow);
        assert_eq!(scoped.action.as_slice(), ["s3:GetObject".to_string()]);
        assert_eq!(
            scoped.resource.as_slice(),
            ["arn:clove:s3:::b1".to_string(), "arn:clove:s3:::b1/docs/*".to_string()]
        );
        assert!(scoped.condition.is_none());
    }

    #[test]
    fn test_bucket_without_prefixes_covers_all_objects() {
        let mut req = ScopeRequest::new("org_1");
        req.buckets = vec![bucket("b1", &["s3:ListBucket", "s3:GetObject"], &[])];

        let policy = PolicyBuilder::default().build(&req).unwrap();
        assert_eq!(policy.statements.len(), 1);
        assert_eq!(
            policy.statements[0].resource.as_slice(),
            ["arn:clove:s3:::b1".to_string(), "arn:clove:s3:::b1/*".to_string()]
        );
    }

    #[test]
    fn test_multiple_prefixes() {
        let mut req = ScopeRequest::new("org_1");
        req.buckets = vec![bucket("b1", &["s3:PutObject"], &["a/", "b/"])];

        let policy = PolicyBuilder::new("acme").build(&req).unwrap();
        assert_eq!(
            policy.statements[0].resource.as_slice(),
            [
                "arn:acme:s3:::b1".to_string(),
                "arn:acme:s3:::b1/a/*".to_string(),
                "arn:acme:s3:::b1/b/*".to_string(),
            ]
        );
    }

    #[test]
    fn test_conditions_attached_to_every_statement() {
        let mut req = ScopeRequest::new("org_1");
        req.global_actions = vec!["s3:ListAllMyBuckets".to_string()];
        req.buckets = vec![bucket("b1", &["s3:PutObject"], &[])];
        req.conditions = Some(ScopeConditions {
            ip_allowlist: vec!["10.0.0.1".to_string()],
            max_object_size: Some(1024),
        });

        let policy = PolicyBuilder::default().build(&req).unwrap();
        for statement in &policy.statements {
            let condition = statement.condition.as_ref().unwrap();
            assert_eq!(
                condition[CONDITION_IP_ADDRESS],
                json!({"clove:SourceIp": ["10.0.0.1"]})
            );
            assert_eq!(condition[CONDITION_NUMERIC_LTE], json!({"s3:content-length": 1024}));
        }

        let json = policy.to_json().unwrap();
        assert!(json.contains(r#""Condition":{"IpAddress":{"clove:SourceIp":["10.0.0.1"]},"NumericLessThanEquals":{"s3:content-length":1024}}"#));
    }

    #[test]
    fn test_empty_conditions_are_omitted() {
        let mut req = ScopeRequest::new("org_1");
        req.global_actions = vec!["s3:ListAllMyBuckets".to_string()];
        req.conditions = Some(ScopeConditions {
            ip_allowlist: vec![],
            max_object_size: Some(0),
        });

        let policy = PolicyBuilder::default().build(&req).unwrap();
        assert!(policy.statements[0].condition.is_none());
    }

    #[test]
    fn test_empty_request_builds_empty_policy() {
        let policy = PolicyBuilder::default().build(&ScopeRequest::new("org_1")).unwrap();
        assert!(policy.statements.is_empty());
    }

    #[test]
    fn test_invalid_request_rejected() {
        let result = PolicyBuilder::default().build(&ScopeRequest::new(""));
        assert!(result.is_err());
    }
}
